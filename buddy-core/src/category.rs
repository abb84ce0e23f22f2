//! Deterministic keyword categorization of transaction descriptions.
//!
//! A description is lowercased, tokenized, stripped of stopwords and
//! non-alphabetic tokens, and matched against an ordered [`CategoryTable`].
//! The first category whose keyword set intersects the tokens wins.

use std::collections::BTreeSet;
use std::sync::Arc;

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::stopwords::StopWords;

/// Label returned for every record typed as income.
pub const INCOME: &str = "Income";
/// Catch-all label, always the last row of a table.
pub const OTHER: &str = "Other";

/// Word tokens keep internal `.`, `'` and `-` joins ("booking.com", "o'brien");
/// any other non-space character stands alone.
const WORD_PATTERN: &str = r"\w+(?:[.'\-]\w+)*|[^\w\s]";

/// Contractions split off the end of a word token, Treebank style.
const CLITICS: &[&str] = &["n't", "'s", "'m", "'d", "'re", "'ve", "'ll"];

const STANDARD_RULES: &[(&str, &[&str])] = &[
    (
        "Transport",
        &[
            "uber", "lyft", "ola", "rapido", "taxi", "auto", "rickshaw", "subway", "metro",
            "bus", "train", "airline", "flight", "airways", "indigo", "vistara", "gas",
            "fuel", "petrol", "diesel", "cng", "parking", "toll", "fastag", "airport",
        ],
    ),
    (
        "Food & Groceries",
        &[
            "food", "grocery", "groceries", "restaurant", "cafe", "coffee", "meal", "lunch",
            "dinner", "breakfast", "supermarket", "walmart", "target", "costco", "kroger",
            "bigbasket", "blinkit", "zepto", "grofers", "swiggy", "zomato", "ubereats",
            "doordash", "pizza", "burger", "sushi", "starbucks", "ccd", "delivery",
            "receipt", "ate",
        ],
    ),
    (
        "Health & Wellness",
        &[
            "health", "pharmacy", "doctor", "hospital", "medical", "clinic", "dentist",
            "medicine", "cvs", "walgreens", "apollo", "medplus", "netmeds", "pharmeasy",
            "wellness", "gym", "fitness", "cult.fit", "yoga", "vitamins", "supplement",
        ],
    ),
    (
        "Utilities & Bills",
        &[
            "utility", "electric", "electricity", "power", "water", "internet", "phone",
            "bill", "comcast", "verizon", "att", "airtel", "jio", "vi", "vodafone",
            "broadband", "wifi", "gas", "sewage", "recharge", "mobile", "postpaid",
            "prepaid",
        ],
    ),
    (
        "Entertainment & Subscriptions",
        &[
            "entertainment", "movie", "movies", "cinema", "tickets", "bookmyshow", "paytm",
            "pvr", "inox", "spotify", "netflix", "hulu", "amazon", "prime", "disney",
            "hotstar", "zee5", "sony", "youtube", "concert", "game", "games", "steam",
            "playstation", "psn", "xbox", "nintendo", "premium",
        ],
    ),
    (
        "Shopping & Personal",
        &[
            "shopping", "clothes", "clothing", "apparel", "shoes", "fashion", "amazon",
            "flipkart", "myntra", "ajio", "nykaa", "meesho", "trends", "lifestyle", "mall",
            "store", "electronics", "gadget", "apple", "samsung", "croma", "reliance",
            "digital",
        ],
    ),
    (
        "Housing & Rent",
        &[
            "rent", "mortgage", "emi", "loan", "housing", "apartment", "maintenance",
            "property", "tax", "realtor",
        ],
    ),
    (
        "Insurance",
        &[
            "insurance", "lic", "policy", "premium", "bajaj", "allianz", "hdfc", "ergo",
            "icici", "lombard",
        ],
    ),
    (
        "Personal Care",
        &[
            "salon", "haircut", "barber", "cosmetics", "toiletries", "beauty", "parlour",
            "spa", "grooming",
        ],
    ),
    (
        "Education",
        &[
            "tuition", "school", "college", "university", "books", "stationery", "udemy",
            "coursera", "fee", "fees",
        ],
    ),
    (
        "Gifts & Donations",
        &[
            "gift", "donation", "charity", "present", "birthday", "wedding", "unicef",
            "give", "ngo",
        ],
    ),
    (
        "Fees & Charges",
        &[
            "fee", "charge", "bank", "atm", "withdrawal", "late", "penalty", "interest",
            "service",
        ],
    ),
    (
        "Investments & Savings",
        &[
            "investment", "mutual", "fund", "sip", "stocks", "equity", "zerodha", "groww",
            "upstox", "crypto",
        ],
    ),
    (
        "Travel",
        &[
            "travel", "hotel", "booking.com", "makemytrip", "mmt", "goibibo", "airbnb",
            "yatra", "vacation", "holiday",
        ],
    ),
    (OTHER, &["other"]),
];

/// One row of the table: a category name and its keywords.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRule {
    pub name: String,
    pub keywords: BTreeSet<String>,
}

impl CategoryRule {
    pub fn new<I, S>(name: impl Into<String>, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            name: name.into(),
            keywords: keywords
                .into_iter()
                .map(|k| k.as_ref().trim().to_lowercase())
                .filter(|k| !k.is_empty())
                .collect(),
        }
    }

    /// True when any keyword appears among the tokens.
    pub fn matches(&self, tokens: &BTreeSet<String>) -> bool {
        !self.keywords.is_disjoint(tokens)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableError {
    #[error("category name must not be empty")]
    EmptyName,
    #[error("duplicate category {0:?}")]
    Duplicate(String),
    #[error("\"Income\" is reserved for income records")]
    ReservedIncome,
    #[error("\"Other\" must be the last category")]
    OtherNotLast,
}

/// Ordered category rules ending with [`OTHER`]. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryTable {
    rules: Vec<CategoryRule>,
}

impl CategoryTable {
    /// Validate a caller-supplied ordering. `Other` is appended when missing.
    pub fn new(mut rules: Vec<CategoryRule>) -> Result<Self, TableError> {
        for rule in rules.iter_mut() {
            rule.name = rule.name.trim().to_string();
        }
        let mut seen = BTreeSet::new();
        for (i, rule) in rules.iter().enumerate() {
            let name = rule.name.as_str();
            if name.is_empty() {
                return Err(TableError::EmptyName);
            }
            if name == INCOME {
                return Err(TableError::ReservedIncome);
            }
            if name == OTHER && i + 1 != rules.len() {
                return Err(TableError::OtherNotLast);
            }
            if !seen.insert(name.to_string()) {
                return Err(TableError::Duplicate(name.to_string()));
            }
        }
        if !seen.contains(OTHER) {
            rules.push(CategoryRule::new(OTHER, ["other"]));
        }
        tracing::debug!(categories = rules.len(), "category table built");
        Ok(Self { rules })
    }

    /// The built-in table.
    pub fn standard() -> Self {
        Self {
            rules: STANDARD_RULES
                .iter()
                .map(|(name, keywords)| CategoryRule::new(*name, keywords.iter()))
                .collect(),
        }
    }

    pub fn rules(&self) -> &[CategoryRule] {
        &self.rules
    }

    /// Category names in match order, `Other` last.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.rules.iter().map(|r| r.name.as_str())
    }

    /// First matching category in table order.
    pub fn first_match(&self, tokens: &BTreeSet<String>) -> Option<&str> {
        self.rules
            .iter()
            .find(|r| r.matches(tokens))
            .map(|r| r.name.as_str())
    }

    /// `Income` followed by every table category.
    pub fn all_categories(&self) -> Vec<&str> {
        std::iter::once(INCOME).chain(self.names()).collect()
    }

    /// Categories a spending goal can target.
    pub fn expense_categories(&self) -> Vec<&str> {
        self.names().collect()
    }

    pub fn is_valid_category(&self, name: &str) -> bool {
        name == INCOME || self.names().any(|n| n == name)
    }
}

impl Default for CategoryTable {
    fn default() -> Self {
        Self::standard()
    }
}

/// Which tokenization path a [`Categorizer`] runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenizerMode {
    /// Word tokens, stopword and punctuation filtering.
    Primary,
    /// Lowercase whitespace split, no filtering.
    Degraded,
}

#[derive(Debug, Clone)]
enum Tokenizer {
    Primary { word: Regex, stopwords: Arc<StopWords> },
    Degraded,
}

impl Tokenizer {
    fn build(stopwords: Option<Arc<StopWords>>) -> Self {
        let Some(stopwords) = stopwords else {
            return Tokenizer::Degraded;
        };
        match Regex::new(WORD_PATTERN) {
            Ok(word) => Tokenizer::Primary { word, stopwords },
            Err(_) => Tokenizer::Degraded,
        }
    }

    fn tokens(&self, description: &str) -> BTreeSet<String> {
        let lower = description.to_lowercase();
        match self {
            Tokenizer::Primary { word, stopwords } => word
                .find_iter(&lower)
                .flat_map(|m| split_clitic(m.as_str()))
                .flatten()
                .filter(|t| !stopwords.contains(t))
                .filter(|t| !is_punctuation(t))
                .filter(|t| t.chars().all(char::is_alphabetic))
                .map(str::to_string)
                .collect(),
            Tokenizer::Degraded => lower.split_whitespace().map(str::to_string).collect(),
        }
    }
}

/// "uber's" -> "uber", "'s"; "don't" -> "do", "n't".
fn split_clitic(word: &str) -> [Option<&str>; 2] {
    for clitic in CLITICS {
        if let Some(stem) = word.strip_suffix(clitic) {
            if !stem.is_empty() {
                return [Some(stem), Some(&word[stem.len()..])];
            }
        }
    }
    [Some(word), None]
}

fn is_punctuation(token: &str) -> bool {
    let mut chars = token.chars();
    matches!((chars.next(), chars.next()), (Some(c), None) if c.is_ascii_punctuation())
}

/// Maps (description, transaction type) to a category label.
///
/// Holds only shared read-only state, so one instance can serve any number of
/// threads.
#[derive(Debug, Clone)]
pub struct Categorizer {
    table: Arc<CategoryTable>,
    tokenizer: Tokenizer,
}

impl Categorizer {
    /// Without stopwords the categorizer runs in [`TokenizerMode::Degraded`].
    pub fn new(table: Arc<CategoryTable>, stopwords: Option<Arc<StopWords>>) -> Self {
        Self {
            table,
            tokenizer: Tokenizer::build(stopwords),
        }
    }

    /// Standard table with the built-in English stopwords.
    pub fn standard() -> Self {
        Self::new(
            Arc::new(CategoryTable::standard()),
            Some(Arc::new(StopWords::english())),
        )
    }

    pub fn mode(&self) -> TokenizerMode {
        match self.tokenizer {
            Tokenizer::Primary { .. } => TokenizerMode::Primary,
            Tokenizer::Degraded => TokenizerMode::Degraded,
        }
    }

    pub fn table(&self) -> &CategoryTable {
        &self.table
    }

    /// The deduplicated token set matching runs against.
    pub fn tokens(&self, description: &str) -> BTreeSet<String> {
        self.tokenizer.tokens(description)
    }

    /// Any transaction type other than exactly `"Income"` is keyword matched.
    pub fn categorize(&self, description: &str, transaction_type: &str) -> &str {
        if transaction_type == INCOME {
            return INCOME;
        }
        let tokens = self.tokens(description);
        self.table.first_match(&tokens).unwrap_or(OTHER)
    }

    /// A missing description is treated as empty text.
    pub fn categorize_opt(&self, description: Option<&str>, transaction_type: &str) -> &str {
        self.categorize(description.unwrap_or_default(), transaction_type)
    }
}

impl Default for Categorizer {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expense(c: &Categorizer, desc: &str) -> String {
        c.categorize(desc, "Expense").to_string()
    }

    #[test]
    fn test_income_short_circuits_keywords() {
        let c = Categorizer::standard();
        assert_eq!(c.categorize("uber ride", "Income"), "Income");
        assert_eq!(c.categorize("", "Income"), "Income");
        assert_eq!(c.categorize("rent netflix pizza", "Income"), "Income");
    }

    #[test]
    fn test_income_match_is_exact() {
        let c = Categorizer::standard();
        assert_eq!(c.categorize("uber ride", "income"), "Transport");
        assert_eq!(c.categorize("uber ride", "Refund"), "Transport");
        assert_eq!(c.categorize("salary", "Refund"), "Other");
    }

    #[test]
    fn test_empty_and_symbol_only_fall_through() {
        let c = Categorizer::standard();
        assert_eq!(expense(&c, ""), "Other");
        assert_eq!(expense(&c, "!!!123"), "Other");
        assert_eq!(expense(&c, "   \t "), "Other");
        assert_eq!(c.categorize_opt(None, "Expense"), "Other");
    }

    #[test]
    fn test_first_match_wins() {
        let c = Categorizer::standard();
        assert_eq!(expense(&c, "uber food delivery"), "Transport");
        // gas is in Transport and Utilities & Bills
        assert_eq!(expense(&c, "gas bill"), "Transport");
        // amazon is in Entertainment and Shopping
        assert_eq!(expense(&c, "Amazon order"), "Entertainment & Subscriptions");
        // fee is in Education and Fees & Charges
        assert_eq!(expense(&c, "late fee"), "Education");
        assert_eq!(expense(&c, "late penalty"), "Fees & Charges");
    }

    #[test]
    fn test_case_insensitive_whole_tokens() {
        let c = Categorizer::standard();
        assert_eq!(expense(&c, "UBER ride"), "Transport");
        assert_eq!(expense(&c, "suburban"), "Other");
        assert_eq!(expense(&c, "Paid the uber."), "Transport");
        assert_eq!(expense(&c, "Swiggy order #4411"), "Food & Groceries");
    }

    #[test]
    fn test_non_alphabetic_tokens_dropped() {
        let c = Categorizer::standard();
        // mixed alphanumerics never match
        assert_eq!(expense(&c, "uber2 zee5"), "Other");
        // dotted keywords never survive the alphabetic filter
        assert_eq!(expense(&c, "booking.com stay"), "Other");
        let tokens = c.tokens("The Uber, to the AIRPORT 42!");
        let expected: BTreeSet<String> =
            ["uber", "airport"].iter().map(|s| s.to_string()).collect();
        assert_eq!(tokens, expected);
    }

    #[test]
    fn test_possessives_split_from_brand() {
        let c = Categorizer::standard();
        assert_eq!(expense(&c, "Uber's fare"), "Transport");
        assert_eq!(expense(&c, "Swiggy's order"), "Food & Groceries");
        assert_eq!(expense(&c, "DOMINO'S PIZZA"), "Food & Groceries");

        let tokens = c.tokens("swiggy's order");
        let expected: BTreeSet<String> =
            ["swiggy", "order"].iter().map(|s| s.to_string()).collect();
        assert_eq!(tokens, expected);
        // "do" is a stopword and "n't" is not alphabetic
        assert!(c.tokens("don't").is_empty());
        // other apostrophes stay inside the word
        assert!(c.tokens("o'brien").is_empty());
    }

    #[test]
    fn test_stopwords_removed() {
        let c = Categorizer::standard();
        // "other" is a stopword, so it never reaches the Other keyword
        assert!(c.tokens("some other thing").iter().all(|t| t == "thing"));
        assert_eq!(expense(&c, "other"), "Other");
    }

    #[test]
    fn test_degraded_mode_splits_on_whitespace() {
        let c = Categorizer::new(Arc::new(CategoryTable::standard()), None);
        assert_eq!(c.mode(), TokenizerMode::Degraded);
        assert_eq!(expense(&c, "booking.com stay"), "Travel");
        assert_eq!(expense(&c, "cult.fit membership"), "Health & Wellness");
        // punctuation stays attached to the token
        assert_eq!(expense(&c, "uber, late"), "Fees & Charges");
        assert_eq!(expense(&c, ""), "Other");
        assert_eq!(c.categorize("uber", "Income"), "Income");
    }

    #[test]
    fn test_primary_mode_by_default() {
        assert_eq!(Categorizer::standard().mode(), TokenizerMode::Primary);
    }

    #[test]
    fn test_deterministic_and_idempotent() {
        let c = Categorizer::standard();
        let batch = [
            ("Ola to office", "Expense"),
            ("Salary March", "Income"),
            ("Netflix premium", "Expense"),
            ("haircut at salon", "Expense"),
            ("???", "Expense"),
        ];
        let first: Vec<String> = batch
            .iter()
            .map(|(d, t)| c.categorize(d, t).to_string())
            .collect();
        let second: Vec<String> = batch
            .iter()
            .map(|(d, t)| c.categorize(d, t).to_string())
            .collect();
        assert_eq!(first, second);
        assert_eq!(
            first,
            vec![
                "Transport",
                "Income",
                "Entertainment & Subscriptions",
                "Personal Care",
                "Other"
            ]
        );
    }

    #[test]
    fn test_category_list_order() {
        let table = CategoryTable::standard();
        let all = table.all_categories();
        assert_eq!(all.len(), 16);
        assert_eq!(all[0], "Income");
        assert_eq!(all[1], "Transport");
        assert_eq!(all[2], "Food & Groceries");
        assert_eq!(all[14], "Travel");
        assert_eq!(*all.last().unwrap(), "Other");
        assert!(!table.expense_categories().contains(&"Income"));
        assert!(table.is_valid_category("Income"));
        assert!(table.is_valid_category("Insurance"));
        assert!(!table.is_valid_category("insurance"));
    }

    #[test]
    fn test_custom_table_appends_other() {
        let table = CategoryTable::new(vec![
            CategoryRule::new("Pets", ["Vet", " kibble "]),
            CategoryRule::new("Transport", ["uber"]),
        ])
        .unwrap();
        assert_eq!(table.all_categories(), vec!["Income", "Pets", "Transport", "Other"]);
        assert!(table.rules()[0].keywords.contains("vet"));
        assert!(table.rules()[0].keywords.contains("kibble"));

        let c = Categorizer::new(Arc::new(table), Some(Arc::new(StopWords::english())));
        assert_eq!(expense(&c, "VET visit"), "Pets");
        assert_eq!(expense(&c, "pizza"), "Other");
    }

    #[test]
    fn test_custom_table_validation() {
        assert_eq!(
            CategoryTable::new(vec![CategoryRule::new("Income", ["salary"])]),
            Err(TableError::ReservedIncome)
        );
        assert_eq!(
            CategoryTable::new(vec![
                CategoryRule::new("A", ["x"]),
                CategoryRule::new("A", ["y"]),
            ]),
            Err(TableError::Duplicate("A".to_string()))
        );
        assert_eq!(
            CategoryTable::new(vec![
                CategoryRule::new("Other", ["other"]),
                CategoryRule::new("A", ["y"]),
            ]),
            Err(TableError::OtherNotLast)
        );
        assert_eq!(
            CategoryTable::new(vec![CategoryRule::new("  ", ["y"])]),
            Err(TableError::EmptyName)
        );
    }

    #[test]
    fn test_shared_across_threads() {
        let c = Arc::new(Categorizer::standard());
        let labels: Vec<String> = std::thread::scope(|s| {
            let handles: Vec<_> = ["metro card", "spotify", "rent due", "???"]
                .iter()
                .map(|d| {
                    let c = Arc::clone(&c);
                    s.spawn(move || c.categorize(d, "Expense").to_string())
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });
        assert_eq!(
            labels,
            vec![
                "Transport",
                "Entertainment & Subscriptions",
                "Housing & Rent",
                "Other"
            ]
        );
    }
}
