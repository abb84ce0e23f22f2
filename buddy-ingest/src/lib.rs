//! buddy-ingest: transaction uploads, manual entry, categorize-on-ingest, per-user storage.

pub mod manual;
pub mod pipeline;
pub mod store;
pub mod types;
pub mod upload;

pub use manual::manual_entry;
pub use pipeline::{categorize_record, ingest};
pub use store::{Store, SystemStats};
pub use types::{IngestRecord, UploadBatch};
pub use upload::{DEFAULT_DATE_FORMAT, parse_upload_csv, parse_upload_reader};
