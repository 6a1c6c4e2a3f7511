//! # tare-store
//!
//! The durable half of the pipeline: an append-only CSV weight log.
//!
//! One file, one header line, one record per line in the fixed column order
//! `user_id,weight,logged_at,synced`. Entries are only ever appended; the
//! single permitted mutation is flipping an entry's synced flag, which goes
//! through a full-file rewrite published atomically via a same-directory
//! tempfile. A household scale log stays small enough that the rewrite's
//! write amplification is a non-issue, and the simplicity pays for itself.

mod error;
mod format;
mod store;

pub use error::StoreError;
pub use format::HEADER;
pub use store::WeightLogStore;
