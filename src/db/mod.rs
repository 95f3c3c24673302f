//! Persistence module split across logical submodules.

mod connection;
mod records;

pub use connection::{apply_schema, ensure_schema};
pub use records::RecordStore;
