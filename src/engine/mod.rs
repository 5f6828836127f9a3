pub mod filter;
pub mod format;
pub mod ingest;
pub mod status;
pub mod view;
