pub mod bootstrap;
pub mod ingestion;
