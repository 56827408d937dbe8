pub mod ask;
pub mod backfill;
pub mod init;
pub mod output;
pub mod semantic_search;
