pub mod enrich;
pub mod error;
pub mod metrics;
pub mod scanner;
pub mod totals;
