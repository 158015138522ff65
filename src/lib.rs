pub mod analyzer;
pub mod config;
pub mod crypto;
pub mod domain;
pub mod error;
pub mod gate;
pub mod multiset;
pub mod observability;
pub mod showdown;
pub mod store;
pub mod verify;


#[cfg(test)]
mod scenarios;

pub use analyzer::{audit_transcript, Analyzer};
pub use config::AnalyzerConfig;
pub use domain::AnalysisResult;
pub use error::AnalyzerError;
