pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod service;

pub use config::{AppConfig, ScoringConfig, ScoringOverrides};
pub use error::ReconError;
pub use models::{BankTransaction, Invoice, MatchCandidate};
pub use service::ReconciliationScorer;
