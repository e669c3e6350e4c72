pub mod components;
pub mod export;
pub mod scorer;
pub mod similarity;

pub use components::{amount_score, date_score, text_score};
pub use export::write_candidates_csv;
pub use scorer::ReconciliationScorer;
pub use similarity::partial_ratio;
