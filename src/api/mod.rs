pub mod handlers;

pub use handlers::*;

use crate::service::ReconciliationScorer;
use crate::AppConfig;
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

/// 共享状态：评分器在进程生命周期内不可变
#[derive(Clone)]
pub struct AppState {
    pub scorer: Arc<ReconciliationScorer>,
    pub default_top_n: usize,
}

impl AppState {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            scorer: Arc::new(ReconciliationScorer::new(config.scoring.clone())),
            default_top_n: config.batch.default_top_n,
        }
    }
}

/// 构建路由
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/reconcile/score", post(score_pair))
        .route("/api/reconcile/candidates", post(generate_candidates))
        .route("/api/reconcile/candidates/csv", post(generate_candidates_csv))
        .with_state(state)
}
