use super::AppState;
use crate::config::ScoringOverrides;
use crate::error::ReconError;
use crate::models::{
    BankTransaction, Invoice, InvoiceInput, MatchCandidate, TransactionInput,
};
use crate::service::{write_candidates_csv, ReconciliationScorer};
use axum::{
    extract::{Json, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

/// 请求体: 单笔评分
#[derive(Debug, Deserialize)]
pub struct ScorePairRequest {
    pub invoice: InvoiceInput,
    pub transaction: TransactionInput,
    #[serde(default)]
    pub overrides: Option<ScoringOverrides>,
}

/// 请求体: 批量生成候选
#[derive(Debug, Deserialize)]
pub struct CandidatesRequest {
    pub invoices: Vec<InvoiceInput>,
    pub transactions: Vec<TransactionInput>,
    /// 每张发票保留的候选数，未指定时取配置默认值，负数视为 0
    #[serde(default)]
    pub top_n: Option<i64>,
    #[serde(default)]
    pub overrides: Option<ScoringOverrides>,
}

/// 响应体: 单笔评分
#[derive(Debug, Serialize, Deserialize)]
pub struct ScorePairResponse {
    pub success: bool,
    pub message: String,
    pub candidate: Option<MatchCandidate>,
}

/// 响应体: 批量候选
#[derive(Debug, Serialize, Deserialize)]
pub struct CandidatesResponse {
    pub success: bool,
    pub message: String,
    pub candidates: Option<Vec<MatchCandidate>>,
}

/// 健康检查
pub async fn health_check() -> &'static str {
    "OK"
}

/// 单笔评分接口
pub async fn score_pair(
    State(state): State<AppState>,
    Json(req): Json<ScorePairRequest>,
) -> Response {
    let result = resolve_scorer(&state, req.overrides.as_ref()).and_then(|scorer| {
        let invoice = Invoice::try_from(req.invoice)?;
        let transaction = BankTransaction::try_from(req.transaction)?;
        Ok(scorer.score_pair(&invoice, &transaction))
    });

    match result {
        Ok(candidate) => {
            let response = ScorePairResponse {
                success: true,
                message: format!("Overall confidence {:.1}%", candidate.score),
                candidate: Some(candidate),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => {
            tracing::warn!("单笔评分请求失败: {}", e);
            let response = ScorePairResponse {
                success: false,
                message: format!("Error: {}", e),
                candidate: None,
            };
            (error_status(&e), Json(response)).into_response()
        }
    }
}

/// 批量候选接口
pub async fn generate_candidates(
    State(state): State<AppState>,
    Json(req): Json<CandidatesRequest>,
) -> Response {
    let invoice_count = req.invoices.len();

    match run_batch(&state, req).await {
        Ok(candidates) => {
            let response = CandidatesResponse {
                success: true,
                message: format!(
                    "Generated {} candidates for {} invoices",
                    candidates.len(),
                    invoice_count
                ),
                candidates: Some(candidates),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => {
            tracing::warn!("批量候选请求失败: {}", e);
            let response = CandidatesResponse {
                success: false,
                message: format!("Error: {}", e),
                candidates: None,
            };
            (error_status(&e), Json(response)).into_response()
        }
    }
}

/// 批量候选 CSV 导出接口
pub async fn generate_candidates_csv(
    State(state): State<AppState>,
    Json(req): Json<CandidatesRequest>,
) -> Response {
    let result = run_batch(&state, req).await.and_then(|candidates| {
        let mut body = Vec::new();
        write_candidates_csv(&candidates, &mut body)?;
        Ok(body)
    });

    match result {
        Ok(body) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/csv; charset=utf-8")],
            body,
        )
            .into_response(),
        Err(e) => {
            tracing::warn!("CSV 导出请求失败: {}", e);
            (error_status(&e), format!("Error: {}", e)).into_response()
        }
    }
}

/// 批量评分放到阻塞线程池执行，避免占用异步运行时
async fn run_batch(
    state: &AppState,
    req: CandidatesRequest,
) -> Result<Vec<MatchCandidate>, ReconError> {
    let scorer = resolve_scorer(state, req.overrides.as_ref())?;
    let top_n = effective_top_n(req.top_n, state.default_top_n);
    let CandidatesRequest {
        invoices,
        transactions,
        ..
    } = req;

    tracing::info!(
        "批量评分: {} 张发票, {} 笔流水, top_n = {}",
        invoices.len(),
        transactions.len(),
        top_n
    );

    tokio::task::spawn_blocking(move || scorer.score_raw_batch(invoices, transactions, top_n))
        .await?
}

fn resolve_scorer(
    state: &AppState,
    overrides: Option<&ScoringOverrides>,
) -> Result<ReconciliationScorer, ReconError> {
    match overrides {
        Some(overrides) if !overrides.is_empty() => state.scorer.with_overrides(overrides),
        _ => Ok(state.scorer.as_ref().clone()),
    }
}

fn effective_top_n(requested: Option<i64>, default_top_n: usize) -> usize {
    match requested {
        Some(n) => usize::try_from(n).unwrap_or(0),
        None => default_top_n,
    }
}

fn error_status(e: &ReconError) -> StatusCode {
    if e.is_client_error() {
        StatusCode::UNPROCESSABLE_ENTITY
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    }
}
