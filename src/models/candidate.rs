use serde::{Deserialize, Serialize};

/// 匹配候选 (发票 <-> 银行流水)
///
/// 评分后即不可变。`score` 及三个分项均为 0-100 分制。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchCandidate {
    pub invoice_id: String,
    pub transaction_id: String,
    pub score: f64,
    pub amount_score: f64,
    pub date_score: f64,
    pub text_score: f64,
    pub explanation: String,
}
