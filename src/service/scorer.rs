use super::components::{amount_score, date_score, text_score};
use crate::config::{ScoringConfig, ScoringOverrides};
use crate::error::ReconError;
use crate::models::{BankTransaction, Invoice, InvoiceInput, MatchCandidate, TransactionInput};
use rayon::prelude::*;

/// 对账评分器
///
/// 持有一份不可变的评分配置，评分过程无状态、无副作用 (日志除外)，可在线程间共享。
#[derive(Debug, Clone, Default)]
pub struct ReconciliationScorer {
    config: ScoringConfig,
}

impl ReconciliationScorer {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// 基于当前配置叠加单次覆盖项，构造新的评分器 (原评分器不变)
    pub fn with_overrides(&self, overrides: &ScoringOverrides) -> Result<Self, ReconError> {
        let config = self.config.with_overrides(overrides);
        config.validate()?;
        Ok(Self { config })
    }

    /// 对单个 发票 <-> 流水 组合评分
    pub fn score_pair(&self, invoice: &Invoice, transaction: &BankTransaction) -> MatchCandidate {
        let (amount, amount_explanation) = amount_score(
            &invoice.amount,
            &transaction.amount,
            self.config.amount_tolerance_percent,
        );

        let (date, date_explanation) = date_score(
            invoice.invoice_date.as_ref(),
            &transaction.posted_at,
            self.config.date_proximity_days,
        );

        let (text, text_explanation) = text_score(
            invoice.description.as_deref(),
            transaction.description.as_deref(),
            invoice.invoice_number.as_deref(),
            invoice.vendor_name.as_deref(),
        );

        // 权重之和不要求为 1，因此必须显式截断到 100
        let weighted = amount * self.config.amount_exact_weight
            + date * self.config.date_proximity_weight
            + text * self.config.text_similarity_weight;
        let score = (weighted * 100.0).min(100.0);

        let explanation = [
            format!("Amount: {}", amount_explanation),
            format!("Date: {}", date_explanation),
            format!("Text: {}", text_explanation),
            format!("Overall confidence: {:.1}%", score),
        ]
        .join(" | ");

        tracing::debug!(
            "评分: 发票 {} <-> 流水 {} = {:.1} (金额: {:.2}, 日期: {:.2}, 文本: {:.2})",
            short_id(&invoice.id),
            short_id(&transaction.id),
            score,
            amount,
            date,
            text
        );

        MatchCandidate {
            invoice_id: invoice.id.clone(),
            transaction_id: transaction.id.clone(),
            score,
            amount_score: amount * 100.0,
            date_score: date * 100.0,
            text_score: text * 100.0,
            explanation,
        }
    }

    /// 批量生成匹配候选
    ///
    /// 币种不同的组合直接跳过；每张发票保留得分最高的 `top_n` 个候选，最后全局按得分降序排列。
    /// 同分时保持输入顺序 (稳定排序)。
    pub fn score_batch(
        &self,
        invoices: &[Invoice],
        transactions: &[BankTransaction],
        top_n: usize,
    ) -> Vec<MatchCandidate> {
        let per_invoice: Vec<Vec<MatchCandidate>> = invoices
            .iter()
            .map(|invoice| self.candidates_for_invoice(invoice, transactions, top_n))
            .collect();

        self.merge_ranked(per_invoice)
    }

    /// 与 [`score_batch`](Self::score_batch) 结果一致，按发票并行评分
    ///
    /// 各发票的候选按发票顺序收集完毕后才做全局排序。
    pub fn score_batch_parallel(
        &self,
        invoices: &[Invoice],
        transactions: &[BankTransaction],
        top_n: usize,
    ) -> Vec<MatchCandidate> {
        let per_invoice: Vec<Vec<MatchCandidate>> = invoices
            .par_iter()
            .map(|invoice| self.candidates_for_invoice(invoice, transactions, top_n))
            .collect();

        self.merge_ranked(per_invoice)
    }

    /// 先校验全部原始记录，再并行批量评分
    ///
    /// 任一记录不合法则整批失败，不会跳过单条记录继续评分。
    pub fn score_raw_batch(
        &self,
        invoices: Vec<InvoiceInput>,
        transactions: Vec<TransactionInput>,
        top_n: usize,
    ) -> Result<Vec<MatchCandidate>, ReconError> {
        let invoices = invoices
            .into_iter()
            .map(Invoice::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        let transactions = transactions
            .into_iter()
            .map(BankTransaction::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(self.score_batch_parallel(&invoices, &transactions, top_n))
    }

    fn candidates_for_invoice(
        &self,
        invoice: &Invoice,
        transactions: &[BankTransaction],
        top_n: usize,
    ) -> Vec<MatchCandidate> {
        let mut candidates: Vec<MatchCandidate> = transactions
            .iter()
            .filter(|txn| txn.currency == invoice.currency)
            .map(|txn| self.score_pair(invoice, txn))
            .collect();

        rank(&mut candidates);
        candidates.truncate(top_n);
        candidates
    }

    fn merge_ranked(&self, per_invoice: Vec<Vec<MatchCandidate>>) -> Vec<MatchCandidate> {
        let mut all: Vec<MatchCandidate> = per_invoice.into_iter().flatten().collect();
        rank(&mut all);

        tracing::info!("生成 {} 条匹配候选", all.len());
        all
    }
}

/// 按得分降序稳定排序
fn rank(candidates: &mut [MatchCandidate]) {
    candidates.sort_by(|a, b| b.score.total_cmp(&a.score));
}

fn short_id(id: &str) -> &str {
    match id.char_indices().nth(8) {
        Some((idx, _)) => &id[..idx],
        None => id,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bigdecimal::BigDecimal;
    use chrono::{DateTime, FixedOffset, TimeZone};
    use std::str::FromStr;

    fn ts(y: i32, m: u32, d: u32) -> DateTime<FixedOffset> {
        FixedOffset::east_opt(0)
            .unwrap()
            .with_ymd_and_hms(y, m, d, 0, 0, 0)
            .unwrap()
    }

    fn invoice(id: &str, amount: &str, currency: &str) -> Invoice {
        Invoice::new(id, BigDecimal::from_str(amount).unwrap(), currency).with_date(ts(2024, 1, 15))
    }

    fn txn(id: &str, amount: &str, currency: &str) -> BankTransaction {
        BankTransaction::new(id, BigDecimal::from_str(amount).unwrap(), currency, ts(2024, 1, 15))
    }

    #[test]
    fn ties_keep_transaction_order() {
        let scorer = ReconciliationScorer::default();
        let invoices = vec![invoice("inv-1", "100.00", "USD")];
        let transactions = vec![
            txn("txn-a", "100.00", "USD"),
            txn("txn-b", "100.00", "USD"),
            txn("txn-c", "100.00", "USD"),
        ];

        let candidates = scorer.score_batch(&invoices, &transactions, 2);
        let ids: Vec<&str> = candidates.iter().map(|c| c.transaction_id.as_str()).collect();
        assert_eq!(ids, vec!["txn-a", "txn-b"]);
    }

    #[test]
    fn global_ties_keep_invoice_order() {
        let scorer = ReconciliationScorer::default();
        let invoices = vec![
            invoice("inv-1", "100.00", "USD"),
            invoice("inv-2", "100.00", "USD"),
        ];
        let transactions = vec![txn("txn-a", "100.00", "USD")];

        let candidates = scorer.score_batch(&invoices, &transactions, 5);
        let ids: Vec<&str> = candidates.iter().map(|c| c.invoice_id.as_str()).collect();
        assert_eq!(ids, vec!["inv-1", "inv-2"]);
    }

    #[test]
    fn zero_top_n_retains_nothing() {
        let scorer = ReconciliationScorer::default();
        let invoices = vec![invoice("inv-1", "100.00", "USD")];
        let transactions = vec![txn("txn-a", "100.00", "USD")];
        assert!(scorer.score_batch(&invoices, &transactions, 0).is_empty());
    }

    #[test]
    fn empty_inputs_produce_empty_output() {
        let scorer = ReconciliationScorer::default();
        assert!(scorer.score_batch(&[], &[txn("txn-a", "1", "USD")], 5).is_empty());
        assert!(scorer.score_batch(&[invoice("inv-1", "1", "USD")], &[], 5).is_empty());
    }

    #[test]
    fn weights_above_one_are_clamped() {
        let scorer = ReconciliationScorer::default()
            .with_overrides(&ScoringOverrides {
                amount_exact_weight: Some(1.0),
                date_proximity_weight: Some(1.0),
                text_similarity_weight: Some(1.0),
                ..Default::default()
            })
            .unwrap();
        let candidate = scorer.score_pair(
            &invoice("inv-1", "100.00", "USD"),
            &txn("txn-a", "100.00", "USD"),
        );
        assert_eq!(candidate.score, 100.0);
    }

    #[test]
    fn overrides_build_a_new_scorer_and_leave_the_base_untouched() {
        let base = ReconciliationScorer::default();
        let tuned = base
            .with_overrides(&ScoringOverrides {
                date_proximity_days: Some(10),
                amount_tolerance_percent: Some(5.0),
                ..Default::default()
            })
            .unwrap();

        assert_eq!(tuned.config().date_proximity_days, 10);
        assert_eq!(tuned.config().amount_tolerance_percent, 5.0);
        assert_eq!(tuned.config().text_similarity_weight, base.config().text_similarity_weight);
        assert_eq!(base.config(), &ScoringConfig::default());
    }

    #[test]
    fn invalid_override_is_rejected() {
        let result = ReconciliationScorer::default().with_overrides(&ScoringOverrides {
            amount_tolerance_percent: Some(f64::NAN),
            ..Default::default()
        });
        assert!(matches!(result, Err(ReconError::InvalidConfig(_))));
    }

    #[test]
    fn short_id_truncates_on_char_boundary() {
        assert_eq!(short_id("abcdefghijkl"), "abcdefgh");
        assert_eq!(short_id("abc"), "abc");
        assert_eq!(short_id("发票编号一二三四五六"), "发票编号一二三四");
    }
}
