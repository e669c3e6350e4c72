use super::parse::{parse_amount, parse_timestamp, require_non_empty};
use crate::error::ReconError;
use bigdecimal::BigDecimal;
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// 银行流水
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BankTransaction {
    pub id: String,
    pub amount: BigDecimal,
    pub currency: String,
    pub posted_at: DateTime<FixedOffset>,
    pub description: Option<String>,
}

impl BankTransaction {
    pub fn new(
        id: impl Into<String>,
        amount: BigDecimal,
        currency: impl Into<String>,
        posted_at: DateTime<FixedOffset>,
    ) -> Self {
        Self {
            id: id.into(),
            amount,
            currency: currency.into(),
            posted_at,
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// 请求体中的银行流水
///
/// `posted_at` 在这里是可选的，这样缺失时能报告为前置条件错误而不是反序列化失败。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionInput {
    pub id: String,
    pub amount: String,
    pub currency: String,
    #[serde(default)]
    pub posted_at: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl TryFrom<TransactionInput> for BankTransaction {
    type Error = ReconError;

    fn try_from(input: TransactionInput) -> Result<Self, Self::Error> {
        require_non_empty(&input.id, &input.id, "id")?;
        require_non_empty(&input.id, &input.currency, "currency")?;

        let amount = parse_amount(&input.id, &input.amount)?;
        let Some(raw_posted_at) = input.posted_at.as_deref() else {
            return Err(ReconError::MissingPostedAt {
                transaction_id: input.id,
            });
        };
        let posted_at = parse_timestamp(&input.id, raw_posted_at)?;

        Ok(Self {
            id: input.id,
            amount,
            currency: input.currency,
            posted_at,
            description: input.description,
        })
    }
}
