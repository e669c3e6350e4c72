use super::parse::{parse_amount, parse_timestamp, require_non_empty};
use crate::error::ReconError;
use bigdecimal::BigDecimal;
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// 待核销发票
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
    pub id: String,
    pub amount: BigDecimal,
    pub currency: String,
    pub invoice_date: Option<DateTime<FixedOffset>>,
    pub description: Option<String>,
    pub invoice_number: Option<String>,
    pub vendor_name: Option<String>,
}

impl Invoice {
    pub fn new(id: impl Into<String>, amount: BigDecimal, currency: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            amount,
            currency: currency.into(),
            invoice_date: None,
            description: None,
            invoice_number: None,
            vendor_name: None,
        }
    }

    pub fn with_date(mut self, date: DateTime<FixedOffset>) -> Self {
        self.invoice_date = Some(date);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_invoice_number(mut self, number: impl Into<String>) -> Self {
        self.invoice_number = Some(number.into());
        self
    }

    pub fn with_vendor_name(mut self, vendor: impl Into<String>) -> Self {
        self.vendor_name = Some(vendor.into());
        self
    }
}

/// 请求体中的发票 (金额、日期均为字符串，校验后转换为 [`Invoice`])
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceInput {
    pub id: String,
    pub amount: String,
    pub currency: String,
    #[serde(default)]
    pub invoice_date: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub invoice_number: Option<String>,
    #[serde(default)]
    pub vendor_name: Option<String>,
}

impl TryFrom<InvoiceInput> for Invoice {
    type Error = ReconError;

    fn try_from(input: InvoiceInput) -> Result<Self, Self::Error> {
        require_non_empty(&input.id, &input.id, "id")?;
        require_non_empty(&input.id, &input.currency, "currency")?;

        let amount = parse_amount(&input.id, &input.amount)?;
        let invoice_date = input
            .invoice_date
            .as_deref()
            .map(|value| parse_timestamp(&input.id, value))
            .transpose()?;

        Ok(Self {
            id: input.id,
            amount,
            currency: input.currency,
            invoice_date,
            description: input.description,
            invoice_number: input.invoice_number,
            vendor_name: input.vendor_name,
        })
    }
}
