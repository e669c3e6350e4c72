//! 分项评分：金额、日期、文本
//!
//! 三个函数互不依赖，均返回 `(score, explanation)`，score 取值 [0, 1]。

use super::similarity::partial_ratio;
use bigdecimal::{BigDecimal, Zero};
use chrono::{DateTime, FixedOffset};

/// 日期超出窗口后的衰减周期 (天)，与配置的窗口无关
const DATE_DECAY_HORIZON_DAYS: f64 = 30.0;

/// 文本数据不足时的先验分
const INSUFFICIENT_TEXT_SCORE: f64 = 0.3;
const INVOICE_NUMBER_FLOOR: f64 = 0.9;
const VENDOR_NAME_FLOOR: f64 = 0.85;

/// 命中说明中截取的发票文本长度 (字符)
const MATCHED_TEXT_PREVIEW: usize = 50;

/// 金额评分
///
/// 完全相等得 1.0；差异百分比在容差内从 1.0 线性衰减到 0.5；超出容差后按 `1 - 差异%/100` 衰减，下限 0。
pub fn amount_score(
    invoice_amount: &BigDecimal,
    transaction_amount: &BigDecimal,
    tolerance_percent: f64,
) -> (f64, String) {
    if invoice_amount == transaction_amount {
        return (1.0, "Exact amount match".to_string());
    }

    let percent_diff = percent_difference(invoice_amount, transaction_amount);

    if tolerance_percent > 0.0 && percent_diff <= tolerance_percent {
        let score = 1.0 - (percent_diff / tolerance_percent) * 0.5;
        return (score, format!("Amount within {:.1}% tolerance", percent_diff));
    }

    let score = (1.0 - percent_diff / 100.0).max(0.0);
    (score, format!("Amount differs by {:.1}%", percent_diff))
}

/// `|a - b| / ((a + b) / 2) * 100`，用精确十进制计算；均值 <= 0 时按 100% 处理
fn percent_difference(a: &BigDecimal, b: &BigDecimal) -> f64 {
    let diff = (a - b).abs();
    let avg = (a + b) / BigDecimal::from(2);
    if avg <= BigDecimal::zero() {
        return 100.0;
    }

    let percent = diff / avg * BigDecimal::from(100);
    // 十进制字符串解析为 f64 是正确舍入的
    percent.to_string().parse::<f64>().unwrap_or(100.0)
}

/// 日期评分
///
/// 两个时间戳先去掉时区偏移，取各自本地时间的日历日期相减，取天数的绝对值。
pub fn date_score(
    invoice_date: Option<&DateTime<FixedOffset>>,
    transaction_date: &DateTime<FixedOffset>,
    window_days: u32,
) -> (f64, String) {
    let Some(invoice_date) = invoice_date else {
        return (0.5, "Invoice date not available".to_string());
    };

    let days = (invoice_date.naive_local().date() - transaction_date.naive_local().date())
        .num_days()
        .abs();

    if days == 0 {
        return (1.0, "Same day transaction".to_string());
    }

    let explanation = format!("Transaction {} days from invoice date", days);
    let score = if days <= i64::from(window_days) {
        1.0 - (days as f64 / f64::from(window_days)) * 0.5
    } else {
        (1.0 - days as f64 / DATE_DECAY_HORIZON_DAYS).max(0.0)
    };
    (score, explanation)
}

/// 文本评分
///
/// 发票侧文本 (描述、发票号、供应商名) 与流水描述做模糊部分匹配取最大值；
/// 发票号原文出现在流水描述中时分数不低于 0.9，供应商名原文出现时不低于 0.85。
pub fn text_score(
    invoice_desc: Option<&str>,
    transaction_desc: Option<&str>,
    invoice_number: Option<&str>,
    vendor_name: Option<&str>,
) -> (f64, String) {
    let invoice_number = non_empty(invoice_number);
    let vendor_name = non_empty(vendor_name);

    let invoice_texts: Vec<String> = [non_empty(invoice_desc), invoice_number, vendor_name]
        .into_iter()
        .flatten()
        .map(str::to_lowercase)
        .collect();

    let transaction_text = match non_empty(transaction_desc) {
        Some(desc) if !invoice_texts.is_empty() => desc.to_lowercase(),
        _ => {
            return (
                INSUFFICIENT_TEXT_SCORE,
                "Insufficient text data for comparison".to_string(),
            )
        }
    };

    let mut max_score = 0.0_f64;
    let mut best_match = String::new();

    for invoice_text in &invoice_texts {
        let ratio = partial_ratio(invoice_text, &transaction_text);
        if ratio > max_score {
            max_score = ratio;
            best_match = invoice_text.chars().take(MATCHED_TEXT_PREVIEW).collect();
        }
    }

    if let Some(number) = invoice_number {
        if transaction_text.contains(&number.to_lowercase()) {
            max_score = max_score.max(INVOICE_NUMBER_FLOOR);
            best_match = format!("Invoice number '{}' found in description", number);
        }
    }

    if let Some(vendor) = vendor_name {
        if transaction_text.contains(&vendor.to_lowercase()) {
            max_score = max_score.max(VENDOR_NAME_FLOOR);
            best_match = format!("Vendor name '{}' found in description", vendor);
        }
    }

    let mut explanation = format!("Text similarity: {}%", (max_score * 100.0) as u32);
    if !best_match.is_empty() {
        explanation.push_str(&format!(" (matched: {})", best_match));
    }

    (max_score, explanation)
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}
