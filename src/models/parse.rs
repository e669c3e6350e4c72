//! 请求字段解析：金额、时间戳、必填字段

use crate::error::ReconError;
use bigdecimal::BigDecimal;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Offset, Utc};
use std::str::FromStr;

const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// 解析精确十进制金额，不做任何猜测或纠正
pub(crate) fn parse_amount(record_id: &str, value: &str) -> Result<BigDecimal, ReconError> {
    BigDecimal::from_str(value.trim()).map_err(|_| ReconError::InvalidAmount {
        record_id: record_id.to_string(),
        value: value.to_string(),
    })
}

/// 解析时间戳
///
/// 支持 RFC 3339 (带时区偏移)；不带偏移的日期时间或纯日期按零时区的本地时间处理。
pub(crate) fn parse_timestamp(
    record_id: &str,
    value: &str,
) -> Result<DateTime<FixedOffset>, ReconError> {
    let value = value.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(value) {
        return Ok(ts);
    }

    let naive = NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        });

    match naive {
        Some(naive) => Ok(DateTime::from_naive_utc_and_offset(naive, Utc.fix())),
        None => Err(ReconError::InvalidTimestamp {
            record_id: record_id.to_string(),
            value: value.to_string(),
        }),
    }
}

pub(crate) fn require_non_empty(
    record_id: &str,
    value: &str,
    field: &'static str,
) -> Result<(), ReconError> {
    if value.trim().is_empty() {
        return Err(ReconError::EmptyField {
            record_id: record_id.to_string(),
            field,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn parses_rfc3339_with_offset() {
        let ts = parse_timestamp("inv-1", "2024-01-15T23:30:00+08:00").unwrap();
        assert_eq!(ts.naive_local().day(), 15);
        assert_eq!(ts.offset().local_minus_utc(), 8 * 3600);
    }

    #[test]
    fn naive_inputs_read_as_wall_clock() {
        let ts = parse_timestamp("inv-1", "2024-01-15T10:20:30").unwrap();
        assert_eq!(ts.naive_local().hour(), 10);

        let date_only = parse_timestamp("inv-1", "2024-01-15").unwrap();
        assert_eq!(date_only.naive_local().day(), 15);
        assert_eq!(date_only.naive_local().hour(), 0);
    }

    #[test]
    fn malformed_inputs_fail_fast() {
        assert!(matches!(
            parse_timestamp("inv-1", "15/01/2024"),
            Err(ReconError::InvalidTimestamp { .. })
        ));
        assert!(matches!(
            parse_amount("inv-1", "12,00"),
            Err(ReconError::InvalidAmount { .. })
        ));
        assert_eq!(
            parse_amount("inv-1", " 1000.50 ").unwrap(),
            BigDecimal::from_str("1000.5").unwrap()
        );
    }
}
