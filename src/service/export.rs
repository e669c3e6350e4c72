use crate::error::ReconError;
use crate::models::MatchCandidate;
use std::io::Write;

const HEADER: [&str; 8] = [
    "rank",
    "invoice_id",
    "transaction_id",
    "score",
    "amount_score",
    "date_score",
    "text_score",
    "explanation",
];

/// 导出匹配候选到 CSV (含表头，按传入顺序编号)
pub fn write_candidates_csv<W: Write>(
    candidates: &[MatchCandidate],
    output: W,
) -> Result<(), ReconError> {
    let mut writer = csv::Writer::from_writer(output);
    writer.write_record(HEADER)?;

    for (idx, candidate) in candidates.iter().enumerate() {
        writer.write_record(&[
            (idx + 1).to_string(),
            candidate.invoice_id.clone(),
            candidate.transaction_id.clone(),
            format!("{:.2}", candidate.score),
            format!("{:.2}", candidate.amount_score),
            format!("{:.2}", candidate.date_score),
            format!("{:.2}", candidate.text_score),
            candidate.explanation.clone(),
        ])?;
    }

    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(invoice_id: &str, transaction_id: &str, score: f64) -> MatchCandidate {
        MatchCandidate {
            invoice_id: invoice_id.to_string(),
            transaction_id: transaction_id.to_string(),
            score,
            amount_score: 100.0,
            date_score: 50.0,
            text_score: 30.0,
            explanation: "Amount: Exact amount match | Date: Invoice date not available".to_string(),
        }
    }

    #[test]
    fn writes_header_and_one_row_per_candidate() {
        let mut out = Vec::new();
        write_candidates_csv(
            &[candidate("inv-1", "txn-1", 64.0), candidate("inv-1", "txn-2", 12.5)],
            &mut out,
        )
        .unwrap();

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines[0],
            "rank,invoice_id,transaction_id,score,amount_score,date_score,text_score,explanation"
        );
        assert!(lines[1].starts_with("1,inv-1,txn-1,64.00,100.00,50.00,30.00,"));
        assert!(lines[2].starts_with("2,inv-1,txn-2,12.50,"));
    }

    #[test]
    fn empty_list_writes_header_only() {
        let mut out = Vec::new();
        write_candidates_csv(&[], &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap().lines().count(), 1);
    }
}
