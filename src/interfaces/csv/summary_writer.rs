use crate::application::session::CheckoutSession;
use crate::domain::money::format_amount;
use crate::error::Result;
use serde::Serialize;
use std::io::Write;

/// One output line describing how a checkout ended.
///
/// Amounts are pre-formatted to two decimals; the raw fee can carry more
/// precision than the payer is ever shown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryRow {
    pub screen: String,
    pub method: String,
    pub subtotal: String,
    pub fee: String,
    pub total: String,
    pub email: String,
    pub receipt_id: String,
}

impl SummaryRow {
    /// A row per settled payment, or a single row with the open totals when
    /// nothing settled.
    pub fn from_session(session: &CheckoutSession) -> Vec<SummaryRow> {
        let screen = session.screen().to_string();
        if session.history().is_empty() {
            let totals = session.totals();
            return vec![SummaryRow {
                screen,
                method: session
                    .form()
                    .map(|f| f.method())
                    .or(session.express().open_method())
                    .map(|m| m.to_string())
                    .unwrap_or_default(),
                subtotal: format_amount(session.amount()),
                fee: totals.map(|t| format_amount(t.fee)).unwrap_or_default(),
                total: totals.map(|t| format_amount(t.total)).unwrap_or_default(),
                email: String::new(),
                receipt_id: String::new(),
            }];
        }

        session
            .history()
            .iter()
            .map(|record| SummaryRow {
                screen: screen.clone(),
                method: record.method.to_string(),
                subtotal: format_amount(record.subtotal),
                fee: format_amount(record.fee),
                total: format_amount(record.total),
                email: record.email.clone().unwrap_or_default(),
                receipt_id: record.receipt_id.clone().unwrap_or_default(),
            })
            .collect()
    }
}

/// Writes session summaries as CSV (with a header row) or as a JSON array.
pub struct SummaryWriter<W: Write> {
    sink: W,
}

impl<W: Write> SummaryWriter<W> {
    pub fn new(sink: W) -> Self {
        Self { sink }
    }

    pub fn write_csv(self, rows: &[SummaryRow]) -> Result<()> {
        let mut writer = csv::Writer::from_writer(self.sink);
        if rows.is_empty() {
            writer.write_record([
                "screen",
                "method",
                "subtotal",
                "fee",
                "total",
                "email",
                "receipt_id",
            ])?;
        }
        for row in rows {
            writer.serialize(row)?;
        }
        writer.flush()?;
        Ok(())
    }

    pub fn write_json(mut self, rows: &[SummaryRow]) -> Result<()> {
        serde_json::to_writer_pretty(&mut self.sink, rows)?;
        writeln!(self.sink)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row() -> SummaryRow {
        SummaryRow {
            screen: "receipt".into(),
            method: "card".into(),
            subtotal: "10.00".into(),
            fee: "0.59".into(),
            total: "10.59".into(),
            email: "payer@example.com".into(),
            receipt_id: "RCP-ABCDEFGH".into(),
        }
    }

    #[test]
    fn test_write_csv() {
        let mut out = Vec::new();
        SummaryWriter::new(&mut out).write_csv(&[row()]).unwrap();
        let text = String::from_utf8(out).unwrap();

        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("screen,method,subtotal,fee,total,email,receipt_id")
        );
        assert_eq!(
            lines.next(),
            Some("receipt,card,10.00,0.59,10.59,payer@example.com,RCP-ABCDEFGH")
        );
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn test_write_csv_without_rows_keeps_header() {
        let mut out = Vec::new();
        SummaryWriter::new(&mut out).write_csv(&[]).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "screen,method,subtotal,fee,total,email,receipt_id\n"
        );
    }

    #[test]
    fn test_write_json() {
        let mut out = Vec::new();
        SummaryWriter::new(&mut out).write_json(&[row()]).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value[0]["total"], "10.59");
        assert_eq!(value[0]["receipt_id"], "RCP-ABCDEFGH");
    }
}
