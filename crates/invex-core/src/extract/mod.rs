//! Invoice field extraction from OCR text.

pub mod patterns;

use regex::Regex;
use serde::Serialize;
use tracing::debug;

use crate::models::record::{ExtractionRecord, Field, NOT_FOUND};

use patterns::{ADDRESS, EMAIL, INVOICE_DATE, TELEPHONE, TOTAL_AMOUNT};

/// Shown in diagnostics for a field whose pattern did not match.
pub const NO_MATCH: &str = "No match";

/// A single pattern match in the source text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractionMatch {
    /// Extracted value (trimmed capture group).
    pub value: String,
    /// Whole text matched by the pattern, label included.
    pub source: String,
    /// Byte range of the whole match in the source text.
    pub position: (usize, usize),
}

/// A pattern bound to the field it fills and the capture group holding the value.
#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
    field: Field,
    pattern: &'static Regex,
    group: usize,
}

impl FieldRule {
    /// Rule for a field.
    pub fn for_field(field: Field) -> Self {
        let (pattern, group): (&'static Regex, usize) = match field {
            Field::InvoiceDate => (&*INVOICE_DATE, 2),
            Field::Address => (&*ADDRESS, 1),
            Field::Email => (&*EMAIL, 0),
            Field::Telephone => (&*TELEPHONE, 2),
            Field::TotalAmount => (&*TOTAL_AMOUNT, 1),
        };
        Self { field, pattern, group }
    }

    pub fn field(&self) -> Field {
        self.field
    }

    /// Find the leftmost match of this rule in `text`.
    pub fn find(&self, text: &str) -> Option<ExtractionMatch> {
        let caps = self.pattern.captures(text)?;
        let whole = caps.get(0)?;
        let value = caps.get(self.group)?.as_str().trim().to_string();

        Some(ExtractionMatch {
            value,
            source: whole.as_str().to_string(),
            position: (whole.start(), whole.end()),
        })
    }
}

/// Result of running every field rule over one text blob.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractionReport {
    /// The extracted record.
    pub record: ExtractionRecord,
    /// Per-field matches in column order, `None` when the pattern did not match.
    pub matches: Vec<(Field, Option<ExtractionMatch>)>,
}

impl ExtractionReport {
    /// Diagnostic summary for a field: the whole matched text, or [`NO_MATCH`].
    pub fn match_summary(&self, field: Field) -> &str {
        self.matches
            .iter()
            .find(|(f, _)| *f == field)
            .and_then(|(_, m)| m.as_ref())
            .map(|m| m.source.as_str())
            .unwrap_or(NO_MATCH)
    }

    /// Number of fields that matched.
    pub fn found_count(&self) -> usize {
        self.matches.iter().filter(|(_, m)| m.is_some()).count()
    }
}

/// Applies the five field rules to OCR text.
#[derive(Debug, Clone)]
pub struct FieldExtractor {
    rules: [FieldRule; 5],
}

impl FieldExtractor {
    pub fn new() -> Self {
        Self {
            rules: Field::ALL.map(FieldRule::for_field),
        }
    }

    /// Extract all fields. Never fails: unmatched fields hold [`NOT_FOUND`].
    pub fn extract(&self, text: &str) -> ExtractionReport {
        let mut record = ExtractionRecord::not_found();
        let mut matches = Vec::with_capacity(self.rules.len());

        for rule in &self.rules {
            let found = rule.find(text);
            debug!(
                "{} match: {}",
                rule.field(),
                found.as_ref().map(|m| m.source.as_str()).unwrap_or(NO_MATCH)
            );

            let value = found
                .as_ref()
                .map(|m| m.value.clone())
                .unwrap_or_else(|| NOT_FOUND.to_string());

            match rule.field() {
                Field::InvoiceDate => record.invoice_date = value,
                Field::Address => record.address = value,
                Field::Email => record.email = value,
                Field::Telephone => record.telephone = value,
                Field::TotalAmount => record.total_amount = value,
            }
            matches.push((rule.field(), found));
        }

        ExtractionReport { record, matches }
    }

    /// Extract only the record.
    pub fn extract_record(&self, text: &str) -> ExtractionRecord {
        self.extract(text).record
    }
}

impl Default for FieldExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn extract(text: &str) -> ExtractionRecord {
        FieldExtractor::new().extract_record(text)
    }

    #[test]
    fn test_no_markers_yields_not_found() {
        for text in ["", "   \n\t", "Lorem ipsum dolor sit amet", "#$%^&*"] {
            assert_eq!(extract(text), ExtractionRecord::not_found());
        }
    }

    #[test]
    fn test_address() {
        assert_eq!(extract("Address: 123 Main St\n").address, "123 Main St");
        assert_eq!(
            extract("Billing ADDRESS:   42 Elm Road, Springfield  \nTel: 1").address,
            "42 Elm Road, Springfield"
        );
    }

    #[test]
    fn test_address_skips_blank_label_line() {
        assert_eq!(extract("Address:\n  7 Harbour Way\n").address, "7 Harbour Way");
    }

    #[test]
    fn test_address_label_at_end_matches_empty() {
        assert_eq!(extract("Address:").address, "");
    }

    #[test]
    fn test_total_amount() {
        assert_eq!(extract("TOTAL: 1,234.56").total_amount, "1,234.56");
        assert_eq!(extract("Total - 99.90 USD").total_amount, "99.90");
        assert_eq!(extract("total 1.000.000,00").total_amount, "1.000.000,00");
    }

    #[test]
    fn test_total_requires_word_boundary() {
        let text = "Subtotal: 10.00\nTotal: 12.00";
        assert_eq!(extract(text).total_amount, "12.00");
        assert_eq!(extract("SUBTOTAL: 10.00").total_amount, NOT_FOUND);
    }

    #[test]
    fn test_telephone() {
        assert_eq!(
            extract("Tel: +1 (555) 123-4567").telephone,
            "+1 (555) 123-4567"
        );
        assert_eq!(extract("PHONE. 020 7946 0958\n").telephone, "020 7946 0958");
    }

    #[test]
    fn test_telephone_stops_at_line_end() {
        let text = "Tel: 555-0100\n42 Elm Road";
        assert_eq!(extract(text).telephone, "555-0100");
    }

    #[test]
    fn test_telephone_label_inside_word() {
        assert_eq!(extract("Telephone: 555 0100").telephone, "555 0100");
    }

    #[test]
    fn test_invoice_date() {
        assert_eq!(extract("Invoice Date: 05-Jan-2024").invoice_date, "05-Jan-2024");
        assert_eq!(extract("DATE. 5-feb-2023").invoice_date, "5-feb-2023");
        assert_eq!(extract("Date: 2024-01-05").invoice_date, NOT_FOUND);
    }

    #[test]
    fn test_invoice_date_not_validated() {
        assert_eq!(extract("Date: 32-Xyz-2024").invoice_date, "32-Xyz-2024");
    }

    #[test]
    fn test_email() {
        assert_eq!(extract("contact@example.com").email, "contact@example.com");
        assert_eq!(
            extract("Mail us at billing.team+inv@acme-corp.co.uk today").email,
            "billing.team+inv@acme-corp.co.uk"
        );
    }

    #[test]
    fn test_first_match_wins() {
        let text = "a@first.com\nb@second.com\nTOTAL: 1.00\nTOTAL: 2.00";
        let record = extract(text);
        assert_eq!(record.email, "a@first.com");
        assert_eq!(record.total_amount, "1.00");
    }

    #[test]
    fn test_full_invoice() {
        let text = r#"
            ACME SUPPLIES LTD
            Address: 123 Main St, Springfield
            Tel: +1 (555) 123-4567
            Email: contact@example.com

            Invoice Date: 05-Jan-2024

            Widget x2          20.00
            Subtotal           20.00
            TOTAL: 1,234.56
        "#;

        let record = extract(text);
        assert_eq!(
            record,
            ExtractionRecord {
                invoice_date: "05-Jan-2024".to_string(),
                address: "123 Main St, Springfield".to_string(),
                email: "contact@example.com".to_string(),
                telephone: "+1 (555) 123-4567".to_string(),
                total_amount: "1,234.56".to_string(),
            }
        );
    }

    #[test]
    fn test_match_summaries() {
        let report = FieldExtractor::new().extract("TOTAL: 5.00\nno other fields");

        assert_eq!(report.match_summary(Field::TotalAmount), "TOTAL: 5.00");
        assert_eq!(report.match_summary(Field::Email), NO_MATCH);
        assert_eq!(report.found_count(), 1);
    }

    #[test]
    fn test_match_position() {
        let text = "xx Tel: 123";
        let found = FieldRule::for_field(Field::Telephone).find(text).unwrap();
        assert_eq!(found.position, (3, 11));
        assert_eq!(found.value, "123");
    }
}
