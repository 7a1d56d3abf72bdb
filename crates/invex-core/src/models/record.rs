//! Extraction record: the five text fields pulled out of one invoice image.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Placeholder stored for a field whose pattern did not match.
pub const NOT_FOUND: &str = "Not found";

/// The fields extracted from every invoice, in export column order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Field {
    InvoiceDate,
    Address,
    Email,
    Telephone,
    TotalAmount,
}

impl Field {
    /// All fields in export column order.
    pub const ALL: [Field; 5] = [
        Field::InvoiceDate,
        Field::Address,
        Field::Email,
        Field::Telephone,
        Field::TotalAmount,
    ];

    /// Column header used in exported tables.
    pub fn label(self) -> &'static str {
        match self {
            Field::InvoiceDate => "Invoice Date",
            Field::Address => "Address",
            Field::Email => "Email",
            Field::Telephone => "Telephone",
            Field::TotalAmount => "Total Amount",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Fields extracted from a single invoice.
///
/// Values are kept exactly as matched (trimmed), or [`NOT_FOUND`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionRecord {
    #[serde(rename = "Invoice Date")]
    pub invoice_date: String,

    #[serde(rename = "Address")]
    pub address: String,

    #[serde(rename = "Email")]
    pub email: String,

    #[serde(rename = "Telephone")]
    pub telephone: String,

    #[serde(rename = "Total Amount")]
    pub total_amount: String,
}

impl ExtractionRecord {
    /// A record where no field was found.
    pub fn not_found() -> Self {
        Self {
            invoice_date: NOT_FOUND.to_string(),
            address: NOT_FOUND.to_string(),
            email: NOT_FOUND.to_string(),
            telephone: NOT_FOUND.to_string(),
            total_amount: NOT_FOUND.to_string(),
        }
    }

    /// Get the value of a field.
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::InvoiceDate => &self.invoice_date,
            Field::Address => &self.address,
            Field::Email => &self.email,
            Field::Telephone => &self.telephone,
            Field::TotalAmount => &self.total_amount,
        }
    }

    /// Values in export column order.
    pub fn values(&self) -> [&str; 5] {
        Field::ALL.map(|field| self.get(field))
    }
}

impl Default for ExtractionRecord {
    fn default() -> Self {
        Self::not_found()
    }
}
