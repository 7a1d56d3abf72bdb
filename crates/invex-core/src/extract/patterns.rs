//! Regex patterns for invoice field extraction.
//!
//! The patterns are deliberately loose: first match wins, and nothing is
//! validated beyond the character classes below.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Everything after "Address:" up to the end of that line
    pub static ref ADDRESS: Regex = Regex::new(
        r"(?i)Address:\s*(.*)"
    ).unwrap();

    // Digits with thousands/decimal separators after a standalone TOTAL label
    pub static ref TOTAL_AMOUNT: Regex = Regex::new(
        r"(?i)\bTOTAL\s*[:\-]?\s*([\d,.]+)"
    ).unwrap();

    // Tel/Phone label; the number may contain + ( ) - and spaces, not newlines
    pub static ref TELEPHONE: Regex = Regex::new(
        r"(?i)(Tel|Phone)[:.]?\s*([\+()\- \d]+)"
    ).unwrap();

    // DD-MMM-YYYY after "Invoice Date" or "Date"
    pub static ref INVOICE_DATE: Regex = Regex::new(
        r"(?i)(Invoice Date|Date)[:.]?\s*(\d{1,2}-[A-Za-z]{3}-\d{4})"
    ).unwrap();

    // Email token, case-sensitive
    pub static ref EMAIL: Regex = Regex::new(
        r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Z|a-z]{2,7}\b"
    ).unwrap();
}
