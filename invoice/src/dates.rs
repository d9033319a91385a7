//! Calendar arithmetic for the billing month and parsing of billing
//! dates given on the command line.

use chrono::{DateTime, Datelike, Days, Months, NaiveDate};

use crate::error::{InvoiceError, Result};

pub fn beginning_of_month(date: NaiveDate) -> NaiveDate {
    date - Days::new(u64::from(date.day0()))
}

pub fn end_of_month(date: NaiveDate) -> NaiveDate {
    beginning_of_month(date) + Months::new(1) - Days::new(1)
}

/// Last day of the month after `date`'s month.
pub fn end_of_next_month(date: NaiveDate) -> NaiveDate {
    end_of_month(beginning_of_month(date) + Months::new(1))
}

/// Parse a billing date. Accepts `YYYY-MM-DD`, `YYYY/MM/DD`, `YYYY-MM`
/// (first of the month) and RFC 3339 timestamps.
pub fn parse_billing_date(input: &str) -> Result<NaiveDate> {
    let input = input.trim();
    for format in ["%Y-%m-%d", "%Y/%m/%d"] {
        if let Ok(date) = NaiveDate::parse_from_str(input, format) {
            return Ok(date);
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(&format!("{input}-01"), "%Y-%m-%d") {
        return Ok(date);
    }
    DateTime::parse_from_rfc3339(input)
        .map(|ts| ts.date_naive())
        .map_err(|_| InvoiceError::InvalidDate(input.to_string()))
}
