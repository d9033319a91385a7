//! Amounts derived from the billables and their formatting.

use crate::config::{BillableItem, BillingConfig};
use crate::error::{InvoiceError, Result};

/// Largest amount whose cents still fit in an `i64`.
pub const MAX_AMOUNT: f64 = 9.0e16;

#[derive(Debug, Clone, PartialEq)]
pub struct Totals {
    /// Currency of the first billable; used for every summary row.
    pub currency: String,
    pub subtotal: f64,
    pub tax_rate: f64,
    pub tax: f64,
    pub total: f64,
}

impl Totals {
    pub fn compute(config: &BillingConfig) -> Totals {
        let subtotal: f64 = config.billables.iter().map(BillableItem::total).sum();
        let tax_rate = config.bill.tax_rate;
        let tax = subtotal * tax_rate;
        Totals {
            currency: config
                .billables
                .first()
                .map(|b| b.currency.clone())
                .unwrap_or_default(),
            subtotal,
            tax_rate,
            tax,
            total: subtotal + tax,
        }
    }
}

/// Format an amount with thousands separators and two decimals,
/// rounded to the cent: `1234.5` -> `1,234.50`. Amounts that are not
/// finite or exceed [`MAX_AMOUNT`] are rejected.
pub fn format_money(amount: f64) -> Result<String> {
    if !amount.is_finite() || amount.abs() > MAX_AMOUNT {
        return Err(InvoiceError::AmountOutOfRange(amount));
    }
    let cents = (amount * 100.0).round() as i64;
    let sign = if cents < 0 { "-" } else { "" };
    let cents = cents.unsigned_abs();
    let whole = (cents / 100).to_string();

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    Ok(format!("{sign}{grouped}.{:02}", cents % 100))
}

/// Amount prefixed by its currency, e.g. `EUR 1,234.50`.
pub fn money(currency: &str, amount: f64) -> Result<String> {
    let amount = format_money(amount)?;
    if currency.is_empty() {
        Ok(amount)
    } else {
        Ok(format!("{currency} {amount}"))
    }
}

pub fn format_quantity(quantity: f64) -> String {
    format!("{quantity:.2}")
}

/// A rate as a percentage without trailing zeros: `0.125` -> `12.5%`.
pub fn format_rate(rate: f64) -> String {
    let pct = format!("{:.2}", rate * 100.0);
    let pct = pct.trim_end_matches('0').trim_end_matches('.');
    format!("{pct}%")
}

/// Cell texts of one billables row. The period column is included
/// only when the table has one.
pub fn row_strings(item: &BillableItem, with_period: bool) -> Result<Vec<String>> {
    let mut row = vec![
        format_quantity(item.quantity),
        item.description.clone(),
        money(&item.currency, item.unit_price)?,
    ];
    if with_period {
        row.push(item.period.clone().unwrap_or_default());
    }
    row.push(money(&item.currency, item.total())?);
    Ok(row)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{BillDetails, BillToDetails, BusinessDetails};

    fn item(quantity: f64, unit_price: f64, currency: &str) -> BillableItem {
        BillableItem {
            quantity,
            description: "Work".into(),
            unit_price,
            currency: currency.into(),
            period: None,
        }
    }

    fn config(billables: Vec<BillableItem>, tax_rate: f64) -> BillingConfig {
        BillingConfig {
            business: BusinessDetails::default(),
            bill: BillDetails {
                tax_rate,
                ..Default::default()
            },
            bill_to: BillToDetails::default(),
            billables,
            bank: Default::default(),
            colors: Default::default(),
        }
    }

    #[test]
    fn money_grouping_and_rounding() {
        assert_eq!(format_money(0.0).unwrap(), "0.00");
        assert_eq!(format_money(999.999).unwrap(), "1,000.00");
        assert_eq!(format_money(1234.5).unwrap(), "1,234.50");
        assert_eq!(format_money(1234567.891).unwrap(), "1,234,567.89");
        assert_eq!(format_money(-3.0).unwrap(), "-3.00");
        assert_eq!(format_money(-1500.25).unwrap(), "-1,500.25");
        assert_eq!(format_money(-0.001).unwrap(), "0.00");
    }

    #[test]
    fn money_rejects_unprintable_amounts() {
        assert_eq!(format_money(MAX_AMOUNT).unwrap(), "90,000,000,000,000,000.00");
        for amount in [f64::INFINITY, f64::NEG_INFINITY, f64::NAN, 1e17, -1e17] {
            assert!(
                matches!(format_money(amount), Err(InvoiceError::AmountOutOfRange(_))),
                "{amount}"
            );
        }
        assert!(money("EUR", f64::NAN).is_err());
    }

    #[test]
    fn money_with_currency() {
        assert_eq!(money("EUR", 1234.5).unwrap(), "EUR 1,234.50");
        assert_eq!(money("€", 7.0).unwrap(), "€ 7.00");
        assert_eq!(money("", 7.0).unwrap(), "7.00");
    }

    #[test]
    fn quantity_and_rate() {
        assert_eq!(format_quantity(2.0), "2.00");
        assert_eq!(format_quantity(0.5), "0.50");
        assert_eq!(format_rate(0.25), "25%");
        assert_eq!(format_rate(0.125), "12.5%");
        assert_eq!(format_rate(0.0), "0%");
    }

    #[test]
    fn totals_without_tax() {
        let totals = Totals::compute(&config(
            vec![item(2.0, 100.0, "EUR"), item(1.5, 40.0, "EUR")],
            0.0,
        ));
        assert_eq!(totals.subtotal, 260.0);
        assert_eq!(totals.tax, 0.0);
        assert_eq!(totals.total, 260.0);
        assert_eq!(totals.currency, "EUR");
    }

    #[test]
    fn totals_with_tax_use_first_currency() {
        let totals = Totals::compute(&config(
            vec![item(10.0, 100.0, "SEK"), item(1.0, 0.0, "EUR")],
            0.25,
        ));
        assert_eq!(totals.tax, 250.0);
        assert_eq!(totals.total, 1250.0);
        assert_eq!(totals.currency, "SEK");
    }

    #[test]
    fn row_strings_with_and_without_period() {
        let mut line = item(3.0, 1000.0, "EUR");
        assert_eq!(
            row_strings(&line, false).unwrap(),
            vec!["3.00", "Work", "EUR 1,000.00", "EUR 3,000.00"]
        );
        line.period = Some("01-01-24 - 31-01-24".into());
        assert_eq!(
            row_strings(&line, true).unwrap(),
            vec!["3.00", "Work", "EUR 1,000.00", "01-01-24 - 31-01-24", "EUR 3,000.00"]
        );
    }
}
