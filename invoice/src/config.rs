//! The billing file: a YAML document describing who bills whom, for
//! what, and where to pay.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use pdf_core::{BuiltinFont, Color};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::billing::{Totals, MAX_AMOUNT};
use crate::dates::parse_billing_date;
use crate::error::{InvoiceError, Result};
use crate::template;

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BusinessDetails {
    pub name: String,
    pub person: String,
    pub address: String,
    /// Logo drawn in the header. Relative paths are resolved against the
    /// billing file's directory when loaded from disk.
    pub image_file: Option<PathBuf>,
    pub sans_font: String,
    pub serif_font: String,
    pub org_no: String,
    pub postal_address: String,
    pub telephone: String,
    pub email: String,
    pub vat: String,
}

impl Default for BusinessDetails {
    fn default() -> Self {
        BusinessDetails {
            name: String::new(),
            person: String::new(),
            address: String::new(),
            image_file: None,
            sans_font: "Helvetica".to_string(),
            serif_font: "Times".to_string(),
            org_no: String::new(),
            postal_address: String::new(),
            telephone: String::new(),
            email: String::new(),
            vat: String::new(),
        }
    }
}

impl BusinessDetails {
    /// Registration and contact lines that are filled in.
    pub fn extra_lines(&self) -> Vec<(&'static str, &str)> {
        [
            ("Org. no.", self.org_no.as_str()),
            ("Postal address", self.postal_address.as_str()),
            ("Telephone", self.telephone.as_str()),
            ("Email", self.email.as_str()),
            ("VAT no.", self.vat.as_str()),
        ]
        .into_iter()
        .filter(|(_, value)| !value.trim().is_empty())
        .collect()
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BillDetails {
    pub department: String,
    pub currency: String,
    pub payment_terms: String,
    pub due_date: String,
    /// Always replaced by the billing date when the file is loaded.
    pub date: String,
    pub invoice_number: Option<String>,
    pub tax_rate: f64,
    pub tax_label: String,
}

impl Default for BillDetails {
    fn default() -> Self {
        BillDetails {
            department: String::new(),
            currency: String::new(),
            payment_terms: String::new(),
            due_date: String::new(),
            date: String::new(),
            invoice_number: None,
            tax_rate: 0.0,
            tax_label: "Tax".to_string(),
        }
    }
}

impl BillDetails {
    pub fn strings(&self) -> [&str; 4] {
        [
            &self.department,
            &self.currency,
            &self.payment_terms,
            &self.due_date,
        ]
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct BillToDetails {
    pub email: String,
    pub name: String,
    pub street: String,
    pub city_state_zip: String,
    pub country: String,
}

impl BillToDetails {
    pub fn lines(&self) -> [&str; 5] {
        [
            &self.email,
            &self.name,
            &self.street,
            &self.city_state_zip,
            &self.country,
        ]
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct BillableItem {
    pub quantity: f64,
    #[serde(default)]
    pub description: String,
    pub unit_price: f64,
    #[serde(default)]
    pub currency: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub period: Option<String>,
}

impl BillableItem {
    pub fn total(&self) -> f64 {
        self.quantity * self.unit_price
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct BankDetails {
    pub pay_by: String,
    pub name: String,
    pub address: String,
    pub account_type: String,
    pub iban: String,
    pub sort_code: String,
    pub swift_bic: String,
    pub plusgiro: String,
    pub payee: String,
}

impl BankDetails {
    /// Labelled payment rows, empty fields skipped.
    pub fn rows(&self) -> Vec<(&'static str, &str)> {
        [
            ("Pay By", self.pay_by.as_str()),
            ("Bank Name", self.name.as_str()),
            ("Address", self.address.as_str()),
            ("Account Type (checking/Savings)", self.account_type.as_str()),
            ("IBAN (international)", self.iban.as_str()),
            ("Sort Code (international)", self.sort_code.as_str()),
            ("SWIFT/BIC (international)", self.swift_bic.as_str()),
            ("PlusGiro", self.plusgiro.as_str()),
            ("Payee", self.payee.as_str()),
        ]
        .into_iter()
        .filter(|(_, value)| !value.is_empty())
        .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl From<Rgb> for Color {
    fn from(c: Rgb) -> Color {
        Color::from_rgb8(c.r, c.g, c.b)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BillColors {
    pub color_light: Rgb,
    pub color_dark: Rgb,
}

impl Default for BillColors {
    fn default() -> Self {
        BillColors {
            color_light: Rgb {
                r: 247,
                g: 126,
                b: 25,
            },
            color_dark: Rgb {
                r: 68,
                g: 54,
                b: 152,
            },
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BillingConfig {
    pub business: BusinessDetails,
    #[serde(default)]
    pub bill: BillDetails,
    pub bill_to: BillToDetails,
    pub billables: Vec<BillableItem>,
    #[serde(default)]
    pub bank: BankDetails,
    #[serde(default)]
    pub colors: BillColors,
}

impl BillingConfig {
    /// Read, template-expand and validate a billing file.
    pub fn load(path: &Path, billing_date: NaiveDate) -> Result<Self> {
        let source = fs::read_to_string(path).map_err(|source| InvoiceError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        let mut config = Self::from_template(&name, &source, billing_date)?;
        if let Some(image) = config.business.image_file.as_mut() {
            if image.is_relative() {
                if let Some(dir) = path.parent() {
                    *image = dir.join(&*image);
                }
            }
        }
        debug!(
            path = %path.display(),
            billables = config.billables.len(),
            date = %config.bill.date,
            "loaded billing config"
        );
        Ok(config)
    }

    /// Expand `source` as a template, then parse and validate it.
    /// `name` is used in error messages.
    pub fn from_template(name: &str, source: &str, billing_date: NaiveDate) -> Result<Self> {
        let expanded = template::render(name, source, billing_date)?;
        let mut config: BillingConfig =
            serde_yaml::from_str(&expanded).map_err(|source| InvoiceError::Yaml {
                file: name.to_string(),
                source,
            })?;

        config.bill.date = billing_date.format("%Y-%m-%d").to_string();
        for item in &mut config.billables {
            if item.currency.is_empty() {
                item.currency = config.bill.currency.clone();
            }
        }
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.billables.is_empty() {
            return Err(InvoiceError::NoBillables);
        }
        for family in [&self.business.sans_font, &self.business.serif_font] {
            if BuiltinFont::from_family(family, "").is_none() {
                return Err(InvoiceError::UnknownFont(family.clone()));
            }
        }
        let rate = self.bill.tax_rate;
        if !rate.is_finite() || rate < 0.0 {
            return Err(InvoiceError::InvalidTaxRate(rate));
        }
        for item in &self.billables {
            for (field, value) in [("quantity", item.quantity), ("unit_price", item.unit_price)] {
                if !value.is_finite() {
                    return Err(InvoiceError::InvalidAmount {
                        item: item.description.clone(),
                        field,
                        value,
                    });
                }
            }
            check_amount(item.unit_price)?;
            check_amount(item.total())?;
        }
        check_amount(Totals::compute(self).total)
    }

    pub fn billing_date(&self) -> Result<NaiveDate> {
        parse_billing_date(&self.bill.date)
    }

    /// Whether any billable carries a service period, which adds a
    /// Period column to the billables table.
    pub fn has_periods(&self) -> bool {
        self.billables
            .iter()
            .any(|b| b.period.as_deref().is_some_and(|p| !p.is_empty()))
    }
}

fn check_amount(amount: f64) -> Result<()> {
    if amount.is_finite() && amount.abs() <= MAX_AMOUNT {
        Ok(())
    } else {
        Err(InvoiceError::AmountOutOfRange(amount))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
business:
  name: Acme Consulting
  person: Jane Doe
bill_to:
  name: Globex
billables:
  - quantity: 2
    description: Consulting
    unit_price: 100
"#;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()
    }

    #[test]
    fn defaults_fill_optional_sections() {
        let config = BillingConfig::from_template("billing.yaml", MINIMAL, date()).unwrap();
        assert_eq!(config.business.sans_font, "Helvetica");
        assert_eq!(config.business.serif_font, "Times");
        assert_eq!(config.bill.tax_rate, 0.0);
        assert_eq!(config.bill.tax_label, "Tax");
        assert_eq!(config.colors.color_light, Rgb { r: 247, g: 126, b: 25 });
        assert_eq!(config.colors.color_dark, Rgb { r: 68, g: 54, b: 152 });
        assert_eq!(config.billables[0].quantity, 2.0);
        assert!(config.bank.rows().is_empty());
        assert!(!config.has_periods());
    }

    #[test]
    fn billing_date_overrides_yaml_date() {
        let yaml = format!("{MINIMAL}bill:\n  date: 1999-01-01\n");
        let config = BillingConfig::from_template("billing.yaml", &yaml, date()).unwrap();
        assert_eq!(config.bill.date, "2024-01-15");
        assert_eq!(config.billing_date().unwrap(), date());
    }

    #[test]
    fn billables_inherit_bill_currency() {
        let yaml = r#"
business: { name: Acme }
bill: { currency: EUR }
bill_to: { name: Globex }
billables:
  - { quantity: 1, description: a, unit_price: 5 }
  - { quantity: 1, description: b, unit_price: 5, currency: SEK }
"#;
        let config = BillingConfig::from_template("billing.yaml", yaml, date()).unwrap();
        assert_eq!(config.billables[0].currency, "EUR");
        assert_eq!(config.billables[1].currency, "SEK");
    }

    #[test]
    fn empty_billables_rejected() {
        let yaml = "business: { name: Acme }\nbill_to: { name: Globex }\nbillables: []\n";
        let err = BillingConfig::from_template("billing.yaml", yaml, date()).unwrap_err();
        assert!(matches!(err, InvoiceError::NoBillables));
    }

    #[test]
    fn missing_required_section_is_yaml_error() {
        let yaml = "business: { name: Acme }\nbillables: []\n";
        let err = BillingConfig::from_template("billing.yaml", yaml, date()).unwrap_err();
        assert!(matches!(err, InvoiceError::Yaml { .. }));
    }

    #[test]
    fn unknown_font_rejected() {
        let yaml = MINIMAL.replace("person: Jane Doe", "person: Jane Doe\n  serif_font: Garamond");
        let err = BillingConfig::from_template("billing.yaml", &yaml, date()).unwrap_err();
        assert!(matches!(err, InvoiceError::UnknownFont(f) if f == "Garamond"));
    }

    #[test]
    fn negative_tax_rate_rejected() {
        let yaml = format!("{MINIMAL}bill:\n  tax_rate: -0.1\n");
        let err = BillingConfig::from_template("billing.yaml", &yaml, date()).unwrap_err();
        assert!(matches!(err, InvoiceError::InvalidTaxRate(_)));
    }

    #[test]
    fn non_finite_amounts_rejected() {
        let yaml = MINIMAL.replace("unit_price: 100", "unit_price: .inf");
        let err = BillingConfig::from_template("billing.yaml", &yaml, date()).unwrap_err();
        assert!(matches!(
            err,
            InvoiceError::InvalidAmount { field: "unit_price", ref item, .. } if item == "Consulting"
        ));

        let yaml = MINIMAL.replace("quantity: 2", "quantity: .nan");
        let err = BillingConfig::from_template("billing.yaml", &yaml, date()).unwrap_err();
        assert!(matches!(err, InvoiceError::InvalidAmount { field: "quantity", .. }));
    }

    #[test]
    fn amounts_too_large_to_print_rejected() {
        let yaml = MINIMAL.replace("unit_price: 100", "unit_price: 1.0e17");
        let err = BillingConfig::from_template("billing.yaml", &yaml, date()).unwrap_err();
        assert!(matches!(err, InvoiceError::AmountOutOfRange(_)));

        // Each line fits; the taxed total does not.
        let yaml = format!("{}bill:\n  tax_rate: 0.5\n", MINIMAL.replace("unit_price: 100", "unit_price: 4.0e16"));
        let err = BillingConfig::from_template("billing.yaml", &yaml, date()).unwrap_err();
        assert!(matches!(err, InvoiceError::AmountOutOfRange(_)));
    }

    #[test]
    fn empty_period_adds_no_column() {
        let yaml = MINIMAL.replace("unit_price: 100", "unit_price: 100\n    period: \"\"");
        let config = BillingConfig::from_template("billing.yaml", &yaml, date()).unwrap();
        assert!(!config.has_periods());

        let yaml = MINIMAL.replace("unit_price: 100", "unit_price: 100\n    period: Jan 2024");
        let config = BillingConfig::from_template("billing.yaml", &yaml, date()).unwrap();
        assert!(config.has_periods());
    }

    #[test]
    fn bank_rows_skip_empty_fields() {
        let bank = BankDetails {
            name: "First Bank".into(),
            iban: "DE00 1234".into(),
            ..Default::default()
        };
        assert_eq!(
            bank.rows(),
            vec![("Bank Name", "First Bank"), ("IBAN (international)", "DE00 1234")]
        );
    }

    #[test]
    fn business_extra_lines_skip_blank_fields() {
        let business = BusinessDetails {
            org_no: "556000-0000".into(),
            vat: "  ".into(),
            ..Default::default()
        };
        assert_eq!(business.extra_lines(), vec![("Org. no.", "556000-0000")]);
    }
}
