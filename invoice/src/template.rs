//! Template expansion of billing files.
//!
//! A billing file is rendered with Tera before it is parsed as YAML so
//! line items can describe the billing period. The date helpers are
//! exposed both as variables (`{{ billingPeriod }}`) and as functions
//! (`{{ billingPeriod() }}`).

use std::collections::HashMap;

use chrono::NaiveDate;
use tera::{Context, Tera, Value};

use crate::dates::{beginning_of_month, end_of_month, end_of_next_month};
use crate::error::{InvoiceError, Result};

/// Helper values computed from the billing date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateHelpers {
    /// The billing date, `MM-DD-YY`.
    pub now: String,
    /// Last day of the billing month, `DD-MM-YY`.
    pub end_of_this_month: String,
    /// Last day of the following month, `DD-MM-YY`.
    pub end_of_next_month: String,
    /// First to last day of the billing month, `DD-MM-YY - DD-MM-YY`.
    pub billing_period: String,
}

impl DateHelpers {
    pub fn for_date(date: NaiveDate) -> Self {
        let short = |d: NaiveDate| d.format("%d-%m-%y").to_string();
        DateHelpers {
            now: date.format("%m-%d-%y").to_string(),
            end_of_this_month: short(end_of_month(date)),
            end_of_next_month: short(end_of_next_month(date)),
            billing_period: format!(
                "{} - {}",
                short(beginning_of_month(date)),
                short(end_of_month(date))
            ),
        }
    }

    fn entries(&self) -> [(&'static str, &str); 4] {
        [
            ("now", &self.now),
            ("endOfThisMonth", &self.end_of_this_month),
            ("endOfNextMonth", &self.end_of_next_month),
            ("billingPeriod", &self.billing_period),
        ]
    }
}

/// Render `source` as a template named `name`.
pub fn render(name: &str, source: &str, date: NaiveDate) -> Result<String> {
    let template_error = |source| InvoiceError::Template {
        file: name.to_string(),
        source,
    };

    let helpers = DateHelpers::for_date(date);
    let mut tera = Tera::default();
    tera.autoescape_on(vec![]);
    let mut context = Context::new();
    for (key, value) in helpers.entries() {
        let value = value.to_string();
        context.insert(key, &value);
        tera.register_function(key, move |_: &HashMap<String, Value>| -> tera::Result<Value> {
            Ok(Value::String(value.clone()))
        });
    }

    tera.add_raw_template(name, source).map_err(template_error)?;
    tera.render(name, &context).map_err(template_error)
}
