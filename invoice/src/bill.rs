//! The invoice page: header, recipient, bill terms, billables with
//! totals, payment details and footer, drawn at fixed positions on one
//! A4 sheet.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDate, Utc};
use pdf_core::{Align, Border, Color, PdfDocument};
use tracing::{info, warn};

use crate::billing::{format_rate, money, row_strings, Totals};
use crate::config::BillingConfig;
use crate::dates::end_of_month;
use crate::error::{InvoiceError, Result};
use crate::sheet::Sheet;

const BILL_HEADERS: [&str; 4] = ["Department", "Currency", "Payment Terms", "Due Date"];
/// Width of a bill-terms column per header character.
const BILL_CHAR_WIDTH: f64 = 4.9;

const BILLABLE_HEADERS: [&str; 4] = ["Qty", "Description", "Unit Price", "Line Total"];
const BILLABLE_WIDTHS: [f64; 4] = [16.0, 125.5, 25.0, 25.0];
const PERIOD_HEADERS: [&str; 5] = ["Qty", "Description", "Unit Price", "Period", "Line Total"];
const PERIOD_WIDTHS: [f64; 5] = [16.0, 100.5, 25.0, 25.0, 25.0];

const RECIPIENT_X: f64 = 20.0;
const BUSINESS_LINES_X: f64 = 120.0;
const FOOTER_RULE_Y: f64 = 275.0;

fn table_gray() -> Color {
    Color::from_rgb8(64, 64, 64)
}

/// Invoice number shown in the header: the configured one, or the end
/// of the billing month such as `Jan312024`.
pub fn invoice_number(config: &BillingConfig, billing_date: NaiveDate) -> String {
    match &config.bill.invoice_number {
        Some(number) if !number.is_empty() => number.clone(),
        _ => end_of_month(billing_date).format("%b%-d%Y").to_string(),
    }
}

/// `<person> <MONDDYYYY>.pdf`, dated at the end of the billing month,
/// e.g. `Jane Doe JAN312024.pdf`.
pub fn output_file_name(config: &BillingConfig) -> Result<String> {
    let month_end = end_of_month(config.billing_date()?);
    let person = config.business.person.replace(['/', '\\'], "-");
    Ok(format!(
        "{} {}.pdf",
        person,
        month_end.format("%b%d%Y").to_string().to_uppercase()
    ))
}

/// Render the invoice into `writer` and return it.
pub fn render<W: Write>(
    config: &BillingConfig,
    writer: W,
    generated_at: DateTime<Utc>,
) -> Result<W> {
    Bill::new(config, writer, generated_at)?.render()
}

/// Render the invoice into `out_dir` under its conventional file name.
/// Nothing is written when rendering fails. Returns the path written.
pub fn write_invoice(
    config: &BillingConfig,
    out_dir: &Path,
    generated_at: DateTime<Utc>,
) -> Result<PathBuf> {
    if !out_dir.is_dir() {
        return Err(InvoiceError::MissingOutputDir(out_dir.display().to_string()));
    }
    let path = out_dir.join(output_file_name(config)?);
    let bytes = render(config, Vec::new(), generated_at)?;
    fs::write(&path, bytes)?;
    info!(path = %path.display(), "wrote invoice");
    Ok(path)
}

pub struct Bill<'a, W: Write> {
    sheet: Sheet<W>,
    config: &'a BillingConfig,
    billing_date: NaiveDate,
    generated_at: DateTime<Utc>,
}

impl<'a, W: Write> Bill<'a, W> {
    pub fn new(config: &'a BillingConfig, writer: W, generated_at: DateTime<Utc>) -> Result<Self> {
        let billing_date = config.billing_date()?;
        let mut doc = PdfDocument::new(writer)?;
        doc.set_info(
            "Title",
            &format!("Invoice {}", invoice_number(config, billing_date)),
        )
        .set_info("Author", &config.business.person)
        .set_info("Creator", "invoice");

        Ok(Bill {
            sheet: Sheet::new(doc)?,
            config,
            billing_date,
            generated_at,
        })
    }

    pub fn render(mut self) -> Result<W> {
        self.draw_header()?;
        self.draw_bill_to()?;
        self.draw_bill_table()?;
        let totals_bottom = self.draw_billables_table()?;
        let bottom = self.draw_bank_details()?.unwrap_or(totals_bottom);

        if bottom > FOOTER_RULE_Y {
            warn!(
                bottom_mm = bottom,
                footer_mm = FOOTER_RULE_Y,
                "invoice content runs into the footer"
            );
        }
        self.draw_footer()?;
        self.sheet.finish()
    }

    fn light(&self) -> Color {
        self.config.colors.color_light.into()
    }

    fn dark(&self) -> Color {
        self.config.colors.color_dark.into()
    }

    fn draw_header(&mut self) -> Result<()> {
        let business = &self.config.business;
        let sans = business.sans_font.as_str();
        let serif = business.serif_font.as_str();
        let (light, dark) = (self.light(), self.dark());

        match &business.image_file {
            Some(path) => {
                self.sheet.image(path, 0.0, 10.0, 100.0, 0.0)?;
            }
            None => {
                self.sheet.set_font(sans, "B", 28.0)?;
                self.sheet.set_xy(8.0, 30.0);
                self.sheet.set_text_color(dark);
                self.sheet.text(60.0, 0.0, &business.name)?;
            }
        }

        self.sheet.set_font(sans, "BI", 28.0)?;
        self.sheet.set_xy(140.0, 30.0);
        self.sheet.set_text_color(dark);
        self.sheet.text(40.0, 0.0, "Invoice")?;

        let month_end = end_of_month(self.billing_date);
        self.sheet.set_font(serif, "", 12.0)?;
        self.sheet.set_xy(140.0, 40.0);
        self.sheet.text(20.0, 0.0, "Date:")?;
        self.sheet.set_text_color(light);
        self.sheet
            .text(20.0, 0.0, &month_end.format("%B %-d, %Y").to_string())?;

        self.sheet.set_xy(140.0, 45.0);
        self.sheet.set_text_color(dark);
        self.sheet.text(20.0, 0.0, "Invoice #:")?;
        self.sheet.set_text_color(light);
        self.sheet
            .text(20.0, 0.0, &invoice_number(self.config, self.billing_date))?;

        self.sheet.set_xy(8.0, 40.0);
        self.sheet.set_text_color(dark);
        self.sheet.set_font(serif, "B", 14.0)?;
        self.sheet.text(40.0, 0.0, &business.person)?;

        self.sheet.set_font(serif, "", 10.0)?;
        self.sheet.set_xy(8.0, 45.0);
        self.sheet.text(40.0, 0.0, &business.address)?;

        self.sheet.ln(10.0);
        self.sheet.set_draw_color(dark);
        self.sheet.line(8.0, 50.0, 200.0, 50.0)
    }

    fn draw_bill_to(&mut self) -> Result<()> {
        self.sheet.set_text_color(Color::BLACK);
        self.sheet.ln(10.0);
        self.sheet.ln(10.0);

        let top = self.sheet.y();
        self.sheet.text(0.0, 0.0, "To: ")?;
        for (i, line) in self.config.bill_to.lines().into_iter().enumerate() {
            if i > 0 {
                self.sheet.ln(5.0);
            }
            self.sheet.set_x(RECIPIENT_X);
            self.sheet.text(0.0, 0.0, line)?;
        }
        let bottom = self.sheet.y();

        let extras = self.config.business.extra_lines();
        if extras.is_empty() {
            return Ok(());
        }
        for (i, (label, value)) in extras.into_iter().enumerate() {
            self.sheet.set_xy(BUSINESS_LINES_X, top + 5.0 * i as f64);
            self.sheet.text(30.0, 0.0, label)?;
            self.sheet.text(0.0, 0.0, value)?;
        }
        self.sheet.set_y(bottom);
        Ok(())
    }

    /// Pen for table headers: light fill, white bold text, gray rules.
    fn header_pen(&mut self) -> Result<()> {
        let light = self.light();
        self.sheet.set_text_color(Color::WHITE);
        self.sheet.set_draw_color(table_gray());
        self.sheet.set_fill_color(light);
        self.sheet.set_line_width(0.3);
        self.sheet.set_font(&self.config.business.serif_font, "B", 10.0)
    }

    /// Pen for table bodies: white fill, black regular text.
    fn body_pen(&mut self) -> Result<()> {
        self.sheet.set_fill_color(Color::WHITE);
        self.sheet.set_text_color(Color::BLACK);
        self.sheet.set_font(&self.config.business.serif_font, "", 8.0)
    }

    fn draw_bill_table(&mut self) -> Result<()> {
        self.header_pen()?;
        let y = self.sheet.y() + 10.0;
        self.sheet.set_y(y);
        for header in BILL_HEADERS {
            let width = header.chars().count() as f64 * BILL_CHAR_WIDTH;
            self.sheet
                .cell(width, 5.0, header, Border::ALL, Align::Center, true)?;
        }

        self.sheet.ln(5.0);
        self.body_pen()?;
        for (header, value) in BILL_HEADERS.iter().zip(self.config.bill.strings()) {
            let width = header.chars().count() as f64 * BILL_CHAR_WIDTH;
            self.sheet
                .cell(width, 4.0, value, Border::ALL, Align::Left, true)?;
        }
        Ok(())
    }

    /// Returns the bottom edge of the Total row.
    fn draw_billables_table(&mut self) -> Result<f64> {
        let with_period = self.config.has_periods();
        let (headers, widths): (&[&str], &[f64]) = if with_period {
            (&PERIOD_HEADERS, &PERIOD_WIDTHS)
        } else {
            (&BILLABLE_HEADERS, &BILLABLE_WIDTHS)
        };

        self.header_pen()?;
        let y = self.sheet.y() + 10.0;
        self.sheet.set_y(y);
        for (header, width) in headers.iter().zip(widths) {
            self.sheet
                .cell(*width, 5.0, header, Border::ALL, Align::Center, true)?;
        }

        self.sheet.ln(5.0);
        self.body_pen()?;
        for item in &self.config.billables {
            for (value, width) in row_strings(item, with_period)?.iter().zip(widths) {
                self.sheet
                    .cell(*width, 4.0, value, Border::ALL, Align::Right, true)?;
            }
            self.sheet.ln(4.0);
        }

        let totals = Totals::compute(self.config);
        let bill = &self.config.bill;
        let tax_label = if totals.tax_rate > 0.0 {
            format!("{} ({})", bill.tax_label, format_rate(totals.tax_rate))
        } else {
            bill.tax_label.clone()
        };

        self.sheet.set_draw_color(Color::WHITE);
        self.sheet.ln(2.0);
        self.summary_row(widths, 4.0, "Subtotal", &money(&totals.currency, totals.subtotal)?)?;
        self.sheet.ln(4.0);
        self.summary_row(widths, 4.0, &tax_label, &money(&totals.currency, totals.tax)?)?;
        self.sheet.ln(4.0);

        self.draw_blanks(widths)?;
        self.sheet
            .set_font(&self.config.business.serif_font, "B", 10.0)?;
        let (x, y) = (self.sheet.x(), self.sheet.y());
        let (label_w, value_w) = last_two(widths);
        self.sheet
            .cell(label_w, 6.0, "Total", Border::ALL, Align::Right, true)?;
        self.sheet.cell(
            value_w,
            6.0,
            &money(&totals.currency, totals.total)?,
            Border::ALL,
            Align::Right,
            true,
        )?;
        let x2 = self.sheet.x();
        self.sheet.set_draw_color(table_gray());
        self.sheet.line(x, y, x2, y)?;
        Ok(y + 6.0)
    }

    /// Blank cells under every column but the last two.
    fn draw_blanks(&mut self, widths: &[f64]) -> Result<()> {
        for width in &widths[..widths.len().saturating_sub(2)] {
            self.sheet
                .cell(*width, 4.0, "", Border::NONE, Align::Center, true)?;
        }
        Ok(())
    }

    fn summary_row(&mut self, widths: &[f64], height: f64, label: &str, value: &str) -> Result<()> {
        self.draw_blanks(widths)?;
        let (label_w, value_w) = last_two(widths);
        self.sheet
            .cell(label_w, height, label, Border::ALL, Align::Right, true)?;
        self.sheet
            .cell(value_w, height, value, Border::ALL, Align::Right, true)
    }

    /// Returns the bottom of the section, or `None` when there is
    /// nothing to show.
    fn draw_bank_details(&mut self) -> Result<Option<f64>> {
        let rows = self.config.bank.rows();
        if rows.is_empty() {
            return Ok(None);
        }
        let serif = self.config.business.serif_font.as_str();
        let (light, dark) = (self.light(), self.dark());

        self.sheet.ln(20.0);
        self.sheet.set_font(serif, "B", 14.0)?;
        self.sheet.set_text_color(dark);
        self.sheet.text(40.0, 0.0, "Payment Details")?;
        self.sheet.ln(5.0);

        self.sheet.set_draw_color(table_gray());
        self.sheet.set_fill_color(light);
        for (label, value) in rows {
            self.sheet.set_text_color(Color::WHITE);
            self.sheet.set_font(serif, "B", 10.0)?;
            self.sheet
                .cell(60.0, 5.0, label, Border::ALL, Align::Right, true)?;
            self.sheet.set_text_color(Color::BLACK);
            self.sheet.set_font(serif, "", 10.0)?;
            self.sheet
                .cell(100.0, 5.0, value, Border::ALL, Align::Left, false)?;
            self.sheet.ln(5.0);
        }
        Ok(Some(self.sheet.y()))
    }

    fn draw_footer(&mut self) -> Result<()> {
        let (light, dark) = (self.light(), self.dark());
        self.sheet.set_draw_color(dark);
        self.sheet.line(8.0, FOOTER_RULE_Y, 200.0, FOOTER_RULE_Y)?;
        self.sheet.set_xy(8.0, 280.0);
        self.sheet.set_text_color(dark);
        self.sheet.text(143.0, 0.0, &self.config.business.name)?;
        self.sheet.set_text_color(light);
        let generated = format!(
            "Generated: {}",
            self.generated_at.format("%Y-%m-%d %H:%M:%S")
        );
        self.sheet.text(40.0, 0.0, &generated)
    }
}

fn last_two(widths: &[f64]) -> (f64, f64) {
    match widths {
        [.., label, value] => (*label, *value),
        _ => (0.0, 0.0),
    }
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::sync::{Arc, Mutex};

    use chrono::TimeZone;

    use super::*;

    fn config(yaml: &str) -> BillingConfig {
        let date = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        BillingConfig::from_template("billing.yaml", yaml, date).unwrap()
    }

    const YAML: &str = r#"
business: { name: Acme, person: Jane Doe }
bill_to: { name: Globex }
billables:
  - { quantity: 1, description: Work, unit_price: 10 }
"#;

    #[test]
    fn default_invoice_number_is_month_end() {
        let config = config(YAML);
        let date = config.billing_date().unwrap();
        assert_eq!(invoice_number(&config, date), "Jan312024");
    }

    #[test]
    fn configured_invoice_number_wins() {
        let config = config(&YAML.replace(
            "bill_to:",
            "bill: { invoice_number: INV-0042 }\nbill_to:",
        ));
        let date = config.billing_date().unwrap();
        assert_eq!(invoice_number(&config, date), "INV-0042");
    }

    #[test]
    fn file_name_uses_person_and_month_end() {
        assert_eq!(output_file_name(&config(YAML)).unwrap(), "Jane Doe JAN312024.pdf");
    }

    #[test]
    fn file_name_has_two_digit_day() {
        let date = NaiveDate::from_ymd_opt(2023, 2, 3).unwrap();
        let config = BillingConfig::from_template("billing.yaml", YAML, date).unwrap();
        assert_eq!(output_file_name(&config).unwrap(), "Jane Doe FEB282023.pdf");
    }

    #[derive(Clone, Default)]
    struct LogBuffer(Arc<Mutex<Vec<u8>>>);

    impl io::Write for LogBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    /// Render `count` billables without bank details and return the
    /// warnings logged on the way.
    fn render_warnings(count: usize) -> String {
        let items: String = (0..count)
            .map(|i| format!("  - {{ quantity: 1, description: Item {i}, unit_price: 1 }}\n"))
            .collect();
        let yaml = format!(
            "business: {{ name: Acme, person: Jane Doe }}\nbill_to: {{ name: Globex }}\nbillables:\n{items}"
        );
        let config = config(&yaml);

        let logs = LogBuffer::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::WARN)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();
        tracing::subscriber::with_default(subscriber, || {
            let generated = Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap();
            render(&config, Vec::new(), generated).unwrap();
        });
        let bytes = logs.0.lock().unwrap().clone();
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn total_row_past_footer_rule_warns() {
        // 34 rows put the Total row at 271..277 mm.
        let logs = render_warnings(34);
        assert!(logs.contains("invoice content runs into the footer"), "{logs}");
    }

    #[test]
    fn total_row_above_footer_rule_is_quiet() {
        assert_eq!(render_warnings(33), "");
    }

    #[test]
    fn last_two_widths() {
        assert_eq!(last_two(&BILLABLE_WIDTHS), (25.0, 25.0));
        assert_eq!(last_two(&[3.0]), (0.0, 0.0));
    }
}
