//! PDF statements for debweb
//!
//! A report always covers the full, unpaginated dataset the caller
//! fetched for the active filters. An empty dataset produces no file.

pub mod error;
pub mod layout;
pub mod render;
pub mod table;

pub use error::{ReportError, ReportResult};
pub use layout::{PageGeometry, ReportHeading};
pub use render::ReportFont;
pub use table::{AmountFormat, ReportKind, ReportTable};

use chrono::NaiveDateTime;
use debweb_config::{BusinessConfig, Config};
use debweb_core::{CreditTransaction, DateRange, DueEntry, StatementEntry};

/// A finished document, ready to download
#[derive(Debug, Clone)]
pub struct Report {
    pub filename: String,
    pub bytes: Vec<u8>,
    /// Body rows in the table
    pub rows: usize,
}

/// `<report>_<start>_to_<end>.pdf`, or `<report>_all_dates.pdf`
pub fn report_filename(kind: ReportKind, range: &DateRange) -> String {
    format!("{}_{}.pdf", kind.file_stem(), range.file_label())
}

#[derive(Debug, Clone)]
pub struct ReportGenerator {
    business: BusinessConfig,
    amounts: AmountFormat,
    geometry: PageGeometry,
    font: ReportFont,
}

impl ReportGenerator {
    pub fn new(business: BusinessConfig, amounts: AmountFormat) -> Self {
        Self {
            business,
            amounts,
            geometry: PageGeometry::a4_portrait(),
            font: ReportFont::Builtin,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.business.clone(), AmountFormat::from_currency(&config.currency))
            .with_font(ReportFont::from_path(config.report.font_file()))
    }

    pub fn with_font(mut self, font: ReportFont) -> Self {
        self.font = font;
        self
    }

    pub fn font(&self) -> &ReportFont {
        &self.font
    }

    pub fn credits(
        &self,
        records: &[CreditTransaction],
        range: &DateRange,
        generated_at: NaiveDateTime,
    ) -> ReportResult<Report> {
        let table = ReportTable::credits(records, &self.amounts)?;
        self.generate(&table, range, generated_at)
    }

    pub fn statement(
        &self,
        records: &[StatementEntry],
        range: &DateRange,
        generated_at: NaiveDateTime,
    ) -> ReportResult<Report> {
        let table = ReportTable::statement(records, &self.amounts)?;
        self.generate(&table, range, generated_at)
    }

    pub fn due(
        &self,
        records: &[DueEntry],
        range: &DateRange,
        generated_at: NaiveDateTime,
    ) -> ReportResult<Report> {
        let table = ReportTable::due(records, &self.amounts)?;
        self.generate(&table, range, generated_at)
    }

    pub fn heading(&self, kind: ReportKind, range: &DateRange, generated_at: NaiveDateTime) -> ReportHeading {
        ReportHeading {
            business_name: self.business.name.clone(),
            address: self.business.address.clone(),
            phone: self.business.phone.clone(),
            report_name: kind.title().to_string(),
            range: range.description(),
            generated_at: generated_at.format("%Y-%m-%d %H:%M").to_string(),
        }
    }

    pub fn generate(
        &self,
        table: &ReportTable,
        range: &DateRange,
        generated_at: NaiveDateTime,
    ) -> ReportResult<Report> {
        let heading = self.heading(table.kind, range, generated_at);
        let pages = layout::plan(table, &heading, &self.geometry);
        let bytes = render::render_pdf(table.kind.title(), &pages, &self.geometry, &self.font)?;
        let filename = report_filename(table.kind, range);
        log::info!(
            target: "debweb::report",
            "{}: {} rows on {} pages ({} bytes)",
            filename,
            table.row_count(),
            pages.len(),
            bytes.len()
        );
        Ok(Report {
            filename,
            bytes,
            rows: table.row_count(),
        })
    }
}
