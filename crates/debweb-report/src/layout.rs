//! Page layout for A4 portrait reports
//!
//! Planning is pure: [`plan`] turns a table into positioned text lines
//! per page and the renderer only draws them. The column header row is
//! placed once, above the first body row.

use crate::table::ReportTable;
use debweb_utils::truncate;

/// Millimetres per typographic point
const MM_PER_PT: f32 = 0.3528;
/// Average glyph width of Helvetica relative to its size
const GLYPH_WIDTH: f32 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    pub width: f32,
    pub height: f32,
    pub margin: f32,
    pub row_height: f32,
    pub font_size: f32,
}

impl PageGeometry {
    pub fn a4_portrait() -> Self {
        Self {
            width: 210.0,
            height: 297.0,
            margin: 15.0,
            row_height: 7.0,
            font_size: 8.0,
        }
    }

    pub fn usable_width(&self) -> f32 {
        self.width - 2.0 * self.margin
    }

    /// Lowest baseline a line may sit on
    pub fn bottom(&self) -> f32 {
        self.margin
    }

    pub fn top(&self) -> f32 {
        self.height - self.margin
    }

    /// Lines of `row_height` that fit from baseline `start` down to the bottom margin
    fn lines_from(&self, start: f32) -> usize {
        if start < self.bottom() {
            return 0;
        }
        ((start - self.bottom()) / self.row_height).floor() as usize + 1
    }
}

impl Default for PageGeometry {
    fn default() -> Self {
        Self::a4_portrait()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Title,
    Meta,
    Header,
    Body,
    Totals,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub text: String,
    pub x: f32,
    pub size: f32,
    pub bold: bool,
}

/// One baseline on a page
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedLine {
    pub kind: LineKind,
    pub y: f32,
    pub runs: Vec<TextRun>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PagePlan {
    pub lines: Vec<PlacedLine>,
}

impl PagePlan {
    pub fn count(&self, kind: LineKind) -> usize {
        self.lines.iter().filter(|l| l.kind == kind).count()
    }
}

/// Text of the title and metadata blocks
#[derive(Debug, Clone, PartialEq)]
pub struct ReportHeading {
    pub business_name: String,
    pub address: String,
    pub phone: String,
    pub report_name: String,
    pub range: String,
    pub generated_at: String,
}

pub fn plan(table: &ReportTable, heading: &ReportHeading, geometry: &PageGeometry) -> Vec<PagePlan> {
    let columns = column_layout(table.kind.column_weights(), geometry);
    let mut pages = vec![PagePlan::default()];
    let mut y = geometry.top();

    // Title block, centred
    let centred: [(&str, f32, bool); 4] = [
        (&heading.business_name, 16.0, true),
        (&heading.address, 10.0, false),
        (&heading.phone, 10.0, false),
        (&heading.report_name, 13.0, true),
    ];
    for (text, size, bold) in centred {
        if text.trim().is_empty() {
            continue;
        }
        push(&mut pages, LineKind::Title, y, vec![centred_run(text, size, bold, geometry)]);
        y -= size * MM_PER_PT + 3.0;
    }
    y -= 2.0;

    // Metadata block
    let mut meta = vec![
        ("Date Range".to_string(), heading.range.clone()),
        ("Generated".to_string(), heading.generated_at.clone()),
    ];
    meta.extend(table.totals.iter().cloned());
    for (label, value) in &meta {
        let run = TextRun {
            text: format!("{}: {}", label, value),
            x: geometry.margin,
            size: 9.0,
            bold: false,
        };
        push(&mut pages, LineKind::Meta, y, vec![run]);
        y -= 5.0;
    }
    y -= 3.0;

    // Header row, once
    let header_runs = table
        .headers()
        .iter()
        .zip(&columns)
        .map(|(text, col)| cell_run(text, col, geometry.font_size, true))
        .collect();
    push(&mut pages, LineKind::Header, y, header_runs);
    y -= geometry.row_height;

    for row in &table.rows {
        if geometry.lines_from(y) == 0 {
            pages.push(PagePlan::default());
            y = geometry.top();
        }
        let runs = row
            .iter()
            .zip(&columns)
            .map(|(text, col)| cell_run(text, col, geometry.font_size, false))
            .collect();
        push(&mut pages, LineKind::Body, y, runs);
        y -= geometry.row_height;
    }

    // Totals line under the table
    y -= 2.0;
    if geometry.lines_from(y) == 0 {
        pages.push(PagePlan::default());
        y = geometry.top();
    }
    let summary = table
        .totals
        .iter()
        .map(|(label, value)| format!("{}: {}", label, value))
        .collect::<Vec<_>>()
        .join("    ");
    let run = TextRun {
        text: summary,
        x: geometry.margin,
        size: 9.0,
        bold: true,
    };
    push(&mut pages, LineKind::Totals, y, vec![run]);

    pages
}

#[derive(Debug, Clone, Copy)]
struct Column {
    x: f32,
    width: f32,
}

fn column_layout(weights: &[f32], geometry: &PageGeometry) -> Vec<Column> {
    let total: f32 = weights.iter().sum();
    let mut x = geometry.margin;
    weights
        .iter()
        .map(|w| {
            let width = geometry.usable_width() * w / total;
            let column = Column { x, width };
            x += width;
            column
        })
        .collect()
}

/// Characters of `size` that fit in `width` millimetres
fn fitting_chars(width: f32, size: f32) -> usize {
    (width / (size * MM_PER_PT * GLYPH_WIDTH)).floor().max(1.0) as usize
}

fn cell_run(text: &str, column: &Column, size: f32, bold: bool) -> TextRun {
    TextRun {
        text: truncate(text, fitting_chars(column.width - 1.5, size)),
        x: column.x,
        size,
        bold,
    }
}

fn centred_run(text: &str, size: f32, bold: bool, geometry: &PageGeometry) -> TextRun {
    let text = truncate(text, fitting_chars(geometry.usable_width(), size));
    let width = text.chars().count() as f32 * size * MM_PER_PT * GLYPH_WIDTH;
    TextRun {
        x: ((geometry.width - width) / 2.0).max(geometry.margin),
        text,
        size,
        bold,
    }
}

fn push(pages: &mut [PagePlan], kind: LineKind, y: f32, runs: Vec<TextRun>) {
    if let Some(page) = pages.last_mut() {
        page.lines.push(PlacedLine { kind, y, runs });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::ReportKind;

    fn heading() -> ReportHeading {
        ReportHeading {
            business_name: "Deb Telecom".to_string(),
            address: "Main Road, Bazar".to_string(),
            phone: String::new(),
            report_name: "Due Ledger".to_string(),
            range: "All dates".to_string(),
            generated_at: "2024-05-01 10:00".to_string(),
        }
    }

    fn table(rows: usize) -> ReportTable {
        ReportTable {
            kind: ReportKind::Due,
            rows: (0..rows)
                .map(|i| vec![format!("2024-05-{:02}", i % 28 + 1), "note".to_string(), "1".to_string(), "0".to_string(), "1".to_string()])
                .collect(),
            totals: vec![("Balance".to_string(), "Tk 1.00".to_string())],
        }
    }

    fn count(pages: &[PagePlan], kind: LineKind) -> usize {
        pages.iter().map(|p| p.count(kind)).sum()
    }

    #[test]
    fn test_n_body_rows_plus_one_header() {
        for n in [1, 5, 30, 75, 200] {
            let pages = plan(&table(n), &heading(), &PageGeometry::a4_portrait());
            assert_eq!(count(&pages, LineKind::Body), n);
            assert_eq!(count(&pages, LineKind::Header), 1);
            assert_eq!(pages[0].count(LineKind::Header), 1);
            assert_eq!(count(&pages, LineKind::Totals), 1);
        }
    }

    #[test]
    fn test_long_tables_span_pages_within_margins() {
        let geometry = PageGeometry::a4_portrait();
        let pages = plan(&table(120), &heading(), &geometry);
        assert!(pages.len() > 1);
        for page in &pages {
            for line in &page.lines {
                assert!(line.y >= geometry.bottom() && line.y <= geometry.top());
            }
        }
        let last = pages.last().unwrap();
        assert_eq!(last.lines.last().unwrap().kind, LineKind::Totals);
    }

    #[test]
    fn test_blank_phone_is_skipped() {
        let pages = plan(&table(1), &heading(), &PageGeometry::a4_portrait());
        assert_eq!(pages[0].count(LineKind::Title), 3);
    }

    #[test]
    fn test_cells_are_truncated_to_column() {
        let mut t = table(1);
        t.rows[0][1] = "x".repeat(500);
        let pages = plan(&t, &heading(), &PageGeometry::a4_portrait());
        let body = pages[0].lines.iter().find(|l| l.kind == LineKind::Body).unwrap();
        assert!(body.runs[1].text.ends_with("..."));
        assert!(body.runs[1].text.len() < 100);
    }
}
