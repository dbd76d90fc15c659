//! PDF drawing of planned pages

use crate::error::{ReportError, ReportResult};
use crate::layout::{PageGeometry, PagePlan};
use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference};
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

/// Typeface of every run in a report
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ReportFont {
    /// Helvetica and Helvetica-Bold. WinAnsi only: Bengali and other
    /// non-Latin names do not render.
    #[default]
    Builtin,
    /// TrueType file embedded in the document; bold runs use it too
    External(PathBuf),
}

impl ReportFont {
    pub fn from_path(path: Option<PathBuf>) -> Self {
        path.map_or(ReportFont::Builtin, ReportFont::External)
    }

    /// Regular and bold font references for `doc`
    fn load(&self, doc: &PdfDocumentReference) -> ReportResult<(IndirectFontRef, IndirectFontRef)> {
        match self {
            ReportFont::Builtin => Ok((
                doc.add_builtin_font(BuiltinFont::Helvetica)?,
                doc.add_builtin_font(BuiltinFont::HelveticaBold)?,
            )),
            ReportFont::External(path) => {
                let file = File::open(path).map_err(|e| ReportError::Font {
                    path: path.display().to_string(),
                    message: e.to_string(),
                })?;
                let font = doc.add_external_font(BufReader::new(file))?;
                Ok((font.clone(), font))
            }
        }
    }
}

pub fn render_pdf(
    title: &str,
    pages: &[PagePlan],
    geometry: &PageGeometry,
    font: &ReportFont,
) -> ReportResult<Vec<u8>> {
    let width = Mm(geometry.width);
    let height = Mm(geometry.height);
    let (doc, first_page, first_layer) = PdfDocument::new(title, width, height, "Page 1");
    let (regular, bold) = font.load(&doc)?;
    let total = pages.len();

    for (index, plan) in pages.iter().enumerate() {
        let (page, layer) = if index == 0 {
            (first_page, first_layer)
        } else {
            doc.add_page(width, height, format!("Page {}", index + 1))
        };
        let canvas = doc.get_page(page).get_layer(layer);

        for line in &plan.lines {
            for run in &line.runs {
                let font = if run.bold { &bold } else { &regular };
                canvas.use_text(run.text.clone(), run.size, Mm(run.x), Mm(line.y), font);
            }
        }
        if total > 1 {
            canvas.use_text(
                format!("Page {} of {}", index + 1, total),
                7.0,
                Mm(geometry.width - geometry.margin - 20.0),
                Mm(geometry.margin / 2.0),
                &regular,
            );
        }
    }

    Ok(doc.save_to_bytes()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{LineKind, PlacedLine, TextRun};

    fn title_page() -> PagePlan {
        PagePlan {
            lines: vec![PlacedLine {
                kind: LineKind::Title,
                y: 280.0,
                runs: vec![TextRun { text: "Deb Telecom".to_string(), x: 90.0, size: 16.0, bold: true }],
            }],
        }
    }

    #[test]
    fn test_renders_pdf_bytes() {
        let page = title_page();
        let bytes = render_pdf(
            "Test",
            &[page.clone(), page],
            &PageGeometry::a4_portrait(),
            &ReportFont::Builtin,
        )
        .unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_font_choice_follows_path() {
        assert_eq!(ReportFont::from_path(None), ReportFont::Builtin);
        let path = PathBuf::from("fonts/NotoSansBengali.ttf");
        assert_eq!(ReportFont::from_path(Some(path.clone())), ReportFont::External(path));
    }

    #[test]
    fn test_missing_font_file_is_reported() {
        let font = ReportFont::External(PathBuf::from("/nonexistent/NotoSansBengali.ttf"));
        let err = render_pdf("Test", &[title_page()], &PageGeometry::a4_portrait(), &font).unwrap_err();
        assert!(matches!(err, ReportError::Font { ref path, .. } if path.ends_with("NotoSansBengali.ttf")));
    }
}
