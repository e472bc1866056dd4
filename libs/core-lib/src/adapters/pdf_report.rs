use crate::adapters::excel_report::COLUMNS;
use crate::domain::prospect::Prospect;
use crate::{CoreError, ReportRenderer};
use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference};

// A4 landscape
const PAGE_WIDTH: f32 = 297.0;
const PAGE_HEIGHT: f32 = 210.0;
const MARGIN: f32 = 12.0;
const LINE_HEIGHT: f32 = 6.0;
const FONT_SIZE: f32 = 9.0;
const COLUMN_X: [f32; 8] = [0.0, 22.0, 80.0, 112.0, 144.0, 164.0, 184.0, 208.0];

fn pdf(e: printpdf::Error) -> CoreError {
    CoreError::Internal(format!("PDF rendering failed: {e:?}"))
}

/// Prospect report as a paginated PDF table.
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfReport;

struct Cursor {
    layer: PdfLayerReference,
    y: f32,
}

impl Cursor {
    fn new_page(doc: &PdfDocumentReference) -> Self {
        let (page, layer) = doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
        Self {
            layer: doc.get_page(page).get_layer(layer),
            y: PAGE_HEIGHT - MARGIN,
        }
    }

    fn row(&mut self, cells: &[String], font: &IndirectFontRef) {
        for (cell, x) in cells.iter().zip(COLUMN_X) {
            self.layer
                .use_text(cell.as_str(), FONT_SIZE, Mm(MARGIN + x), Mm(self.y), font);
        }
        self.y -= LINE_HEIGHT;
    }

    fn is_full(&self) -> bool {
        self.y < MARGIN
    }
}

fn cells(prospect: &Prospect) -> Vec<String> {
    vec![
        prospect.prospect_id.to_string(),
        prospect.name.clone(),
        prospect.mobile_number.clone(),
        prospect.pan_number.clone().unwrap_or_default(),
        prospect.state_id.to_string(),
        prospect.lob_id.to_string(),
        prospect.location_id.to_string(),
        prospect.created_on.format("%Y-%m-%d %H:%M").to_string(),
    ]
}

impl ReportRenderer for PdfReport {
    fn content_type(&self) -> &'static str {
        "application/pdf"
    }

    fn file_extension(&self) -> &'static str {
        "pdf"
    }

    fn render(&self, title: &str, prospects: &[Prospect]) -> Result<Vec<u8>, CoreError> {
        let (doc, page, layer) = PdfDocument::new(title, Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
        let regular = doc.add_builtin_font(BuiltinFont::Helvetica).map_err(pdf)?;
        let bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(pdf)?;
        let header: Vec<String> = COLUMNS.iter().map(|c| c.to_string()).collect();

        let mut cursor = Cursor {
            layer: doc.get_page(page).get_layer(layer),
            y: PAGE_HEIGHT - MARGIN,
        };
        cursor
            .layer
            .use_text(title, 14.0, Mm(MARGIN), Mm(cursor.y), &bold);
        cursor.y -= LINE_HEIGHT * 2.0;
        cursor.row(&header, &bold);

        for prospect in prospects {
            if cursor.is_full() {
                cursor = Cursor::new_page(&doc);
                cursor.row(&header, &bold);
            }
            cursor.row(&cells(prospect), &regular);
        }

        doc.save_to_bytes().map_err(pdf)
    }
}
