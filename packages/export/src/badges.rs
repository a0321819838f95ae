// ABOUTME: Printable badge sheets for entries
// ABOUTME: Lays out QR badges on A4 pages, two columns by four rows

use printpdf::{BuiltinFont, Line, Mm, PdfDocument, PdfLayerReference, Point, Rect};
use tracing::debug;

use scansheet_core::truncate;
use scansheet_entries::Entry;

use crate::error::ExportResult;
use crate::pdf_report::{black, page_ranges, PAGE_HEIGHT, PAGE_WIDTH};
use crate::qr::QrMatrix;

pub const BADGE_COLUMNS: usize = 2;
pub const BADGE_ROWS: usize = 4;
pub const BADGES_PER_PAGE: usize = BADGE_COLUMNS * BADGE_ROWS;

const BADGE_WIDTH: f32 = 90.0;
const BADGE_HEIGHT: f32 = 65.0;
const QR_SIZE: f32 = 40.0;
const NAME_MAX_CHARS: usize = 30;

/// Left and bottom edge of the badge in `slot` (0-based, row-major from the top)
fn badge_origin(slot: usize) -> (f32, f32) {
    let margin_x = (PAGE_WIDTH - BADGE_WIDTH * BADGE_COLUMNS as f32) / 2.0;
    let margin_y = (PAGE_HEIGHT - BADGE_HEIGHT * BADGE_ROWS as f32) / 2.0;
    let (col, row) = (slot % BADGE_COLUMNS, slot / BADGE_COLUMNS);

    let x = margin_x + col as f32 * BADGE_WIDTH;
    let y = PAGE_HEIGHT - margin_y - (row + 1) as f32 * BADGE_HEIGHT;
    (x, y)
}

/// Rough Helvetica width, enough to center short labels
fn text_width(text: &str, size: f32) -> f32 {
    const PT_TO_MM: f32 = 0.3528;
    text.chars().count() as f32 * size * 0.5 * PT_TO_MM
}

/// Render one badge per entry
pub fn render_badge_sheet(entries: &[Entry]) -> ExportResult<Vec<u8>> {
    let pages = page_ranges(entries.len(), BADGES_PER_PAGE);
    debug!(
        "Rendering {} badge(s) on {} page(s)",
        entries.len(),
        pages.len()
    );

    let (doc, first_page, first_layer) =
        PdfDocument::new("Scansheet badges", Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Badges");
    let bold = doc.add_builtin_font(BuiltinFont::HelveticaBold)?;
    let mono = doc.add_builtin_font(BuiltinFont::Courier)?;

    for (index, range) in pages.into_iter().enumerate() {
        let layer = if index == 0 {
            doc.get_page(first_page).get_layer(first_layer)
        } else {
            let (page, layer) = doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Badges");
            doc.get_page(page).get_layer(layer)
        };

        for (slot, entry) in entries[range].iter().enumerate() {
            let (x, y) = badge_origin(slot);
            draw_outline(&layer, x, y);

            let matrix = QrMatrix::encode(&entry.code)?;
            let qr_x = x + (BADGE_WIDTH - QR_SIZE) / 2.0;
            let qr_y = y + BADGE_HEIGHT - QR_SIZE - 4.0;
            draw_qr(&layer, &matrix, qr_x, qr_y);

            layer.set_fill_color(black());
            let name = truncate(&entry.name, NAME_MAX_CHARS);
            let name_x = x + (BADGE_WIDTH - text_width(&name, 12.0)).max(0.0) / 2.0;
            layer.use_text(name, 12.0, Mm(name_x), Mm(y + 12.0), &bold);

            let code_x = x + (BADGE_WIDTH - text_width(&entry.code, 10.0)) / 2.0;
            layer.use_text(entry.code.clone(), 10.0, Mm(code_x), Mm(y + 5.0), &mono);
        }
    }

    Ok(doc.save_to_bytes()?)
}

/// Thin cut line around a badge
fn draw_outline(layer: &PdfLayerReference, x: f32, y: f32) {
    layer.set_outline_color(black());
    layer.set_outline_thickness(0.25);
    layer.add_line(Line {
        points: vec![
            (Point::new(Mm(x), Mm(y)), false),
            (Point::new(Mm(x + BADGE_WIDTH), Mm(y)), false),
            (Point::new(Mm(x + BADGE_WIDTH), Mm(y + BADGE_HEIGHT)), false),
            (Point::new(Mm(x), Mm(y + BADGE_HEIGHT)), false),
        ],
        is_closed: true,
    });
}

/// Draw dark modules as filled squares; `(x, y)` is the bottom-left corner
fn draw_qr(layer: &PdfLayerReference, matrix: &QrMatrix, x: f32, y: f32) {
    let module = QR_SIZE / matrix.width() as f32;
    let top = y + QR_SIZE;

    layer.set_fill_color(black());
    for (col, row) in matrix.dark_modules() {
        let left = x + col as f32 * module;
        let upper = top - row as f32 * module;
        layer.add_rect(Rect::new(
            Mm(left),
            Mm(upper - module),
            Mm(left + module),
            Mm(upper),
        ));
    }
}
