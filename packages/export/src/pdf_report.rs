// ABOUTME: PDF attendance report
// ABOUTME: A4 table with a title, repeated column header, and page footers

use std::ops::Range;

use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Line, Mm, PdfDocument, PdfLayerReference, Point, Rgb,
};
use tracing::debug;

use scansheet_core::truncate;
use scansheet_scans::Scan;

use crate::csv_report::{scan_time, UNKNOWN_ENTRY};
use crate::error::ExportResult;

pub(crate) const PAGE_WIDTH: f32 = 210.0;
pub(crate) const PAGE_HEIGHT: f32 = 297.0;
const MARGIN: f32 = 15.0;

pub const ROWS_PER_PAGE: usize = 40;
const ROW_HEIGHT: f32 = 6.0;
const TITLE_Y: f32 = 280.0;
const HEADER_Y: f32 = 268.0;
const FIRST_ROW_Y: f32 = HEADER_Y - 8.0;
const FOOTER_Y: f32 = 10.0;

const EMPTY_MESSAGE: &str = "No scans recorded";

/// Column x offsets and the character budget of each cell
const COLUMNS: [(&str, f32, usize); 6] = [
    ("Date", MARGIN, 10),
    ("Time", 40.0, 8),
    ("Category", 58.0, 22),
    ("Name", 100.0, 34),
    ("Code", 163.0, 10),
    ("Source", 186.0, 6),
];

/// Render scans as a paginated PDF table. `title` names the filters applied.
pub fn render_scans_pdf(title: &str, scans: &[Scan]) -> ExportResult<Vec<u8>> {
    let pages = page_ranges(scans.len(), ROWS_PER_PAGE);
    debug!(
        "Rendering PDF report '{}' ({} scan(s), {} page(s))",
        title,
        scans.len(),
        pages.len()
    );

    let (doc, first_page, first_layer) =
        PdfDocument::new(title, Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Report");
    let regular = doc.add_builtin_font(BuiltinFont::Helvetica)?;
    let bold = doc.add_builtin_font(BuiltinFont::HelveticaBold)?;

    let page_count = pages.len();
    for (index, rows) in pages.into_iter().enumerate() {
        let layer = if index == 0 {
            doc.get_page(first_page).get_layer(first_layer)
        } else {
            let (page, layer) = doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Report");
            doc.get_page(page).get_layer(layer)
        };

        layer.set_fill_color(black());
        layer.use_text(title, 14.0, Mm(MARGIN), Mm(TITLE_Y), &bold);
        draw_header(&layer, &bold);

        if scans.is_empty() {
            layer.use_text(EMPTY_MESSAGE, 10.0, Mm(MARGIN), Mm(FIRST_ROW_Y), &regular);
        }

        for (slot, scan) in scans[rows].iter().enumerate() {
            let y = FIRST_ROW_Y - slot as f32 * ROW_HEIGHT;
            for ((_, x, max), value) in COLUMNS.iter().zip(row_cells(scan)) {
                layer.use_text(truncate(&value, *max), 9.0, Mm(*x), Mm(y), &regular);
            }
        }

        let footer = format!("Page {} of {}", index + 1, page_count);
        layer.use_text(
            footer,
            8.0,
            Mm(PAGE_WIDTH - MARGIN - 25.0),
            Mm(FOOTER_Y),
            &regular,
        );
    }

    Ok(doc.save_to_bytes()?)
}

fn draw_header(layer: &PdfLayerReference, font: &IndirectFontRef) {
    for (label, x, _) in COLUMNS {
        layer.use_text(label, 10.0, Mm(x), Mm(HEADER_Y), font);
    }

    let rule_y = HEADER_Y - 2.5;
    layer.set_outline_color(black());
    layer.set_outline_thickness(0.5);
    layer.add_line(Line {
        points: vec![
            (Point::new(Mm(MARGIN), Mm(rule_y)), false),
            (Point::new(Mm(PAGE_WIDTH - MARGIN), Mm(rule_y)), false),
        ],
        is_closed: false,
    });
}

fn row_cells(scan: &Scan) -> [String; 6] {
    [
        scan.scan_date.format("%Y-%m-%d").to_string(),
        scan_time(scan),
        scan.category_name.clone(),
        scan.entry_name
            .clone()
            .unwrap_or_else(|| UNKNOWN_ENTRY.to_string()),
        scan.code.clone(),
        scan.source.to_string(),
    ]
}

pub(crate) fn black() -> Color {
    Color::Rgb(Rgb::new(0.0, 0.0, 0.0, None))
}

/// Split `total` rows into pages. Always yields at least one page.
pub(crate) fn page_ranges(total: usize, per_page: usize) -> Vec<Range<usize>> {
    if total == 0 {
        return vec![0..0];
    }
    (0..total)
        .step_by(per_page)
        .map(|start| start..(start + per_page).min(total))
        .collect()
}
