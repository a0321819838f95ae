// ABOUTME: QR code rendering for entry codes
// ABOUTME: SVG output for the browser and a module matrix for PDF drawing

use qrcode::render::svg;
use qrcode::{Color, EcLevel, QrCode};

use crate::error::ExportResult;

/// Modules of quiet zone around the symbol
pub const QUIET_ZONE: usize = 4;

fn encode(code: &str) -> ExportResult<QrCode> {
    Ok(QrCode::with_error_correction_level(code.as_bytes(), EcLevel::M)?)
}

/// Render a code as an SVG document, quiet zone included
pub fn render_qr_svg(code: &str) -> ExportResult<String> {
    let qr = encode(code)?;
    Ok(qr
        .render::<svg::Color>()
        .min_dimensions(240, 240)
        .quiet_zone(true)
        .build())
}

/// Dark/light grid of a QR symbol, including the quiet zone
#[derive(Debug, Clone)]
pub struct QrMatrix {
    width: usize,
    dark: Vec<bool>,
}

impl QrMatrix {
    pub fn encode(code: &str) -> ExportResult<Self> {
        let qr = encode(code)?;
        let inner = qr.width();
        let width = inner + QUIET_ZONE * 2;
        let mut dark = vec![false; width * width];

        for (i, color) in qr.to_colors().into_iter().enumerate() {
            if color == Color::Dark {
                let (x, y) = (i % inner, i / inner);
                dark[(y + QUIET_ZONE) * width + x + QUIET_ZONE] = true;
            }
        }

        Ok(Self { width, dark })
    }

    /// Modules per side
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn is_dark(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.width && self.dark[y * self.width + x]
    }

    /// Coordinates of every dark module, row by row from the top
    pub fn dark_modules(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.dark
            .iter()
            .enumerate()
            .filter(|(_, dark)| **dark)
            .map(move |(i, _)| (i % self.width, i / self.width))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_svg() {
        let svg = render_qr_svg("ABCDEFGHJK").unwrap();
        assert!(svg.contains("<svg"));
        assert!(svg.trim_end().ends_with("</svg>"));
    }

    #[test]
    fn test_matrix_has_quiet_zone_and_finder_pattern() {
        let matrix = QrMatrix::encode("ABCDEFGHJK").unwrap();
        // Version 1 symbols are 21 modules wide
        assert_eq!(matrix.width(), 21 + QUIET_ZONE * 2);

        for i in 0..matrix.width() {
            assert!(!matrix.is_dark(i, 0));
            assert!(!matrix.is_dark(0, i));
        }
        // Top-left finder pattern corner
        assert!(matrix.is_dark(QUIET_ZONE, QUIET_ZONE));
        assert!(!matrix.is_dark(matrix.width(), 0));
        assert!(matrix.dark_modules().count() > 0);
    }
}
