//! # Decorative Asset Renderer
//!
//! Static header decoration: a colored band across the top of the first
//! page, an accent strip below it, and a category icon (document, shield or
//! money, by document kind). A caller-supplied logo image takes precedence
//! over the icon; if the logo bytes fail to decode the icon is drawn instead.

use crate::documents::DocumentKind;
use crate::pdf::{self, Surface};

/// Band geometry on the first page.
const BAND_HEIGHT_MM: f32 = 22.0;
const STRIP_HEIGHT_MM: f32 = 1.8;

/// Icon bounding box inside the band.
const ICON_BOX_X_MM: f32 = pdf::MARGIN_LEFT_MM;
const ICON_BOX_SIZE_MM: f32 = 14.0;

/// Draw the header band, accent strip and the icon or logo.
pub fn draw_header(surface: &Surface, kind: DocumentKind, logo: Option<&[u8]>) {
    let band_bottom = pdf::PAGE_HEIGHT_MM - BAND_HEIGHT_MM;

    surface.set_fill(pdf::BAND);
    surface.fill_rect(0.0, band_bottom, pdf::PAGE_WIDTH_MM, BAND_HEIGHT_MM);

    surface.set_fill(pdf::BAND_ACCENT);
    surface.fill_rect(
        0.0,
        band_bottom - STRIP_HEIGHT_MM,
        pdf::PAGE_WIDTH_MM,
        STRIP_HEIGHT_MM,
    );

    let box_y = band_bottom + (BAND_HEIGHT_MM - ICON_BOX_SIZE_MM) / 2.0;

    if let Some(bytes) = logo {
        match surface.image_fit(bytes, ICON_BOX_X_MM, box_y, ICON_BOX_SIZE_MM, ICON_BOX_SIZE_MM) {
            Ok(()) => return,
            Err(e) => eprintln!("logo skipped: {}", e),
        }
    }

    let cx = ICON_BOX_X_MM + ICON_BOX_SIZE_MM / 2.0;
    let cy = box_y + ICON_BOX_SIZE_MM / 2.0;
    surface.set_stroke(pdf::WHITE, 0.6);
    match kind {
        DocumentKind::Loan => draw_document_icon(surface, cx, cy),
        DocumentKind::Consent => draw_shield_icon(surface, cx, cy),
        DocumentKind::Refund => draw_money_icon(surface, cx, cy),
    }
}

/// Sheet of paper with three text rules.
fn draw_document_icon(surface: &Surface, cx: f32, cy: f32) {
    surface.stroke_rect(cx - 4.0, cy - 5.5, 8.0, 11.0);
    for i in 0..3 {
        let y = cy + 2.5 - i as f32 * 2.5;
        surface.line(cx - 2.5, y, cx + 2.5, y);
    }
}

/// Heater-shield outline.
fn draw_shield_icon(surface: &Surface, cx: f32, cy: f32) {
    surface.stroke_polyline(
        &[
            (cx - 4.5, cy + 5.0),
            (cx + 4.5, cy + 5.0),
            (cx + 4.5, cy - 0.5),
            (cx, cy - 5.5),
            (cx - 4.5, cy - 0.5),
        ],
        true,
    );
    // check mark
    surface.stroke_polyline(&[(cx - 2.0, cy + 0.5), (cx - 0.5, cy - 1.0), (cx + 2.2, cy + 2.2)], false);
}

/// Coin with two bars.
fn draw_money_icon(surface: &Surface, cx: f32, cy: f32) {
    surface.stroke_polyline(&circle_points(cx, cy, 5.2), true);
    surface.line(cx - 2.6, cy + 1.2, cx + 2.6, cy + 1.2);
    surface.line(cx - 2.6, cy - 1.2, cx + 2.6, cy - 1.2);
}

/// Polygon approximation of a circle, 32 segments.
fn circle_points(cx: f32, cy: f32, r: f32) -> Vec<(f32, f32)> {
    let segments = 32;
    (0..segments)
        .map(|i| {
            let angle = 2.0 * std::f32::consts::PI * i as f32 / segments as f32;
            (cx + r * angle.cos(), cy + r * angle.sin())
        })
        .collect()
}
