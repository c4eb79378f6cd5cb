//! # Drawing Surface and Paginated Template Renderer
//!
//! [`Surface`] wraps one printpdf document: text, shapes and images placed in
//! millimetre coordinates on A4 pages, plus the single vertical cursor the
//! paginated renderer owns while a document is being built.
//!
//! Pagination policy: before drawing each content line, if the cursor sits
//! below the bottom margin a new page is started and the cursor resets to the
//! top margin. The check happens before drawing, never mid-line — a line is
//! never split across pages.

use std::io::{BufWriter, Cursor};

use printpdf::path::{PaintMode, WindingOrder};
use printpdf::*;

use crate::content::{ContentLine, LineKind};
use crate::error::BlankiError;
use crate::fonts::FontStore;

// ============================================================================
// LAYOUT CONSTANTS
// ============================================================================

pub const PAGE_WIDTH_MM: f32 = 210.0; // A4
pub const PAGE_HEIGHT_MM: f32 = 297.0;

/// Left edge of body text.
pub const MARGIN_LEFT_MM: f32 = 30.0;
/// Cursor values below this trigger a page break.
pub const BOTTOM_MARGIN_MM: f32 = 30.0;
/// Cursor reset position on every new page (40mm below the top edge).
pub const TOP_START_MM: f32 = PAGE_HEIGHT_MM - 40.0;

/// Vertical advance after a body or contact line.
pub const BODY_STEP_MM: f32 = 5.0;
/// Vertical advance after a section heading.
pub const HEADER_STEP_MM: f32 = 6.0;
/// Vertical advance for a blank-space line.
pub const GAP_STEP_MM: f32 = 3.0;

pub const BODY_SIZE_PT: f32 = 10.0;
pub const HEADER_SIZE_PT: f32 = 11.0;

const MM_PER_PT: f32 = 0.352_777_78;

// ============================================================================
// PALETTE
// ============================================================================

/// Body text.
pub const INK: (f32, f32, f32) = (0.13, 0.13, 0.16);
/// Section headings and titles.
pub const HEADING: (f32, f32, f32) = (0.10, 0.18, 0.35);
/// Contact lines.
pub const ACCENT: (f32, f32, f32) = (0.07, 0.45, 0.30);
/// Header band background.
pub const BAND: (f32, f32, f32) = (0.10, 0.25, 0.52);
/// Accent strip under the header band.
pub const BAND_ACCENT: (f32, f32, f32) = (0.06, 0.65, 0.45);
pub const WHITE: (f32, f32, f32) = (1.0, 1.0, 1.0);

// ============================================================================
// FONTS
// ============================================================================

/// The two faces registered in one document.
pub struct DocFonts {
    pub regular: IndirectFontRef,
    pub bold: IndirectFontRef,
}

impl DocFonts {
    /// Register the store's TTF faces, falling back to the built-in
    /// Helvetica faces wherever bytes are missing or rejected.
    fn register(doc: &PdfDocumentReference, store: &FontStore) -> Result<Self, BlankiError> {
        Ok(Self {
            regular: register_face(doc, store.regular.as_deref(), BuiltinFont::Helvetica)?,
            bold: register_face(doc, store.bold.as_deref(), BuiltinFont::HelveticaBold)?,
        })
    }
}

fn register_face(
    doc: &PdfDocumentReference,
    ttf: Option<&[u8]>,
    fallback: BuiltinFont,
) -> Result<IndirectFontRef, BlankiError> {
    if let Some(bytes) = ttf {
        match doc.add_external_font(Cursor::new(bytes)) {
            Ok(font) => return Ok(font),
            Err(e) => eprintln!("external font rejected: {}; using built-in font", e),
        }
    }
    doc.add_builtin_font(fallback)
        .map_err(|e| BlankiError::Font(e.to_string()))
}

// ============================================================================
// SURFACE
// ============================================================================

/// One in-progress PDF document plus the renderer's cursor state.
pub struct Surface {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    fonts: DocFonts,
    /// Current vertical position in mm; decreases down the page.
    y: f32,
    pages: usize,
}

impl Surface {
    pub fn new(title: &str, store: &FontStore) -> Result<Self, BlankiError> {
        let (doc, page1, layer1) =
            PdfDocument::new(title, Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1");
        let fonts = DocFonts::register(&doc, store)?;
        let layer = doc.get_page(page1).get_layer(layer1);
        Ok(Self {
            doc,
            layer,
            fonts,
            y: TOP_START_MM,
            pages: 1,
        })
    }

    pub fn cursor(&self) -> f32 {
        self.y
    }

    pub fn set_cursor(&mut self, y: f32) {
        self.y = y;
    }

    pub fn page_count(&self) -> usize {
        self.pages
    }

    /// Advance to a fresh page and reset the cursor to the top margin.
    pub fn new_page(&mut self) {
        let (page, layer) = self
            .doc
            .add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1");
        self.layer = self.doc.get_page(page).get_layer(layer);
        self.y = TOP_START_MM;
        self.pages += 1;
    }

    // ------------------------------------------------------------------
    // Paginated template rendering
    // ------------------------------------------------------------------

    /// Draw an ordered line sequence starting at the current cursor,
    /// breaking pages as needed. Sequence order is visual order.
    pub fn render_lines(&mut self, lines: &[ContentLine]) {
        for line in lines {
            if self.y < BOTTOM_MARGIN_MM {
                self.new_page();
            }
            match line.kind {
                LineKind::Header => {
                    self.set_fill(HEADING);
                    self.text_bold(&line.text, HEADER_SIZE_PT, MARGIN_LEFT_MM, self.y);
                    self.y -= HEADER_STEP_MM;
                }
                LineKind::Contact => {
                    self.set_fill(ACCENT);
                    self.text(&line.text, BODY_SIZE_PT, MARGIN_LEFT_MM, self.y);
                    self.y -= BODY_STEP_MM;
                }
                LineKind::Gap => {
                    self.y -= GAP_STEP_MM;
                }
                LineKind::Normal => {
                    self.set_fill(INK);
                    self.text(&line.text, BODY_SIZE_PT, MARGIN_LEFT_MM, self.y);
                    self.y -= BODY_STEP_MM;
                }
            }
        }
    }

    // ------------------------------------------------------------------
    // Text
    // ------------------------------------------------------------------

    pub fn text(&self, text: &str, size_pt: f32, x: f32, y: f32) {
        self.layer
            .use_text(text, size_pt, Mm(x), Mm(y), &self.fonts.regular);
    }

    pub fn text_bold(&self, text: &str, size_pt: f32, x: f32, y: f32) {
        self.layer
            .use_text(text, size_pt, Mm(x), Mm(y), &self.fonts.bold);
    }

    /// Rough horizontal centring for the title block. The renderer has no
    /// text metrics; 0.55em average advance is close enough for short
    /// all-caps titles.
    pub fn text_bold_centered(&self, text: &str, size_pt: f32, y: f32) {
        let approx_width_mm = text.chars().count() as f32 * size_pt * 0.55 * MM_PER_PT;
        let x = ((PAGE_WIDTH_MM - approx_width_mm) / 2.0).max(MARGIN_LEFT_MM);
        self.text_bold(text, size_pt, x, y);
    }

    // ------------------------------------------------------------------
    // Shapes
    // ------------------------------------------------------------------

    pub fn set_fill(&self, (r, g, b): (f32, f32, f32)) {
        self.layer
            .set_fill_color(printpdf::Color::Rgb(Rgb::new(r, g, b, None)));
    }

    pub fn set_stroke(&self, (r, g, b): (f32, f32, f32), thickness: f32) {
        self.layer
            .set_outline_color(printpdf::Color::Rgb(Rgb::new(r, g, b, None)));
        self.layer.set_outline_thickness(thickness);
    }

    /// Axis-aligned filled rectangle; (x, y) is the bottom-left corner.
    pub fn fill_rect(&self, x: f32, y: f32, w: f32, h: f32) {
        let points = rect_points(x, y, w, h);
        self.layer.add_polygon(Polygon {
            rings: vec![points],
            mode: PaintMode::Fill,
            winding_order: WindingOrder::NonZero,
        });
    }

    pub fn stroke_rect(&self, x: f32, y: f32, w: f32, h: f32) {
        let points = rect_points(x, y, w, h);
        self.layer.add_line(Line {
            points,
            is_closed: true,
        });
    }

    pub fn line(&self, x1: f32, y1: f32, x2: f32, y2: f32) {
        self.layer.add_line(Line {
            points: vec![
                (Point::new(Mm(x1), Mm(y1)), false),
                (Point::new(Mm(x2), Mm(y2)), false),
            ],
            is_closed: false,
        });
    }

    /// Open or closed stroked polyline through the given mm points.
    pub fn stroke_polyline(&self, points: &[(f32, f32)], closed: bool) {
        let points = points
            .iter()
            .map(|&(x, y)| (Point::new(Mm(x), Mm(y)), false))
            .collect();
        self.layer.add_line(Line {
            points,
            is_closed: closed,
        });
    }

    // ------------------------------------------------------------------
    // Images
    // ------------------------------------------------------------------

    /// Decode raw image bytes and draw them scaled to fit (contain) inside
    /// the given box; (x, y) is the bottom-left corner in mm.
    pub fn image_fit(
        &self,
        bytes: &[u8],
        x: f32,
        y: f32,
        w: f32,
        h: f32,
    ) -> Result<(), BlankiError> {
        // Leading colons: the printpdf glob re-exports its own older `image`.
        let decoded = ::image::ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()
            .map_err(|e| BlankiError::Image(format!("unrecognized image format: {}", e)))?
            .decode()
            .map_err(|e| BlankiError::Image(format!("image decode failed: {}", e)))?;

        let px_w = decoded.width() as f32;
        let px_h = decoded.height() as f32;
        let rgb = decoded.to_rgb8();

        let xobject = ImageXObject {
            width: Px(px_w as usize),
            height: Px(px_h as usize),
            color_space: ColorSpace::Rgb,
            bits_per_component: ColorBits::Bit8,
            interpolate: true,
            image_data: rgb.into_raw(),
            image_filter: None,
            clipping_bbox: None,
            smask: None,
        };

        // Contain fit: preserve aspect ratio, centre inside the box.
        let img_aspect = px_w / px_h;
        let box_aspect = w / h;
        let (render_w, render_h) = if img_aspect > box_aspect {
            (w, w / img_aspect)
        } else {
            (h * img_aspect, h)
        };
        let offset_x = (w - render_w) / 2.0;
        let offset_y = (h - render_h) / 2.0;

        // At 72 dpi one pixel is one point, so the scale factors map pixel
        // dimensions onto the requested mm box.
        let scale_x = (render_w / MM_PER_PT) / px_w;
        let scale_y = (render_h / MM_PER_PT) / px_h;

        printpdf::Image::from(xobject).add_to_layer(
            self.layer.clone(),
            ImageTransform {
                translate_x: Some(Mm(x + offset_x)),
                translate_y: Some(Mm(y + offset_y)),
                scale_x: Some(scale_x),
                scale_y: Some(scale_y),
                dpi: Some(72.0),
                ..Default::default()
            },
        );

        Ok(())
    }

    // ------------------------------------------------------------------
    // Finalization
    // ------------------------------------------------------------------

    /// Serialize the document into a byte buffer.
    pub fn finish(self) -> Result<Vec<u8>, BlankiError> {
        let mut buf = Vec::new();
        {
            let cursor = Cursor::new(&mut buf);
            let mut writer = BufWriter::new(cursor);
            self.doc
                .save(&mut writer)
                .map_err(|e| BlankiError::Pdf(e.to_string()))?;
        }
        Ok(buf)
    }
}

fn rect_points(x: f32, y: f32, w: f32, h: f32) -> Vec<(Point, bool)> {
    vec![
        (Point::new(Mm(x), Mm(y)), false),
        (Point::new(Mm(x + w), Mm(y)), false),
        (Point::new(Mm(x + w), Mm(y + h)), false),
        (Point::new(Mm(x), Mm(y + h)), false),
    ]
}
