//! # Document Content Model
//!
//! A document body is an ordered sequence of [`ContentLine`]s. The order of
//! the sequence is the visual order on the page; the renderer never reorders
//! or splits lines. Lines are pre-wrapped by the assembler — there is no text
//! measurement or word-wrap engine.

/// Visual category of one body line. Determines font, colour and the
/// vertical advance after drawing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// Regular body prose.
    Normal,
    /// Section heading: bold, heading colour, larger advance.
    Header,
    /// Contact details: accent colour.
    Contact,
    /// Vertical gap: nothing is drawn, smaller advance.
    Gap,
}

/// One unit of body text tagged with its visual kind.
#[derive(Debug, Clone)]
pub struct ContentLine {
    pub kind: LineKind,
    pub text: String,
}

impl ContentLine {
    pub fn normal(text: impl Into<String>) -> Self {
        Self {
            kind: LineKind::Normal,
            text: text.into(),
        }
    }

    pub fn header(text: impl Into<String>) -> Self {
        Self {
            kind: LineKind::Header,
            text: text.into(),
        }
    }

    pub fn contact(text: impl Into<String>) -> Self {
        Self {
            kind: LineKind::Contact,
            text: text.into(),
        }
    }

    pub fn gap() -> Self {
        Self {
            kind: LineKind::Gap,
            text: String::new(),
        }
    }
}
