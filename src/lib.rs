//! Generates paginated legal-document PDFs (loan agreement, personal-data
//! consent, refund policy) from fixed templates with caller-supplied merge
//! fields, served over a small HTTP endpoint.

pub mod assets;
pub mod content;
pub mod decor;
pub mod documents;
pub mod error;
pub mod fields;
pub mod fonts;
pub mod pdf;
pub mod server;

pub use error::BlankiError;
