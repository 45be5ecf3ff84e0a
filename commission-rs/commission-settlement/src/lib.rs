//! Commission settlement statements.
//!
//! A [`SettlementStatement`] turns gross profit, a commission rate, and the
//! draws already advanced into net commission and paid total. The
//! statement is then composed into a [`SettlementDocument`] and rendered:
//!
//! - as plain text, for the terminal
//! - as a standalone Letter PDF via [`render_pdf`]
//! - or stamped onto a designed template via [`render_overlay`]
//!
//! Renderers never recompute figures; they only lay out what the statement
//! already holds.

pub mod document;
pub mod error;
pub mod overlay;
pub mod pdf;
pub mod period;
pub mod statement;

pub use document::{Block, SettlementDocument, TableRow};
pub use error::{SettlementError, SettlementResult};
pub use overlay::{render_overlay, OverlayField, OverlayLayout, Region, StatementField};
pub use pdf::render_pdf;
pub use period::{settlement_file_name, Period};
pub use statement::{DrawMode, SettlementInput, SettlementStatement};
