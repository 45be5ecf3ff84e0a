//! Template overlay renderer.
//!
//! Instead of generating the whole statement, stamp the computed figures
//! onto a pre-designed template PDF. Each field's region is painted white
//! first so the template's placeholder text is hidden, then the new value
//! is written at the field's anchor.

use commission_kpi::{format_currency, format_rate};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream};
use serde::{Deserialize, Serialize};

use crate::error::{SettlementError, SettlementResult};
use crate::pdf::{standard_font, text_op};
use crate::statement::SettlementStatement;

/// Font resource name added to the template page.
const OVERLAY_FONT: &str = "FOvl";
/// Page tree depth limit when looking up inherited resources.
const MAX_TREE_DEPTH: usize = 32;

/// A statement value that can be stamped onto a template.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatementField {
    Payee,
    PayoutPeriod,
    ReportPeriod,
    GrossProfit,
    CommissionRate,
    NetCommission,
    DrawDeduction,
    PaidTotal,
}

impl StatementField {
    pub fn value(self, statement: &SettlementStatement) -> String {
        match self {
            StatementField::Payee => statement.payee.clone(),
            StatementField::PayoutPeriod => statement.payout_period.to_string(),
            StatementField::ReportPeriod => statement.report_period.to_string(),
            StatementField::GrossProfit => format_currency(statement.gross_profit),
            StatementField::CommissionRate => format_rate(statement.rate),
            StatementField::NetCommission => format_currency(statement.net_commission),
            StatementField::DrawDeduction => format_currency(-statement.draw_deduction),
            StatementField::PaidTotal => format_currency(statement.paid_total),
        }
    }
}

/// Rectangle in PDF user space, origin bottom-left.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    pub x: i64,
    pub y: i64,
    pub width: i64,
    pub height: i64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverlayField {
    pub field: StatementField,
    /// Painted white before writing.
    pub erase: Region,
    /// Text baseline start.
    pub anchor: (i64, i64),
    #[serde(default = "default_font_size")]
    pub font_size: i64,
}

fn default_font_size() -> i64 {
    11
}

/// Where each field goes on the template.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayLayout {
    /// 1-based page number.
    pub page: u32,
    pub fields: Vec<OverlayField>,
}

impl Default for OverlayLayout {
    /// Matches the standard Letter settlement template.
    fn default() -> Self {
        let row = |field, y| OverlayField {
            field,
            erase: Region {
                x: 400,
                y: y - 4,
                width: 140,
                height: 16,
            },
            anchor: (410, y),
            font_size: default_font_size(),
        };
        let header = |field, x, y, width| OverlayField {
            field,
            erase: Region {
                x,
                y: y - 4,
                width,
                height: 16,
            },
            anchor: (x + 2, y),
            font_size: 12,
        };
        Self {
            page: 1,
            fields: vec![
                header(StatementField::Payee, 72, 690, 220),
                header(StatementField::PayoutPeriod, 380, 690, 160),
                header(StatementField::ReportPeriod, 380, 670, 160),
                row(StatementField::GrossProfit, 560),
                row(StatementField::CommissionRate, 540),
                row(StatementField::NetCommission, 520),
                row(StatementField::DrawDeduction, 500),
                row(StatementField::PaidTotal, 470),
            ],
        }
    }
}

fn kind(object: &Object) -> &'static str {
    match object {
        Object::Null => "null",
        Object::Boolean(_) => "boolean",
        Object::Integer(_) => "integer",
        Object::Real(_) => "real",
        Object::Name(_) => "name",
        Object::String(..) => "string",
        Object::Array(_) => "array",
        Object::Dictionary(_) => "dictionary",
        Object::Stream(_) => "stream",
        Object::Reference(_) => "reference",
    }
}

fn resolve_dict(doc: &Document, object: &Object) -> SettlementResult<Dictionary> {
    match object {
        Object::Dictionary(dict) => Ok(dict.clone()),
        Object::Reference(id) => Ok(doc.get_dictionary(*id)?.clone()),
        other => Err(SettlementError::UnsupportedTemplate(format!(
            "expected a dictionary, found {}",
            kind(other)
        ))),
    }
}

/// Resources in effect for a page, following `Parent` links for
/// inherited entries.
fn effective_resources(doc: &Document, page_id: ObjectId) -> SettlementResult<Dictionary> {
    let mut node = page_id;
    for _ in 0..MAX_TREE_DEPTH {
        let dict = doc.get_dictionary(node)?;
        if let Ok(resources) = dict.get(b"Resources") {
            return resolve_dict(doc, resources);
        }
        match dict.get(b"Parent").and_then(Object::as_reference) {
            Ok(parent) => node = parent,
            Err(_) => break,
        }
    }
    Ok(Dictionary::new())
}

fn existing_contents(doc: &Document, page: &Dictionary) -> SettlementResult<Vec<Object>> {
    match page.get(b"Contents") {
        Err(_) => Ok(Vec::new()),
        Ok(Object::Array(items)) => Ok(items.clone()),
        Ok(Object::Reference(id)) => match doc.get_object(*id)? {
            Object::Array(items) => Ok(items.clone()),
            Object::Stream(_) => Ok(vec![Object::Reference(*id)]),
            other => Err(SettlementError::UnsupportedTemplate(format!(
                "page contents is a {}",
                kind(other)
            ))),
        },
        Ok(other) => Err(SettlementError::UnsupportedTemplate(format!(
            "page contents is a {}",
            kind(other)
        ))),
    }
}

fn overlay_operations(statement: &SettlementStatement, layout: &OverlayLayout) -> Vec<Operation> {
    let mut ops = Vec::new();
    for field in &layout.fields {
        let Region {
            x,
            y,
            width,
            height,
        } = field.erase;
        ops.extend([
            Operation::new("q", vec![]),
            Operation::new("g", vec![Object::Integer(1)]),
            Operation::new(
                "re",
                vec![
                    Object::Integer(x),
                    Object::Integer(y),
                    Object::Integer(width),
                    Object::Integer(height),
                ],
            ),
            Operation::new("f", vec![]),
            Operation::new("Q", vec![]),
            Operation::new("g", vec![Object::Integer(0)]),
        ]);
        ops.extend(text_op(
            OVERLAY_FONT,
            field.font_size,
            field.anchor.0,
            field.anchor.1,
            &field.field.value(statement),
        ));
    }
    ops
}

fn add_stream(doc: &mut Document, operations: Vec<Operation>) -> SettlementResult<ObjectId> {
    let content = Content { operations };
    Ok(doc.add_object(Stream::new(dictionary! {}, content.encode()?)))
}

/// Stamp `statement` onto page `layout.page` of `template`.
///
/// The template's own content is wrapped in `q`/`Q` so any graphics state
/// it leaves behind cannot leak into the overlay.
pub fn render_overlay(
    template: &[u8],
    statement: &SettlementStatement,
    layout: &OverlayLayout,
) -> SettlementResult<Vec<u8>> {
    let mut doc = Document::load_mem(template)?;
    let pages = doc.get_pages();
    let page_id = *pages
        .get(&layout.page)
        .ok_or(SettlementError::TemplatePageMissing {
            page: layout.page,
            available: pages.len(),
        })?;

    let mut resources = effective_resources(&doc, page_id)?;
    let mut fonts = match resources.get(b"Font") {
        Ok(fonts) => resolve_dict(&doc, fonts)?,
        Err(_) => Dictionary::new(),
    };
    let font_id = doc.add_object(standard_font("Helvetica"));
    fonts.set(OVERLAY_FONT, font_id);
    resources.set("Font", fonts);

    let existing = existing_contents(&doc, doc.get_dictionary(page_id)?)?;
    let save_id = add_stream(&mut doc, vec![Operation::new("q", vec![])])?;
    let restore_id = add_stream(&mut doc, vec![Operation::new("Q", vec![])])?;
    let overlay_id = add_stream(&mut doc, overlay_operations(statement, layout))?;

    let mut contents: Vec<Object> = Vec::with_capacity(existing.len() + 3);
    contents.push(save_id.into());
    contents.extend(existing);
    contents.push(restore_id.into());
    contents.push(overlay_id.into());

    let page = doc.get_object_mut(page_id)?.as_dict_mut()?;
    page.set("Resources", resources);
    page.set("Contents", contents);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes)?;
    log::debug!(
        "stamped {} field(s) onto template page {}",
        layout.fields.len(),
        layout.page
    );
    Ok(bytes)
}
