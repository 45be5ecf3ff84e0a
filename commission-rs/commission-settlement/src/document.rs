//! Declarative settlement document.
//!
//! A statement is composed into a flat list of blocks once; the text and
//! PDF renderers only lay those blocks out. Neither renderer does any
//! arithmetic.

use commission_kpi::{format_currency, format_rate};
use serde::Serialize;

use crate::statement::{DrawMode, SettlementStatement};

/// One row of the breakdown table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TableRow {
    pub label: String,
    pub value: String,
    /// Drawn bold with a rule above it.
    pub emphasis: bool,
}

impl TableRow {
    fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
            emphasis: false,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum Block {
    Title(String),
    Subtitle(String),
    Paragraph(String),
    Table {
        header: (String, String),
        rows: Vec<TableRow>,
    },
    Rule,
    /// Small print.
    Note(String),
}

/// Ordered blocks making up one settlement.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SettlementDocument {
    pub blocks: Vec<Block>,
}

const PAYMENT_TIMING_NOTE: &str = "Commission is paid with the first regular payroll after the \
reporting period closes and results are finalized. Amounts are subject to adjustment for \
chargebacks, returns, and VHI/FIOS activations cancelled within 30 days.";

const ACCEPTANCE_NOTE: &str = "Please review this statement carefully. If you have questions or \
believe an amount is incorrect, contact management or your team lead within five business days \
of receipt; otherwise this statement will be considered accepted.";

fn tier_sentence(statement: &SettlementStatement) -> String {
    match statement.tier {
        Some(tier) => format!(
            "Commission was calculated at the {} rate of {} of gross profit.",
            tier,
            format_rate(statement.rate)
        ),
        None => format!(
            "Commission was calculated at a rate of {} of gross profit.",
            format_rate(statement.rate)
        ),
    }
}

fn draw_label(statement: &SettlementStatement) -> String {
    match statement.draw_mode {
        DrawMode::PerDraw => format!(
            "Less: Draws ({} x {})",
            format_currency(statement.draw_amount),
            statement.draw_count
        ),
        DrawMode::Total => "Less: Draws".to_string(),
    }
}

impl SettlementDocument {
    /// Compose the standard settlement layout: header, narrative,
    /// breakdown table, and footer.
    pub fn from_statement(statement: &SettlementStatement) -> Self {
        let narrative = format!(
            "This statement summarizes commission earned by {} for the {} reporting period, \
             payable in the {} payout. {}",
            statement.payee,
            statement.report_period,
            statement.payout_period,
            tier_sentence(statement)
        );

        let rows = vec![
            TableRow::new("Gross Profit", format_currency(statement.gross_profit)),
            TableRow::new("Commission Rate", format_rate(statement.rate)),
            TableRow::new("Net Commission", format_currency(statement.net_commission)),
            TableRow::new(draw_label(statement), format_currency(-statement.draw_deduction)),
            TableRow {
                emphasis: true,
                ..TableRow::new("Paid Total", format_currency(statement.paid_total))
            },
        ];

        Self {
            blocks: vec![
                Block::Title("Commission Settlement Statement".into()),
                Block::Subtitle(format!(
                    "{} | Payout Period: {}",
                    statement.payee, statement.payout_period
                )),
                Block::Paragraph(narrative),
                Block::Table {
                    header: ("Item".into(), "Amount".into()),
                    rows,
                },
                Block::Rule,
                Block::Note(PAYMENT_TIMING_NOTE.into()),
                Block::Note(ACCEPTANCE_NOTE.into()),
            ],
        }
    }

    /// Render as fixed-width plain text.
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        for block in &self.blocks {
            match block {
                Block::Title(title) => {
                    out.push_str(title);
                    out.push('\n');
                    out.push_str(&"=".repeat(title.chars().count()));
                    out.push_str("\n\n");
                }
                Block::Subtitle(text) => {
                    out.push_str(text);
                    out.push_str("\n\n");
                }
                Block::Paragraph(text) | Block::Note(text) => {
                    for line in wrap(text, TEXT_WIDTH) {
                        out.push_str(&line);
                        out.push('\n');
                    }
                    out.push('\n');
                }
                Block::Table { header, rows } => {
                    let label_width = rows
                        .iter()
                        .map(|r| r.label.chars().count())
                        .chain(std::iter::once(header.0.chars().count()))
                        .max()
                        .unwrap_or(0)
                        + 4;
                    let value_width = TEXT_WIDTH.saturating_sub(label_width);
                    let line = |label: &str, value: &str| {
                        format!("{:<lw$}{:>vw$}\n", label, value, lw = label_width, vw = value_width)
                    };
                    out.push_str(&line(&header.0, &header.1));
                    out.push_str(&"-".repeat(TEXT_WIDTH));
                    out.push('\n');
                    for row in rows {
                        if row.emphasis {
                            out.push_str(&"-".repeat(TEXT_WIDTH));
                            out.push('\n');
                        }
                        out.push_str(&line(&row.label, &row.value));
                    }
                    out.push('\n');
                }
                Block::Rule => {
                    out.push_str(&"_".repeat(TEXT_WIDTH));
                    out.push_str("\n\n");
                }
            }
        }
        out
    }
}

/// Column width of the plain-text rendering.
const TEXT_WIDTH: usize = 72;

/// Greedy word wrap. Words longer than `width` get a line of their own.
pub(crate) fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        let needed = if current.is_empty() {
            word.len()
        } else {
            current.len() + 1 + word.len()
        };
        if needed > width && !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::statement::tests::sample_input;
    use crate::statement::SettlementInput;

    fn document() -> SettlementDocument {
        SettlementDocument::from_statement(&SettlementStatement::compute(sample_input()).unwrap())
    }

    #[test]
    fn contains_every_section() {
        let doc = document();
        assert!(matches!(doc.blocks[0], Block::Title(_)));
        assert!(matches!(&doc.blocks[1], Block::Subtitle(s) if s.contains("Marcus Allen") && s.contains("October 2026")));
        assert!(matches!(&doc.blocks[2], Block::Paragraph(p) if p.contains("September 2026") && p.contains("high tier")));
        assert_eq!(doc.blocks.iter().filter(|b| matches!(b, Block::Note(_))).count(), 2);
    }

    #[test]
    fn table_rows_carry_formatted_figures() {
        let doc = document();
        let rows = doc
            .blocks
            .iter()
            .find_map(|b| match b {
                Block::Table { rows, .. } => Some(rows.clone()),
                _ => None,
            })
            .unwrap();
        let values: Vec<(&str, &str)> = rows.iter().map(|r| (r.label.as_str(), r.value.as_str())).collect();
        assert_eq!(
            values,
            vec![
                ("Gross Profit", "$30,000.00"),
                ("Commission Rate", "30%"),
                ("Net Commission", "$9,000.00"),
                ("Less: Draws ($1,800.00 x 3)", "-$5,400.00"),
                ("Paid Total", "$3,600.00"),
            ]
        );
        assert!(rows[4].emphasis);
    }

    #[test]
    fn narrative_without_tier() {
        let statement = SettlementStatement::compute(SettlementInput {
            tier: None,
            ..sample_input()
        })
        .unwrap();
        let doc = SettlementDocument::from_statement(&statement);
        assert!(matches!(&doc.blocks[2], Block::Paragraph(p) if p.contains("at a rate of 30%")));
    }

    #[test]
    fn text_rendering_is_deterministic() {
        let a = document().render_text();
        let b = document().render_text();
        assert_eq!(a, b);
        assert!(a.starts_with("Commission Settlement Statement\n"));
        assert!(a.contains("$3,600.00\n"));
        assert!(a.lines().all(|l| l.len() <= TEXT_WIDTH));
    }

    #[test]
    fn wrap_respects_width() {
        let lines = wrap("aaa bbb ccc ddd", 7);
        assert_eq!(lines, vec!["aaa bbb", "ccc ddd"]);
        assert_eq!(wrap("", 10), Vec::<String>::new());
        assert_eq!(wrap("supercalifragilistic word", 5), vec!["supercalifragilistic", "word"]);
    }
}
