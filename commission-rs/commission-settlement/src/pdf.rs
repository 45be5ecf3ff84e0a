//! PDF layout of a [`SettlementDocument`].
//!
//! Uses the standard Type1 fonts only, so no font files are embedded, and
//! leaves streams uncompressed. The same document always produces the same
//! bytes.

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream};

use crate::document::{wrap, Block, SettlementDocument};
use crate::error::SettlementResult;

/// US Letter in points.
pub const PAGE_WIDTH: i64 = 612;
pub const PAGE_HEIGHT: i64 = 792;
const MARGIN: i64 = 72;
const RIGHT_EDGE: i64 = PAGE_WIDTH - MARGIN;

const BODY_SIZE: i64 = 10;
const NOTE_SIZE: i64 = 8;
const TITLE_SIZE: i64 = 18;
const SUBTITLE_SIZE: i64 = 12;
const TABLE_SIZE: i64 = 11;

/// Conservative average Helvetica glyph width, in thousandths of an em.
const HELVETICA_AVG_WIDTH: i64 = 550;
/// Courier is monospaced at 600/1000 em.
const COURIER_WIDTH: i64 = 600;

#[derive(Clone, Copy)]
enum Font {
    Regular,
    Bold,
    Mono,
    MonoBold,
}

impl Font {
    fn resource(self) -> &'static str {
        match self {
            Font::Regular => "F1",
            Font::Bold => "F2",
            Font::Mono => "F3",
            Font::MonoBold => "F4",
        }
    }
}

const FONTS: [(&str, &str); 4] = [
    ("F1", "Helvetica"),
    ("F2", "Helvetica-Bold"),
    ("F3", "Courier"),
    ("F4", "Courier-Bold"),
];

fn int(v: i64) -> Object {
    Object::Integer(v)
}

/// Byte for `c` in WinAnsiEncoding, the encoding every font here declares.
fn winansi_byte(c: char) -> Option<u8> {
    let byte = match c {
        ' '..='~' => c as u8,
        '\u{a0}'..='\u{ff}' => c as u8,
        '€' => 0x80,
        '‚' => 0x82,
        'ƒ' => 0x83,
        '„' => 0x84,
        '…' => 0x85,
        '†' => 0x86,
        '‡' => 0x87,
        'ˆ' => 0x88,
        '‰' => 0x89,
        'Š' => 0x8A,
        '‹' => 0x8B,
        'Œ' => 0x8C,
        'Ž' => 0x8E,
        '\u{2018}' => 0x91,
        '\u{2019}' => 0x92,
        '\u{201c}' => 0x93,
        '\u{201d}' => 0x94,
        '•' => 0x95,
        '\u{2013}' => 0x96,
        '\u{2014}' => 0x97,
        '˜' => 0x98,
        '™' => 0x99,
        'š' => 0x9A,
        '›' => 0x9B,
        'œ' => 0x9C,
        'ž' => 0x9E,
        'Ÿ' => 0x9F,
        _ => return None,
    };
    Some(byte)
}

/// Encode text for a standard font. Characters WinAnsi lacks become `?`.
pub(crate) fn pdf_text(text: &str) -> Object {
    let bytes: Vec<u8> = text.chars().map(|c| winansi_byte(c).unwrap_or(b'?')).collect();
    Object::string_literal(bytes)
}

pub(crate) fn text_op(font: &str, size: i64, x: i64, y: i64, text: &str) -> Vec<Operation> {
    vec![
        Operation::new("BT", vec![]),
        Operation::new("Tf", vec![font.into(), int(size)]),
        Operation::new("Td", vec![int(x), int(y)]),
        Operation::new("Tj", vec![pdf_text(text)]),
        Operation::new("ET", vec![]),
    ]
}

fn chars_per_line(size: i64, width: i64) -> usize {
    (width * 1000 / (size * HELVETICA_AVG_WIDTH)).max(1) as usize
}

/// Collects drawing operations page by page, moving the cursor downward.
struct PageWriter {
    pages: Vec<Vec<Operation>>,
    current: Vec<Operation>,
    y: i64,
}

impl PageWriter {
    fn new() -> Self {
        Self {
            pages: Vec::new(),
            current: Vec::new(),
            y: PAGE_HEIGHT - MARGIN,
        }
    }

    fn ensure_room(&mut self, height: i64) {
        if self.y - height < MARGIN && !self.current.is_empty() {
            self.pages.push(std::mem::take(&mut self.current));
            self.y = PAGE_HEIGHT - MARGIN;
        }
    }

    fn text(&mut self, font: Font, size: i64, x: i64, text: &str) {
        self.current.extend(text_op(font.resource(), size, x, self.y, text));
    }

    fn line(&mut self, size: i64, leading: i64, font: Font, text: &str) {
        self.ensure_room(leading);
        self.y -= size;
        self.text(font, size, MARGIN, text);
        self.y -= leading - size;
    }

    fn rule(&mut self, weight: i64) {
        self.ensure_room(8);
        self.y -= 4;
        self.current.extend([
            Operation::new("w", vec![int(weight)]),
            Operation::new("m", vec![int(MARGIN), int(self.y)]),
            Operation::new("l", vec![int(RIGHT_EDGE), int(self.y)]),
            Operation::new("S", vec![]),
        ]);
        self.y -= 4;
    }

    fn gap(&mut self, height: i64) {
        self.y -= height;
    }

    fn table_row(&mut self, label: &str, value: &str, bold: bool) {
        let leading = TABLE_SIZE + 7;
        self.ensure_room(leading);
        self.y -= TABLE_SIZE;
        let (label_font, value_font) = if bold {
            (Font::Bold, Font::MonoBold)
        } else {
            (Font::Regular, Font::Mono)
        };
        self.text(label_font, TABLE_SIZE, MARGIN, label);
        let value_width = value.chars().count() as i64 * COURIER_WIDTH * TABLE_SIZE / 1000;
        self.text(value_font, TABLE_SIZE, RIGHT_EDGE - value_width, value);
        self.y -= leading - TABLE_SIZE;
    }

    fn finish(mut self) -> Vec<Vec<Operation>> {
        if !self.current.is_empty() || self.pages.is_empty() {
            self.pages.push(self.current);
        }
        self.pages
    }
}

fn lay_out(document: &SettlementDocument) -> Vec<Vec<Operation>> {
    let mut page = PageWriter::new();
    let text_width = RIGHT_EDGE - MARGIN;

    for block in &document.blocks {
        match block {
            Block::Title(title) => {
                page.line(TITLE_SIZE, TITLE_SIZE + 8, Font::Bold, title);
            }
            Block::Subtitle(text) => {
                page.line(SUBTITLE_SIZE, SUBTITLE_SIZE + 4, Font::Regular, text);
                page.rule(1);
                page.gap(10);
            }
            Block::Paragraph(text) => {
                for line in wrap(text, chars_per_line(BODY_SIZE, text_width)) {
                    page.line(BODY_SIZE, BODY_SIZE + 4, Font::Regular, &line);
                }
                page.gap(12);
            }
            Block::Table { header, rows } => {
                page.table_row(&header.0, &header.1, true);
                page.rule(1);
                for row in rows {
                    if row.emphasis {
                        page.rule(1);
                    }
                    page.table_row(&row.label, &row.value, row.emphasis);
                }
                page.gap(12);
            }
            Block::Rule => {
                page.rule(1);
                page.gap(6);
            }
            Block::Note(text) => {
                for line in wrap(text, chars_per_line(NOTE_SIZE, text_width)) {
                    page.line(NOTE_SIZE, NOTE_SIZE + 3, Font::Regular, &line);
                }
                page.gap(8);
            }
        }
    }

    page.finish()
}

pub(crate) fn standard_font(base_font: &str) -> Dictionary {
    dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => base_font,
        "Encoding" => "WinAnsiEncoding",
    }
}

/// Render the document as a standalone Letter-size PDF.
pub fn render_pdf(document: &SettlementDocument) -> SettlementResult<Vec<u8>> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let mut fonts = Dictionary::new();
    for (name, base_font) in FONTS {
        let font_id = doc.add_object(standard_font(base_font));
        fonts.set(name, font_id);
    }
    let resources_id = doc.add_object(dictionary! { "Font" => fonts });

    let mut kids: Vec<Object> = Vec::new();
    for operations in lay_out(document) {
        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));
        let page_id: ObjectId = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let page_count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => page_count,
            "Resources" => resources_id,
            "MediaBox" => vec![int(0), int(0), int(PAGE_WIDTH), int(PAGE_HEIGHT)],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes)?;
    log::debug!("rendered settlement PDF: {} page(s), {} bytes", page_count, bytes.len());
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::statement::tests::sample_input;
    use crate::statement::SettlementStatement;

    fn rendered() -> Vec<u8> {
        let statement = SettlementStatement::compute(sample_input()).unwrap();
        render_pdf(&SettlementDocument::from_statement(&statement)).unwrap()
    }

    fn contains(haystack: &[u8], needle: &str) -> bool {
        haystack
            .windows(needle.len())
            .any(|w| w == needle.as_bytes())
    }

    #[test]
    fn output_is_a_pdf() {
        let bytes = rendered();
        assert!(bytes.starts_with(b"%PDF-1.5"));
        assert!(contains(&bytes, "%%EOF"));
    }

    #[test]
    fn same_input_same_bytes() {
        assert_eq!(rendered(), rendered());
    }

    #[test]
    fn figures_appear_in_content() {
        let bytes = rendered();
        assert!(contains(&bytes, "$3,600.00"));
        assert!(contains(&bytes, "$9,000.00"));
        assert!(contains(&bytes, "Marcus Allen"));
        assert!(contains(&bytes, "Helvetica-Bold"));
    }

    #[test]
    fn reloads_as_single_page() {
        let bytes = rendered();
        let doc = Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 1);
    }

    #[test]
    fn long_documents_spill_onto_new_pages() {
        let mut document = SettlementDocument { blocks: Vec::new() };
        for i in 0..120 {
            document.blocks.push(Block::Paragraph(format!("Line {i}")));
        }
        let bytes = render_pdf(&document).unwrap();
        let doc = Document::load_mem(&bytes).unwrap();
        assert!(doc.get_pages().len() > 1);
    }

    #[test]
    fn latin1_names_keep_their_accents() {
        assert_eq!(pdf_text("Zoë").as_str().unwrap(), b"Zo\xeb");
        assert_eq!(pdf_text("José Núñez").as_str().unwrap(), b"Jos\xe9 N\xfa\xf1ez");
    }

    #[test]
    fn winansi_punctuation_maps_to_its_code_points() {
        assert_eq!(
            pdf_text("\u{2018}Q3\u{2019} \u{2013} \u{20ac}5").as_str().unwrap(),
            b"\x91Q3\x92 \x96 \x805"
        );
    }

    #[test]
    fn unencodable_characters_are_replaced() {
        assert_eq!(pdf_text("\u{2713} done\n").as_str().unwrap(), b"? done?");
        assert_eq!(pdf_text("\u{5f20}").as_str().unwrap(), b"?");
    }
}
