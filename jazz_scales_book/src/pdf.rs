// Low-level PDF drawing and I/O on top of `lopdf`.
//
// `PageCanvas` collects content-stream operations for one page: filled
// rectangles, stroked lines, filled circles, and text in the two standard
// Helvetica faces. `build_document` turns a list of canvases into a
// self-contained document. The fonts are standard Type 1 fonts, so nothing
// is embedded; text is encoded as WinAnsi. Coordinates are PDF points with
// the origin at the bottom left.
//
// The standard fonts carry no metrics in the file, so right-aligned text
// is positioned with the published Helvetica advance widths below.

use crate::error::{BookError, Result};
use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, ObjectId, Stream, dictionary};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Bezier control distance for a quarter circle of radius 1.
const KAPPA: f32 = 0.552_284_8;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageSize {
    pub width: f32,
    pub height: f32,
}

impl PageSize {
    /// US Letter, 8.5 x 11 inches.
    pub const LETTER: PageSize = PageSize {
        width: 612.0,
        height: 792.0,
    };

    pub(crate) fn media_box(self) -> Object {
        Object::Array(vec![
            Object::Integer(0),
            Object::Integer(0),
            Object::Real(self.width),
            Object::Real(self.height),
        ])
    }
}

/// An sRGB colour, written in config files as `#rrggbb`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Rgb { r, g, b }
    }

    /// Parse `#rrggbb` (the `#` is optional).
    pub fn from_hex(text: &str) -> Option<Self> {
        let hex = text.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        Some(Rgb::new(channel(0)?, channel(2)?, channel(4)?))
    }

    /// This colour painted at `alpha` opacity over `background`.
    pub fn over(self, background: Rgb, alpha: f32) -> Rgb {
        let alpha = alpha.clamp(0.0, 1.0);
        let mix = |fg: u8, bg: u8| {
            (f32::from(fg) * alpha + f32::from(bg) * (1.0 - alpha)).round() as u8
        };
        Rgb::new(
            mix(self.r, background.r),
            mix(self.g, background.g),
            mix(self.b, background.b),
        )
    }

    fn operands(self) -> Vec<Object> {
        [self.r, self.g, self.b]
            .into_iter()
            .map(|c| Object::Real(f32::from(c) / 255.0))
            .collect()
    }
}

impl TryFrom<String> for Rgb {
    type Error = String;

    fn try_from(text: String) -> std::result::Result<Self, String> {
        Rgb::from_hex(&text).ok_or_else(|| format!("invalid colour {text:?}, expected #rrggbb"))
    }
}

impl From<Rgb> for String {
    fn from(rgb: Rgb) -> String {
        format!("#{:02x}{:02x}{:02x}", rgb.r, rgb.g, rgb.b)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Font {
    Helvetica,
    HelveticaBold,
}

impl Font {
    fn resource_name(self) -> &'static str {
        match self {
            Font::Helvetica => "F1",
            Font::HelveticaBold => "F2",
        }
    }

    fn base_font(self) -> &'static str {
        match self {
            Font::Helvetica => "Helvetica",
            Font::HelveticaBold => "Helvetica-Bold",
        }
    }

    fn widths(self) -> &'static [u16; 95] {
        match self {
            Font::Helvetica => &HELVETICA_WIDTHS,
            Font::HelveticaBold => &HELVETICA_BOLD_WIDTHS,
        }
    }
}

/// Advance widths (1/1000 em) of printable ASCII, space through tilde.
#[rustfmt::skip]
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

#[rustfmt::skip]
const HELVETICA_BOLD_WIDTHS: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

/// Width assumed for characters outside printable ASCII.
const FALLBACK_WIDTH: u16 = 556;

/// Width of `text` in points when set in `font` at `size`.
pub fn text_width(font: Font, size: f32, text: &str) -> f32 {
    let widths = font.widths();
    let units: u32 = text
        .chars()
        .map(|c| match c {
            ' '..='~' => u32::from(widths[c as usize - 0x20]),
            _ => u32::from(FALLBACK_WIDTH),
        })
        .sum();
    units as f32 * size / 1000.0
}

/// Encode text for a WinAnsi font. Characters outside Latin-1 become `?`.
fn win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| u8::try_from(u32::from(c)).unwrap_or(b'?'))
        .collect()
}

fn real(value: f32) -> Object {
    Object::Real(value)
}

/// Drawing operations for one page.
#[derive(Debug, Clone)]
pub struct PageCanvas {
    size: PageSize,
    operations: Vec<Operation>,
}

impl PageCanvas {
    pub fn new(size: PageSize) -> Self {
        PageCanvas {
            size,
            operations: Vec::new(),
        }
    }

    pub fn size(&self) -> PageSize {
        self.size
    }

    pub fn is_blank(&self) -> bool {
        self.operations.is_empty()
    }

    fn push(&mut self, operator: &str, operands: Vec<Object>) {
        self.operations.push(Operation::new(operator, operands));
    }

    pub fn fill_rect(&mut self, colour: Rgb, x: f32, y: f32, width: f32, height: f32) {
        self.push("rg", colour.operands());
        self.push("re", vec![real(x), real(y), real(width), real(height)]);
        self.push("f", vec![]);
    }

    pub fn line(&mut self, colour: Rgb, width: f32, from: (f32, f32), to: (f32, f32)) {
        self.push("RG", colour.operands());
        self.push("w", vec![real(width)]);
        self.push("m", vec![real(from.0), real(from.1)]);
        self.push("l", vec![real(to.0), real(to.1)]);
        self.push("S", vec![]);
    }

    /// A filled circle drawn as four cubic Bezier arcs.
    pub fn circle(&mut self, colour: Rgb, cx: f32, cy: f32, radius: f32) {
        let k = radius * KAPPA;
        let r = radius;
        self.push("rg", colour.operands());
        self.push("m", vec![real(cx + r), real(cy)]);
        let arcs = [
            [cx + r, cy + k, cx + k, cy + r, cx, cy + r],
            [cx - k, cy + r, cx - r, cy + k, cx - r, cy],
            [cx - r, cy - k, cx - k, cy - r, cx, cy - r],
            [cx + k, cy - r, cx + r, cy - k, cx + r, cy],
        ];
        for arc in arcs {
            self.push("c", arc.into_iter().map(real).collect());
        }
        self.push("f", vec![]);
    }

    /// Text with its baseline starting at (`x`, `y`).
    pub fn text(&mut self, colour: Rgb, font: Font, size: f32, x: f32, y: f32, text: &str) {
        self.push("rg", colour.operands());
        self.push("BT", vec![]);
        self.push("Tf", vec![Object::Name(font.resource_name().into()), real(size)]);
        self.push("Td", vec![real(x), real(y)]);
        self.push("Tj", vec![Object::string_literal(win_ansi(text))]);
        self.push("ET", vec![]);
    }

    /// Text whose baseline ends at (`right`, `y`).
    pub fn text_right(&mut self, colour: Rgb, font: Font, size: f32, right: f32, y: f32, text: &str) {
        let x = right - text_width(font, size, text);
        self.text(colour, font, size, x, y, text);
    }
}

/// Build a document with one page per canvas. The font resources live on
/// the page tree root and are inherited by every page.
pub fn build_document(pages: Vec<PageCanvas>) -> Result<Document> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let mut fonts = lopdf::Dictionary::new();
    for font in [Font::Helvetica, Font::HelveticaBold] {
        let id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => font.base_font(),
            "Encoding" => "WinAnsiEncoding",
        });
        fonts.set(font.resource_name(), id);
    }
    let resources_id = doc.add_object(dictionary! { "Font" => fonts });

    let mut kids: Vec<Object> = Vec::with_capacity(pages.len());
    for page in pages {
        let size = page.size;
        let content = Content {
            operations: page.operations,
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "MediaBox" => size.media_box(),
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "Resources" => resources_id,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    Ok(doc)
}

/// Load a prerequisite PDF. A missing file is reported as `MissingInput`
/// naming `what` it was supposed to be.
pub fn load(path: &Path, what: &'static str) -> Result<Document> {
    if !path.is_file() {
        return Err(BookError::MissingInput {
            what,
            path: path.to_path_buf(),
        });
    }
    Document::load(path).map_err(|source| BookError::Load {
        path: path.to_path_buf(),
        source,
    })
}

/// Like `load`, but a document without pages is `EmptyInput`.
pub fn load_section(path: &Path, what: &'static str) -> Result<Document> {
    let doc = load(path, what)?;
    if page_count(&doc) == 0 {
        return Err(BookError::EmptyInput {
            what,
            path: path.to_path_buf(),
        });
    }
    Ok(doc)
}

pub fn page_count(doc: &Document) -> usize {
    doc.get_pages().len()
}

/// Write a document, creating the parent directory if needed.
pub fn save(doc: &mut Document, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| BookError::io(parent, e))?;
    }
    doc.save(path)
        .map(|_| ())
        .map_err(|e| BookError::Save {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
}

/// Every string shown with `Tj` on a page, in drawing order.
pub fn page_strings(doc: &Document, page_id: ObjectId) -> Result<Vec<String>> {
    let content = Content::decode(&doc.get_page_content(page_id)?)?;
    Ok(content
        .operations
        .iter()
        .filter(|op| op.operator == "Tj")
        .filter_map(|op| op.operands.first())
        .filter_map(|operand| match operand {
            Object::String(bytes, _) => Some(bytes.iter().map(|&b| char::from(b)).collect()),
            _ => None,
        })
        .collect())
}
