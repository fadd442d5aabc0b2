// The book cover.
//
// A single Letter page: a dark background, a short staff with five beamed
// note heads above the title block, an author block in the lower third,
// the compile date, and a thin footer band. Positions are laid out as
// fractions of the page width and height, then scaled to points.

use crate::config::CoverConfig;
use crate::error::Result;
use crate::pdf::{Font, PageCanvas, PageSize, Rgb, build_document};
use chrono::NaiveDate;
use lopdf::Document;

/// Baseline of the top staff line, as a fraction of page height.
const STAFF_TOP: f32 = 0.64;
const STAFF_GAP: f32 = 0.015;
const STAFF_LEFT: f32 = 0.08;
const STAFF_RIGHT: f32 = 0.92;
const STAFF_LINE_WIDTH: f32 = 2.2;
const STAFF_ALPHA: f32 = 0.55;

/// Note heads: x positions, and y offsets below the top line in staff gaps.
const NOTE_XS: [f32; 5] = [0.18, 0.27, 0.36, 0.45, 0.54];
const NOTE_DROPS: [f32; 5] = [0.5, 1.5, 1.0, 2.0, 1.5];
const NOTE_RADIUS: f32 = 0.012;

const BEAM_RISE: f32 = 0.035;
const BEAM_WIDTH: f32 = 6.0;
const BEAM_ALPHA: f32 = 0.85;

const TEXT_LEFT: f32 = 0.08;

const BAND_Y: f32 = 0.04;
const BAND_HEIGHT: f32 = 0.03;

/// "Compiled <Month DD, YYYY>".
pub fn compiled_line(date: NaiveDate) -> String {
    format!("Compiled {}", date.format("%B %d, %Y"))
}

struct Layout {
    size: PageSize,
}

impl Layout {
    fn x(&self, fraction: f32) -> f32 {
        fraction * self.size.width
    }

    fn y(&self, fraction: f32) -> f32 {
        fraction * self.size.height
    }

    fn point(&self, x: f32, y: f32) -> (f32, f32) {
        (self.x(x), self.y(y))
    }
}

/// Draw the cover onto a canvas.
pub fn draw_cover(canvas: &mut PageCanvas, config: &CoverConfig, compiled_on: NaiveDate) {
    let layout = Layout {
        size: canvas.size(),
    };
    let palette = &config.palette;

    canvas.fill_rect(
        palette.background,
        0.0,
        0.0,
        layout.size.width,
        layout.size.height,
    );

    let staff = palette.staff.over(palette.background, STAFF_ALPHA);
    for i in 0..5 {
        let y = STAFF_TOP - i as f32 * STAFF_GAP;
        canvas.line(
            staff,
            STAFF_LINE_WIDTH,
            layout.point(STAFF_LEFT, y),
            layout.point(STAFF_RIGHT, y),
        );
    }

    let note_ys = NOTE_DROPS.map(|drop| STAFF_TOP - STAFF_GAP * drop);
    for (&x, &y) in NOTE_XS.iter().zip(&note_ys) {
        canvas.circle(
            palette.notes,
            layout.x(x),
            layout.y(y),
            layout.x(NOTE_RADIUS),
        );
    }
    let beam = palette.notes.over(palette.background, BEAM_ALPHA);
    canvas.line(
        beam,
        BEAM_WIDTH,
        layout.point(NOTE_XS[0] - 0.01, note_ys[0] + BEAM_RISE),
        layout.point(NOTE_XS[4] + 0.02, note_ys[4] + BEAM_RISE),
    );

    let compiled = compiled_line(compiled_on);
    let lines: [(&str, f32, Font, f32, Rgb); 8] = [
        (config.title.as_str(), 0.78, Font::HelveticaBold, 46.0, palette.title),
        (config.subtitle.as_str(), 0.73, Font::HelveticaBold, 28.0, palette.subtitle),
        (config.instrument_line.as_str(), 0.69, Font::Helvetica, 16.0, palette.instrument_line),
        (config.author.as_str(), 0.235, Font::HelveticaBold, 18.0, palette.author),
        (config.role.as_str(), 0.212, Font::Helvetica, 14.0, palette.details),
        (config.organization.as_str(), 0.194, Font::Helvetica, 14.0, palette.details),
        (config.url.as_str(), 0.172, Font::Helvetica, 13.0, palette.url),
        (compiled.as_str(), 0.14, Font::Helvetica, 12.0, palette.compiled),
    ];
    for (text, y, font, size, colour) in lines {
        if !text.is_empty() {
            canvas.text(colour, font, size, layout.x(TEXT_LEFT), layout.y(y), text);
        }
    }

    canvas.fill_rect(
        palette.band,
        0.0,
        layout.y(BAND_Y),
        layout.size.width,
        layout.y(BAND_HEIGHT),
    );
}

/// A one-page cover document.
pub fn render_cover(config: &CoverConfig, compiled_on: NaiveDate) -> Result<Document> {
    let mut canvas = PageCanvas::new(PageSize::LETTER);
    draw_cover(&mut canvas, config, compiled_on);
    build_document(vec![canvas])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::{page_count, page_strings};

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 7).unwrap()
    }

    #[test]
    fn test_compiled_line_format() {
        assert_eq!(compiled_line(date()), "Compiled March 07, 2024");
    }

    #[test]
    fn test_cover_is_one_page_with_texts_in_order() {
        let doc = render_cover(&CoverConfig::default(), date()).unwrap();
        assert_eq!(page_count(&doc), 1);
        let page = doc.get_pages()[&1];
        let strings = page_strings(&doc, page).unwrap();
        assert_eq!(strings[0], "JAZZ SCALES");
        assert_eq!(strings[1], "Practice Book");
        assert_eq!(strings[2], "C instruments");
        assert_eq!(strings.last().map(String::as_str), Some("Compiled March 07, 2024"));
        assert_eq!(strings.len(), 8);
    }

    #[test]
    fn test_empty_author_block_is_skipped() {
        let config = CoverConfig {
            author: String::new(),
            role: String::new(),
            organization: String::new(),
            url: String::new(),
            ..CoverConfig::default()
        };
        let doc = render_cover(&config, date()).unwrap();
        let page = doc.get_pages()[&1];
        assert_eq!(page_strings(&doc, page).unwrap().len(), 4);
    }
}
