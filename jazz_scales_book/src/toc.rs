// Table of contents pages.
//
// A heading on the first page, then one line per entry: the title at the
// left margin and its page number flush with the right margin. Lines are
// 18 pt apart; once the next baseline would fall below the bottom margin
// the rest continue on a new page, which starts at the top margin with no
// heading. On Letter paper that is 35 entries on the first page and 37 on
// each later one.

use crate::error::Result;
use crate::pdf::{Font, PageCanvas, PageSize, Rgb, build_document};
use lopdf::Document;
use std::ops::Range;

const PAGE: PageSize = PageSize::LETTER;
const MARGIN: f32 = 72.0;
const HEADING_SIZE: f32 = 24.0;
/// Drop from the heading baseline to the first entry.
const HEADING_GAP: f32 = 36.0;
const ENTRY_SIZE: f32 = 12.0;
const LINE_HEIGHT: f32 = 18.0;
const INK: Rgb = Rgb::new(0, 0, 0);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TocEntry {
    pub title: String,
    /// 1-based page number as printed.
    pub page: usize,
}

impl TocEntry {
    pub fn new(title: impl Into<String>, page: usize) -> Self {
        TocEntry {
            title: title.into(),
            page,
        }
    }
}

fn first_baseline(page_index: usize) -> f32 {
    let top = PAGE.height - MARGIN;
    if page_index == 0 { top - HEADING_GAP } else { top }
}

/// Split `entry_count` entries into per-page index ranges. Always returns
/// at least one page, and never a trailing empty one.
pub fn paginate(entry_count: usize) -> Vec<Range<usize>> {
    let mut pages = Vec::new();
    let mut start = 0;
    let mut y = first_baseline(0);
    for i in 0..entry_count {
        y -= LINE_HEIGHT;
        if y < MARGIN && i + 1 < entry_count {
            pages.push(start..i + 1);
            start = i + 1;
            y = first_baseline(pages.len());
        }
    }
    pages.push(start..entry_count);
    pages
}

/// Number of pages `render_toc` produces for `entry_count` entries.
pub fn page_count_for(entry_count: usize) -> usize {
    paginate(entry_count).len()
}

pub fn render_toc(heading: &str, entries: &[TocEntry]) -> Result<Document> {
    let right = PAGE.width - MARGIN;
    let canvases = paginate(entries.len())
        .into_iter()
        .enumerate()
        .map(|(index, range)| {
            let mut canvas = PageCanvas::new(PAGE);
            if index == 0 {
                canvas.text(
                    INK,
                    Font::HelveticaBold,
                    HEADING_SIZE,
                    MARGIN,
                    PAGE.height - MARGIN,
                    heading,
                );
            }
            let mut y = first_baseline(index);
            for entry in &entries[range] {
                canvas.text(INK, Font::Helvetica, ENTRY_SIZE, MARGIN, y, &entry.title);
                canvas.text_right(
                    INK,
                    Font::Helvetica,
                    ENTRY_SIZE,
                    right,
                    y,
                    &entry.page.to_string(),
                );
                y -= LINE_HEIGHT;
            }
            canvas
        })
        .collect();
    build_document(canvases)
}
