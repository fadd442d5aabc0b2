// Book assembly: cover, table of contents, then the chart sections.
//
// Page numbers printed in the TOC depend on how many pages the TOC itself
// takes, and that depends on how many entries it has. The assembler starts
// from an empty placeholder TOC, plans the layout for its page count,
// renders the real TOC, and repeats until the rendered page count matches
// the one the plan assumed. The result is merged into one document with a
// bookmark at the first page of every section.
//
// Two numbering schemes are in play:
// - TOC entries show 1-based page numbers as printed.
// - Bookmarks point at 0-based page indices in the merged document.
// For every section, bookmark index + 1 == TOC page number.

use crate::collect::collect_key_pdfs;
use crate::config::BookConfig;
use crate::error::{BookError, Result};
use crate::pdf::{self, PageSize, page_count};
use crate::toc::{TocEntry, render_toc};
use lopdf::{Bookmark, Dictionary, Document, Object, ObjectId, dictionary};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Upper bound on TOC layout passes before giving up.
const MAX_TOC_PASSES: usize = 8;

/// Page attributes a page may inherit from its ancestors in the page tree.
const INHERITABLE: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

/// Guard against cyclic `Parent` chains in malformed input.
const MAX_TREE_DEPTH: usize = 64;

/// One titled part of the book's body.
#[derive(Debug, Clone)]
pub struct Section {
    pub title: String,
    pub document: Document,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookmarkEntry {
    pub title: String,
    /// 0-based page index in the merged book.
    pub page_index: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookLayout {
    pub toc_entries: Vec<TocEntry>,
    pub bookmarks: Vec<BookmarkEntry>,
}

/// Where every section starts, given the page counts of everything before
/// it. `section_page_counts` and `titles` are parallel.
pub fn plan_layout(
    cover_pages: usize,
    toc_pages: usize,
    section_page_counts: &[usize],
    titles: &[String],
) -> BookLayout {
    let mut toc_entries = Vec::with_capacity(titles.len());
    let mut bookmarks = Vec::with_capacity(titles.len());
    let mut page_index = cover_pages + toc_pages;
    for (title, &pages) in titles.iter().zip(section_page_counts) {
        toc_entries.push(TocEntry::new(title.clone(), page_index + 1));
        bookmarks.push(BookmarkEntry {
            title: title.clone(),
            page_index,
        });
        page_index += pages;
    }
    BookLayout {
        toc_entries,
        bookmarks,
    }
}

#[derive(Debug)]
pub struct AssembledBook {
    pub document: Document,
    /// The final TOC on its own, as merged into `document`.
    pub toc: Document,
    pub layout: BookLayout,
    pub page_count: usize,
}

pub fn assemble_book(cover: Document, sections: Vec<Section>, heading: &str) -> Result<AssembledBook> {
    let cover_pages = page_count(&cover);
    let counts: Vec<usize> = sections.iter().map(|s| page_count(&s.document)).collect();
    let titles: Vec<String> = sections.iter().map(|s| s.title.clone()).collect();

    let mut toc_pages = page_count(&render_toc(heading, &[])?);
    let mut settled = None;
    for pass in 1..=MAX_TOC_PASSES {
        let layout = plan_layout(cover_pages, toc_pages, &counts, &titles);
        let toc = render_toc(heading, &layout.toc_entries)?;
        let rendered = page_count(&toc);
        debug!(pass, assumed = toc_pages, rendered, "TOC layout pass");
        if rendered == toc_pages {
            settled = Some((layout, toc));
            break;
        }
        toc_pages = rendered;
    }
    let (layout, toc) = settled.ok_or(BookError::TocDidNotSettle(MAX_TOC_PASSES))?;

    let mut parts = Vec::with_capacity(sections.len() + 2);
    parts.push(cover);
    parts.push(toc.clone());
    parts.extend(sections.into_iter().map(|s| s.document));
    let document = merge_documents(parts, &layout.bookmarks)?;
    let page_count = page_count(&document);
    info!(
        pages = page_count,
        sections = layout.bookmarks.len(),
        toc_pages,
        "Assembled book"
    );

    Ok(AssembledBook {
        document,
        toc,
        layout,
        page_count,
    })
}

/// A page dictionary with inherited attributes copied down from its
/// ancestors, so it stands alone once re-parented.
fn standalone_page(doc: &Document, page_id: ObjectId) -> Result<Dictionary> {
    let mut page = doc.get_dictionary(page_id)?.clone();
    let mut parent = page.get(b"Parent").and_then(Object::as_reference).ok();
    let mut depth = 0;
    while let Some(id) = parent {
        if depth == MAX_TREE_DEPTH {
            break;
        }
        depth += 1;
        let Ok(node) = doc.get_dictionary(id) else {
            break;
        };
        for key in INHERITABLE {
            if page.has(key) {
                continue;
            }
            if let Ok(value) = node.get(key) {
                page.set(key, value.clone());
            }
        }
        parent = node.get(b"Parent").and_then(Object::as_reference).ok();
    }
    if !page.has(b"MediaBox") {
        page.set("MediaBox", PageSize::LETTER.media_box());
    }
    Ok(page)
}

fn object_type(object: &Object) -> Option<&[u8]> {
    match object {
        Object::Dictionary(dict) => dict.get(b"Type").and_then(Object::as_name).ok(),
        _ => None,
    }
}

/// Concatenate `parts` page by page into a new document and add a top-level
/// bookmark for each entry of `bookmarks`.
///
/// Each part's objects are renumbered into a shared id space. The parts'
/// own catalogs, page trees and outlines are dropped and replaced by one
/// page tree and catalog for the whole book.
pub fn merge_documents(parts: Vec<Document>, bookmarks: &[BookmarkEntry]) -> Result<Document> {
    let mut next_id = 1;
    let mut pages: Vec<(ObjectId, Dictionary)> = Vec::new();
    let mut objects: BTreeMap<ObjectId, Object> = BTreeMap::new();

    for mut doc in parts {
        doc.renumber_objects_with(next_id);
        next_id = doc.max_id + 1;
        for page_id in doc.get_pages().into_values() {
            pages.push((page_id, standalone_page(&doc, page_id)?));
        }
        objects.extend(doc.objects);
    }

    let mut merged = Document::with_version("1.5");
    merged.max_id = next_id;
    for (id, object) in objects {
        if matches!(
            object_type(&object),
            Some(b"Catalog" | b"Pages" | b"Page" | b"Outlines" | b"Outline")
        ) {
            continue;
        }
        merged.objects.insert(id, object);
    }

    let pages_id = merged.new_object_id();
    let mut kids: Vec<Object> = Vec::with_capacity(pages.len());
    let mut page_ids = Vec::with_capacity(pages.len());
    for (id, mut page) in pages {
        page.set("Parent", pages_id);
        merged.objects.insert(id, Object::Dictionary(page));
        kids.push(id.into());
        page_ids.push(id);
    }
    merged.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => page_ids.len() as i64,
        }),
    );
    let catalog_id = merged.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    merged.trailer.set("Root", catalog_id);

    for entry in bookmarks {
        let page = page_ids
            .get(entry.page_index)
            .ok_or_else(|| BookError::BookmarkOutOfRange {
                title: entry.title.clone(),
                index: entry.page_index,
                pages: page_ids.len(),
            })?;
        merged.add_bookmark(Bookmark::new(entry.title.clone(), [0.0, 0.0, 0.0], 0, *page), None);
    }
    if let Some(outline_id) = merged.build_outline() {
        let catalog = merged.get_object_mut(catalog_id)?.as_dict_mut()?;
        catalog.set("Outlines", outline_id);
        catalog.set("PageMode", "UseOutlines");
    }

    Ok(merged)
}

/// Book around a single content PDF, e.g. the C-instrument chart.
pub fn single_content_book(config: &BookConfig, content: &Path, label: &str) -> Result<AssembledBook> {
    let cover = pdf::load(&config.cover_path(), "cover")?;
    let document = pdf::load_section(content, "content")?;
    let sections = vec![Section {
        title: label.to_string(),
        document,
    }];
    assemble_book(cover, sections, &config.toc_heading)
}

/// Book with one section per `<prefix><key>.pdf` in the output directory.
pub fn key_book(config: &BookConfig) -> Result<AssembledBook> {
    let cover = pdf::load(&config.cover_path(), "cover")?;
    let key_pdfs = collect_key_pdfs(&config.output_dir, &config.key_pdf_prefix)?;
    let mut sections = Vec::with_capacity(key_pdfs.len());
    for key_pdf in key_pdfs {
        sections.push(Section {
            title: config.key_label(&key_pdf.key_name),
            document: pdf::load_section(&key_pdf.path, "key chart")?,
        });
    }
    assemble_book(cover, sections, &config.toc_heading)
}

/// Save the TOC and the book; returns the book's path.
pub fn write_book(book: &mut AssembledBook, config: &BookConfig) -> Result<PathBuf> {
    pdf::save(&mut book.toc, &config.toc_path())?;
    let path = config.book_path();
    pdf::save(&mut book.document, &path)?;
    info!(path = %path.display(), pages = book.page_count, "Wrote book");
    Ok(path)
}
