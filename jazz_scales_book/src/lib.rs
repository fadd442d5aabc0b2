// Jazz scale practice book
//
// Turns the per-key chart PDFs written by `jazz_scales_music` into a single
// practice book: a drawn cover, a table of contents with page numbers, the
// charts, and a PDF outline with one bookmark per chart.
//
// - pdf.rs: Drawing canvas, document building, load/save (lopdf)
// - cover.rs: The cover page
// - toc.rs: TOC pagination and rendering
// - collect.rs: Finding per-key chart PDFs by file name
// - assemble.rs: TOC fixed point, page-tree merge, bookmarks
// - config.rs: `BookConfig` and `CoverConfig`
// - error.rs: `BookError`

pub mod assemble;
pub mod collect;
pub mod config;
pub mod cover;
pub mod error;
pub mod pdf;
pub mod toc;
