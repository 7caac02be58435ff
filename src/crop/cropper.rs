//! Batch-wise page cropping
//!
//! Loads a PDF, assigns the fixed crop rectangle to every page in bounded
//! batches, and writes the result. The CropBox is the region viewers
//! display; the page's MediaBox is never modified.

use std::ops::Range;
use std::path::{Path, PathBuf};

use lopdf::{Dictionary, Document, Object, ObjectId};
use thiserror::Error;

use super::margins::CropMargins;

/// Errors from the crop routine.
///
/// Any error aborts the whole operation; the destination file is written
/// only after serialization succeeds.
#[derive(Debug, Error)]
pub enum CropError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse PDF: {0}")]
    Parse(lopdf::Error),

    #[error("Failed to serialize PDF: {0}")]
    Serialize(std::io::Error),

    #[error("PDF structure error: {0}")]
    Structure(lopdf::Error),

    #[error("Page {0}: MediaBox not found")]
    MissingMediaBox(u32),

    #[error("Page {0}: invalid MediaBox")]
    InvalidMediaBox(u32),
}

/// What a completed crop processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropSummary {
    /// Number of pages cropped.
    pub pages: usize,
    /// Number of batches the pages were processed in.
    pub batches: usize,
}

/// Crop every page of the PDF at `source` and write the result to
/// `destination`.
///
/// Pages are processed in contiguous batches of `batch_size` (the final
/// batch may be shorter). Batching bounds the unit of work and progress
/// logging only; the output is identical for any batch size. Each page's
/// crop rectangle is computed from that page's own MediaBox dimensions.
///
/// The destination is written atomically: the document is serialized to a
/// sibling temporary file which is renamed into place on success, so a
/// failure leaves no partial output behind.
pub fn crop_document(
    source: &Path,
    destination: &Path,
    margins: &CropMargins,
    batch_size: usize,
) -> Result<CropSummary, CropError> {
    let bytes = std::fs::read(source)?;
    let mut doc = Document::load_mem(&bytes).map_err(CropError::Parse)?;

    // get_pages is keyed by 1-indexed page number, so iteration order is
    // document page order.
    let pages: Vec<(u32, ObjectId)> = doc.get_pages().into_iter().collect();
    let total = pages.len();
    let ranges = batch_ranges(total, batch_size);

    for range in &ranges {
        tracing::debug!(
            from = range.start + 1,
            to = range.end,
            total = total,
            "Cropping page batch"
        );

        for &(page_num, page_id) in &pages[range.clone()] {
            let (width, height) = page_dimensions(&doc, page_num, page_id)?;
            let rect = margins.rect_for(width, height);

            let page_dict = doc
                .get_object_mut(page_id)
                .and_then(Object::as_dict_mut)
                .map_err(CropError::Structure)?;
            page_dict.set(
                "CropBox",
                Object::Array(vec![
                    Object::Real(rect.left as f32),
                    Object::Real(rect.bottom as f32),
                    Object::Real(rect.right as f32),
                    Object::Real(rect.top as f32),
                ]),
            );
        }
    }

    let mut buf = Vec::new();
    doc.save_to(&mut buf).map_err(CropError::Serialize)?;

    let tmp = temp_sibling(destination);
    std::fs::write(&tmp, &buf)?;
    if let Err(e) = std::fs::rename(&tmp, destination) {
        let _ = std::fs::remove_file(&tmp);
        return Err(e.into());
    }

    tracing::info!(
        pages = total,
        batches = ranges.len(),
        destination = %destination.display(),
        "Cropped document written"
    );

    Ok(CropSummary {
        pages: total,
        batches: ranges.len(),
    })
}

/// Partition `[0, total)` into contiguous ranges of at most `batch_size`.
///
/// A batch size of zero is clamped to one.
fn batch_ranges(total: usize, batch_size: usize) -> Vec<Range<usize>> {
    let size = batch_size.max(1);
    (0..total)
        .step_by(size)
        .map(|start| start..(start + size).min(total))
        .collect()
}

/// Width and height of a page from its MediaBox, following Parent
/// inheritance when the page dictionary has no MediaBox of its own.
fn page_dimensions(
    doc: &Document,
    page_num: u32,
    page_id: ObjectId,
) -> Result<(f64, f64), CropError> {
    let dict = doc.get_dictionary(page_id).map_err(CropError::Structure)?;
    let media_box =
        resolve_media_box(doc, dict).ok_or(CropError::MissingMediaBox(page_num))?;

    let arr = media_box
        .as_array()
        .map_err(|_| CropError::InvalidMediaBox(page_num))?;
    if arr.len() < 4 {
        return Err(CropError::InvalidMediaBox(page_num));
    }

    let coord = |i: usize| -> Result<f64, CropError> {
        as_number(&arr[i]).ok_or(CropError::InvalidMediaBox(page_num))
    };
    let (x0, y0, x1, y1) = (coord(0)?, coord(1)?, coord(2)?, coord(3)?);

    Ok(((x1 - x0).abs(), (y1 - y0).abs()))
}

/// Find the effective MediaBox for a page dictionary, walking Parent links
/// for inherited boxes.
fn resolve_media_box(doc: &Document, dict: &Dictionary) -> Option<Object> {
    if let Ok(obj) = dict.get(b"MediaBox") {
        return match obj {
            Object::Reference(id) => doc.get_object(*id).ok().cloned(),
            other => Some(other.clone()),
        };
    }

    if let Ok(Object::Reference(parent_id)) = dict.get(b"Parent") {
        let parent = doc.get_dictionary(*parent_id).ok()?;
        return resolve_media_box(doc, parent);
    }

    None
}

fn as_number(obj: &Object) -> Option<f64> {
    match obj {
        Object::Integer(i) => Some(*i as f64),
        Object::Real(f) => Some(*f as f64),
        _ => None,
    }
}

/// Temporary path next to the destination, on the same filesystem so the
/// final rename is atomic.
fn temp_sibling(destination: &Path) -> PathBuf {
    let mut name = destination
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    destination.with_file_name(name)
}
