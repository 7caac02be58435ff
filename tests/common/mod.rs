//! Shared fixtures: minimal synthetic PDFs built with lopdf.
#![allow(dead_code)]

use lopdf::{dictionary, Document, Object, Stream};

/// Build a minimal document with one page per entry in `page_sizes`,
/// each with a `[0 0 width height]` MediaBox.
pub fn build_pdf(page_sizes: &[(f64, f64)]) -> Document {
    let mut doc = Document::with_version("1.7");
    let pages_id = doc.new_object_id();

    let mut kids: Vec<Object> = Vec::new();
    for &(width, height) in page_sizes {
        let contents_id = doc.add_object(Stream::new(dictionary! {}, vec![]));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![
                Object::Real(0.0),
                Object::Real(0.0),
                Object::Real(width as f32),
                Object::Real(height as f32),
            ],
            "Contents" => contents_id,
        });
        kids.push(page_id.into());
    }

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => page_sizes.len() as i64,
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    doc
}

/// Serialize a document to bytes.
pub fn pdf_bytes(doc: &mut Document) -> Vec<u8> {
    let mut buf = Vec::new();
    doc.save_to(&mut buf).expect("serialize fixture PDF");
    buf
}

/// CropBox of every page, in page order.
pub fn crop_boxes(doc: &Document) -> Vec<[f32; 4]> {
    doc.get_pages()
        .into_iter()
        .map(|(page_num, page_id)| {
            let dict = doc
                .get_dictionary(page_id)
                .unwrap_or_else(|_| panic!("page {page_num} dictionary"));
            let arr = dict
                .get(b"CropBox")
                .unwrap_or_else(|_| panic!("page {page_num} has no CropBox"))
                .as_array()
                .expect("CropBox array");
            [
                number(&arr[0]),
                number(&arr[1]),
                number(&arr[2]),
                number(&arr[3]),
            ]
        })
        .collect()
}

/// Numeric value of a box component (Integer or Real).
pub fn number(obj: &Object) -> f32 {
    match obj {
        Object::Integer(i) => *i as f32,
        Object::Real(f) => *f,
        other => panic!("non-numeric box value: {other:?}"),
    }
}
