//! Shared helpers for the integration tests.
//!
//! PDFs are built in memory with `lopdf`; every page carries a `Marker`
//! entry so tests can check which source page ended up where.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use lopdf::{Document, Object, Stream, dictionary};
use pdfstitch::io::RawFile;

/// Build a PDF with `pages` pages marked `"{label}-{n}"`.
pub fn marked_pdf(label: &str, pages: usize) -> Vec<u8> {
    let mut doc = Document::with_version("1.4");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut kids: Vec<Object> = Vec::new();
    for number in 1..=pages {
        let content = format!("BT /F1 18 Tf 50 750 Td ({label} {number}) Tj ET");
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.into_bytes()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            "Marker" => Object::string_literal(format!("{label}-{number}")),
        });
        kids.push(page_id.into());
    }

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => pages as i64,
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).expect("Failed to serialize test PDF");
    bytes
}

/// An in-memory candidate holding a marked PDF.
pub fn marked_file(name: &str, label: &str, pages: usize) -> RawFile {
    RawFile::pdf(name, marked_pdf(label, pages))
}

/// Write a marked PDF into `dir` and return its path.
pub fn write_marked(dir: &Path, name: &str, label: &str, pages: usize) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, marked_pdf(label, pages)).expect("Failed to write test PDF");
    path
}

/// Page markers of a serialized PDF, in page order.
pub fn page_markers(bytes: &[u8]) -> Vec<String> {
    let doc = Document::load_mem(bytes).expect("Merged output is not a PDF");
    doc.get_pages()
        .into_values()
        .map(|page_id| {
            let page = doc.get_dictionary(page_id).expect("Page is not a dictionary");
            match page.get(b"Marker") {
                Ok(Object::String(marker, _)) => String::from_utf8_lossy(marker).into_owned(),
                other => panic!("Page without marker: {other:?}"),
            }
        })
        .collect()
}

/// Markers `"{label}-1"` through `"{label}-{pages}"`.
pub fn expected_markers(label: &str, pages: usize) -> Vec<String> {
    (1..=pages).map(|n| format!("{label}-{n}")).collect()
}
