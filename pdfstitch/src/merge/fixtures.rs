//! In-memory PDFs for unit tests.

use lopdf::{Document, Object, Stream, dictionary};

/// Build a PDF with `pages` pages, each tagged with a `Marker` entry
/// `"{label}-{n}"` (1-based). Resources and MediaBox live on the page tree
/// node so that merging has to carry inherited attributes over.
pub(crate) fn marked_pdf(label: &str, pages: usize) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });

    let mut kids: Vec<Object> = Vec::with_capacity(pages);
    for number in 1..=pages {
        let text = format!("BT /F1 24 Tf 72 720 Td ({label} page {number}) Tj ET");
        let content_id = doc.add_object(Stream::new(dictionary! {}, text.into_bytes()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
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
            "Resources" => dictionary! { "Font" => dictionary! { "F1" => font_id } },
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).unwrap();
    bytes
}

/// Read back the `Marker` of every page, in page order.
pub(crate) fn page_markers(bytes: &[u8]) -> Vec<String> {
    let doc = Document::load_mem(bytes).unwrap();
    doc.get_pages()
        .into_values()
        .map(|page_id| {
            let page = doc.get_dictionary(page_id).unwrap();
            match page.get(b"Marker").unwrap() {
                Object::String(marker, _) => String::from_utf8_lossy(marker).into_owned(),
                other => panic!("unexpected marker object: {other:?}"),
            }
        })
        .collect()
}
