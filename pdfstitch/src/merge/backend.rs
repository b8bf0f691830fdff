//! PDF backend abstraction.
//!
//! The orchestrator never touches PDF internals directly. Everything it needs
//! from a PDF library goes through [`PdfBackend`]:
//! - creating an empty target document
//! - parsing raw bytes into a document
//! - appending all pages of a document, in order, to the target
//! - serializing the target into bytes
//!
//! [`LopdfBackend`] is the production implementation on top of `lopdf`.

use std::collections::BTreeMap;

use lopdf::{Document, Object, ObjectId, dictionary};

use crate::config::CompressionLevel;

/// Page attributes a page may inherit from its ancestors in the page tree.
const INHERITABLE_ATTRIBUTES: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

/// Object types that belong to a source document's structure and are rebuilt
/// for the merged document instead of being copied.
const DISCARDED_TYPES: [&[u8]; 4] = [b"Catalog", b"Pages", b"ObjStm", b"XRef"];

/// Guard against cyclic or absurdly deep page trees.
const MAX_TREE_DEPTH: usize = 64;

/// Version written when no input declares a newer one.
const DEFAULT_VERSION: &str = "1.5";

/// Error reported by a backend operation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct BackendError(pub String);

impl From<lopdf::Error> for BackendError {
    fn from(err: lopdf::Error) -> Self {
        Self(err.to_string())
    }
}

impl From<std::io::Error> for BackendError {
    fn from(err: std::io::Error) -> Self {
        Self(err.to_string())
    }
}

/// Operations the merge orchestrator delegates to a PDF library.
pub trait PdfBackend {
    /// A parsed source document.
    type Document;

    /// The document being assembled.
    type Accumulator;

    /// Create an empty target document.
    fn create_empty(&self) -> Self::Accumulator;

    /// Parse raw bytes into a document.
    ///
    /// # Errors
    ///
    /// Returns an error if the bytes are not a readable PDF.
    fn parse(&self, bytes: &[u8]) -> Result<Self::Document, BackendError>;

    /// Number of pages in a parsed document.
    fn page_count(&self, document: &Self::Document) -> usize;

    /// Append every page of `document`, in its natural order, to `target`.
    ///
    /// Returns the number of pages appended.
    ///
    /// # Errors
    ///
    /// Returns an error if the pages cannot be copied.
    fn append_pages(
        &self,
        target: &mut Self::Accumulator,
        document: Self::Document,
    ) -> Result<usize, BackendError>;

    /// Serialize the assembled document.
    ///
    /// # Errors
    ///
    /// Returns an error if the document cannot be written.
    fn serialize(&self, target: Self::Accumulator) -> Result<Vec<u8>, BackendError>;
}

/// Pages and objects collected from the documents appended so far.
#[derive(Debug, Clone)]
pub struct PageAccumulator {
    objects: BTreeMap<ObjectId, Object>,
    pages: Vec<ObjectId>,
    max_id: u32,
    version: String,
}

impl PageAccumulator {
    /// Number of pages collected.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }
}

/// [`PdfBackend`] built on `lopdf`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LopdfBackend {
    compression: CompressionLevel,
}

impl LopdfBackend {
    /// Create a backend with standard compression.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a backend with the given compression level.
    pub fn with_compression(compression: CompressionLevel) -> Self {
        Self { compression }
    }

    /// Compression level applied at serialization.
    pub fn compression(&self) -> CompressionLevel {
        self.compression
    }
}

impl PdfBackend for LopdfBackend {
    type Document = Document;
    type Accumulator = PageAccumulator;

    fn create_empty(&self) -> PageAccumulator {
        PageAccumulator {
            objects: BTreeMap::new(),
            pages: Vec::new(),
            max_id: 0,
            version: DEFAULT_VERSION.to_string(),
        }
    }

    fn parse(&self, bytes: &[u8]) -> Result<Document, BackendError> {
        Ok(Document::load_mem(bytes)?)
    }

    fn page_count(&self, document: &Document) -> usize {
        document.get_pages().len()
    }

    fn append_pages(
        &self,
        target: &mut PageAccumulator,
        mut document: Document,
    ) -> Result<usize, BackendError> {
        let source_pages: Vec<ObjectId> = document.get_pages().into_values().collect();
        for &page_id in &source_pages {
            inherit_page_attributes(&mut document, page_id)?;
        }

        document.renumber_objects_with(target.max_id + 1);
        let pages: Vec<ObjectId> = document.get_pages().into_values().collect();

        if document.version > target.version {
            target.version = document.version.clone();
        }
        target.max_id = target.max_id.max(document.max_id);

        for (id, object) in document.objects {
            if !is_discarded(&object) {
                target.objects.insert(id, object);
            }
        }

        let appended = pages.len();
        target.pages.extend(pages);

        Ok(appended)
    }

    fn serialize(&self, target: PageAccumulator) -> Result<Vec<u8>, BackendError> {
        let PageAccumulator {
            objects,
            pages,
            max_id,
            version,
        } = target;

        let mut document = Document::with_version(version);
        document.objects = objects;
        document.max_id = max_id;

        let pages_id = document.new_object_id();
        for &page_id in &pages {
            document
                .get_dictionary_mut(page_id)?
                .set("Parent", Object::Reference(pages_id));
        }

        let kids: Vec<Object> = pages.iter().copied().map(Object::Reference).collect();
        document.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => pages.len() as i64,
            }),
        );

        let catalog_id = document.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        document.trailer.set("Root", catalog_id);

        match self.compression {
            CompressionLevel::None => {}
            CompressionLevel::Standard => document.compress(),
            CompressionLevel::Maximum => {
                let pruned = document.prune_objects();
                log::debug!("Pruned {} unreachable object(s)", pruned.len());
                document.compress();
            }
        }

        document.renumber_objects();

        let mut bytes = Vec::new();
        document.save_to(&mut bytes)?;
        Ok(bytes)
    }
}

/// Copy inheritable attributes from ancestor page-tree nodes into the page.
///
/// The merged document gets a flat page tree, so anything a page only
/// inherited from its old parents would otherwise be lost.
fn inherit_page_attributes(document: &mut Document, page_id: ObjectId) -> Result<(), BackendError> {
    let page = document.get_dictionary(page_id)?;

    let mut missing: Vec<&[u8]> = INHERITABLE_ATTRIBUTES
        .iter()
        .copied()
        .filter(|key| !page.has(key))
        .collect();
    let mut inherited = Vec::new();
    let mut parent = page.get(b"Parent").and_then(Object::as_reference).ok();
    let mut depth = 0;

    while let Some(node_id) = parent {
        if missing.is_empty() || depth >= MAX_TREE_DEPTH {
            break;
        }

        let Ok(node) = document.get_dictionary(node_id) else {
            break;
        };

        missing.retain(|key| match node.get(key) {
            Ok(value) => {
                inherited.push((key.to_vec(), value.clone()));
                false
            }
            Err(_) => true,
        });

        parent = node.get(b"Parent").and_then(Object::as_reference).ok();
        depth += 1;
    }

    if !inherited.is_empty() {
        let page = document.get_dictionary_mut(page_id)?;
        for (key, value) in inherited {
            page.set(key, value);
        }
    }

    Ok(())
}

fn is_discarded(object: &Object) -> bool {
    let dict = match object {
        Object::Dictionary(dict) => dict,
        Object::Stream(stream) => &stream.dict,
        _ => return false,
    };

    dict.get(b"Type")
        .and_then(Object::as_name)
        .is_ok_and(|name| DISCARDED_TYPES.iter().any(|discarded| *discarded == name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::merge::fixtures::{marked_pdf, page_markers};

    fn merge_all(backend: &LopdfBackend, inputs: &[Vec<u8>]) -> Vec<u8> {
        let mut target = backend.create_empty();
        for bytes in inputs {
            let document = backend.parse(bytes).unwrap();
            backend.append_pages(&mut target, document).unwrap();
        }
        backend.serialize(target).unwrap()
    }

    #[test]
    fn test_parse_and_count_pages() {
        let backend = LopdfBackend::new();
        let document = backend.parse(&marked_pdf("a", 3)).unwrap();
        assert_eq!(backend.page_count(&document), 3);
    }

    #[test]
    fn test_backend_error_from_io_error() {
        let err = BackendError::from(std::io::Error::other("write zero"));
        assert_eq!(err, BackendError("write zero".to_string()));
    }

    #[test]
    fn test_serialize_produces_readable_document() {
        let backend = LopdfBackend::new();
        let bytes = backend.serialize(backend.create_empty()).unwrap();

        assert!(bytes.starts_with(b"%PDF-"));
        assert!(backend.parse(&bytes).is_ok());
    }

    #[test]
    fn test_parse_rejects_garbage() {
        let backend = LopdfBackend::new();
        assert!(backend.parse(b"definitely not a pdf").is_err());
    }

    #[test]
    fn test_pages_follow_input_order() {
        let backend = LopdfBackend::new();
        let merged = merge_all(
            &backend,
            &[marked_pdf("a", 2), marked_pdf("b", 3), marked_pdf("c", 1)],
        );

        assert_eq!(
            page_markers(&merged),
            vec!["a-1", "a-2", "b-1", "b-2", "b-3", "c-1"]
        );
    }

    #[test]
    fn test_append_reports_page_count() {
        let backend = LopdfBackend::new();
        let mut target = backend.create_empty();

        let appended = backend
            .append_pages(&mut target, backend.parse(&marked_pdf("a", 4)).unwrap())
            .unwrap();

        assert_eq!(appended, 4);
        assert_eq!(target.page_count(), 4);
    }

    #[test]
    fn test_same_document_twice() {
        let backend = LopdfBackend::new();
        let doc = marked_pdf("a", 2);
        let merged = merge_all(&backend, &[doc.clone(), doc]);

        assert_eq!(page_markers(&merged), vec!["a-1", "a-2", "a-1", "a-2"]);
    }

    #[test]
    fn test_inherited_attributes_survive() {
        let backend = LopdfBackend::new();
        let merged = merge_all(&backend, &[marked_pdf("a", 1), marked_pdf("b", 1)]);

        let document = Document::load_mem(&merged).unwrap();
        for page_id in document.get_pages().into_values() {
            let page = document.get_dictionary(page_id).unwrap();
            assert!(page.has(b"MediaBox"));
            assert!(page.has(b"Resources"));
        }
    }

    #[rstest::rstest]
    #[case(CompressionLevel::None)]
    #[case(CompressionLevel::Standard)]
    #[case(CompressionLevel::Maximum)]
    fn test_every_compression_level_produces_readable_output(#[case] level: CompressionLevel) {
        let backend = LopdfBackend::with_compression(level);
        let merged = merge_all(&backend, &[marked_pdf("a", 2), marked_pdf("b", 1)]);

        assert!(merged.starts_with(b"%PDF-"));
        assert_eq!(page_markers(&merged), vec!["a-1", "a-2", "b-1"]);
    }

    #[test]
    fn test_empty_target_serializes() {
        let backend = LopdfBackend::new();
        let bytes = backend.serialize(backend.create_empty()).unwrap();

        let document = Document::load_mem(&bytes).unwrap();
        assert!(document.get_pages().is_empty());
    }
}
