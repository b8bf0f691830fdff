#![no_main]

use libfuzzer_sys::fuzz_target;
use pdfstitch::collection::FileCollection;
use pdfstitch::io::RawFile;
use pdfstitch::merge::Merger;
use std::sync::OnceLock;
use tokio::runtime::{Builder, Runtime};

static RUNTIME: OnceLock<Runtime> = OnceLock::new();

fn runtime() -> &'static Runtime {
    RUNTIME.get_or_init(|| Builder::new_current_thread().enable_all().build().unwrap())
}

fuzz_target!(|data: &[u8]| {
    // The second copy is one byte longer so the pair is not deduplicated.
    let mut files = FileCollection::new();
    files.add(vec![
        RawFile::pdf("fuzz-a.pdf", data.to_vec()),
        RawFile::pdf("fuzz-b.pdf", [data, b"\n"].concat()),
    ]);

    // Arbitrary bytes must produce an error or a document, never a panic.
    let _ = runtime().block_on(Merger::new().merge(files.entries(), |_| {}));
});
