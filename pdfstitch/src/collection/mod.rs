//! Ordered file collection.
//!
//! The collection holds the files a user has selected, in merge order. It
//! deduplicates by (name, size), supports removal and adjacent reordering,
//! and never mutates an entry in place.
//!
//! # Examples
//!
//! ```
//! use pdfstitch::collection::{FileCollection, MoveDirection};
//! use pdfstitch::io::RawFile;
//!
//! let mut files = FileCollection::new();
//! files.add(vec![
//!     RawFile::pdf("intro.pdf", vec![0u8; 10]),
//!     RawFile::pdf("body.pdf", vec![0u8; 20]),
//! ]);
//!
//! let body = files.entries()[1].id;
//! files.move_entry(body, MoveDirection::Previous);
//! assert_eq!(files.entries()[0].name, "body.pdf");
//! ```

mod entry;

pub use entry::{EntryId, FileEntry, MoveDirection};

use entry::IdGenerator;

use crate::io::RawFile;

/// Ordered, deduplicated list of selected files.
#[derive(Debug, Clone)]
pub struct FileCollection {
    entries: Vec<FileEntry>,
    ids: IdGenerator,
}

impl FileCollection {
    /// Create an empty collection.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            ids: IdGenerator::new(),
        }
    }

    /// Append candidates in order, skipping duplicates.
    ///
    /// A candidate whose (name, size) matches an entry already present is
    /// skipped silently. Candidates within the same batch are checked
    /// against each other as well.
    ///
    /// Returns the number of entries appended.
    pub fn add<I>(&mut self, candidates: I) -> usize
    where
        I: IntoIterator<Item = RawFile>,
    {
        let mut added = 0;

        for candidate in candidates {
            if self.entries.iter().any(|entry| entry.matches(&candidate)) {
                log::debug!(
                    "Skipping duplicate {} ({} bytes)",
                    candidate.name,
                    candidate.size_bytes
                );
                continue;
            }

            let entry = FileEntry::new(self.ids.next_id(), candidate);
            log::debug!("Added {} as {}", entry.name, entry.id);
            self.entries.push(entry);
            added += 1;
        }

        added
    }

    /// Remove the entry with the given id.
    ///
    /// Returns false if no such entry exists.
    pub fn remove(&mut self, id: EntryId) -> bool {
        match self.position(id) {
            Some(index) => {
                let entry = self.entries.remove(index);
                log::debug!("Removed {} ({})", entry.name, entry.id);
                true
            }
            None => false,
        }
    }

    /// Swap an entry with its neighbour in the given direction.
    ///
    /// Moving the first entry towards the start, the last entry towards the
    /// end, or an unknown id does nothing and returns false.
    pub fn move_entry(&mut self, id: EntryId, direction: MoveDirection) -> bool {
        let Some(index) = self.position(id) else {
            return false;
        };

        let target = match direction {
            MoveDirection::Previous => index.checked_sub(1),
            MoveDirection::Next => Some(index + 1).filter(|&t| t < self.entries.len()),
        };

        match target {
            Some(target) => {
                self.entries.swap(index, target);
                true
            }
            None => false,
        }
    }

    /// Remove every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Entries in merge order.
    pub fn entries(&self) -> &[FileEntry] {
        &self.entries
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the collection is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up an entry by id.
    pub fn get(&self, id: EntryId) -> Option<&FileEntry> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    /// Current index of an entry.
    pub fn position(&self, id: EntryId) -> Option<usize> {
        self.entries.iter().position(|entry| entry.id == id)
    }

    /// Sum of all entry sizes in bytes.
    pub fn total_size(&self) -> u64 {
        self.entries.iter().map(|entry| entry.size_bytes).sum()
    }
}

impl Default for FileCollection {
    fn default() -> Self {
        Self::new()
    }
}
