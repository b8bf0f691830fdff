//! Collection entries and their identities.

use std::fmt;

use serde::Serialize;

use crate::io::RawFile;

/// Stable identity of a [`FileEntry`].
///
/// Combines a salt drawn once per collection with a per-collection counter,
/// so ids stay unique across reorders and are unlikely to collide between
/// collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct EntryId {
    salt: u32,
    seq: u64,
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:08x}-{}", self.salt, self.seq)
    }
}

/// Generates [`EntryId`]s for one collection.
#[derive(Debug, Clone)]
pub(crate) struct IdGenerator {
    salt: u32,
    next: u64,
}

impl IdGenerator {
    pub(crate) fn new() -> Self {
        Self {
            salt: rand::random(),
            next: 0,
        }
    }

    pub(crate) fn next_id(&mut self) -> EntryId {
        let id = EntryId {
            salt: self.salt,
            seq: self.next,
        };
        self.next += 1;
        id
    }
}

/// Direction of an adjacent move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveDirection {
    /// Towards the start of the list.
    Previous,
    /// Towards the end of the list.
    Next,
}

/// One selected file awaiting merge.
#[derive(Debug, Clone)]
pub struct FileEntry {
    /// Stable identity.
    pub id: EntryId,

    /// Display name.
    pub name: String,

    /// Size in bytes; together with the name this is the dedup key.
    pub size_bytes: u64,

    /// The underlying candidate, used to read content at merge time.
    pub source: RawFile,
}

impl FileEntry {
    pub(crate) fn new(id: EntryId, source: RawFile) -> Self {
        Self {
            id,
            name: source.name.clone(),
            size_bytes: source.size_bytes,
            source,
        }
    }

    /// Check whether a candidate has the same dedup key as this entry.
    pub fn matches(&self, candidate: &RawFile) -> bool {
        self.name == candidate.name && self.size_bytes == candidate.size_bytes
    }
}
