//! Reference-dictionary assembly.
//!
//! The dictionary is an ordered list of ambient texts the compressor may
//! point back into: post body first, then each search-result document, then
//! each comment body in canonical flattened order. Ordering and composition
//! are a pure function of the carrier, so the decoder rebuilds the same
//! table without side information.

use crate::bits::width;
use crate::carrier::Post;
use crate::flatten::FlatThread;

/// Ordered reference texts, indexed as Unicode scalar values.
pub struct Dictionary {
    entries: Vec<Vec<char>>,
    max_entry_len: usize,
}

impl Dictionary {
    /// Assemble the dictionary from a carrier. Empty texts are dropped;
    /// the order of survivors is preserved.
    pub fn from_carrier(post: &Post, thread: &FlatThread) -> Self {
        let texts = std::iter::once(post.selftext.as_str())
            .chain(post.search_results.iter().map(|s| s.as_str()))
            .chain(thread.iter().map(|c| c.body.as_str()));

        let mut entries = Vec::new();
        for text in texts {
            if text.is_empty() {
                continue;
            }
            entries.push(text.chars().collect::<Vec<char>>());
        }
        let max_entry_len = entries.iter().map(|e| e.len()).max().unwrap_or(0);
        Self {
            entries,
            max_entry_len,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entry(&self, doc: usize) -> &[char] {
        &self.entries[doc]
    }

    /// Length in code points of entry `doc`.
    pub fn entry_len(&self, doc: usize) -> usize {
        self.entries[doc].len()
    }

    /// Length in code points of the longest entry.
    pub fn max_entry_len(&self) -> usize {
        self.max_entry_len
    }

    /// Width of the document-index field.
    pub fn doc_width(&self) -> usize {
        width(self.len())
    }

    /// Width of the offset field for entry `doc`.
    pub fn offset_width(&self, doc: usize) -> usize {
        width(self.entry_len(doc))
    }

    /// Width of the reference-length field.
    pub fn len_width(&self) -> usize {
        width(self.max_entry_len)
    }
}
