//! Per-position back-reference candidates.
//!
//! For every payload position the index records the dictionary runs worth
//! considering, as `(doc, offset, max_len)` triples in discovery order:
//! documents ascending, offsets ascending. The DP expands each run into the
//! individual lengths, so candidate order is exactly the enumeration order
//! the cost search depends on.

use std::collections::HashMap;

use crate::dict::Dictionary;

/// A run of code points shared between the payload and one dictionary entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefCandidate {
    pub doc: usize,
    pub offset: usize,
    /// Longest usable run at this position. Every length above the match
    /// threshold up to this value is a valid reference.
    pub max_len: usize,
}

/// Candidate references for each payload position.
pub struct MatchIndex {
    by_pos: Vec<Vec<RefCandidate>>,
}

impl MatchIndex {
    /// Build the index. Runs must be strictly longer than `min_match_len`
    /// to be recorded; at most `cap` candidates are kept per position,
    /// earliest found first.
    pub fn build(
        payload: &[char],
        dict: &Dictionary,
        min_match_len: usize,
        cap: usize,
    ) -> Self {
        // Occurrence map over the dictionary, discovery-ordered.
        let mut occurrences: HashMap<char, Vec<(usize, usize)>> = HashMap::new();
        for doc in 0..dict.len() {
            for (offset, &c) in dict.entry(doc).iter().enumerate() {
                occurrences.entry(c).or_default().push((doc, offset));
            }
        }

        let mut by_pos = Vec::with_capacity(payload.len());
        for i in 0..payload.len() {
            let mut candidates = Vec::new();
            if let Some(starts) = occurrences.get(&payload[i]) {
                for &(doc, offset) in starts {
                    if candidates.len() >= cap {
                        break;
                    }
                    let entry = dict.entry(doc);
                    let limit = (payload.len() - i).min(entry.len() - offset);
                    let mut run = 0;
                    while run < limit && payload[i + run] == entry[offset + run] {
                        run += 1;
                    }
                    if run > min_match_len {
                        candidates.push(RefCandidate {
                            doc,
                            offset,
                            max_len: run,
                        });
                    }
                }
            }
            by_pos.push(candidates);
        }
        Self { by_pos }
    }

    pub fn at(&self, pos: usize) -> &[RefCandidate] {
        &self.by_pos[pos]
    }

    /// True when no position has any candidate.
    pub fn is_empty(&self) -> bool {
        self.by_pos.iter().all(|c| c.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::carrier::Post;
    use crate::flatten::FlatThread;

    fn dict_for(texts: &[&str]) -> Dictionary {
        let post = Post {
            selftext: texts.first().copied().unwrap_or("").to_string(),
            search_results: texts[1..].iter().map(|s| s.to_string()).collect(),
            ..Post::default()
        };
        let thread = FlatThread::build(&[]);
        Dictionary::from_carrier(&post, &thread)
    }

    #[test]
    fn short_runs_are_pruned() {
        let dict = dict_for(&["abcdef"]);
        let payload: Vec<char> = "abcxx".chars().collect();
        let index = MatchIndex::build(&payload, &dict, 2, 64);
        // "abc" is a 3-run, above the threshold
        assert_eq!(
            index.at(0),
            &[RefCandidate {
                doc: 0,
                offset: 0,
                max_len: 3
            }]
        );
        // "bcx" only shares two code points with the dictionary
        assert!(index.at(1).is_empty());
    }

    #[test]
    fn candidates_follow_discovery_order() {
        let dict = dict_for(&["xxabcd", "abcd"]);
        let payload: Vec<char> = "abcd".chars().collect();
        let index = MatchIndex::build(&payload, &dict, 2, 64);
        let docs: Vec<usize> = index.at(0).iter().map(|c| c.doc).collect();
        assert_eq!(docs, [0, 1]);
        assert_eq!(index.at(0)[0].offset, 2);
    }

    #[test]
    fn cap_keeps_earliest_candidates() {
        let dict = dict_for(&["aaaa aaaa aaaa aaaa"]);
        let payload: Vec<char> = "aaaa".chars().collect();
        let index = MatchIndex::build(&payload, &dict, 2, 2);
        assert_eq!(index.at(0).len(), 2);
        assert_eq!(index.at(0)[0].offset, 0);
        assert_eq!(index.at(0)[1].offset, 1);
    }
}
