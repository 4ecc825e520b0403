//! Angle selector: the second positional carrier.
//!
//! Angles from every document are pooled in document-major order. Each step
//! sizes its field to the live pool (`ceil(log2 r)` bits, zero when one
//! angle remains), picks modulo the pool size, and removes the pick, so a
//! selection is an ordered subset with no repeats.

use serde::Serialize;

use crate::bits::{ceil_log2, BitCursor};
use crate::carrier::Angle;

/// Result of driving the angle pool from the remaining bitstream.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AngleEmbedding {
    /// Concatenation of every step's consumed bits, padding included.
    pub bits_used: String,
    /// Total bits consumed across all steps.
    pub bits_count: usize,
    /// Stream left over after selection stopped.
    pub remaining_bits: String,
    pub selected_angles: Vec<Angle>,
    pub unselected_angles: Vec<Angle>,
    pub insufficient_bits: bool,
    /// Snippet located by the external finder, when one is attached.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snippet: Option<String>,
    /// Document index the snippet came from.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snippet_document: Option<usize>,
}

/// Select up to `target` angles from the pooled groups.
///
/// `None` or `Some(0)` fills the pool. Underflow pads with zeros and is
/// flagged, never an error.
pub fn select_angles(
    cur: &mut BitCursor,
    groups: &[Vec<Angle>],
    target: Option<usize>,
) -> AngleEmbedding {
    let mut pool: Vec<Angle> = groups.iter().flatten().cloned().collect();
    let want = match target {
        Some(0) | None => pool.len(),
        Some(t) => t.min(pool.len()),
    };

    let mut selected = Vec::with_capacity(want);
    let mut bits_used = String::new();
    let mut bits_count = 0;
    let mut insufficient = false;

    while selected.len() < want && !pool.is_empty() {
        let r = pool.len();
        let step_bits = ceil_log2(r);
        let taken = cur.take(step_bits);
        bits_used.push_str(&taken.bits.to_bit_string());
        bits_count += step_bits;
        insufficient |= taken.insufficient;
        let idx = (taken.value as usize) % r;
        selected.push(pool.remove(idx));
    }

    AngleEmbedding {
        bits_used,
        bits_count,
        remaining_bits: cur.rest().to_bit_string(),
        selected_angles: selected,
        unselected_angles: pool,
        insufficient_bits: insufficient,
        snippet: None,
        snippet_document: None,
    }
}
