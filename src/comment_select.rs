//! Comment selector: the first positional carrier.
//!
//! The head of the compressed stream names either the post (value 0) or one
//! of the flattened comments (value i names the i-th comment, 1-based). The
//! field is sized for n + 1 slots so the post is always addressable.

use serde::{Deserialize, Serialize};

use crate::bits::{width, BitCursor};
use crate::carrier::{CommentRef, Post, PostContext};
use crate::flatten::FlatThread;

/// What the selected value pointed at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetType {
    Post,
    Comment,
}

/// Result of resolving the comment carrier from the head of the bitstream.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentEmbedding {
    /// Exactly the consumed bits, zero-padded on underflow.
    pub bits_used: String,
    /// Declared field width: `width(n)` for n flattened comments.
    pub bits_count: usize,
    /// The clamped selection value; 0 names the post.
    pub selection_index: u64,
    pub target_type: TargetType,
    /// Projected post, always present for context.
    pub context: PostContext,
    /// Ancestor chain of the selected comment, root-first. Empty when the
    /// post itself is the target.
    pub picked_comment_chain: Vec<CommentRef>,
    pub insufficient_bits: bool,
}

/// Consume `width(n)` bits from the stream and resolve the target.
///
/// Values above `n` wrap modulo `n + 1`, so every bit pattern names a valid
/// target on both sides of the protocol.
pub fn select_comment(
    cur: &mut BitCursor,
    post: &Post,
    thread: &FlatThread,
) -> CommentEmbedding {
    let n = thread.len() as u64;
    let bits_count = width(thread.len());
    let taken = cur.take(bits_count);

    let mut selection = taken.value;
    if selection > n {
        selection %= n + 1;
    }

    let (target_type, chain) = if selection == 0 {
        (TargetType::Post, Vec::new())
    } else {
        match thread.get(selection as usize - 1) {
            Some(node) => {
                let chain = thread
                    .ancestor_chain(node)
                    .into_iter()
                    .map(CommentRef::from_node)
                    .collect();
                (TargetType::Comment, chain)
            }
            // Unreachable after the clamp, but never panic on carrier data.
            None => (TargetType::Post, Vec::new()),
        }
    };

    CommentEmbedding {
        bits_used: taken.bits.to_bit_string(),
        bits_count,
        selection_index: selection,
        target_type,
        context: PostContext::from_post(post),
        picked_comment_chain: chain,
        insufficient_bits: taken.insufficient,
    }
}
