//! Receiver side: recover the embedded bits from an observed selection.
//!
//! The receiver sees the public artifact (which comment was picked, which
//! angles in which order) and reverses the selector arithmetic to rebuild
//! the consumed bit prefix, then decodes it with the padding-tolerant
//! decoder. The dictionary and flattened order are rebuilt from the carrier
//! alone, so no side channel is needed.

use serde::Deserialize;

use crate::bits::{ceil_log2, width, Bits};
use crate::carrier::{Angle, Carrier};
use crate::config::EncoderConfig;
use crate::decompress::decompress_padded;
use crate::dict::Dictionary;
use crate::error::UndertextError;
use crate::flatten::FlatThread;

/// The selection as observed in the published artifact.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ObservedSelection {
    /// Id of the selected comment; `None` means the post was the target.
    #[serde(default)]
    pub comment: Option<String>,
    /// The selected angles in pick order.
    #[serde(default)]
    pub angles: Vec<Angle>,
}

/// Rebuild the exact bits the sender's selectors consumed.
pub fn recover_bits(
    carrier: &Carrier,
    selection: &ObservedSelection,
) -> Result<Bits, UndertextError> {
    let thread = FlatThread::build(&carrier.post.comments);
    let mut bits = Bits::new();

    let n = thread.len();
    let value = match &selection.comment {
        None => 0,
        Some(id) => {
            let pos = thread
                .position(id)
                .or_else(|| {
                    // The published id may carry a type prefix.
                    id.rsplit_once('_').and_then(|(_, suffix)| thread.position(suffix))
                })
                .ok_or_else(|| {
                    UndertextError::Carrier(format!("comment id {id:?} not in thread"))
                })?;
            pos as u64 + 1
        }
    };
    bits.push_int(value, width(n));

    let mut pool: Vec<Angle> = carrier.angles.iter().flatten().cloned().collect();
    for observed in &selection.angles {
        let idx = pool
            .iter()
            .position(|a| a == observed)
            .ok_or_else(|| {
                UndertextError::Carrier(format!(
                    "angle {:?} not in the remaining pool",
                    observed.category
                ))
            })?;
        bits.push_int(idx as u64, ceil_log2(pool.len()));
        pool.remove(idx);
    }

    Ok(bits)
}

/// Recover the payload from a carrier and an observed selection.
///
/// Tolerates the sender's zero-padding; a selection whose capacity was too
/// small for the stream is unrecoverable and surfaces as a decode error.
pub fn extract(
    carrier: &Carrier,
    selection: &ObservedSelection,
    config: &EncoderConfig,
) -> Result<String, UndertextError> {
    let bits = recover_bits(carrier, selection)?;
    let thread = FlatThread::build(&carrier.post.comments);
    let dict = Dictionary::from_carrier(&carrier.post, &thread);
    decompress_padded(&bits, &dict, config)
}
