//! Mode-aware decoding of the compressed bitstream.
//!
//! The strict decoder reconstructs exactly what the encoder produced and is
//! the round-trip reference for every emitted stream. The padded variant
//! additionally accepts the zero bits the selectors may have appended when
//! the carrier offered more capacity than the stream had bits. The padding
//! rule is sound because no valid dictionary-mode token is all-zero: a
//! literal carries a length field of at least 1 and a reference leads with
//! a 1 bit.

use crate::bits::{width, BitCursor, Bits};
use crate::config::EncoderConfig;
use crate::dict::Dictionary;
use crate::error::UndertextError;

/// Decode a bitstream produced by [`compress`](crate::compress::compress)
/// back into the payload text. The stream must be bit-exact.
pub fn decompress(
    bits: &Bits,
    dict: &Dictionary,
    config: &EncoderConfig,
) -> Result<String, UndertextError> {
    decode(bits, dict, config, false)
}

/// Decode a recovered bitstream that may carry trailing selector padding.
///
/// In dictionary mode an all-zero tail is treated as padding and dropped.
/// In uncompressed mode only whole bytes are taken and trailing NUL bytes
/// are trimmed, since zero-padding is the only way they can appear.
pub fn decompress_padded(
    bits: &Bits,
    dict: &Dictionary,
    config: &EncoderConfig,
) -> Result<String, UndertextError> {
    decode(bits, dict, config, true)
}

fn decode(
    bits: &Bits,
    dict: &Dictionary,
    config: &EncoderConfig,
    padded: bool,
) -> Result<String, UndertextError> {
    let mut cur = BitCursor::new(bits);
    let mode = cur.try_take(1)?;
    if mode == 0 {
        return decode_standard(&mut cur, padded);
    }

    let lit_len_width = width(config.max_literal_len);
    let mut out = String::new();
    while cur.remaining() > 0 {
        if padded && cur.rest_all_zero() {
            break;
        }
        let kind = cur.try_take(1)?;
        if kind == 0 {
            let len = cur.try_take(lit_len_width)? as usize;
            if len == 0 {
                return Err(UndertextError::Decode("literal of length 0".to_string()));
            }
            for _ in 0..len {
                out.push(read_scalar(&mut cur)?);
            }
        } else {
            let doc = cur.try_take(dict.doc_width())? as usize;
            if doc >= dict.len() {
                return Err(UndertextError::Decode(format!(
                    "document index {} out of range",
                    doc
                )));
            }
            let offset = cur.try_take(dict.offset_width(doc))? as usize;
            let len = cur.try_take(dict.len_width())? as usize;
            let entry = dict.entry(doc);
            if len == 0 || offset + len > entry.len() {
                return Err(UndertextError::Decode(format!(
                    "reference {}..{} out of range for document {}",
                    offset,
                    offset + len,
                    doc
                )));
            }
            out.extend(&entry[offset..offset + len]);
        }
    }
    Ok(out)
}

fn decode_standard(cur: &mut BitCursor, padded: bool) -> Result<String, UndertextError> {
    let rem = cur.remaining();
    if !padded && rem % 8 != 0 {
        return Err(UndertextError::Bitstream(format!(
            "uncompressed payload of {} bits is not byte aligned",
            rem
        )));
    }
    let mut bytes = Vec::with_capacity(rem / 8);
    for _ in 0..rem / 8 {
        bytes.push(cur.try_take(8)? as u8);
    }
    if padded {
        while bytes.last() == Some(&0) {
            bytes.pop();
        }
    }
    String::from_utf8(bytes)
        .map_err(|e| UndertextError::Decode(format!("payload is not valid UTF-8: {e}")))
}

/// Read one UTF-8 encoded Unicode scalar value from the stream.
fn read_scalar(cur: &mut BitCursor) -> Result<char, UndertextError> {
    let first = cur.try_take(8)? as u8;
    let extra = if first < 0x80 {
        0
    } else if first >> 5 == 0b110 {
        1
    } else if first >> 4 == 0b1110 {
        2
    } else if first >> 3 == 0b11110 {
        3
    } else {
        return Err(UndertextError::Decode(format!(
            "invalid UTF-8 lead byte {:#04x}",
            first
        )));
    };
    let mut buf = vec![first];
    for _ in 0..extra {
        buf.push(cur.try_take(8)? as u8);
    }
    let text = std::str::from_utf8(&buf)
        .map_err(|e| UndertextError::Decode(format!("invalid UTF-8 sequence: {e}")))?;
    text.chars()
        .next()
        .ok_or_else(|| UndertextError::Decode("empty UTF-8 sequence".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::carrier::Post;
    use crate::compress::compress;
    use crate::flatten::FlatThread;

    fn dict_for(texts: &[&str]) -> Dictionary {
        let post = Post {
            selftext: texts.first().copied().unwrap_or("").to_string(),
            search_results: texts.get(1..).unwrap_or(&[]).iter().map(|s| s.to_string()).collect(),
            ..Post::default()
        };
        let thread = FlatThread::build(&[]);
        Dictionary::from_carrier(&post, &thread)
    }

    #[test]
    fn standard_stream_round_trips() {
        let dict = dict_for(&[]);
        let cfg = EncoderConfig::default();
        let out = compress("héllo 𝄞", &dict, &cfg).unwrap();
        assert_eq!(decompress(&out.bits, &dict, &cfg).unwrap(), "héllo 𝄞");
    }

    #[test]
    fn dictionary_stream_round_trips() {
        let body = "a shared piece of reference text for the compressor";
        let dict = dict_for(&[body]);
        let cfg = EncoderConfig::default();
        let out = compress(body, &dict, &cfg).unwrap();
        assert_eq!(decompress(&out.bits, &dict, &cfg).unwrap(), body);
    }

    #[test]
    fn padded_zero_tail_is_dropped() {
        let body = "a shared piece of reference text for the compressor";
        let dict = dict_for(&[body]);
        let cfg = EncoderConfig::default();
        let out = compress(body, &dict, &cfg).unwrap();
        let mut padded = out.bits.clone();
        for _ in 0..13 {
            padded.push(false);
        }
        assert_eq!(decompress_padded(&padded, &dict, &cfg).unwrap(), body);
    }

    #[test]
    fn truncated_stream_is_an_error() {
        let body = "a shared piece of reference text for the compressor";
        let dict = dict_for(&[body]);
        let cfg = EncoderConfig::default();
        let out = compress(body, &dict, &cfg).unwrap();
        let cut = out.bits.slice(0, out.bits.len() - 3);
        assert!(decompress(&cut, &dict, &cfg).is_err());
    }
}
