//! Dictionary compression of the payload.
//!
//! A right-to-left dynamic program picks, for every payload suffix, the
//! cheapest token to emit next: a literal run of code points or a
//! back-reference into the dictionary. Costs are bit-exact, including the
//! UTF-8 byte expansion of literals, because downstream selectors consume
//! the emitted bits positionally. Ties keep the earliest-found option so
//! the stream is reproducible across implementations.

use serde::{Deserialize, Serialize};

use crate::bits::{utf8_byte_len, width, Bits};
use crate::config::EncoderConfig;
use crate::dict::Dictionary;
use crate::error::UndertextError;
use crate::matcher::MatchIndex;

/// One emitted token of the dictionary bitstream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// A run of payload code points stored verbatim.
    Literal { pos: usize, len: usize },
    /// A back-reference into a dictionary entry.
    Reference { doc: usize, offset: usize, len: usize },
}

impl Token {
    pub fn len(&self) -> usize {
        match *self {
            Token::Literal { len, .. } | Token::Reference { len, .. } => len,
        }
    }
}

/// How the payload bits were produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Method {
    /// Mode flag 0: raw UTF-8 bits of the payload.
    Standard,
    /// Mode flag 1: token stream over the reference dictionary.
    Dictionary,
}

/// Result of compressing one payload against one dictionary.
#[derive(Debug, Clone)]
pub struct Compressed {
    pub method: Method,
    /// The full bitstream including the leading mode flag.
    pub bits: Bits,
    /// Emitted tokens; empty in standard mode.
    pub tokens: Vec<Token>,
}

/// Compress `payload` against `dict`, falling back to the uncompressed
/// form whenever dictionary mode cannot beat it.
pub fn compress(
    payload: &str,
    dict: &Dictionary,
    config: &EncoderConfig,
) -> Result<Compressed, UndertextError> {
    let chars: Vec<char> = payload.chars().collect();
    let standard_len = 1 + 8 * utf8_byte_len(&chars);

    if dict.is_empty() {
        return Ok(standard_mode(payload));
    }

    let (tokens, dict_len) = plan_tokens(&chars, dict, config)?;
    if dict_len >= standard_len {
        return Ok(standard_mode(payload));
    }

    let mut bits = Bits::new();
    bits.push(true);
    let lit_len_width = width(config.max_literal_len);
    for token in &tokens {
        match *token {
            Token::Literal { pos, len } => {
                bits.push(false);
                bits.push_int(len as u64, lit_len_width);
                let run: String = chars[pos..pos + len].iter().collect();
                bits.push_str_utf8(&run);
            }
            Token::Reference { doc, offset, len } => {
                bits.push(true);
                bits.push_int(doc as u64, dict.doc_width());
                bits.push_int(offset as u64, dict.offset_width(doc));
                bits.push_int(len as u64, dict.len_width());
            }
        }
    }
    if bits.len() != dict_len {
        return Err(UndertextError::Internal(format!(
            "planned {} bits but emitted {}",
            dict_len,
            bits.len()
        )));
    }
    Ok(Compressed {
        method: Method::Dictionary,
        bits,
        tokens,
    })
}

fn standard_mode(payload: &str) -> Compressed {
    let mut bits = Bits::new();
    bits.push(false);
    bits.push_str_utf8(payload);
    Compressed {
        method: Method::Standard,
        bits,
        tokens: Vec::new(),
    }
}

/// Run the DP and walk the choices forward. Returns the token sequence and
/// the total dictionary-mode bit length including the mode flag.
fn plan_tokens(
    chars: &[char],
    dict: &Dictionary,
    config: &EncoderConfig,
) -> Result<(Vec<Token>, usize), UndertextError> {
    let n = chars.len();
    let index = MatchIndex::build(chars, dict, config.min_match_len, config.max_candidates_per_pos);

    let lit_len_width = width(config.max_literal_len) as u64;
    let len_width = dict.len_width() as u64;
    let doc_width = dict.doc_width() as u64;

    let mut dp = vec![0u64; n + 1];
    let mut choice: Vec<Option<Token>> = vec![None; n + 1];

    for i in (0..n).rev() {
        let mut best = u64::MAX;
        let mut pick = None;

        let max_l = config.max_literal_len.min(n - i);
        let mut byte_bits = 0u64;
        for l in 1..=max_l {
            byte_bits += chars[i + l - 1].len_utf8() as u64 * 8;
            let cost = 1 + lit_len_width + byte_bits + dp[i + l];
            if cost < best {
                best = cost;
                pick = Some(Token::Literal { pos: i, len: l });
            }
        }

        for cand in index.at(i) {
            let base = 1 + doc_width + width(dict.entry_len(cand.doc)) as u64 + len_width;
            for l in (config.min_match_len + 1)..=cand.max_len {
                let cost = base + dp[i + l];
                if cost < best {
                    best = cost;
                    pick = Some(Token::Reference {
                        doc: cand.doc,
                        offset: cand.offset,
                        len: l,
                    });
                }
            }
        }

        dp[i] = best;
        choice[i] = pick;
    }

    let mut tokens = Vec::new();
    let mut i = 0;
    while i < n {
        let token = choice[i]
            .clone()
            .ok_or_else(|| UndertextError::Internal(format!("no token chosen at {i}")))?;
        let step = token.len();
        if step == 0 {
            return Err(UndertextError::Internal(format!("zero-length token at {i}")));
        }
        tokens.push(token);
        i += step;
    }

    Ok((tokens, 1 + dp[0] as usize))
}
