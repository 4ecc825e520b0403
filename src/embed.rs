//! Pipeline coordinator.
//!
//! Fixed stage order: build the dictionary, compress the payload, drive the
//! comment selector on the full bitstream, drive the angle selector on the
//! leftover, then optionally consult the quote finder. Recoverable
//! conditions accumulate as warnings on the record; only an empty payload
//! or an internal invariant breach aborts.

use serde::{Serialize, Serializer};
use tracing::debug;

use crate::angle_select::{select_angles, AngleEmbedding};
use crate::bits::{utf8_byte_len, BitCursor};
use crate::carrier::Carrier;
use crate::comment_select::{select_comment, CommentEmbedding};
use crate::compress::{compress, Method, Token};
use crate::config::EncoderConfig;
use crate::dict::Dictionary;
use crate::error::UndertextError;
use crate::finder::{FinderError, QuoteFinder};
use crate::flatten::FlatThread;

/// Recoverable conditions raised while embedding.
///
/// Serialized as display strings, which is the wire format of the
/// `warnings` list.
#[derive(Debug, Clone, PartialEq)]
pub enum Warning {
    CompressionInefficient,
    CommentBitsPadded,
    AngleBitsPadded,
    AngleTruncated,
    FinderUnavailable(String),
    FinderLowScore(f64),
    FinderBadResponse(String),
}

impl std::fmt::Display for Warning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Warning::CompressionInefficient => {
                write!(f, "Dictionary compression inefficient; payload stored uncompressed")
            }
            Warning::CommentBitsPadded => {
                write!(f, "Comment selector ran out of payload bits; padded with zeros")
            }
            Warning::AngleBitsPadded => {
                write!(f, "Angle selector ran out of payload bits; padded with zeros")
            }
            Warning::AngleTruncated => {
                write!(f, "Payload bits exceed what the angle selection could embed")
            }
            Warning::FinderUnavailable(msg) => write!(f, "Quote finder unavailable: {msg}"),
            Warning::FinderLowScore(score) => {
                write!(f, "Quote finder returned no acceptable match (score {score})")
            }
            Warning::FinderBadResponse(msg) => {
                write!(f, "Quote finder returned a bad response: {msg}")
            }
        }
    }
}

impl Serialize for Warning {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// One token of the compressed stream, flattened for the record.
///
/// Literals carry `doc: null` and their payload position; references carry
/// the document index and offset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TokenSummary {
    pub doc: Option<usize>,
    pub idx: usize,
    pub len: usize,
}

/// Compression summary carried on the output record.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompressionSummary {
    pub method: Method,
    pub payload: String,
    /// The full bitstream as a '0'/'1' string.
    pub compressed: String,
    pub compressed_length: usize,
    /// Bit length of the raw UTF-8 payload.
    pub original_length: usize,
    pub ratio: f64,
    pub references: Vec<TokenSummary>,
}

/// Full embedding record produced by one encoder invocation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputRecord {
    pub compression: CompressionSummary,
    pub comment_embedding: CommentEmbedding,
    pub angle_embedding: AngleEmbedding,
    pub total_bits_embedded: usize,
    /// Concatenation of the two selectors' consumed bits.
    pub full_encoded_bits: String,
    pub warnings: Vec<Warning>,
}

/// The embedding pipeline.
pub struct Encoder {
    config: EncoderConfig,
    finder: Option<Box<dyn QuoteFinder>>,
}

impl Encoder {
    pub fn new(config: EncoderConfig) -> Self {
        Self {
            config,
            finder: None,
        }
    }

    /// Attach an external quote finder.
    pub fn with_finder(mut self, finder: Box<dyn QuoteFinder>) -> Self {
        self.finder = Some(finder);
        self
    }

    pub fn config(&self) -> &EncoderConfig {
        &self.config
    }

    /// Embed `payload` into `carrier`, selecting up to `target_angles`
    /// angles (`None` or `Some(0)` fills the pool).
    pub fn embed(
        &self,
        carrier: &Carrier,
        payload: &str,
        target_angles: Option<usize>,
    ) -> Result<OutputRecord, UndertextError> {
        if payload.is_empty() {
            return Err(UndertextError::InvalidPayload(
                "payload is empty".to_string(),
            ));
        }

        let mut warnings = Vec::new();
        let thread = FlatThread::build(&carrier.post.comments);
        let dict = Dictionary::from_carrier(&carrier.post, &thread);
        debug!(
            comments = thread.len(),
            dictionary_entries = dict.len(),
            "carrier prepared"
        );

        let compressed = compress(payload, &dict, &self.config)?;
        if compressed.method == Method::Standard {
            warnings.push(Warning::CompressionInefficient);
        }
        debug!(
            method = ?compressed.method,
            bits = compressed.bits.len(),
            "payload compressed"
        );

        let mut cur = BitCursor::new(&compressed.bits);
        let comment = select_comment(&mut cur, &carrier.post, &thread);
        if comment.insufficient_bits {
            warnings.push(Warning::CommentBitsPadded);
        }

        let mut angle = select_angles(&mut cur, &carrier.angles, target_angles);
        if angle.insufficient_bits {
            warnings.push(Warning::AngleBitsPadded);
        }
        if !angle.remaining_bits.is_empty() {
            warnings.push(Warning::AngleTruncated);
        }

        if let Some(finder) = &self.finder {
            self.attach_snippet(finder.as_ref(), carrier, &mut angle, &mut warnings);
        }

        let payload_chars: Vec<char> = payload.chars().collect();
        let original_length = 8 * utf8_byte_len(&payload_chars);
        let compressed_length = compressed.bits.len();
        let references = compressed
            .tokens
            .iter()
            .map(|token| match *token {
                Token::Literal { pos, len } => TokenSummary {
                    doc: None,
                    idx: pos,
                    len,
                },
                Token::Reference { doc, offset, len } => TokenSummary {
                    doc: Some(doc),
                    idx: offset,
                    len,
                },
            })
            .collect();

        let full_encoded_bits = format!("{}{}", comment.bits_used, angle.bits_used);
        let total_bits_embedded = full_encoded_bits.len();

        Ok(OutputRecord {
            compression: CompressionSummary {
                method: compressed.method,
                payload: payload.to_string(),
                compressed: compressed.bits.to_bit_string(),
                compressed_length,
                original_length,
                ratio: compressed_length as f64 / original_length as f64,
                references,
            },
            comment_embedding: comment,
            angle_embedding: angle,
            total_bits_embedded,
            full_encoded_bits,
            warnings,
        })
    }

    /// Locate the first selected angle's quote in the carrier documents.
    /// Every failure mode degrades to a warning.
    fn attach_snippet(
        &self,
        finder: &dyn QuoteFinder,
        carrier: &Carrier,
        angle: &mut AngleEmbedding,
        warnings: &mut Vec<Warning>,
    ) {
        let quote = match angle.selected_angles.first() {
            Some(first) => first.source_quote.clone(),
            None => return,
        };
        match finder.find(&quote, &carrier.post.search_results) {
            Ok(found) => {
                if found.best_match.is_none() || found.score < 0.0 || found.index < 0 {
                    warnings.push(Warning::FinderLowScore(found.score));
                    return;
                }
                if let Some(threshold) = self.config.low_score_threshold {
                    if found.score < threshold {
                        warnings.push(Warning::FinderLowScore(found.score));
                    }
                }
                angle.snippet = found.best_match;
                let index = found.index as usize;
                angle.snippet_document = if index < carrier.post.search_results.len() {
                    Some(index)
                } else {
                    None
                };
            }
            Err(FinderError::Unavailable(msg)) => {
                tracing::warn!(error = %msg, "quote finder unavailable");
                warnings.push(Warning::FinderUnavailable(msg));
            }
            Err(FinderError::BadResponse(msg)) => {
                tracing::warn!(error = %msg, "quote finder bad response");
                warnings.push(Warning::FinderBadResponse(msg));
            }
        }
    }
}
