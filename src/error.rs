use thiserror::Error;

/// Fatal failures of the embedding pipeline.
///
/// Recoverable conditions (selector padding, compression fallback, finder
/// degradation) are surfaced as warnings on the output record instead.
#[derive(Error, Debug)]
pub enum UndertextError {
    /// Payload missing or empty; there is nothing to embed.
    #[error("invalid payload: {0}")]
    InvalidPayload(String),

    /// Malformed '0'/'1' wire string.
    #[error("bitstream error: {0}")]
    Bitstream(String),

    /// The compressed stream ended before a declared field width was filled.
    #[error("unexpected end of bitstream")]
    UnexpectedEof,

    /// Token fields decoded to an impossible dictionary location.
    #[error("decode error: {0}")]
    Decode(String),

    /// The carrier record or observed selection failed normalization.
    #[error("carrier error: {0}")]
    Carrier(String),

    /// Propagated I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Carrier or record JSON failure.
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// Catch all for unexpected internal problems. Always a bug.
    #[error("internal error: {0}")]
    Internal(String),
}
