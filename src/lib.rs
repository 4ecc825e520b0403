//! Steganographic embedding of a text payload inside a discussion-thread
//! carrier.
//!
//! The payload is compressed against a dictionary built from the carrier's
//! ambient text (post body, attached documents, comment bodies), and the
//! resulting bitstream drives two positional selectors: the identity of a
//! comment in the flattened reply tree, then an ordered subset of editorial
//! "angles" pooled across the documents. The receiver rebuilds the same
//! dictionary and selector arithmetic from the carrier alone and reverses
//! the selection back into bits.

pub mod angle_select;
pub mod bits;
pub mod carrier;
pub mod comment_select;
pub mod compress;
pub mod config;
pub mod decompress;
pub mod dict;
pub mod embed;
pub mod error;
pub mod extract;
pub mod finder;
pub mod flatten;
pub mod matcher;

pub use angle_select::AngleEmbedding;
pub use carrier::{Angle, Carrier, CommentNode, CommentRef, PayloadInput, Post, PostContext};
pub use comment_select::{CommentEmbedding, TargetType};
pub use compress::{compress, Compressed, Method, Token};
pub use config::EncoderConfig;
pub use decompress::{decompress, decompress_padded};
pub use dict::Dictionary;
pub use embed::{Encoder, OutputRecord, Warning};
pub use error::UndertextError;
pub use extract::{extract, recover_bits, ObservedSelection};
pub use finder::{FinderMatch, HttpQuoteFinder, QuoteFinder};
pub use flatten::FlatThread;
