/// Runtime configuration for the embedding pipeline.
///
/// Every knob is encoder-side: the decoder derives all field widths from the
/// dictionary alone, so none of these values travel on the wire.
#[derive(Debug, Clone)]
pub struct EncoderConfig {
    /// Longest run of code points a single literal token may carry.
    pub max_literal_len: usize,
    /// Strict lower bound on recorded back-reference runs. A candidate is
    /// kept only when its length exceeds this value.
    pub min_match_len: usize,
    /// Upper bound on candidate references kept per payload position. The
    /// earliest-found candidates survive, so determinism is unaffected.
    pub max_candidates_per_pos: usize,
    /// Finder scores below this raise a low-score warning. `None` accepts
    /// any non-negative score silently.
    pub low_score_threshold: Option<f64>,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            max_literal_len: 250,
            min_match_len: 2,
            max_candidates_per_pos: 64,
            low_score_threshold: None,
        }
    }
}
