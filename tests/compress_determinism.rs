use undertext::{Angle, Carrier, CommentNode, Encoder, EncoderConfig, Post};

fn carrier() -> Carrier {
    Carrier {
        post: Post {
            id: "p1".to_string(),
            selftext: "determinism is part of the protocol surface".to_string(),
            search_results: vec![
                "the protocol surface includes selector arithmetic".to_string(),
            ],
            comments: vec![CommentNode {
                id: "c1".to_string(),
                parent_id: "t3_p1".to_string(),
                link_id: "t3_p1".to_string(),
                body: "selectors must agree on both sides".to_string(),
                ..CommentNode::default()
            }],
            ..Post::default()
        },
        angles: vec![vec![
            Angle {
                source_quote: "protocol surface".to_string(),
                tangent: "what counts as wire format".to_string(),
                category: "analysis".to_string(),
                source_document: Some(0),
            },
            Angle {
                source_quote: "selector arithmetic".to_string(),
                tangent: "modular clamping".to_string(),
                category: "detail".to_string(),
                source_document: Some(0),
            },
        ]],
    }
}

#[test]
fn test_equal_inputs_produce_identical_records() {
    // Dictionary order, DP tie-breaks and selector arithmetic are all
    // deterministic, so two runs must agree bit for bit
    let encoder = Encoder::new(EncoderConfig::default());
    let payload = "the protocol surface includes";
    let a = encoder.embed(&carrier(), payload, Some(2)).unwrap();
    let b = encoder.embed(&carrier(), payload, Some(2)).unwrap();

    assert_eq!(a.compression.compressed, b.compression.compressed);
    assert_eq!(a.full_encoded_bits, b.full_encoded_bits);
    assert_eq!(
        serde_json::to_string(&a).unwrap(),
        serde_json::to_string(&b).unwrap()
    );
}

#[test]
fn test_embedding_does_not_mutate_the_carrier() {
    let original = carrier();
    let copy = carrier();
    let encoder = Encoder::new(EncoderConfig::default());
    let _ = encoder.embed(&copy, "any payload at all", None).unwrap();
    assert_eq!(
        serde_json::to_string(&original.post).unwrap(),
        serde_json::to_string(&copy.post).unwrap()
    );
}
