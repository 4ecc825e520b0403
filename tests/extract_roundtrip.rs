use undertext::{
    extract, recover_bits, Angle, Carrier, CommentNode, Encoder, EncoderConfig,
    ObservedSelection, OutputRecord, Post, TargetType,
};

fn angle(name: &str) -> Angle {
    Angle {
        source_quote: format!("quote {name}"),
        tangent: format!("tangent {name}"),
        category: name.to_string(),
        source_document: None,
    }
}

/// A carrier sized so the selector fields cannot wrap: seven comments give
/// a fully-covered 3 bit field, and the 16 angle pool keeps every early
/// step below its modulus while later steps only see padding zeros.
fn roomy_carrier() -> Carrier {
    Carrier {
        post: Post {
            id: "p1".to_string(),
            selftext: "the quick brown fox jumps over the lazy dog".to_string(),
            search_results: vec!["a second document about foxes and dogs".to_string()],
            comments: (0..7)
                .map(|i| CommentNode {
                    id: format!("c{i}"),
                    parent_id: "t3_p1".to_string(),
                    link_id: "t3_p1".to_string(),
                    body: format!("thread comment number {i}"),
                    ..CommentNode::default()
                })
                .collect(),
            ..Post::default()
        },
        angles: vec![
            (0..8).map(|i| angle(&format!("d0a{i}"))).collect(),
            (0..8).map(|i| angle(&format!("d1a{i}"))).collect(),
        ],
    }
}

fn selection_from(record: &OutputRecord) -> ObservedSelection {
    let comment = match record.comment_embedding.target_type {
        TargetType::Post => None,
        TargetType::Comment => record
            .comment_embedding
            .picked_comment_chain
            .last()
            .map(|c| c.id.clone()),
    };
    ObservedSelection {
        comment,
        angles: record.angle_embedding.selected_angles.clone(),
    }
}

#[test]
fn test_recovered_bits_match_full_encoded_bits() {
    let carrier = roomy_carrier();
    let encoder = Encoder::new(EncoderConfig::default());
    let record = encoder
        .embed(&carrier, "the quick brown fox", None)
        .unwrap();

    let selection = selection_from(&record);
    let bits = recover_bits(&carrier, &selection).unwrap();
    assert_eq!(bits.to_bit_string(), record.full_encoded_bits);
}

#[test]
fn test_dictionary_mode_payload_survives_embed_extract() {
    let carrier = roomy_carrier();
    let encoder = Encoder::new(EncoderConfig::default());
    // A prefix of the post body: a single back-reference token
    let payload = "the quick brown fox";
    let record = encoder.embed(&carrier, payload, None).unwrap();
    // The whole stream must fit for the receiver to win
    assert_eq!(record.angle_embedding.remaining_bits, "");

    let recovered = extract(
        &carrier,
        &selection_from(&record),
        &EncoderConfig::default(),
    )
    .unwrap();
    assert_eq!(recovered, payload);
}

#[test]
fn test_standard_mode_payload_survives_embed_extract() {
    let carrier = roomy_carrier();
    let encoder = Encoder::new(EncoderConfig::default());
    // Shares no 3-code-point run with the carrier text
    let payload = "zq";
    let record = encoder.embed(&carrier, payload, None).unwrap();
    assert_eq!(record.angle_embedding.remaining_bits, "");

    let recovered = extract(
        &carrier,
        &selection_from(&record),
        &EncoderConfig::default(),
    )
    .unwrap();
    assert_eq!(recovered, payload);
}

#[test]
fn test_unknown_comment_id_is_a_carrier_error() {
    let carrier = roomy_carrier();
    let selection = ObservedSelection {
        comment: Some("never-existed".to_string()),
        angles: Vec::new(),
    };
    assert!(recover_bits(&carrier, &selection).is_err());
}

#[test]
fn test_prefixed_comment_id_resolves() {
    let carrier = roomy_carrier();
    let selection = ObservedSelection {
        comment: Some("t1_c3".to_string()),
        angles: Vec::new(),
    };
    let bits = recover_bits(&carrier, &selection).unwrap();
    // c3 sits at position 3, so the selector value is 4 in a 3 bit field
    assert_eq!(bits.to_bit_string(), "100");
}

#[test]
fn test_unknown_angle_is_a_carrier_error() {
    let carrier = roomy_carrier();
    let selection = ObservedSelection {
        comment: None,
        angles: vec![angle("not-in-pool")],
    };
    assert!(recover_bits(&carrier, &selection).is_err());
}
