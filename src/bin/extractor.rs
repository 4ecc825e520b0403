use std::fs;
use std::path::PathBuf;

use clap::Parser;
use serde::Deserialize;
use undertext::{
    extract, Angle, Carrier, CommentRef, EncoderConfig, ObservedSelection, TargetType,
};

/// Recover a payload from a carrier and the published selection.
#[derive(Parser)]
struct Args {
    /// Carrier JSON file (post + angles)
    carrier: PathBuf,
    /// Embedding record produced by the embedder
    #[arg(long, conflicts_with = "selection")]
    record: Option<PathBuf>,
    /// Observed selection: {"comment": id|null, "angles": [...]}
    #[arg(long)]
    selection: Option<PathBuf>,
}

/// The slice of the embedding record the receiver needs.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RecordSlice {
    comment_embedding: CommentSlice,
    angle_embedding: AngleSlice,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CommentSlice {
    target_type: TargetType,
    picked_comment_chain: Vec<CommentRef>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AngleSlice {
    selected_angles: Vec<Angle>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();
    if let Err(e) = run() {
        eprintln!("{e}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let carrier: Carrier = serde_json::from_str(&fs::read_to_string(&args.carrier)?)?;
    let selection = match (&args.record, &args.selection) {
        (Some(path), _) => {
            let record: RecordSlice = serde_json::from_str(&fs::read_to_string(path)?)?;
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
                angles: record.angle_embedding.selected_angles,
            }
        }
        (None, Some(path)) => serde_json::from_str(&fs::read_to_string(path)?)?,
        (None, None) => return Err("either --record or --selection is required".into()),
    };

    let payload = extract(&carrier, &selection, &EncoderConfig::default())?;
    println!("{payload}");
    Ok(())
}
