use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use undertext::{
    decompress, Carrier, Dictionary, Encoder, EncoderConfig, FlatThread, HttpQuoteFinder,
    PayloadInput,
};

/// Embed a payload into a thread carrier and emit the embedding record.
#[derive(Parser)]
struct Args {
    /// Carrier JSON file (post + angles)
    carrier: PathBuf,
    /// Payload file: raw text, a JSON string, or {"payload": "..."}
    #[arg(long, conflicts_with = "text")]
    payload: Option<PathBuf>,
    /// Inline payload text
    #[arg(long)]
    text: Option<String>,
    /// Number of angles to select (0 fills the pool)
    #[arg(long, default_value_t = 0)]
    angles: usize,
    /// Quote-finder endpoint; omitted means no snippet lookup
    #[arg(long)]
    finder: Option<String>,
    /// Finder request timeout in seconds
    #[arg(long, default_value_t = 30)]
    finder_timeout: u64,
    /// Output file (stdout when omitted)
    #[arg(long)]
    output: Option<PathBuf>,
    /// Verify the compressed stream decodes back to the payload
    #[arg(long)]
    test: bool,
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
    let payload = match (&args.text, &args.payload) {
        (Some(text), _) => text.clone(),
        (None, Some(path)) => {
            let raw = fs::read_to_string(path)?;
            // Payload files may be raw text or one JSON wrapper level.
            match serde_json::from_str::<PayloadInput>(&raw) {
                Ok(input) => input.into_text(),
                Err(_) => raw,
            }
        }
        (None, None) => return Err("either --payload or --text is required".into()),
    };

    let mut encoder = Encoder::new(EncoderConfig::default());
    if let Some(endpoint) = &args.finder {
        let finder =
            HttpQuoteFinder::new(endpoint.clone(), Duration::from_secs(args.finder_timeout))?;
        encoder = encoder.with_finder(Box::new(finder));
    }

    let target = if args.angles == 0 {
        None
    } else {
        Some(args.angles)
    };
    let record = encoder.embed(&carrier, &payload, target)?;

    if args.test {
        let thread = FlatThread::build(&carrier.post.comments);
        let dict = Dictionary::from_carrier(&carrier.post, &thread);
        let bits = undertext::bits::Bits::from_bit_string(&record.compression.compressed)?;
        let decoded = decompress(&bits, &dict, encoder.config())?;
        if decoded != payload {
            return Err("roundtrip mismatch".into());
        }
        eprintln!("roundtrip verified");
    }

    for warning in &record.warnings {
        eprintln!("warning: {warning}");
    }
    eprintln!(
        "embedded {} bits ({} -> {} compressed)",
        record.total_bits_embedded,
        record.compression.original_length,
        record.compression.compressed_length
    );

    let json = serde_json::to_string_pretty(&record)?;
    match &args.output {
        Some(path) => fs::write(path, json)?,
        None => println!("{json}"),
    }
    Ok(())
}
