//! CLI tool for turning PowerPoint speaker notes into script slides.

use anyhow::{Context, Result};
use clap::Parser;
use script_core::{Chunker, ConversionPlan, Converter, Error, SpeakerPalette, DEFAULT_BUDGET};
use script_pptx::{DeckWriter, NotesReader, DEFAULT_MAX_INPUT_BYTES};
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Build a deck of colorized transcript slides from the speaker notes of a .pptx file.
#[derive(Parser, Debug)]
#[command(name = "script-slides")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Input PowerPoint file(s) (.pptx)
    #[arg(required = true)]
    input: Vec<PathBuf>,

    /// Output directory (default: same as input file)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print the slide plan as JSON to stdout instead of writing a deck
    #[arg(short, long)]
    plan: bool,

    /// Print the deck to stdout instead of writing a file
    #[arg(short = 'P', long)]
    print: bool,

    /// Maximum characters per slide
    #[arg(short, long, default_value_t = DEFAULT_BUDGET)]
    budget: usize,

    /// JSON file with speaker colors (`default`, `fixed`, `pool`)
    #[arg(long)]
    palette: Option<PathBuf>,

    /// Reject input files larger than this many bytes
    #[arg(long, default_value_t = DEFAULT_MAX_INPUT_BYTES)]
    max_size: u64,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    if args.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    }

    let converter = build_converter(&args)?;
    let reader = NotesReader::new().with_max_input_bytes(args.max_size);

    let mut failures = 0;
    for input_path in &args.input {
        if args.verbose {
            eprintln!("Processing: {}", input_path.display());
        }

        match process_file(input_path, &args, &reader, &converter) {
            Ok(Some(output_path)) => {
                if args.verbose {
                    eprintln!("Written to: {}", output_path.display());
                }
            }
            Ok(None) => {}
            Err(e) => {
                eprintln!("Error processing {}: {:#}", input_path.display(), e);
                failures += 1;
            }
        }
    }

    if failures > 0 {
        anyhow::bail!("{} of {} files failed", failures, args.input.len());
    }

    Ok(())
}

/// Configure the converter from the budget and palette arguments.
fn build_converter(args: &Args) -> Result<Converter> {
    let chunker = Chunker::new(args.budget)?;
    let mut converter = Converter::new().with_chunker(chunker);

    if let Some(path) = &args.palette {
        let json = fs::read_to_string(path)
            .with_context(|| format!("Failed to read palette {}", path.display()))?;
        let palette = SpeakerPalette::from_json(&json)
            .with_context(|| format!("Invalid palette {}", path.display()))?;
        converter = converter.with_palette(palette);
    }

    Ok(converter)
}

/// Convert a single PowerPoint file. Returns the written path, if any.
fn process_file(
    input_path: &Path,
    args: &Args,
    reader: &NotesReader,
    converter: &Converter,
) -> Result<Option<PathBuf>> {
    check_input_size(input_path, args.max_size)?;
    let data =
        fs::read(input_path).with_context(|| format!("Failed to open {}", input_path.display()))?;

    let filename = input_path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("unknown");

    let deck = reader.read_bytes(&data, filename)?;
    let notes = deck.notes();

    if args.verbose {
        eprintln!(
            "  Found {} slides, {} with notes",
            deck.slides.len(),
            notes.len()
        );
    }

    let plan = converter.convert(&notes)?;

    if args.verbose {
        eprintln!("  Planned {} script slides", plan.slide_count());
    }

    if args.plan {
        print_plan(&plan)?;
        return Ok(None);
    }

    let stem = input_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output");

    let bytes = DeckWriter::new().with_title(stem).to_bytes(plan.slides())?;

    if args.print {
        io::stdout()
            .lock()
            .write_all(&bytes)
            .context("Failed to write deck to stdout")?;
        return Ok(None);
    }

    let output_path = get_output_path(input_path, args.output.as_ref())?;
    write_output(&output_path, &bytes)?;

    Ok(Some(output_path))
}

/// Reject oversized inputs before buffering them.
fn check_input_size(input_path: &Path, limit: u64) -> Result<()> {
    let size = fs::metadata(input_path)
        .with_context(|| format!("Failed to open {}", input_path.display()))?
        .len();
    if size > limit {
        return Err(Error::InputTooLarge { size, limit }.into());
    }
    Ok(())
}

fn print_plan(plan: &ConversionPlan) -> Result<()> {
    let json = serde_json::to_string_pretty(plan).context("Failed to serialize plan")?;
    println!("{}", json);
    Ok(())
}

/// Determine the output path for a processed file.
fn get_output_path(input_path: &Path, output_dir: Option<&PathBuf>) -> Result<PathBuf> {
    let stem = input_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output");

    let output_filename = format!("{}_script.pptx", stem);

    let output_path = match output_dir {
        Some(dir) => {
            fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create output directory: {}", dir.display()))?;
            dir.join(output_filename)
        }
        None => {
            if let Some(parent) = input_path.parent() {
                parent.join(output_filename)
            } else {
                PathBuf::from(output_filename)
            }
        }
    };

    Ok(output_path)
}

/// Write output to a file.
fn write_output(path: &Path, content: &[u8]) -> Result<()> {
    let mut file =
        File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;

    file.write_all(content)
        .with_context(|| format!("Failed to write to {}", path.display()))?;

    Ok(())
}
