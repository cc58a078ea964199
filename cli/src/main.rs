//! docmd CLI - Word document to Markdown conversion tool
//!
//! Converts DOCX files (and legacy DOC files through LibreOffice) to Markdown,
//! writing embedded images next to the output.

mod legacy;

use clap::{ArgAction, Parser, Subcommand};
use colored::*;
use docmd::render::{has_title, ConvertOptions, ImageExtractor, JsonFormat};
use docmd::{Document, FormatType};
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Name of the image folder created next to converted Markdown.
const ASSETS_DIR: &str = "assets";

/// Word document to Markdown conversion
#[derive(Parser)]
#[command(
    name = "docmd",
    version,
    about = "Convert Word documents to Markdown",
    long_about = "docmd - Word document to Markdown conversion.\n\n\
                  Converts DOCX files to Markdown and extracts embedded images \
                  into an assets folder. Legacy DOC files are converted through \
                  LibreOffice first."
)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug); RUST_LOG overrides
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert documents to Markdown
    #[command(visible_alias = "md")]
    Convert {
        /// Input file paths
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Output file path for a single input ("-" for stdout)
        #[arg(short, long, conflicts_with = "output_dir")]
        output: Option<PathBuf>,

        /// Directory for the Markdown files (default: next to each input)
        #[arg(long)]
        output_dir: Option<PathBuf>,

        /// Do not extract images
        #[arg(long)]
        no_images: bool,
    },

    /// Dump the parsed document tree as JSON
    Tree {
        /// Input file path
        input: PathBuf,

        /// Output file path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output compact JSON (no indentation)
        #[arg(long)]
        compact: bool,
    },

    /// Show document structure information
    Info {
        /// Input file path
        input: PathBuf,
    },

    /// Extract embedded images from a document
    Extract {
        /// Input file path
        input: PathBuf,

        /// Output directory for images
        #[arg(short, long, default_value = ASSETS_DIR)]
        output: PathBuf,
    },

    /// Show version information
    Version,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Convert {
            inputs,
            output,
            output_dir,
            no_images,
        } => {
            run_convert(&inputs, output.as_deref(), output_dir.as_deref(), no_images)?;
        }

        Commands::Tree {
            input,
            output,
            compact,
        } => {
            let pb = create_spinner("Parsing document...");

            let doc = docmd::parse_file(&input)?;
            let format = if compact {
                JsonFormat::Compact
            } else {
                JsonFormat::Pretty
            };
            let json = docmd::render::to_json(&doc, format)?;

            pb.finish_and_clear();
            write_output(output.as_deref(), &json)?;

            if let Some(path) = output {
                println!("{} Wrote tree: {}", "✓".green().bold(), path.display());
            }
        }

        Commands::Info { input } => {
            let pb = create_spinner("Analyzing document...");

            let format = docmd::detect_format_from_path(&input)?;
            let doc = docmd::parse_file(&input)?;

            pb.finish_and_clear();
            print_info(&input, format, &doc);
        }

        Commands::Extract { input, output } => {
            let pb = create_spinner("Extracting images...");

            let format = docmd::detect_format_from_path(&input)?;
            if format != FormatType::Docx {
                pb.finish_and_clear();
                return Err(format!("{} is not supported for extraction", format).into());
            }
            let data = fs::read(&input)?;
            let images = ImageExtractor::new(Some(&output)).extract(&data);

            pb.finish_and_clear();

            if !images.has_images() {
                println!("{} No images found in document", "!".yellow().bold());
                return Ok(());
            }

            for (id, name) in images.mappings() {
                println!("  {} → {}", id.dimmed(), name);
            }
            println!(
                "{} Extracted {} images to {}",
                "✓".green().bold(),
                images.filenames().len(),
                output.display()
            );
        }

        Commands::Version => {
            print_version();
        }
    }

    Ok(())
}

/// Outcome of one successful conversion.
struct Converted {
    destination: Option<PathBuf>,
    images: usize,
}

fn run_convert(
    inputs: &[PathBuf],
    output: Option<&Path>,
    output_dir: Option<&Path>,
    no_images: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if output.is_some() && inputs.len() > 1 {
        return Err("--output can only be used with a single input".into());
    }
    if let Some(dir) = output_dir {
        fs::create_dir_all(dir)?;
    }

    let pb = if inputs.len() > 1 {
        create_progress_bar(inputs.len() as u64)
    } else {
        create_spinner("Converting document...")
    };

    let mut done = Vec::new();
    let mut failed = Vec::new();
    for input in inputs {
        pb.set_message(input.display().to_string());
        match convert_one(input, output, output_dir, no_images, &pb) {
            Ok(converted) => done.push((input, converted)),
            Err(e) => {
                log::warn!("Conversion of {} failed: {}", input.display(), e);
                failed.push((input, e.to_string()));
            }
        }
        pb.inc(1);
    }
    pb.finish_and_clear();

    for (input, converted) in &done {
        if let Some(ref dest) = converted.destination {
            println!(
                "{} {} → {} ({} images)",
                "✓".green().bold(),
                input.display(),
                dest.display(),
                converted.images
            );
        }
    }
    for (input, error) in &failed {
        eprintln!("{} {}: {}", "✗".red().bold(), input.display(), error);
    }

    if inputs.len() > 1 {
        println!(
            "\n{}: {} converted, {} failed",
            "Summary".cyan().bold(),
            done.len(),
            failed.len()
        );
    }

    if failed.is_empty() {
        Ok(())
    } else {
        Err(format!("{} of {} inputs failed", failed.len(), inputs.len()).into())
    }
}

fn convert_one(
    input: &Path,
    output: Option<&Path>,
    output_dir: Option<&Path>,
    no_images: bool,
    pb: &ProgressBar,
) -> Result<Converted, Box<dyn std::error::Error>> {
    let destination = markdown_destination(input, output, output_dir);

    // Keeps the temporary DOCX alive until parsing is done
    let mut pre_converted = None;
    let source = match docmd::detect_format_from_path(input)? {
        FormatType::Docx => input.to_path_buf(),
        FormatType::LegacyDoc => {
            let converted = legacy::convert_to_docx(input)?;
            let path = converted.path.clone();
            pre_converted = Some(converted);
            path
        }
    };

    let doc = docmd::parse_file(&source)?;
    drop(pre_converted);

    let options = ConvertOptions::new()
        .with_assets_dir(assets_dir_for(destination.as_deref(), output_dir))
        .with_images(!no_images);
    let result = docmd::convert(&doc, &options);

    match destination.as_deref() {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }
            write_output(Some(path), &result.markdown)?;
        }
        None => pb.suspend(|| write_output(None, &result.markdown))?,
    }

    Ok(Converted {
        destination,
        images: result.images.len(),
    })
}

/// Where the Markdown for `input` goes; `None` means stdout.
fn markdown_destination(
    input: &Path,
    output: Option<&Path>,
    output_dir: Option<&Path>,
) -> Option<PathBuf> {
    match output {
        Some(path) if path == Path::new("-") => None,
        Some(path) => Some(path.to_path_buf()),
        None => {
            let md = input.with_extension("md");
            match (output_dir, md.file_name()) {
                (Some(dir), Some(name)) => Some(dir.join(name)),
                _ => Some(md),
            }
        }
    }
}

/// Assets folder sitting next to the Markdown output.
fn assets_dir_for(destination: Option<&Path>, output_dir: Option<&Path>) -> PathBuf {
    let base = destination
        .and_then(Path::parent)
        .or(output_dir)
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    base.join(ASSETS_DIR)
}

fn print_info(input: &Path, format: FormatType, doc: &Document) {
    println!("{}", "Document Information".cyan().bold());
    println!("{}", "─".repeat(40));
    println!(
        "{}: {}",
        "File".bold(),
        input.file_name().unwrap_or_default().to_string_lossy()
    );
    println!("{}: {}", "Format".bold(), format);
    println!("{}: {}", "Elements".bold(), doc.elements.len());
    println!("{}: {}", "Paragraphs".bold(), doc.paragraphs().count());
    println!("{}: {}", "Tables".bold(), doc.tables().count());

    let inline_objects: usize = doc.paragraphs().map(|p| p.inline_objects.len()).sum();
    println!("{}: {}", "Inline images".bold(), inline_objects);
    println!(
        "{}: {}",
        "Title".bold(),
        if has_title(doc) { "yes" } else { "no" }
    );

    let text = doc.plain_text();
    println!("\n{}", "Content Statistics".cyan().bold());
    println!("{}", "─".repeat(40));
    println!("{}: {}", "Words".bold(), text.split_whitespace().count());
    println!("{}: {}", "Characters".bold(), text.chars().count());
}

fn print_version() {
    println!("{} {}", "docmd".green().bold(), env!("CARGO_PKG_VERSION"));
    println!("Word document to Markdown conversion");
    println!();
    println!("Supported formats: DOCX, DOC (via LibreOffice)");
}

fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"])
            .template("{spinner:.blue} {msg}")
            .unwrap(),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

fn create_progress_bar(len: u64) -> ProgressBar {
    let pb = ProgressBar::new(len);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{bar:30.blue} {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("█▓░"),
    );
    pb
}

fn write_output(path: Option<&Path>, content: &str) -> io::Result<()> {
    match path {
        Some(p) => fs::write(p, content),
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            handle.write_all(content.as_bytes())
        }
    }
}
