//! CLI binary for docfit.
//!
//! A thin shim over the library crate that maps CLI flags onto
//! `PdfConfig` / `PhotoConfig` and prints results.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use docfit::config::{DEFAULT_DPI, DEFAULT_JPEG_QUALITY};
use docfit::{
    make_passport_photo_file, shrink_pdf_file, CropMode, PdfConfig, PhotoConfig, ProgressCallback,
    RenderProgress,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn yellow(s: &str) -> String {
    format!("\x1b[33m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

const TICKS: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"];

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress bar for page rendering.
///
/// Starts as a spinner while pdfium opens the document and switches to a
/// counted bar once the page total is known.
struct CliRenderProgress {
    bar: ProgressBar,
}

impl CliRenderProgress {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new(0);
        let spinner_style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(TICKS);

        bar.set_style(spinner_style);
        bar.set_prefix("Preparing");
        bar.set_message("Opening PDF…");
        bar.enable_steady_tick(Duration::from_millis(80));
        Arc::new(Self { bar })
    }
}

impl RenderProgress for CliRenderProgress {
    fn on_render_start(&self, total_pages: usize) {
        let style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  \
             [{bar:42.green/238}] {pos:>3}/{len} pages  \
             ⏱ {elapsed_precise}  ETA {eta_precise}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
        .tick_strings(TICKS);

        self.bar.set_length(total_pages as u64);
        self.bar.set_style(style);
        self.bar.set_prefix("Rendering");
        self.bar.reset_eta();
    }

    fn on_page_rendered(&self, page_num: usize, total_pages: usize, width: u32, height: u32) {
        self.bar.println(format!(
            "  {} Page {:>3}/{:<3}  {}",
            green("✓"),
            page_num,
            total_pages,
            dim(&format!("{width}x{height} px")),
        ));
        self.bar.inc(1);
    }

    fn on_render_complete(&self, _total_pages: usize) {
        self.bar.finish_and_clear();
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Shrink a scanned PDF (writes compressed.pdf)
  docfit pdf scan.pdf

  # Lower resolution and quality for a stricter portal
  docfit pdf --dpi 100 --quality 30 --max-kb 500 scan.pdf -o small.pdf

  # Passport photo, central crop (writes passport_photo.jpg)
  docfit photo me.jpg

  # Passport photo framed around the detected face
  docfit photo --mode face --face-model seeta_fd_frontal_v1.0.bin me.jpg

  # Machine-readable report
  docfit pdf --json scan.pdf > report.json

ENVIRONMENT VARIABLES:
  PDFIUM_LIB_PATH     Path to libpdfium (file or directory)
  DOCFIT_DPI          Default for --dpi
  DOCFIT_QUALITY      Default for --quality
  DOCFIT_FACE_MODEL   SeetaFace model used by --mode face
  RUST_LOG            Log filter, overrides -v / -q
"#;

/// Largest accepted `--max-kb` (1 GiB).
const MAX_BUDGET_KB: u64 = 1024 * 1024;

/// `--max-kb` is range-checked by clap, so the product always fits.
fn kb_to_bytes(kb: u64) -> usize {
    (kb.min(MAX_BUDGET_KB) * 1024) as usize
}

#[derive(Parser, Debug)]
#[command(
    name = "docfit",
    version,
    about = "Shrink PDFs and make passport photos that fit upload limits",
    long_about = "Shrink PDFs below a size budget by rasterising and recompressing every page, \
and turn photographs into 750x1050 passport photos under 150 KB.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    #[arg(short, long, global = true, env = "DOCFIT_VERBOSE")]
    verbose: bool,

    #[arg(short, long, global = true, env = "DOCFIT_QUIET")]
    quiet: bool,

    #[arg(long, global = true, env = "DOCFIT_NO_PROGRESS")]
    no_progress: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Rasterise a PDF and rebuild it as a compressed image-only PDF.
    Pdf(PdfArgs),
    /// Crop and compress a photo into a 750x1050 passport photo.
    Photo(PhotoArgs),
}

#[derive(Args, Debug)]
struct PdfArgs {
    input: PathBuf,

    #[arg(short, long, default_value = "compressed.pdf")]
    output: PathBuf,

    #[arg(long, env = "DOCFIT_DPI", default_value_t = DEFAULT_DPI,
          value_parser = clap::value_parser!(u32).range(72..=300))]
    dpi: u32,

    #[arg(long, env = "DOCFIT_QUALITY", default_value_t = DEFAULT_JPEG_QUALITY,
          value_parser = clap::value_parser!(u8).range(10..=95))]
    quality: u8,

    /// Size budget in KB. Exceeding it prints a warning.
    #[arg(long, env = "DOCFIT_PDF_MAX_KB", default_value_t = 1200,
          value_parser = clap::value_parser!(u64).range(1..=MAX_BUDGET_KB))]
    max_kb: u64,

    #[arg(long, env = "PDFIUM_LIB_PATH")]
    pdfium_lib: Option<PathBuf>,

    #[arg(long, env = "DOCFIT_JSON")]
    json: bool,
}

#[derive(Args, Debug)]
struct PhotoArgs {
    input: PathBuf,

    #[arg(short, long, default_value = "passport_photo.jpg")]
    output: PathBuf,

    #[arg(long, env = "DOCFIT_MODE", value_enum, default_value = "central")]
    mode: ModeArg,

    #[arg(long, env = "DOCFIT_FACE_MODEL")]
    face_model: Option<PathBuf>,

    /// Output cap in KB. The JPEG quality ladder stops at the first fit.
    #[arg(long, env = "DOCFIT_PHOTO_MAX_KB", default_value_t = 150,
          value_parser = clap::value_parser!(u64).range(1..=MAX_BUDGET_KB))]
    max_kb: u64,

    #[arg(long, env = "DOCFIT_JSON")]
    json: bool,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum ModeArg {
    Central,
    Face,
}

impl From<ModeArg> for CropMode {
    fn from(v: ModeArg) -> Self {
        match v {
            ModeArg::Central => CropMode::Central,
            ModeArg::Face => CropMode::Face,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // The progress bar replaces INFO-level library logs; budget warnings
    // are printed by the summary instead.
    let json = match &cli.command {
        Command::Pdf(a) => a.json,
        Command::Photo(a) => a.json,
    };
    let show_progress =
        matches!(cli.command, Command::Pdf(_)) && !cli.quiet && !cli.no_progress && !json;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    match cli.command {
        Command::Pdf(ref args) => run_pdf(&cli, args, show_progress),
        Command::Photo(ref args) => run_photo(&cli, args),
    }
}

fn run_pdf(cli: &Cli, args: &PdfArgs, show_progress: bool) -> Result<()> {
    let mut builder = PdfConfig::builder()
        .dpi(args.dpi)
        .jpeg_quality(args.quality)
        .max_output_bytes(kb_to_bytes(args.max_kb));
    if let Some(ref lib) = args.pdfium_lib {
        builder = builder.pdfium_lib_path(lib);
    }
    if show_progress {
        let cb: ProgressCallback = CliRenderProgress::new();
        builder = builder.progress(cb);
    }
    let config = builder.build().context("Invalid configuration")?;

    let stats = shrink_pdf_file(&args.input, &args.output, &config)
        .with_context(|| format!("Failed to shrink {}", args.input.display()))?;

    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&stats).context("Failed to serialise report")?
        );
        return Ok(());
    }

    if !cli.quiet {
        eprintln!(
            "{}  {} pages  {:.1} KB → {:.1} KB  {}ms  →  {}",
            if stats.within_budget {
                green("✔")
            } else {
                yellow("⚠")
            },
            stats.page_count,
            stats.input_bytes as f64 / 1024.0,
            stats.output_kb(),
            stats.total_duration_ms,
            bold(&args.output.display().to_string()),
        );
    }
    if !stats.within_budget {
        eprintln!(
            "{} still above the {} KB budget; try a lower --dpi or --quality",
            yellow("warning:"),
            args.max_kb
        );
    }
    Ok(())
}

fn run_photo(cli: &Cli, args: &PhotoArgs) -> Result<()> {
    let mut builder = PhotoConfig::builder()
        .crop_mode(args.mode.into())
        .max_output_bytes(kb_to_bytes(args.max_kb));
    if let Some(ref model) = args.face_model {
        builder = builder.face_model_path(model);
    }
    let config = builder.build().context("Invalid configuration")?;

    let photo = make_passport_photo_file(&args.input, &args.output, &config, None)
        .with_context(|| format!("Failed to process {}", args.input.display()))?;

    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&photo).context("Failed to serialise report")?
        );
        return Ok(());
    }

    if !cli.quiet {
        eprintln!(
            "{}  {}x{}  {} crop  quality {}  {:.1} KB  →  {}",
            if photo.within_budget {
                green("✔")
            } else {
                yellow("⚠")
            },
            photo.width,
            photo.height,
            cyan(&photo.crop_mode.to_string()),
            photo.quality,
            photo.size_kb(),
            bold(&args.output.display().to_string()),
        );
    }
    if !photo.within_budget {
        eprintln!(
            "{} still above {} KB at the lowest quality; use another photo",
            yellow("warning:"),
            args.max_kb
        );
    }
    Ok(())
}
