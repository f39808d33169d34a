//! CLI binary for doc2md.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `ConversionConfig`, runs the conversion (in parallel for multiple
//! inputs), and prints or writes results.

use anyhow::{Context, Result};
use clap::Parser;
use doc2md::{
    convert, convert_batch, convert_to_file, ConversionConfig, InputFormat, PageSeparator,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
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

const AFTER_HELP: &str = r#"EXAMPLES:
  # Basic conversion (stdout)
  doc2md report.pdf

  # Convert to a specific file
  doc2md report.pdf -o report.md

  # Convert a whole directory's worth of documents, .md files land next to
  # each source as <name>.<ext>.md
  doc2md docs/*.pdf docs/*.docx

  # Collect outputs in one directory
  doc2md docs/*.pptx -o out/

  # Treat an oddly-named file as Tika XHTML
  doc2md --format tika extracted.out

  # Keep page numbers and bare figures (diagnose a missing line)
  doc2md --keep-noise report.pdf

  # Flatten minor font sizes into body text
  doc2md --max-heading-depth 3 report.pdf

  # Page separators and machine-readable stats
  doc2md --separator hr report.pdf -o report.md
  doc2md --json report.pdf > report.json

SUPPORTED FORMATS:
  Extension        Format      Heading detection
  ─────────────    ─────────   ─────────────────────────────────────────
  .pdf             PDF         inferred from font-size frequency ranking
  .docx            DOCX        paragraph style names (Heading 1, Title, …)
  .pptx            PPTX        one section per slide, body text only
  .html .xhtml     Tika XHTML  h1..h6 tags
  .xml

ENVIRONMENT VARIABLES:
  PDFIUM_LIB_PATH   Path to a pdfium shared library (file or directory).
                    Falls back to the system loader when unset.
  RUST_LOG          Tracing filter, overrides -v/-q (e.g. doc2md=debug)

SETUP (PDF only):
  Download a pdfium build for your platform from
  https://github.com/bblanchon/pdfium-binaries and point PDFIUM_LIB_PATH at
  it. The other formats need no native library.
"#;

/// Convert PDF, DOCX, PPTX, and Tika XHTML documents to Markdown.
#[derive(Parser, Debug)]
#[command(
    name = "doc2md",
    version,
    about = "Convert PDF, DOCX, PPTX, and Tika XHTML documents to Markdown",
    long_about = "Convert richly-styled documents to clean Markdown. Headings are inferred \
from typography (PDF font sizes, DOCX style names, XHTML heading tags); page numbers and \
stray figures are filtered out. No network access, no API keys.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Input document(s).
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Output file (single input) or directory (any number of inputs).
    /// Default: `<input>.md` next to each source.
    #[arg(short, long, env = "DOC2MD_OUTPUT")]
    output: Option<PathBuf>,

    /// Force the input format instead of detecting it from the extension:
    /// pdf, docx, pptx, tika.
    #[arg(long, env = "DOC2MD_FORMAT", value_enum)]
    format: Option<FormatArg>,

    /// Deepest heading level to assign (1-6). Scores ranked beyond this
    /// render as body text.
    #[arg(long, env = "DOC2MD_MAX_HEADING_DEPTH", default_value_t = 6,
          value_parser = clap::value_parser!(usize))]
    max_heading_depth: usize,

    /// Keep lines the noise classifier would drop (page numbers, bare
    /// figures, stray short tokens).
    #[arg(long, env = "DOC2MD_KEEP_NOISE")]
    keep_noise: bool,

    /// Page separator: none, hr, comment, or a custom string.
    #[arg(long, env = "DOC2MD_SEPARATOR", default_value = "none")]
    separator: String,

    /// Output structured JSON (Markdown plus statistics) instead of plain
    /// Markdown. Only with stdout output.
    #[arg(long, env = "DOC2MD_JSON")]
    json: bool,

    /// Print to stdout even when multiple inputs are given.
    #[arg(long)]
    stdout: bool,

    /// Disable the progress bar.
    #[arg(long, env = "DOC2MD_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "DOC2MD_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "DOC2MD_QUIET")]
    quiet: bool,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum FormatArg {
    Pdf,
    Docx,
    Pptx,
    Tika,
}

impl From<FormatArg> for InputFormat {
    fn from(v: FormatArg) -> Self {
        match v {
            FormatArg::Pdf => InputFormat::Pdf,
            FormatArg::Docx => InputFormat::Docx,
            FormatArg::Pptx => InputFormat::Pptx,
            FormatArg::Tika => InputFormat::TikaHtml,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    let config = build_config(&cli)?;
    let to_stdout = cli.stdout || (cli.inputs.len() == 1 && cli.output.is_none());

    if to_stdout {
        run_stdout(&cli, &config)
    } else {
        run_files(&cli, &config)
    }
}

/// Single-document (or forced-stdout) path: Markdown or JSON to stdout.
fn run_stdout(cli: &Cli, config: &ConversionConfig) -> Result<()> {
    let mut failed = 0usize;
    for input in &cli.inputs {
        let output = match convert(input, config) {
            Ok(o) => o,
            Err(e) => {
                eprintln!("{} {}: {e}", red("✗"), input.display());
                failed += 1;
                continue;
            }
        };

        if cli.json {
            let json =
                serde_json::to_string_pretty(&output).context("Failed to serialise output")?;
            println!("{json}");
        } else {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            handle
                .write_all(output.markdown.as_bytes())
                .context("Failed to write to stdout")?;
            if !output.markdown.ends_with('\n') {
                handle.write_all(b"\n").ok();
            }
        }

        if !cli.quiet && !cli.json {
            eprintln!(
                "{} {}  {}",
                green("✔"),
                bold(&input.display().to_string()),
                dim(&format!(
                    "{} lines, {} filtered, {}ms",
                    output.stats.lines, output.stats.skipped_lines, output.stats.duration_ms
                )),
            );
        }
    }

    if failed > 0 {
        anyhow::bail!("{failed} document(s) failed");
    }
    Ok(())
}

/// Multi-document path: convert in parallel, write one .md per input.
fn run_files(cli: &Cli, config: &ConversionConfig) -> Result<()> {
    let out_dir = match &cli.output {
        Some(p) if cli.inputs.len() > 1 || p.is_dir() => {
            std::fs::create_dir_all(p)
                .with_context(|| format!("Failed to create output directory {}", p.display()))?;
            Some(p.clone())
        }
        _ => None,
    };

    // Single input with an explicit output file short-circuits the batch.
    if cli.inputs.len() == 1 && out_dir.is_none() {
        let input = &cli.inputs[0];
        let (target, output) = convert_to_file(input, cli.output.as_deref(), config)
            .with_context(|| format!("Failed to convert {}", input.display()))?;
        if !cli.quiet {
            print_summary(input, &target, &output.stats);
        }
        return Ok(());
    }

    let show_progress = !cli.quiet && !cli.no_progress;
    let bar = if show_progress {
        let bar = ProgressBar::new(cli.inputs.len() as u64);
        bar.set_style(
            ProgressStyle::with_template(
                "{spinner:.cyan} {prefix:.bold}  \
                 [{bar:42.green/238}] {pos:>3}/{len} documents  ⏱ {elapsed_precise}",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▉▊▋▌▍▎▏  "),
        );
        bar.set_prefix("Converting");
        Some(bar)
    } else {
        None
    };

    let results = convert_batch(&cli.inputs, config);
    let mut converted = 0usize;
    let mut failed = 0usize;

    for (input, result) in results {
        if let Some(ref bar) = bar {
            bar.inc(1);
        }
        match result {
            Ok(output) => {
                let target = match &out_dir {
                    Some(dir) => {
                        let mut name = input.file_name().unwrap_or_default().to_os_string();
                        name.push(".md");
                        dir.join(name)
                    }
                    None => doc2md::convert::default_output_path(&input),
                };
                if let Err(e) = std::fs::write(&target, &output.markdown) {
                    report(&bar, format!("{} {}: {e}", red("✗"), target.display()));
                    failed += 1;
                    continue;
                }
                report(
                    &bar,
                    format!(
                        "  {} {}  {}",
                        green("✓"),
                        input.display(),
                        dim(&format!(
                            "{} lines, {} filtered, {}ms",
                            output.stats.lines,
                            output.stats.skipped_lines,
                            output.stats.duration_ms
                        )),
                    ),
                );
                converted += 1;
            }
            Err(e) => {
                report(&bar, format!("  {} {}: {e}", red("✗"), input.display()));
                failed += 1;
            }
        }
    }

    if let Some(bar) = bar {
        bar.finish_and_clear();
    }
    if !cli.quiet {
        if failed == 0 {
            eprintln!(
                "{} {} documents converted",
                green("✔"),
                bold(&converted.to_string())
            );
        } else {
            eprintln!(
                "{} {}/{} documents converted  ({} failed)",
                if converted == 0 { red("✘") } else { cyan("⚠") },
                bold(&converted.to_string()),
                cli.inputs.len(),
                red(&failed.to_string()),
            );
        }
    }

    if failed > 0 {
        anyhow::bail!("{failed} document(s) failed");
    }
    Ok(())
}

fn report(bar: &Option<ProgressBar>, line: String) {
    match bar {
        Some(bar) => bar.println(line),
        None => eprintln!("{line}"),
    }
}

fn print_summary(input: &std::path::Path, target: &std::path::Path, stats: &doc2md::ConversionStats) {
    eprintln!(
        "{} {}  →  {}",
        green("✔"),
        input.display(),
        bold(&target.display().to_string()),
    );
    eprintln!(
        "   {}",
        dim(&format!(
            "{} pages, {} lines rendered, {} filtered as noise, {}ms",
            stats.pages, stats.lines, stats.skipped_lines, stats.duration_ms
        )),
    );
}

/// Map CLI args to `ConversionConfig`.
fn build_config(cli: &Cli) -> Result<ConversionConfig> {
    let mut builder = ConversionConfig::builder()
        .max_heading_depth(cli.max_heading_depth)
        .keep_noise(cli.keep_noise)
        .page_separator(parse_separator(&cli.separator));

    if let Some(format) = cli.format {
        builder = builder.format(format.into());
    }

    builder.build().context("Invalid configuration")
}

/// Parse `--separator` string into `PageSeparator`.
fn parse_separator(s: &str) -> PageSeparator {
    match s.to_lowercase().as_str() {
        "none" => PageSeparator::None,
        "hr" | "---" => PageSeparator::HorizontalRule,
        "comment" => PageSeparator::Comment,
        _ => PageSeparator::Custom(s.to_string()),
    }
}
