//! docindex — inspect, validate and normalize documentation search indexes.
//!
//! Works on the `search_index.js` file a Documenter build writes next to the
//! generated site (`var documenterSearchIndex = {"docs": [...]}`):
//!
//! - `docindex check build/` — validate every index below a directory
//! - `docindex list --page Home build/search_index.js`
//! - `docindex fmt --check previews/*/search_index.js`
//!
//! Inputs that are omitted or given as `-` are read from stdin.

mod model;
mod outline;
mod parser;
mod render;
mod stats;
mod validate;

use anyhow::{bail, Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use model::{Category, DocRecord, SearchIndex};
use render::Renderer;
use std::collections::HashSet;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use validate::{Issue, Severity};

/// File name the generator gives the index inside a build directory.
const INDEX_FILE_NAME: &str = "search_index.js";

#[derive(Parser)]
#[command(
    name = "docindex",
    version,
    about = "Inspect, validate and normalize documentation search index files"
)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace). RUST_LOG takes precedence.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load and validate search index files
    Check {
        /// Files, directories or glob patterns. Reads stdin if omitted.
        files: Vec<String>,

        /// Fail on warnings too
        #[arg(long)]
        strict: bool,

        /// Require each file to be byte-identical to its canonical re-rendering
        #[arg(long)]
        canonical: bool,
    },
    /// Print records in source order
    List {
        /// Input file. Reads stdin if omitted or "-".
        file: Option<String>,

        /// Only records of this page
        #[arg(long)]
        page: Option<String>,

        /// Only records of this category (page, section, function, ...)
        #[arg(long)]
        category: Option<String>,

        /// Only records with exactly this location
        #[arg(long)]
        location: Option<String>,

        /// Only records with non-empty text
        #[arg(long)]
        with_text: bool,

        /// Stop after this many records
        #[arg(short = 'n', long)]
        limit: Option<usize>,

        /// Output format: text (default) or json
        #[arg(short = 'f', long, default_value = "text")]
        format: String,
    },
    /// Show the pages of an index with their sections
    Outline {
        /// Files, directories or glob patterns. Reads stdin if omitted.
        files: Vec<String>,

        /// Write one outline per input into this directory instead of stdout
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,

        /// Output format: markdown (default) or json
        #[arg(short = 'f', long, default_value = "markdown")]
        format: String,
    },
    /// Print summary counts
    Stats {
        /// Input file. Reads stdin if omitted or "-".
        file: Option<String>,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Re-emit indexes in canonical layout
    Fmt {
        /// Files, directories or glob patterns. Reads stdin if omitted.
        files: Vec<String>,

        /// List files that are not canonical and fail if there are any
        #[arg(long, conflicts_with = "write")]
        check: bool,

        /// Rewrite files in place
        #[arg(short = 'w', long)]
        write: bool,

        /// Output format: js (default, generator layout) or json
        #[arg(short = 'f', long, default_value = "js")]
        format: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Check {
            files,
            strict,
            canonical,
        } => run_check(&files, strict, canonical),
        Commands::List {
            file,
            page,
            category,
            location,
            with_text,
            limit,
            format,
        } => {
            let filter = RecordFilter {
                page: page.as_deref(),
                category: category.map(Category::from),
                location: location.as_deref(),
                with_text,
            };
            run_list(file.as_deref(), &filter, limit, &format)
        }
        Commands::Outline {
            files,
            output,
            format,
        } => run_outline(&files, output.as_deref(), &format),
        Commands::Stats { file, json } => run_stats(file.as_deref(), json),
        Commands::Fmt {
            files,
            check,
            write,
            format,
        } => run_fmt(&files, check, write, &format),
    }
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default.into()),
        )
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

/// Where an index is read from.
enum Input {
    Stdin,
    File(PathBuf),
}

impl Input {
    fn label(&self) -> String {
        match self {
            Input::Stdin => "<stdin>".to_string(),
            Input::File(path) => path.display().to_string(),
        }
    }

    fn read(&self) -> Result<String> {
        match self {
            Input::Stdin => {
                let mut content = String::new();
                io::stdin()
                    .read_to_string(&mut content)
                    .context("failed to read stdin")?;
                Ok(content)
            }
            Input::File(path) => fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display())),
        }
    }

    /// Read and parse, returning the raw content alongside the index.
    fn load(&self) -> Result<(String, SearchIndex)> {
        let content = self.read()?;
        let index = parser::parse(&content)
            .with_context(|| format!("failed to parse {}", self.label()))?;
        debug!(input = %self.label(), records = index.docs.len(), "loaded");
        Ok((content, index))
    }
}

fn single_input(file: Option<&str>) -> Input {
    match file {
        None | Some("-") => Input::Stdin,
        Some(path) => Input::File(PathBuf::from(path)),
    }
}

fn resolve_inputs(patterns: &[String]) -> Result<Vec<Input>> {
    if patterns.is_empty() || (patterns.len() == 1 && patterns[0] == "-") {
        return Ok(vec![Input::Stdin]);
    }
    let files = expand_globs(patterns)?;
    if files.is_empty() {
        bail!("no input files matched");
    }
    Ok(files.into_iter().map(Input::File).collect())
}

/// Expand glob patterns into a list of real file paths.
/// Directories are searched recursively for `search_index.js`.
/// A plain path that does not exist is an error rather than an empty glob.
fn expand_globs(patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for pattern in patterns {
        let path = Path::new(pattern);
        if path.is_file() {
            files.push(path.to_path_buf());
            continue;
        }
        if path.is_dir() {
            let base = match pattern.trim_end_matches('/') {
                "" => pattern.as_str(),
                trimmed => trimmed,
            };
            let nested = format!("{}/**/{}", glob::Pattern::escape(base), INDEX_FILE_NAME);
            let found: Vec<_> = glob::glob(&nested)
                .with_context(|| format!("invalid directory pattern: {}", nested))?
                .filter_map(|r| r.ok())
                .filter(|p| p.is_file())
                .collect();
            if found.is_empty() {
                warn!("no {} found under {}", INDEX_FILE_NAME, path.display());
            }
            files.extend(found);
            continue;
        }
        if !pattern.contains(['*', '?', '[']) {
            bail!("no such file: {}", pattern);
        }
        let matches: Vec<_> = glob::glob(pattern)
            .with_context(|| format!("invalid glob pattern: {}", pattern))?
            .filter_map(|r| r.ok())
            .filter(|p| p.is_file())
            .collect();
        if matches.is_empty() {
            warn!("no files matched: {}", pattern);
        }
        files.extend(matches);
    }
    // Sort for deterministic output
    files.sort();
    files.dedup();
    Ok(files)
}

/// Derive the output file name (without extension) from an input path.
/// "previews/PR138/search_index.js" → "PR138", "build/api.js" → "api"
fn derive_output_name(source: &Path) -> String {
    let stem = source
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("index");
    if stem == "search_index" {
        if let Some(parent) = source
            .parent()
            .and_then(|p| p.file_name())
            .and_then(|n| n.to_str())
        {
            return parent.to_string();
        }
    }
    stem.to_string()
}

fn run_check(files: &[String], strict: bool, canonical: bool) -> Result<()> {
    let inputs = resolve_inputs(files)?;
    let mut failed = 0;
    let mut errors = 0;
    let mut warnings = 0;

    for input in &inputs {
        let label = input.label();
        let (content, index) = match input.load() {
            Ok(loaded) => loaded,
            Err(e) => {
                println!("{}: error: {:#}", label, e);
                errors += 1;
                failed += 1;
                continue;
            }
        };

        let mut issues = validate::validate(&index);
        if canonical {
            let rendered = render::js::JsRenderer.render(&index)?;
            if rendered != content {
                issues.push(Issue::error(None, "not in canonical generator layout"));
            }
        }

        for issue in &issues {
            println!("{}: {}", label, issue);
            match issue.severity {
                Severity::Error => errors += 1,
                Severity::Warning => warnings += 1,
            }
        }

        let fails = match validate::worst(&issues) {
            Some(Severity::Error) => true,
            Some(Severity::Warning) => strict,
            None => false,
        };
        if fails {
            failed += 1;
        }
        info!(file = %label, records = index.docs.len(), issues = issues.len(), "checked");
    }

    println!(
        "checked {} file(s): {} error(s), {} warning(s)",
        inputs.len(),
        errors,
        warnings
    );
    if failed > 0 {
        bail!("{} of {} file(s) failed validation", failed, inputs.len());
    }
    Ok(())
}

/// Record selection for `list`. Unset fields match everything.
#[derive(Default)]
struct RecordFilter<'a> {
    page: Option<&'a str>,
    category: Option<Category>,
    location: Option<&'a str>,
    with_text: bool,
}

impl RecordFilter<'_> {
    fn matches(&self, record: &DocRecord) -> bool {
        if self.page.is_some_and(|p| record.page != p) {
            return false;
        }
        if self.category.as_ref().is_some_and(|c| &record.category != c) {
            return false;
        }
        if self.location.is_some_and(|l| record.location != l) {
            return false;
        }
        !(self.with_text && record.text.is_empty())
    }
}

/// Matching records with their source positions, in source order.
fn filter_records<'a>(
    index: &'a SearchIndex,
    filter: &RecordFilter,
    limit: Option<usize>,
) -> Vec<(usize, &'a DocRecord)> {
    index
        .docs
        .iter()
        .enumerate()
        .filter(|(_, r)| filter.matches(r))
        .take(limit.unwrap_or(usize::MAX))
        .collect()
}

fn run_list(
    file: Option<&str>,
    filter: &RecordFilter,
    limit: Option<usize>,
    format: &str,
) -> Result<()> {
    if !matches!(format, "text" | "json") {
        bail!("unknown format: {}. Use text or json", format);
    }
    let (_, index) = single_input(file).load()?;
    let selected = filter_records(&index, filter, limit);
    debug!(matched = selected.len(), total = index.docs.len(), "filtered records");

    if format == "json" {
        let records: Vec<&DocRecord> = selected.iter().map(|(_, r)| *r).collect();
        let json = serde_json::to_string_pretty(&records).context("failed to serialize records")?;
        println!("{}", json);
    } else {
        for (i, r) in &selected {
            println!("{}\t{}\t{}\t{}\t{}", i, r.category, r.location, r.page, r.title);
        }
    }
    Ok(())
}

fn render_outline(index: &SearchIndex, format: &str) -> Result<String> {
    match format {
        "markdown" | "md" => render::markdown::MarkdownRenderer.render(index),
        "json" => {
            let mut out = serde_json::to_string_pretty(&outline::build(index))
                .context("failed to serialize outline")?;
            out.push('\n');
            Ok(out)
        }
        _ => bail!("unknown format: {}. Use markdown or json", format),
    }
}

fn run_outline(files: &[String], output: Option<&Path>, format: &str) -> Result<()> {
    let ext = match format {
        "markdown" | "md" => "md",
        "json" => "json",
        _ => bail!("unknown format: {}. Use markdown or json", format),
    };
    let inputs = resolve_inputs(files)?;

    let Some(output_dir) = output else {
        for input in &inputs {
            let (_, index) = input.load()?;
            if inputs.len() > 1 {
                println!("==> {} <==", input.label());
            }
            print!("{}", render_outline(&index, format)?);
        }
        return Ok(());
    };

    fs::create_dir_all(output_dir).with_context(|| {
        format!("failed to create output directory: {}", output_dir.display())
    })?;

    let mut written = HashSet::new();
    for input in &inputs {
        let (_, index) = input.load()?;
        let name = match input {
            Input::Stdin => "stdin".to_string(),
            Input::File(path) => derive_output_name(path),
        };
        if !written.insert(name.clone()) {
            warn!("{} overwrites an earlier outline named {}", input.label(), name);
        }
        let out_path = output_dir.join(format!("{}.{}", name, ext));
        fs::write(&out_path, render_outline(&index, format)?)
            .with_context(|| format!("failed to write {}", out_path.display()))?;
        info!(input = %input.label(), output = %out_path.display(), "wrote outline");
    }
    Ok(())
}

fn run_stats(file: Option<&str>, json: bool) -> Result<()> {
    let (_, index) = single_input(file).load()?;
    let stats = stats::collect(&index);
    if json {
        let out = serde_json::to_string_pretty(&stats).context("failed to serialize stats")?;
        println!("{}", out);
    } else {
        print!("{}", stats);
    }
    Ok(())
}

fn run_fmt(files: &[String], check: bool, write: bool, format: &str) -> Result<()> {
    if !matches!(format, "js" | "javascript" | "json") {
        bail!("unknown format: {}. Use js or json", format);
    }
    let renderer = render::create_renderer(format)?;
    let inputs = resolve_inputs(files)?;
    if !check && !write && inputs.len() > 1 {
        bail!("fmt prints a single input to stdout; use --write or --check for several files");
    }

    let mut unformatted = 0;
    for input in &inputs {
        let (content, index) = input.load()?;
        let rendered = renderer.render(&index)?;

        if check {
            if rendered != content {
                println!("{}: not in canonical form", input.label());
                unformatted += 1;
            }
        } else if write {
            let Input::File(path) = input else {
                bail!("--write needs file arguments");
            };
            if path.extension().and_then(|e| e.to_str()) != Some(renderer.file_extension()) {
                warn!(
                    "writing {} output into {}",
                    renderer.file_extension(),
                    path.display()
                );
            }
            if rendered != content {
                fs::write(path, &rendered)
                    .with_context(|| format!("failed to write {}", path.display()))?;
                println!("formatted {}", path.display());
            } else {
                debug!(file = %path.display(), "already canonical");
            }
        } else {
            print!("{}", rendered);
        }
    }

    if unformatted > 0 {
        bail!("{} file(s) not in canonical form", unformatted);
    }
    Ok(())
}
