use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tagsweep::tagging::{NoteOutcome, RunObserver, TagResolution};
use tagsweep::{
    ApiClientBuilder, ApiConfig, ConfigError, MatchCriteria, Note, RunSummary, ScanTagger,
    TagError,
};
use tracing_subscriber::EnvFilter;

/// tagsweep - tag every note whose body contains all given substrings
#[derive(Parser, Debug)]
#[command(name = "tagsweep")]
#[command(about = "Attach a tag to every note containing all given substrings")]
#[command(version)]
struct Cli {
    /// Title of the tag to find or create
    #[arg(long = "tag-name", alias = "tag_name", value_name = "NAME")]
    tag_name: String,

    /// Substring the note body must contain (repeat for AND logic)
    #[arg(
        long = "contains",
        visible_alias = "contains-substring",
        alias = "contains_substring",
        value_name = "SUBSTRING",
        required = true
    )]
    contains: Vec<String>,

    /// Backend base URL (defaults to TAGSWEEP_API_URL or http://localhost:41184)
    #[arg(long, value_name = "URL")]
    base_url: Option<String>,

    /// API token (defaults to TAGSWEEP_TOKEN)
    #[arg(long, value_name = "TOKEN")]
    token: Option<String>,

    /// Per-request timeout in seconds (defaults to TAGSWEEP_TIMEOUT_SECS or 10)
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,

    /// Log every request and per-note decision
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();

    // A missing .env file is fine
    let _ = dotenvy::dotenv();
    init_tracing(cli.verbose);

    if let Err(e) = run(&cli) {
        // Determine exit code based on error type
        let exit_code = if is_user_error(&e) { 1 } else { 2 };
        eprintln!("Error: {e:#}");
        std::process::exit(exit_code);
    }
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "tagsweep=debug"
    } else {
        "tagsweep=warn"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Determines if an error is a user error (vs remote/internal error).
///
/// User errors are bad input or configuration; everything else comes from
/// the backend or the transport.
fn is_user_error(error: &anyhow::Error) -> bool {
    if error.downcast_ref::<ConfigError>().is_some() {
        return true;
    }
    if let Some(TagError::EmptyCriteria) = error.downcast_ref::<TagError>() {
        return true;
    }
    error.to_string().contains("cannot be empty")
}

/// Resolves configuration, then runs the scan.
fn run(cli: &Cli) -> Result<()> {
    let substrings = validate_substrings(&cli.contains)?;
    if cli.tag_name.trim().is_empty() {
        anyhow::bail!("Tag name cannot be empty");
    }

    let config = build_config(cli)?;
    let client = ApiClientBuilder::new(config)
        .build()
        .context("Failed to create API client")?;

    let criteria = MatchCriteria::new(substrings);
    println!("Tag name: {}", cli.tag_name);
    println!(
        "Required substrings (AND): {}",
        criteria.substrings().join(" AND ")
    );
    println!("---");

    let tagger = ScanTagger::new(Arc::new(client));
    let mut reporter = ConsoleReporter;
    let summary = tagger
        .run_with_observer(&cli.tag_name, &criteria, &mut reporter)
        .context("Tagging aborted")?;

    print_summary(&cli.tag_name, &summary);
    Ok(())
}

fn build_config(cli: &Cli) -> Result<ApiConfig> {
    let mut builder = ApiConfig::builder();
    if let Some(url) = &cli.base_url {
        builder = builder.base_url(url);
    }
    if let Some(token) = &cli.token {
        builder = builder.token(token);
    }
    if let Some(secs) = cli.timeout {
        builder = builder.timeout(Duration::from_secs(secs));
    }
    Ok(builder.build()?)
}

/// Rejects blank substrings, which would match every note.
fn validate_substrings(raw: &[String]) -> Result<Vec<String>> {
    if raw.is_empty() {
        anyhow::bail!("Substring list cannot be empty");
    }
    if raw.iter().any(|s| s.trim().is_empty()) {
        anyhow::bail!("Substrings cannot be empty or whitespace-only");
    }
    Ok(raw.to_vec())
}

fn print_summary(tag_name: &str, summary: &RunSummary) {
    println!();
    println!("Done. Tagged {} note(s) with '{}'.", summary.tagged, tag_name);
    println!(
        "   scanned: {}, matched: {}, already tagged: {}, failed: {}",
        summary.notes_scanned, summary.notes_matched, summary.already_tagged, summary.failed
    );
}

/// Prints run progress to stdout. Failures are reported through `tracing`.
struct ConsoleReporter;

impl RunObserver for ConsoleReporter {
    fn tag_resolved(&mut self, title: &str, resolution: &TagResolution) {
        if resolution.created {
            println!(
                "-> Tag '{}' not found; created it (ID: {})",
                title, resolution.id
            );
        } else {
            println!("-> Found existing tag '{}' (ID: {})", title, resolution.id);
        }
    }

    fn notes_loaded(&mut self, count: usize) {
        println!("-> Found {} notes. Scanning...", count);
    }

    fn note_processed(
        &mut self,
        position: usize,
        total: usize,
        note: &Note,
        outcome: &NoteOutcome,
    ) {
        if let NoteOutcome::Tagged = outcome {
            println!("   [TAGGED] {}/{} '{}'", position, total, note.display_name());
        }
    }
}
