use std::fs;
use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::{CommandFactory, Parser};
use clap_complete::Shell;
use owo_colors::OwoColorize;
use plainpage_core::{
    Document, FetchConfig, JsonConfig, MarkdownConfig, OutputFormat, choose_body, convert_to_json,
    convert_to_markdown, convert_to_text, extract_document, fetch_file, fetch_stdin, fetch_url, metadata_to_json,
};

mod echo;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Extract the title, author and body text of an article from a web page
#[derive(Parser, Debug)]
#[command(name = "plainpage")]
#[command(author = "plainpage contributors")]
#[command(version)]
#[command(about = "Extract clean article text from web pages", long_about = None)]
struct Args {
    /// URL to fetch, local HTML file, or "-" for stdin
    #[arg(value_name = "INPUT", required_unless_present = "completions")]
    input: Option<String>,

    /// Output file (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Output format (text, markdown, json)
    #[arg(short, long, default_value = "text", value_name = "FORMAT")]
    format: OutputFormat,

    /// HTTP timeout in seconds
    #[arg(long, default_value = "10", value_name = "SECS")]
    timeout: u64,

    /// Custom User-Agent for HTTP requests
    #[arg(long, value_name = "UA")]
    user_agent: Option<String>,

    /// Maximum number of response bytes to read
    #[arg(long, default_value = "5000000", value_name = "BYTES")]
    max_bytes: usize,

    /// Only print the title and author
    #[arg(short, long)]
    metadata_only: bool,

    /// Add word count and reading time (JSON only)
    #[arg(long)]
    metrics: bool,

    /// Show progress and timings on stderr
    #[arg(short, long)]
    verbose: bool,

    /// Generate shell completion script
    #[arg(long, value_name = "SHELL")]
    completions: Option<Shell>,
}

fn is_url(input: &str) -> bool {
    input.starts_with("http://") || input.starts_with("https://")
}

async fn read_input(args: &Args, input: &str) -> anyhow::Result<Vec<u8>> {
    if input == "-" {
        if args.verbose {
            echo::print_step(1, 3, "Reading from stdin");
        }
        return fetch_stdin().context("Failed to read from stdin");
    }

    if is_url(input) {
        if args.verbose {
            echo::print_step(1, 3, &format!("Fetching from {}", input.bright_white().underline()));
        }
        let defaults = FetchConfig::default();
        let config = FetchConfig {
            timeout: args.timeout,
            user_agent: args.user_agent.clone().unwrap_or(defaults.user_agent),
            max_bytes: args.max_bytes,
        };
        return fetch_url(input, &config).await.context("Failed to fetch URL");
    }

    if args.verbose {
        echo::print_step(1, 3, &format!("Reading from file {}", input.bright_white()));
    }
    fetch_file(input).with_context(|| format!("Failed to read file: {}", input))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if let Some(shell) = args.completions {
        clap_complete::generate(shell, &mut Args::command(), "plainpage", &mut io::stdout());
        return Ok(());
    }

    let input = args.input.as_deref().context("INPUT is required")?;
    let started = Instant::now();
    let mut timings: Vec<(String, Duration)> = Vec::new();

    if args.verbose {
        echo::print_banner();
    }

    let step = Instant::now();
    let bytes = read_input(&args, input).await?;
    timings.push(("Read".to_string(), step.elapsed()));

    if args.verbose {
        eprintln!("  {} {}\n", "Size:".dimmed(), echo::format_size(bytes.len()).bright_white());
        echo::print_step(2, 3, "Parsing HTML document");
    }

    let step = Instant::now();
    let doc = Document::from_bytes(&bytes).context("Failed to parse HTML")?;
    timings.push(("Parse".to_string(), step.elapsed()));

    let output = if args.metadata_only {
        let metadata = doc.extract_metadata();
        match args.format {
            OutputFormat::Json => metadata_to_json(&metadata, true).context("Failed to render metadata")? + "\n",
            _ => format!("Title: {}\nAuthor: {}\n", metadata.title, metadata.author),
        }
    } else {
        if args.verbose {
            echo::print_step(3, 3, "Extracting article");
        }

        let step = Instant::now();
        let article = extract_document(&doc).context("Failed to extract content")?;
        timings.push(("Extract".to_string(), step.elapsed()));

        if args.verbose {
            echo::print_article_details(&article, &choose_body(&doc).tier);
        }

        match args.format {
            OutputFormat::Text => convert_to_text(&article),
            OutputFormat::Markdown => convert_to_markdown(&article, &MarkdownConfig::default()),
            OutputFormat::Json => {
                let config = JsonConfig { pretty: true, include_metrics: args.metrics };
                convert_to_json(&article, &config).context("Failed to render JSON")? + "\n"
            }
        }
    };

    if args.verbose {
        echo::print_timing_summary(started.elapsed(), &timings);
    }

    match args.output {
        Some(path) => {
            fs::write(&path, output).with_context(|| format!("Failed to write to file: {}", path.display()))?;
            if args.verbose {
                echo::print_success(&format!("Output written to {}", path.display().bright_white()));
            }
        }
        None => print!("{}", output),
    }

    Ok(())
}
