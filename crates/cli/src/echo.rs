use std::time::Duration;

use owo_colors::OwoColorize;
use plainpage_core::{Article, BodyTier};

use crate::VERSION;

/// Print a styled banner for verbose mode
pub fn print_banner() {
    eprintln!(
        "\n{} {} {}",
        "plainpage".bold().bright_blue(),
        "v".dimmed(),
        VERSION.dimmed()
    );
    eprintln!("{}", "Extract clean article text from web pages\n".dimmed());
}

/// Print a styled step message
pub fn print_step(step: usize, total: usize, message: &str) {
    eprintln!("{} {}", format!("[{}/{}]", step, total).dimmed(), message.bright_cyan());
}

/// Print a success message
pub fn print_success(message: &str) {
    eprintln!("{} {}", "✓".green(), message.bright_green());
}

/// Print a warning message
pub fn print_warning(message: &str) {
    eprintln!("{} {}", "⚠".yellow(), message.bright_yellow());
}

/// Print timing information with color coding
pub fn print_timing(label: &str, duration: Duration) {
    let ms = duration.as_secs_f64() * 1000.0;
    let label = format!("{}:", label);

    if ms < 50.0 {
        eprintln!("  {} {:>8.2}ms ({})", label.dimmed(), ms, "fast".dimmed());
    } else if ms < 100.0 {
        eprintln!("  {} {:>8.2}ms ({})", label.dimmed(), ms, "moderate".bright_yellow());
    } else {
        eprintln!("  {} {:>8.2}ms ({})", label.dimmed(), ms, "slow".bright_red());
    }
}

/// Print extraction details summary
pub fn print_article_details(article: &Article, tier: &BodyTier) {
    eprintln!("\n{}", "═".repeat(60).dimmed());
    eprintln!("{}", "Extraction Details".bold().cyan());
    eprintln!("{}", "═".repeat(60).dimmed());

    if article.title.is_empty() {
        print_warning("No title found");
    } else {
        eprintln!("  {} {}", "Title:".dimmed(), article.title.bright_white());
    }
    if !article.author.is_empty() {
        eprintln!("  {} {}", "Author:".dimmed(), article.author.bright_white());
    }
    eprintln!("  {} {}", "Body:".dimmed(), tier.to_string().bright_white());
    eprintln!(
        "  {} {} ({:.1} min)\n",
        "Words:".dimmed(),
        article.word_count().to_string().bright_white(),
        article.reading_time()
    );
}

/// Print timing summary
pub fn print_timing_summary(total: Duration, timings: &[(String, Duration)]) {
    eprintln!("{}", "═".repeat(60).dimmed());
    eprintln!("{}", "Timing Summary".bold().cyan());
    eprintln!("{}", "═".repeat(60).dimmed());

    for (label, duration) in timings {
        print_timing(label, *duration);
    }

    eprintln!(
        "  {} {:>8.2}ms\n",
        format!("{}:", "Total").bold().dimmed(),
        total.as_secs_f64() * 1000.0
    );
}

/// Format file size for display
pub fn format_size(bytes: usize) -> String {
    const KB: usize = 1024;
    const MB: usize = 1024 * KB;

    if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}
