//! Rolodex CLI
//!
//! Command-line interface for the Rolodex directory search.
//! Provides both one-shot and interactive search modes.

use clap::{Parser, Subcommand};
use console::style;
use indicatif::ProgressBar;
use rolodex::{AppConfig, HttpDirectory, UserSource};
use std::path::PathBuf;
use std::time::{Duration, Instant};

/// Rolodex - Interactive user directory search
///
/// Debounces keystrokes into directory lookups and renders matches
/// (name and photo thumbnail) in a dropdown list.
#[derive(Parser)]
#[command(name = "rolodex")]
#[command(author = "Rolodex Contributors")]
#[command(version)]
#[command(about = "Interactive user directory search", long_about = None)]
struct Cli {
    /// Directory endpoint base URL
    #[arg(long, global = true)]
    endpoint: Option<String>,

    /// Debounce window in milliseconds
    #[arg(long, global = true)]
    debounce_ms: Option<u64>,

    /// HTTP request timeout in seconds
    #[arg(long, global = true)]
    timeout_secs: Option<u64>,

    /// Log file path (default: rolodex.log next to the executable)
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Search the directory once and print the matches
    Search {
        /// Name fragment to look up (use -- before it if it starts with -)
        #[arg(allow_hyphen_values = true)]
        query: String,

        /// Maximum results
        #[arg(short, long, default_value = "25")]
        max: usize,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        output: String,
    },

    /// Launch the interactive search (the default when no command is given)
    Tui,
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = rolodex::logging::init(cli.log_file.clone()) {
        eprintln!("{} {}", style("Warning:").yellow().bold(), e);
    }
    log::info!("Rolodex {} starting up", rolodex::VERSION);

    let mut config = AppConfig::default();
    if let Some(endpoint) = cli.endpoint {
        config.endpoint = endpoint;
    }
    if let Some(ms) = cli.debounce_ms {
        config.debounce = Duration::from_millis(ms);
    }
    if let Some(secs) = cli.timeout_secs {
        config.request_timeout = Duration::from_secs(secs);
    }

    let result = match cli.command {
        Some(Commands::Search { query, max, output }) => {
            cmd_search(&config, &query, max, &output)
        }
        Some(Commands::Tui) | None => rolodex::tui::run(&config),
    };

    if let Err(e) = result {
        eprintln!("{} {}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }
}

/// One-shot search command implementation
fn cmd_search(config: &AppConfig, query: &str, max: usize, output_format: &str) -> rolodex::Result<()> {
    let mut config = config.clone();
    config.max_results = max;

    let directory = HttpDirectory::from_config(&config)?;

    let spinner = ProgressBar::new_spinner();
    spinner.set_message(format!("Searching for '{}'...", query));
    spinner.enable_steady_tick(Duration::from_millis(80));

    let start = Instant::now();
    let users = directory.search(query)?;
    let elapsed = start.elapsed();

    spinner.finish_and_clear();

    if output_format == "json" {
        println!("{}", serde_json::to_string_pretty(&users).map_err(rolodex::RolodexError::from)?);
        return Ok(());
    }

    if users.is_empty() {
        println!(
            "{} No matches for '{}'",
            style("∅").yellow().bold(),
            style(query).yellow()
        );
        return Ok(());
    }

    println!(
        "{} {} match(es) for '{}' in {} ms",
        style("✓").green().bold(),
        users.len(),
        style(query).yellow(),
        elapsed.as_millis()
    );
    println!();

    for user in &users {
        println!(
            "  {} {}",
            style(&user.name).white().bold(),
            style(format!("@{}", user.username)).dim()
        );
        if let Some(contact) = user.contact() {
            println!("      {}", style(contact).dim());
        }
        if let Some(thumbnail) = user.thumbnail() {
            println!("      {}", style(thumbnail).cyan());
        }
    }

    Ok(())
}
