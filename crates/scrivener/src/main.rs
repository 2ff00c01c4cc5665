//! Scrivener CLI - Provider-agnostic LLM generation gateway.
//!
//! Scrivener sends prompts and license images to OpenAI or Gemini and turns
//! the answers into names, identity records, job-posting tags and polished
//! articles.
//!
//! # Usage
//!
//! ```bash
//! # Read the name on a license
//! scrivener ocr name https://example.com/license.jpg
//!
//! # Extract identity records for several images, 4 at a time
//! scrivener ocr info --user u1 --platform apen a.jpg b.jpg --parallel 4
//!
//! # Tag a job posting with OpenAI instead of the configured provider
//! scrivener --provider openai article tags --platform nurse posting.txt
//!
//! # View configuration
//! scrivener config show
//! ```

use clap::{Parser, Subcommand};

mod cli;
mod logging;

/// Scrivener - Provider-agnostic LLM generation gateway.
#[derive(Parser, Debug)]
#[command(name = "scrivener")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long, global = true)]
    json_logs: bool,

    /// LLM provider (overrides `[llm] provider`)
    #[arg(long, global = true, value_enum)]
    provider: Option<cli::LlmProvider>,

    /// Model name (provider-specific, overrides the configured model)
    #[arg(long, global = true)]
    model: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Send one raw generation request
    Generate(cli::generate::GenerateArgs),

    /// Read names and identity records from license images
    Ocr(cli::ocr::OcrArgs),

    /// Extract tags from or polish job-posting articles
    Article(cli::article::ArticleArgs),

    /// View and manage configuration
    Config(cli::config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logging isn't initialized yet, so use eprintln for config warnings.
    let config = match scrivener_core::Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!(
                "Warning: Failed to load config: {e}\n  \
                 Using default configuration. Check your config file with `scrivener config path`."
            );
            scrivener_core::Config::default()
        }
    };
    logging::init_from_config(&config, cli.verbose, cli.json_logs);

    tracing::debug!("Scrivener v{}", scrivener_core::VERSION);

    let ctx = cli::Context::new(config, cli.provider, cli.model);

    match cli.command {
        Commands::Generate(args) => cli::generate::execute(&ctx, args).await,
        Commands::Ocr(args) => cli::ocr::execute(&ctx, args).await,
        Commands::Article(args) => cli::article::execute(&ctx, args).await,
        Commands::Config(args) => cli::config::execute(args).await,
    }
}
