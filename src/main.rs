use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tokio::runtime::Runtime;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use docsmith::cli::commands::generate::{GenerateKind, GenerateOptions};

/// Parse generation kind from string
fn parse_generate_kind(s: &str) -> Result<GenerateKind, String> {
    match s.to_lowercase().as_str() {
        "documentation" | "docs" => Ok(GenerateKind::Documentation),
        "instructions" => Ok(GenerateKind::Instructions),
        "faqs" => Ok(GenerateKind::Faqs),
        "all" => Ok(GenerateKind::All),
        _ => Err(format!(
            "Invalid kind '{}'. Valid values: documentation, instructions, faqs, all",
            s
        )),
    }
}

#[derive(Parser)]
#[command(name = "docsmith")]
#[command(
    version,
    about = "Batch AI documentation generator for Angular codebases"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(long)]
    verbose: bool,

    #[arg(long, short)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate documentation artifacts from a source tree
    Generate {
        /// Root of the source tree to process
        path: PathBuf,
        #[arg(
            long,
            short,
            value_parser = parse_generate_kind,
            default_value = "documentation",
            help = "Artifact kind: documentation, instructions, faqs, all"
        )]
        kind: GenerateKind,
        #[arg(long, short, default_value = ".", help = "Directory for output archives")]
        output: PathBuf,
        #[arg(long, help = "Directory with category templates")]
        templates: Option<PathBuf>,
        #[arg(long, help = "Model to use")]
        model: Option<String>,
        #[arg(long, help = "API base URL for the generation service")]
        api_base: Option<String>,
    },

    /// Classify declarations without calling the generation API
    Classify {
        /// Root of the source tree to classify
        path: PathBuf,
        #[arg(
            short = 'f',
            long,
            default_value = "text",
            help = "Output format: text, json"
        )]
        format: String,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show current configuration
    Show {
        #[arg(
            short = 'f',
            long,
            default_value = "toml",
            help = "Output format: toml, json"
        )]
        format: String,
    },
    /// Show configuration file path
    Path,
    /// Initialize project configuration
    Init {
        #[arg(long, help = "Overwrite existing config")]
        force: bool,
    },
}

fn main() -> ExitCode {
    match run_cli() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("\x1b[31mError:\x1b[0m {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run_cli() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    match cli.command {
        Commands::Generate {
            path,
            kind,
            output,
            templates,
            model,
            api_base,
        } => {
            let rt = Runtime::new()?;
            rt.block_on(docsmith::cli::commands::generate::run(GenerateOptions {
                path,
                kind,
                output_dir: output,
                templates_dir: templates,
                model,
                api_base,
            }))?;
        }
        Commands::Classify { path, format } => {
            docsmith::cli::commands::classify::run(&path, &format)?;
        }
        Commands::Config { action } => match action {
            ConfigAction::Show { format } => {
                docsmith::cli::commands::config::show(&format)?;
            }
            ConfigAction::Path => {
                docsmith::cli::commands::config::path()?;
            }
            ConfigAction::Init { force } => {
                docsmith::cli::commands::config::init(force)?;
            }
        },
    }

    Ok(())
}
