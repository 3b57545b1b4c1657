mod config_cmd;
mod context;
mod design_cmd;
mod export_cmd;
mod generate_cmd;
mod presets_cmd;
mod progress;
mod style_cmd;
mod terminal_output;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};

use layoutforge_config::{load_and_prepare, load_config, process_env};
use layoutforge_core::ProviderKind;
use layoutforge_logging::init_logger;

use context::{config_path, with_provider};
use design_cmd::DesignArgs;
use export_cmd::ExportArgs;
use generate_cmd::GenerateArgs;
use terminal_output::note_error;

#[derive(Parser)]
#[command(name = "layoutforge")]
#[command(about = "LayoutForge: AI-styled layouts for articles, exported as inline-styled HTML")]
#[command(version)]
struct Cli {
    /// Config file (default: <config dir>/layoutforge/config.yaml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Generation backend, overriding the config file
    #[arg(long, global = true)]
    provider: Option<ProviderKind>,

    /// Log level or filter directive, e.g. `debug` or `layoutforge_pipeline=trace`
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a design and rewrite the text as styled markdown
    Generate(GenerateArgs),
    /// Generate design descriptors only
    Design(DesignArgs),
    /// Export styled markdown as a single inline-styled HTML fragment
    Export(ExportArgs),
    /// Translate utility classes to an inline style declaration
    Inline {
        #[arg(required = true)]
        classes: Vec<String>,
    },
    /// Replace class attributes in an HTML file with inline styles
    Rewrite {
        #[arg(short, long)]
        input: PathBuf,
        /// Also strip scripts, event handlers and the document shell
        #[arg(long)]
        sanitize: bool,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Inspect or create the config file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
    /// List built-in style prompts and designs
    Presets,
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective config with secrets masked
    Show,
    /// Write a starter config file
    Init {
        #[arg(long)]
        force: bool,
    },
    /// Check the config and report problems
    Validate,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            note_error(&format!("{e:#}"));
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let path = config_path(cli.config.as_deref());
    let env = process_env();

    // Logging settings come from the raw file so that config warnings emitted
    // while preparing it are already visible.
    let raw = load_config(&path).await?;
    let level = cli
        .log_level
        .as_deref()
        .or(raw.log_level())
        .unwrap_or("info")
        .to_string();
    init_logger(&level, raw.log_dir());

    match cli.command {
        Commands::Inline { classes } => {
            style_cmd::inline(&classes);
            return Ok(());
        }
        Commands::Rewrite { input, sanitize, output } => {
            return style_cmd::rewrite(input, sanitize, output).await;
        }
        Commands::Presets => {
            presets_cmd::run();
            return Ok(());
        }
        Commands::Config { action } => {
            return match action {
                ConfigAction::Show => config_cmd::show(&path, &env).await,
                ConfigAction::Init { force } => config_cmd::init(&path, cli.provider, force).await,
                ConfigAction::Validate => config_cmd::check(&path, &env).await.map(|_| ()),
            };
        }
        _ => {}
    }

    let config = with_provider(load_and_prepare(&path, &env).await?, cli.provider);
    match cli.command {
        Commands::Generate(args) => generate_cmd::run(&config, args).await,
        Commands::Design(args) => design_cmd::run(&config, args).await,
        Commands::Export(args) => export_cmd::run(&config, args).await,
        _ => Ok(()),
    }
}
