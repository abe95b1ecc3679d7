use std::path::PathBuf;

use assetsgen_cli::{CommandError, Config, Options, Settings, commands};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use tracing::info;
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(
    name = "assetsgen",
    author,
    version,
    about = "Generate and parse iOS/Android assets: strings, translations and images"
)]
struct Args {
    #[command(subcommand)]
    commands: Commands,
}

/// Supported subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate .strings/strings.xml files (and Swift accessors) from JSON sources.
    GenStrings {
        #[command(flatten)]
        options: Options,
    },

    /// Generate one XLIFF translation request per target language.
    GenTrans {
        #[command(flatten)]
        options: Options,
    },

    /// Apply translated XLIFF files back onto the JSON sources.
    ParseTrans {
        #[command(flatten)]
        options: Options,
    },

    /// Build a seed JSON source out of per-language Android XML files.
    GenSeed {
        #[command(flatten)]
        options: Options,
    },

    /// Reconcile Android XML strings with the project JSON source.
    ParseXml {
        #[command(flatten)]
        options: Options,
    },

    /// Report duplicated keys and values of JSON sources.
    AnalyzeStrings {
        #[command(flatten)]
        options: Options,
    },

    /// Generate .xcassets catalogs (and Swift accessors) from an assets manifest.
    GenImages {
        #[command(flatten)]
        options: Options,
    },

    /// Print shell completions.
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

type CommandFn = fn(&Settings) -> Result<Vec<PathBuf>, CommandError>;

fn run_command(name: &str, options: &Options, command: CommandFn) -> Result<(), CommandError> {
    let config = Config::load(options.config.as_deref())?;
    let settings = options.resolve(&config)?;
    commands::clean_output(&settings)?;

    info!("▶ Starting command: {}", name);
    let written = command(&settings)?;
    info!(files = written.len(), "✔ Finished command: {}", name);
    Ok(())
}

fn init_tracing() {
    let console_layer = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")));

    tracing_subscriber::registry().with(console_layer).init();
}

fn main() {
    let args = Args::parse();

    let result = match &args.commands {
        Commands::Completions { shell } => {
            clap_complete::generate(*shell, &mut Args::command(), "assetsgen", &mut std::io::stdout());
            Ok(())
        }
        command => {
            init_tracing();
            match command {
                Commands::GenStrings { options } => {
                    run_command("gen-strings", options, commands::gen_strings)
                }
                Commands::GenTrans { options } => run_command("gen-trans", options, commands::gen_trans),
                Commands::ParseTrans { options } => {
                    run_command("parse-trans", options, commands::parse_trans)
                }
                Commands::GenSeed { options } => run_command("gen-seed", options, commands::gen_seed),
                Commands::ParseXml { options } => run_command("parse-xml", options, commands::parse_xml),
                Commands::AnalyzeStrings { options } => {
                    run_command("analyze-strings", options, commands::analyze_strings)
                }
                Commands::GenImages { options } => {
                    run_command("gen-images", options, commands::gen_images)
                }
                Commands::Completions { .. } => Ok(()),
            }
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
