use clap::{CommandFactory, FromArgMatches, Parser, Subcommand};
use classforge::config::Config;
use classforge::loader::load_roster;
use std::path::Path;
use std::process;
use tracing::{error, info, warn, Level};

mod cmd;
mod reports;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(global = true, short, long, default_value = "data/roster.csv")]
    roster: String,

    /// JSON file with phase settings; explicit flags win over it
    #[arg(global = true, short, long)]
    config: Option<String>,

    #[arg(global = true, long, default_value_t = false)]
    debug: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    Optimize(cmd::optimize::OptimizeArgs),
    Stats(cmd::stats::StatsArgs),
}

fn main() {
    let matches = Cli::command().get_matches();
    let cli = Cli::from_arg_matches(&matches).unwrap_or_else(|e| e.exit());

    tracing_subscriber::fmt()
        .with_max_level(if cli.debug { Level::DEBUG } else { Level::INFO })
        .with_target(false)
        .init();

    info!("🚀 Initializing ClassForge...");

    let (cli_config, sub_name) = match &cli.command {
        Commands::Optimize(args) => (&args.config, "optimize"),
        Commands::Stats(args) => (&args.config, "stats"),
    };

    let config = match &cli.config {
        Some(path) => {
            info!("⚖️  Loading settings from: {}", path);
            let mut file_config = Config::load_from_file(path).unwrap_or_else(|e| {
                error!("{}", e);
                process::exit(1);
            });
            if let Some(sub_matches) = matches.subcommand_matches(sub_name) {
                file_config.merge_from_cli(cli_config, sub_matches);
            }
            file_config
        }
        None => cli_config.clone(),
    };

    if !Path::new(&cli.roster).exists() {
        error!("❌ Roster file '{}' not found.", cli.roster);
        process::exit(1);
    }

    let loaded = load_roster(&cli.roster).unwrap_or_else(|e| {
        error!("❌ Failed to load roster: {}", e);
        process::exit(1);
    });
    for warning in &loaded.warnings {
        warn!("⚠️  {}", warning);
    }

    let result = match cli.command {
        Commands::Optimize(args) => cmd::optimize::run(args, config, loaded.roster),
        Commands::Stats(_) => cmd::stats::run(&loaded.roster, &config),
    };

    if let Err(e) = result {
        error!("\n❌ FATAL: {}", e);
        process::exit(1);
    }
}
