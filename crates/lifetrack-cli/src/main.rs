use clap::{CommandFactory, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "lifetrack", version, about = "Lifetrack task timeline CLI")]
struct Cli {
    #[command(flatten)]
    global: commands::GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Status and remaining time of every task
    Status,
    /// Quadrant board for a classification mode
    Quadrant(commands::quadrant::QuadrantArgs),
    /// Day timeline layout
    Timeline(commands::timeline::TimelineArgs),
    /// Busy slots and scheduling conflicts
    Busy(commands::busy::BusyArgs),
    /// Re-run the status pass on every clock tick
    Watch(commands::watch::WatchArgs),
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Print a shell completion script
    Completions {
        shell: clap_complete::Shell,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("LIFETRACK_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_tracing();

    let cli = Cli::parse();
    let ctx = commands::Context::new(cli.global);
    let result = match cli.command {
        Commands::Status => commands::status::run(&ctx),
        Commands::Quadrant(args) => commands::quadrant::run(args, &ctx),
        Commands::Timeline(args) => commands::timeline::run(args, &ctx),
        Commands::Busy(args) => commands::busy::run(args, &ctx),
        Commands::Watch(args) => commands::watch::run(args, &ctx),
        Commands::Config { action } => commands::config::run(action),
        Commands::Completions { shell } => commands::completions::run(shell, Cli::command()),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
