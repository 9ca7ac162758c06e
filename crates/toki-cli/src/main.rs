use clap::{CommandFactory, Parser, Subcommand};

mod commands;
mod logging;
mod terminal;

#[derive(Parser)]
#[command(
    name = "toki",
    version,
    about = "A timer with many features",
    args_conflicts_with_subcommands = true,
    subcommand_negates_reqs = true
)]
struct Cli {
    /// Timer specification, e.g. "25m", "25m, 5m, 25m" or "10 5 2"
    #[arg(required = true)]
    timer: Option<String>,
    /// timer name(s)
    #[arg(short, long)]
    name: Option<String>,
    /// fullscreen
    #[arg(short, long)]
    fullscreen: bool,
    /// Specify start time format, possible values: 24h, kitchen
    #[arg(long)]
    format: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generates man pages
    #[command(hide = true)]
    Man,
    /// Generates shell completions
    #[command(hide = true)]
    Completions {
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn main() {
    let cli = Cli::parse();
    logging::init();

    let result = match cli.command {
        Some(Commands::Man) => commands::man::run(Cli::command()),
        Some(Commands::Completions { shell }) => commands::completions::run(shell, Cli::command()),
        Some(Commands::Config { action }) => commands::config::run(action),
        None => commands::timer::run(commands::timer::TimerArgs {
            spec: cli.timer.unwrap_or_default(),
            name: cli.name,
            fullscreen: cli.fullscreen,
            format: cli.format,
        }),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
