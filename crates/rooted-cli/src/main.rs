use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

mod commands;

#[derive(Parser)]
#[command(name = "rooted-cli", version, about = "Rooted: burnout check-ins and guided breathing")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Burnout and stress assessment
    Assess {
        #[command(subcommand)]
        action: commands::assess::AssessAction,
    },
    /// Guided breathing
    Breathe {
        #[command(subcommand)]
        action: commands::breathe::BreatheAction,
    },
    /// Account, avatar and mentor
    Profile {
        #[command(subcommand)]
        action: commands::profile::ProfileAction,
    },
    /// Home screen summary
    Dashboard {
        #[arg(long)]
        json: bool,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// AI wellness assistant
    Ai {
        #[command(subcommand)]
        action: commands::ai::AiAction,
    },
    /// Print shell completions
    Completions { shell: Shell },
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rooted_core=info,rooted_cli=info".into()),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    init_tracing();
    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Assess { action } => commands::assess::run(action),
        Commands::Breathe { action } => commands::breathe::run(action),
        Commands::Profile { action } => commands::profile::run(action),
        Commands::Dashboard { json } => commands::dashboard::run(json),
        Commands::Config { action } => commands::config::run(action),
        Commands::Ai { action } => commands::ai::run(action),
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "rooted-cli", &mut std::io::stdout());
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }
}
