//! Moodlog CLI - a daily mood and sleep journal in your terminal

use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod output;

use commands::{history, login, logs, onboarding, profile, record, register};

/// Moodlog - record how you feel and how you slept, once a day
#[derive(Parser)]
#[command(name = "mood", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new account
    Register {
        /// Email address
        email: String,
        /// Password (prompted when omitted)
        #[arg(long, env = "MOODLOG_PASSWORD", hide_env_values = true)]
        password: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Log in and save the session
    Login {
        /// Email address
        email: String,
        /// Password (prompted when omitted)
        #[arg(long, env = "MOODLOG_PASSWORD", hide_env_values = true)]
        password: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Forget the saved session
    Logout {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Finish or skip first-run profile setup
    Onboarding {
        #[command(subcommand)]
        command: onboarding::OnboardingCommands,
    },

    /// Record today's mood and sleep
    Record {
        /// Overall mood
        #[arg(long)]
        mood: String,
        /// How you are feeling
        #[arg(long)]
        feeling: String,
        /// Hours slept last night
        #[arg(long)]
        sleep_hours: String,
        /// Optional free-form notes
        #[arg(long)]
        notes: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the most recent entries, oldest first
    History {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check whether today's entry has been recorded
    Today {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// View or edit your profile
    Profile {
        #[command(subcommand)]
        command: profile::ProfileCommands,
    },

    /// View and manage diagnostic logs
    Logs {
        #[command(subcommand)]
        command: logs::LogsCommands,
    },
}

impl Commands {
    fn name(&self) -> &'static str {
        match self {
            Commands::Register { .. } => "register",
            Commands::Login { .. } => "login",
            Commands::Logout { .. } => "logout",
            Commands::Onboarding { .. } => "onboarding",
            Commands::Record { .. } => "record",
            Commands::History { .. } => "history",
            Commands::Today { .. } => "today",
            Commands::Profile { .. } => "profile",
            Commands::Logs { .. } => "logs",
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("MOODLOG_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();
    let command_name = cli.command.name();

    // Event logging never blocks a command
    let logger = commands::get_logger();
    if let Some(l) = &logger {
        let _ = l.log_command(command_name);
    }

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if let Some(l) = &logger {
                let _ = l.log_error("command_failed", &e.to_string(), Some(command_name));
            }
            output::error(&e.to_string());
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Register { email, password, json } => register::run(email, password, json),
        Commands::Login { email, password, json } => login::run(email, password, json),
        Commands::Logout { json } => login::run_logout(json),
        Commands::Onboarding { command } => onboarding::run(command),
        Commands::Record {
            mood,
            feeling,
            sleep_hours,
            notes,
            json,
        } => record::run(mood, feeling, sleep_hours, notes, json),
        Commands::History { json } => history::run(json),
        Commands::Today { json } => history::run_today(json),
        Commands::Profile { command } => profile::run(command),
        Commands::Logs { command } => logs::run(command),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use std::path::PathBuf;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_record_flags() {
        let cli = Cli::try_parse_from([
            "mood",
            "record",
            "--mood",
            "calm",
            "--feeling",
            "rested",
            "--sleep-hours",
            "7.5",
        ])
        .unwrap();
        match cli.command {
            Commands::Record {
                mood,
                sleep_hours,
                notes,
                ..
            } => {
                assert_eq!(mood, "calm");
                assert_eq!(sleep_hours, "7.5");
                assert!(notes.is_none());
            }
            _ => panic!("expected record"),
        }
    }

    #[test]
    fn profile_image_file_is_optional() {
        let cli = Cli::try_parse_from(["mood", "profile", "image"]).unwrap();
        assert_eq!(cli.command.name(), "profile");
    }

    #[test]
    fn profile_image_accepts_path() {
        let cli = Cli::try_parse_from(["mood", "profile", "image", "me.png"]).unwrap();
        match cli.command {
            Commands::Profile {
                command: profile::ProfileCommands::Image { file, .. },
            } => assert_eq!(file, Some(PathBuf::from("me.png"))),
            _ => panic!("expected profile image"),
        }
    }
}
