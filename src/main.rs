//! flowfix CLI entry point.
//!
//! Drives the scheduling tools directly from the command line, against the
//! real Google Calendar adapter. Useful for smoke-testing a deployment
//! without the conversational front end.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use flowfix::{AssistantTools, BusinessConfig, GoogleCalendar};

/// Booking assistant core for FlowFix Plumbers.
#[derive(Parser)]
#[command(name = "flowfix")]
#[command(about = "Availability, booking, and emergency checks over the business calendar.")]
#[command(version)]
struct Cli {
    /// Config file path
    #[arg(short, long, default_value = "config.json")]
    config: PathBuf,

    /// OAuth bearer token for the calendar provider
    #[arg(long, env = "FLOWFIX_CALENDAR_TOKEN", hide_env_values = true)]
    calendar_token: Option<String>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List open appointment slots on a date
    Slots {
        /// Date in YYYY-MM-DD form
        date: String,
    },

    /// Book an appointment
    Book {
        /// Date in YYYY-MM-DD form
        #[arg(long)]
        date: String,

        /// Start time, 'HH:MM AM/PM' or 24-hour 'HH:MM'
        #[arg(long)]
        time: String,

        /// Description of the service needed
        #[arg(long)]
        service: String,

        /// Customer's full name
        #[arg(long)]
        name: String,

        /// Customer's phone number
        #[arg(long)]
        phone: String,
    },

    /// Check emergency call-out availability for a postcode
    Emergency {
        /// Customer postcode
        postcode: String,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show the effective config
    Show,

    /// Validate the config file
    Validate,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_level.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = BusinessConfig::load(&cli.config)?;

    match cli.command {
        Commands::Config { action } => match action {
            ConfigCommands::Show => {
                println!("{}", serde_json::to_string_pretty(&config)?);
            }
            ConfigCommands::Validate => {
                config.validate()?;
                println!("Config OK: {}", cli.config.display());
            }
        },

        command => {
            let token = cli.calendar_token.ok_or_else(|| {
                anyhow::anyhow!(
                    "calendar token required; pass --calendar-token or set FLOWFIX_CALENDAR_TOKEN"
                )
            })?;
            let calendar = Arc::new(GoogleCalendar::new(&token));
            let tools = AssistantTools::new(&config, calendar);

            let reply = match command {
                Commands::Slots { date } => {
                    tools.find_available_appointment_slots(&date).await
                }
                Commands::Book {
                    date,
                    time,
                    service,
                    name,
                    phone,
                } => {
                    tools
                        .book_appointment(&date, &time, &service, &name, &phone)
                        .await
                }
                Commands::Emergency { postcode } => {
                    tools.check_emergency_availability(&postcode).await
                }
                Commands::Config { .. } => unreachable!("handled above"),
            };
            println!("{reply}");
        }
    }

    Ok(())
}
