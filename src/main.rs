use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;

use meetsynth::app::{EditRequest, GenerateRequest, SendRequest, TestEmailRequest};
use meetsynth::{App, AppError, Config};

#[derive(Parser)]
#[command(name = "meetsynth", version, about = "Summarize text with an LLM and email the result")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate and store a summary
    Generate {
        /// Text to summarize
        #[arg(long, conflicts_with = "file", required_unless_present = "file")]
        text: Option<String>,
        /// Read the text from a file instead
        #[arg(long)]
        file: Option<PathBuf>,
        /// Instructions for the summary; leave empty to auto-detect
        #[arg(long, default_value = "")]
        prompt: String,
    },
    /// List stored summaries, newest first
    List,
    /// Show one summary
    Show { id: i64 },
    /// Replace the text of a summary with an edited version
    Edit {
        id: i64,
        #[arg(long)]
        text: String,
    },
    /// Delete a summary
    Delete { id: i64 },
    /// Email a summary to one or more recipients
    Send {
        id: i64,
        #[arg(long = "to", required = true, num_args = 1..)]
        recipients: Vec<String>,
        #[arg(long)]
        subject: Option<String>,
        #[arg(long)]
        message: Option<String>,
    },
    /// Show the delivery history of a summary
    Logs { id: i64 },
    /// Send a test email to check mail settings
    TestEmail { address: String },
    /// Report which services are configured
    Health,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Only warnings and errors unless RUST_LOG says otherwise
    meetsynth::tracing_init::init();

    let cli = Cli::parse();

    let config = Config::load().context("failed to load configuration")?;
    let app = App::new(&config)
        .await
        .with_context(|| format!("failed to open database at {}", config.db_path))?;

    if let Err(e) = run(&app, cli.command).await {
        let report = e.report();
        eprintln!("{}", serde_json::to_string_pretty(&report)?);
        std::process::exit(report.kind.exit_code());
    }

    Ok(())
}

async fn run(app: &App, command: Command) -> Result<(), AppError> {
    match command {
        Command::Generate { text, file, prompt } => {
            let text = match file {
                Some(path) => std::fs::read_to_string(path)?,
                None => text.unwrap_or_default(),
            };
            let summary = app
                .generate(GenerateRequest {
                    text: Some(text),
                    custom_prompt: Some(prompt),
                })
                .await?;
            print_json(&summary)
        }
        Command::List => print_json(&app.list_summaries().await?),
        Command::Show { id } => print_json(&app.get_summary(id).await?),
        Command::Edit { id, text } => {
            let result = app
                .edit_summary(
                    id,
                    EditRequest {
                        edited_summary: Some(text),
                    },
                )
                .await?;
            print_json(&result)
        }
        Command::Delete { id } => {
            app.delete_summary(id).await?;
            println!("Deleted summary {}", id);
            Ok(())
        }
        Command::Send {
            id,
            recipients,
            subject,
            message,
        } => {
            let report = app
                .send_email(SendRequest {
                    summary_id: Some(id),
                    recipient_emails: Some(recipients),
                    subject,
                    message,
                })
                .await?;
            print_json(&report)
        }
        Command::Logs { id } => print_json(&app.delivery_logs(id).await?),
        Command::TestEmail { address } => {
            let result = app
                .send_test_email(TestEmailRequest {
                    test_email: Some(address),
                })
                .await?;
            print_json(&result)
        }
        Command::Health => print_json(&app.health().await?),
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<(), AppError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
