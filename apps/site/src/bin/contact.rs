use std::sync::Arc;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use tracing::warn;

use site::api_client::ApiClient;
use site::config::Config;
use site::contact::ContactService;
use site::models::contact::ContactForm;
use site::submission::{SubmissionController, SubmissionState, SubmitResult};

/// Send and list contact form messages against the site's backend.
#[derive(Parser, Debug)]
struct Cli {
    /// Overrides API_BASE_URL.
    #[arg(long)]
    api_base_url: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    Send {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        subject: String,
        #[arg(long)]
        message: String,
        /// Honeypot. Humans leave it empty.
        #[arg(long, default_value = "")]
        website: String,
    },
    List,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::from_env()?;
    site::logging::init(env!("CARGO_CRATE_NAME"), &config.rust_log);

    let base_url = cli.api_base_url.unwrap_or(config.api_base_url);
    let service = ContactService::new(ApiClient::with_reqwest(base_url));

    match cli.command {
        Command::Send {
            name,
            email,
            subject,
            message,
            website,
        } => {
            if !website.is_empty() {
                // bots fill the honeypot; drop silently
                warn!("Honeypot field filled, not sending");
                return Ok(());
            }
            let form = ContactForm {
                name,
                email,
                subject,
                message,
                website,
            };
            send(service, form).await?;
        }
        Command::List => {
            let messages = service.get_messages().await?;
            for stored in &messages {
                let m = &stored.message;
                println!(
                    "{:?}  {}  {} <{}>  {}",
                    stored.id,
                    m.created_at.to_rfc3339(),
                    m.name,
                    m.email,
                    m.subject
                );
            }
            println!("{} message(s)", messages.len());
        }
    }

    Ok(())
}

async fn send(service: ContactService, form: ContactForm) -> Result<()> {
    let controller = SubmissionController::new(Arc::new(service));
    let mut updates = controller.subscribe();
    let renderer = tokio::spawn(async move {
        while updates.changed().await.is_ok() {
            let state = updates.borrow_and_update().clone();
            render(&state);
        }
    });

    let result = controller.submit(form).await;
    drop(controller);
    renderer.await?;

    match result {
        SubmitResult::Sent(_) => Ok(()),
        SubmitResult::Failed(message) => bail!("{message}"),
    }
}

fn render(state: &SubmissionState) {
    if state.is_pending() {
        println!("Sending...");
    } else if let Some(error) = state.error() {
        println!("Error: {error}");
    } else if state.is_success() {
        println!("Message sent successfully!");
    }
}
