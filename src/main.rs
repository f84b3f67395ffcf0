//! MUJ assistant - terminal chat
//!
//! Renders one chat session on the terminal. Logs go to stderr as JSON so
//! they never interleave with the conversation.

use muj_assistant::catalog::ResponseCatalog;
use muj_assistant::config::AssistantConfig;
use muj_assistant::message::{Message, Sender};
use muj_assistant::runtime::{FixedDelay, SessionHandle, SessionUpdate};
use muj_assistant::session::SessionError;
use muj_assistant::state_machine::{Confirmation, ConvContext, DialogState};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "muj_assistant=warn".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false)
                .with_writer(std::io::stderr),
        )
        .init();

    // Configuration
    let config = AssistantConfig::from_env();
    let catalog = Arc::new(config.load_catalog()?);
    tracing::info!(
        preset = %config.preset,
        path = ?config.catalog_path,
        reply_delay_ms = u64::try_from(config.reply_delay.as_millis()).unwrap_or(u64::MAX),
        "Catalog loaded"
    );

    println!("Welcome to");
    println!("Manipal University Jaipur Bot");
    tokio::time::sleep(config.welcome_duration).await;
    println!();

    let context = ConvContext::with_random_id(catalog.clone());
    let handle = SessionHandle::spawn(context, FixedDelay::new(config.reply_delay));
    let printer = tokio::spawn(render_updates(handle.subscribe()));

    for message in handle.history().await? {
        print_message(&message);
    }
    print_help(&catalog);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let input = line.trim();
        let result = match input {
            "/quit" => break,
            "/help" => {
                print_help(&catalog);
                continue;
            }
            "/reset" => handle.reset().await,
            "/yes" => handle.confirm(Confirmation::Yes).await,
            "/no" => handle.confirm(Confirmation::No).await,
            _ => match quick_action_trigger(&catalog, input) {
                Some(trigger) => handle.submit_quick_action(trigger).await,
                None => handle.submit_free_text(input).await,
            },
        };

        match result {
            // Rejections are rendered from the update stream
            Ok(()) | Err(SessionError::InvalidInput | SessionError::Rejected(_)) => {}
            Err(e) => {
                tracing::error!(error = %e, "Session stopped");
                break;
            }
        }
    }

    drop(handle);
    let _ = printer.await;
    Ok(())
}

/// Resolve `/N` to the Nth quick action's trigger
fn quick_action_trigger<'a>(catalog: &'a ResponseCatalog, input: &str) -> Option<&'a str> {
    let index: usize = input.strip_prefix('/')?.parse().ok()?;
    catalog
        .quick_actions()
        .get(index.checked_sub(1)?)
        .map(|action| action.trigger.as_str())
}

async fn render_updates(mut updates: broadcast::Receiver<SessionUpdate>) {
    loop {
        match updates.recv().await {
            Ok(SessionUpdate::MessageAdded { message }) => print_message(&message),
            Ok(SessionUpdate::Pending { active: true }) => println!("  MUJ Bot is typing..."),
            Ok(SessionUpdate::Pending { active: false }) => {}
            Ok(SessionUpdate::StateChange { dialog }) => {
                if let DialogState::AwaitingConfirmation { .. } = dialog {
                    println!("  (/yes or /no)");
                }
            }
            Ok(SessionUpdate::Reset) => println!("--- chat cleared ---"),
            Ok(SessionUpdate::Rejected { message }) => println!("  ! {message}"),
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "Renderer fell behind");
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}

fn print_message(message: &Message) {
    let who = match message.sender {
        Sender::User => "You",
        Sender::Bot => "MUJ Bot",
    };
    println!("{who}: {}", message.text);
}

fn print_help(catalog: &ResponseCatalog) {
    println!("Quick actions:");
    for (i, action) in catalog.quick_actions().iter().enumerate() {
        println!("  /{} {}", i + 1, action.label);
    }
    println!("Commands: /yes /no /reset /help /quit");
    println!("Anything else is sent as a question.");
    println!();
}
