//! Watch a disposable inbox until it expires.
//!
//! Features demonstrated:
//! - Creating a client and a session controller
//! - Generating a random mailbox address
//! - The recurring poll schedule and the expiry countdown
//! - Rendering messages from plain snapshots

use std::io::Write;
use std::time::Duration;
use vanishmail::{render, Client, SessionController};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter("vanishmail=debug,watch=info")
        .init();

    let client = Client::new()?;
    let mut session = SessionController::new(client);
    let address = session.start(None);

    println!("📬 Disposable mailbox ready: {address}");
    println!("   Send something to it; it expires in {} seconds.\n", session.remaining());

    let mut seen = 0;
    while !session.is_expired() {
        let messages = session.messages();
        if messages.len() > seen {
            // newest first, so the fresh arrivals sit at the front
            for message in messages.iter().take(messages.len() - seen) {
                let view = render::message_view(message);
                println!("\n{}", "-".repeat(50));
                println!("From:     {}", view.from);
                println!("Subject:  {}", view.subject);
                println!("Received: {}", view.received_at);
                println!();
                for line in view.body.lines().take(20) {
                    println!("   {line}");
                }
            }
            seen = messages.len();
        }

        let countdown = session.countdown_text().unwrap_or_default();
        print!(
            "\r[{countdown}] {} ({} unread)   ",
            render::status_line(&session.status()),
            session.unread_count()
        );
        std::io::stdout().flush().ok();

        tokio::time::sleep(Duration::from_secs(1)).await;
    }

    println!("\n\n{}", render::status_line(&session.status()));
    Ok(())
}
