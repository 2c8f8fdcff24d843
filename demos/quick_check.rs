//! One-shot inbox check for a known local part.

use vanishmail::{address, Client};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().init();

    let login = std::env::args().nth(1).unwrap_or_else(|| "demo".to_string());
    let address = address::with_local_part(&login);
    println!("🔍 Checking {address}...");

    let client = Client::new()?;
    let summaries = client.list_messages(&address).await?;
    println!("   {} message(s) in the mailbox", summaries.len());

    for summary in &summaries {
        println!("\n#{} From: {}", summary.id, summary.from);
        println!("   Subject: {}", summary.subject);
        println!("   Date:    {}", summary.date);

        match client.fetch_message(&address, summary.id).await {
            Ok(details) => {
                let body = details.text_body.unwrap_or_default();
                let preview: String = body.chars().take(200).collect();
                for line in preview.lines().take(5) {
                    println!("   {line}");
                }
            }
            Err(e) => eprintln!("   ❌ Failed to fetch: {e}"),
        }
    }
    Ok(())
}
