//! Disposable-inbox session engine for the 1secmail public mail API.
//!
//! vanishmail generates a throwaway mailbox address, polls the provider's
//! read API through a forwarding relay, merges incoming messages into an
//! in-memory inbox with read/unread flags, and expires the mailbox after a
//! fixed countdown. A host UI drives it through explicit commands
//! (generate, refresh, delete, copy, select, back) and renders from plain
//! snapshots; nothing in here depends on a rendering framework.
//!
//! # Example
//! ```no_run
//! use vanishmail::{Client, SessionController};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), vanishmail::Error> {
//!     let client = Client::new()?;
//!     let mut session = SessionController::new(client);
//!
//!     let address = session.start(None);
//!     println!("Mailbox: {address}");
//!
//!     let merged = session.refresh().await?;
//!     println!("{merged} new message(s)");
//!     for message in session.messages() {
//!         println!("From: {}, Subject: {}", message.from, message.subject);
//!     }
//!     Ok(())
//! }
//! ```

pub mod address;
mod client;
mod error;
mod inbox;
mod models;
mod poller;
pub mod render;
mod session;
mod timer;

pub use client::{Client, ClientBuilder};
pub use error::Error;
pub use inbox::Inbox;
pub use models::{Address, Message, MessageDetails, MessageSummary};
pub use poller::Poller;
pub use session::{Session, SessionController, Status, View};
pub use timer::{ExpiryTimer, TimerState};

/// Result type alias for vanishmail operations.
///
/// This is equivalent to `std::result::Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
