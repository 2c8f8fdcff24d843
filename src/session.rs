//! Session lifecycle: one active address, its background tasks, and the
//! command handlers a host UI drives.

use crate::timer::{ExpiryTimer, TimerState};
use crate::{address, Address, Client, Inbox, Message, Poller, Result};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::task::{AbortHandle, JoinHandle};
use tracing::{debug, warn};

/// What the session is currently doing, for the host's status strip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// Polling quietly; nothing new on the last completed cycle.
    Listening,
    /// The last completed cycle merged this many messages.
    NewMail(usize),
    /// The countdown ran out; polling has stopped.
    Expired,
}

/// Which screen the host should show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// The message list.
    Inbox,
    /// A single message, by id.
    Reading(u64),
}

/// One live mailbox: the address, the shared state, and the two recurring
/// tasks that keep it fresh.
///
/// Dropping a session aborts its poll and countdown tasks, so a replaced
/// session can never keep fetching against a stale address.
pub struct Session {
    address: Address,
    inbox: Arc<Mutex<Inbox>>,
    timer: Arc<Mutex<ExpiryTimer>>,
    status: Arc<Mutex<Status>>,
    view: View,
    poll_task: JoinHandle<()>,
    countdown_task: JoinHandle<()>,
}

impl Drop for Session {
    fn drop(&mut self) {
        self.poll_task.abort();
        self.countdown_task.abort();
    }
}

/// Drives disposable-mailbox sessions: generation, polling, expiry, and the
/// user-facing commands.
///
/// At most one session is active per controller. Starting a new one drops
/// the previous session, which cancels its recurring work before anything
/// new spawns.
pub struct SessionController {
    poller: Poller,
    poll_interval: Duration,
    ttl_secs: u32,
    session: Option<Session>,
}

impl SessionController {
    /// Cadence of the recurring poll task.
    pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

    /// A controller with the default cadence (5 s) and lifetime (600 s).
    pub fn new(client: Client) -> Self {
        Self {
            poller: Poller::new(client),
            poll_interval: Self::DEFAULT_POLL_INTERVAL,
            ttl_secs: ExpiryTimer::DEFAULT_TTL_SECS,
            session: None,
        }
    }

    /// Override the poll cadence.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Override the session lifetime.
    pub fn with_ttl(mut self, secs: u32) -> Self {
        self.ttl_secs = secs;
        self
    }

    /// Start a fresh session, replacing (and cancelling) any previous one.
    ///
    /// A non-empty custom local part is used verbatim; otherwise the address
    /// is random. The inbox starts empty, the first poll cycle runs
    /// immediately, and the countdown starts from the configured lifetime.
    ///
    /// # Panics
    /// Panics when called outside a Tokio runtime; the recurring tasks are
    /// spawned onto it.
    pub fn start(&mut self, custom_local: Option<&str>) -> Address {
        // the old tasks must be gone before the new address starts polling
        self.session = None;

        let address = match custom_local.map(str::trim) {
            Some(login) if !login.is_empty() => address::with_local_part(login),
            _ => address::generate(),
        };
        let inbox = Arc::new(Mutex::new(Inbox::new()));
        let timer = Arc::new(Mutex::new(ExpiryTimer::new(self.ttl_secs)));
        let status = Arc::new(Mutex::new(Status::Listening));

        let poll_task = tokio::spawn(poll_loop(
            self.poller.clone(),
            address.clone(),
            Arc::clone(&inbox),
            Arc::clone(&status),
            self.poll_interval,
        ));
        let countdown_task = tokio::spawn(countdown_loop(
            Arc::clone(&timer),
            Arc::clone(&status),
            poll_task.abort_handle(),
        ));

        debug!(address = %address, ttl_secs = self.ttl_secs, "session started");
        self.session = Some(Session {
            address: address.clone(),
            inbox,
            timer,
            status,
            view: View::Inbox,
            poll_task,
            countdown_task,
        });
        address
    }

    /// One immediate poll cycle, outside the schedule.
    ///
    /// Neither the schedule nor the countdown is touched. `Ok(0)` when
    /// nothing new arrived (or no session is active); a transient failure is
    /// returned to the caller and the next scheduled cycle retries anyway.
    ///
    /// # Errors
    /// Propagates the listing failure of this one cycle.
    pub async fn refresh(&self) -> Result<usize> {
        let Some(session) = &self.session else {
            return Ok(0);
        };
        self.poller.tick(&session.address, &session.inbox).await
    }

    /// Empty the inbox for the current address. Nothing else changes.
    pub fn clear_inbox(&self) {
        if let Some(session) = &self.session {
            lock(&session.inbox).clear();
        }
    }

    /// The current address as `local@domain`, ready for the host clipboard.
    pub fn address_text(&self) -> Option<String> {
        self.session.as_ref().map(|s| s.address.to_string())
    }

    /// The current address.
    pub fn address(&self) -> Option<&Address> {
        self.session.as_ref().map(|s| &s.address)
    }

    /// Open one message: flips it to read, switches to the reading view,
    /// and returns a snapshot for rendering. `None` when the id is absent.
    pub fn select_message(&mut self, id: u64) -> Option<Message> {
        let session = self.session.as_mut()?;
        let snapshot = {
            let mut inbox = lock(&session.inbox);
            if !inbox.mark_read(id) {
                return None;
            }
            inbox.get(id).cloned()
        };
        session.view = View::Reading(id);
        snapshot
    }

    /// Back to the message list. Pure display-state change.
    pub fn back_to_inbox(&mut self) {
        if let Some(session) = self.session.as_mut() {
            session.view = View::Inbox;
        }
    }

    /// Which screen the host should show, while a session is active.
    pub fn view(&self) -> Option<View> {
        self.session.as_ref().map(|s| s.view)
    }

    /// Snapshot of the messages, newest first.
    pub fn messages(&self) -> Vec<Message> {
        match &self.session {
            Some(session) => lock(&session.inbox).messages().to_vec(),
            None => Vec::new(),
        }
    }

    /// Count of messages not yet opened.
    pub fn unread_count(&self) -> usize {
        self.session
            .as_ref()
            .map_or(0, |s| lock(&s.inbox).unread_count())
    }

    /// The session status for the host's status strip.
    pub fn status(&self) -> Status {
        self.session
            .as_ref()
            .map_or(Status::Listening, |s| *lock(&s.status))
    }

    /// Seconds left on the countdown.
    pub fn remaining(&self) -> u32 {
        self.session.as_ref().map_or(0, |s| lock(&s.timer).remaining())
    }

    /// `MM:SS` rendering of the countdown, while a session is active.
    pub fn countdown_text(&self) -> Option<String> {
        self.session
            .as_ref()
            .map(|s| lock(&s.timer).format_remaining())
    }

    /// Whether the current session has expired.
    pub fn is_expired(&self) -> bool {
        self.session
            .as_ref()
            .is_some_and(|s| lock(&s.timer).is_expired())
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().expect("session state mutex poisoned")
}

async fn poll_loop(
    poller: Poller,
    address: Address,
    inbox: Arc<Mutex<Inbox>>,
    status: Arc<Mutex<Status>>,
    interval: Duration,
) {
    let mut ticker = tokio::time::interval(interval);
    loop {
        ticker.tick().await;
        match poller.tick(&address, &inbox).await {
            Ok(merged) => {
                let mut status = lock(&status);
                // expiry may have landed while the cycle was in flight
                if *status != Status::Expired {
                    *status = if merged > 0 {
                        Status::NewMail(merged)
                    } else {
                        Status::Listening
                    };
                }
            }
            // transient: keep listening, the next scheduled cycle retries
            Err(err) => warn!(address = %address, error = %err, "poll cycle failed"),
        }
    }
}

async fn countdown_loop(
    timer: Arc<Mutex<ExpiryTimer>>,
    status: Arc<Mutex<Status>>,
    poller_abort: AbortHandle,
) {
    let mut ticker = tokio::time::interval(Duration::from_secs(1));
    // the first interval tick fires immediately; the countdown starts one
    // second in
    ticker.tick().await;
    loop {
        ticker.tick().await;
        let state = lock(&timer).tick();
        if state == TimerState::Expired {
            poller_abort.abort();
            *lock(&status) = Status::Expired;
            debug!("session expired, polling stopped");
            break;
        }
    }
}
