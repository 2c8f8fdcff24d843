//! One poll cycle: list the mailbox, diff against the inbox, fetch and merge.

use crate::{Address, Client, Inbox, Result};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, warn};

/// Runs poll cycles against a shared inbox.
///
/// A cycle lists the mailbox, fetches every message the inbox has not seen,
/// and merges the results at the front. Cycles may overlap (the scheduled
/// loop plus a manual refresh against the same inbox);
/// [`Inbox::insert_if_absent`] under the shared lock keeps the merge
/// idempotent per id, so a message lands exactly once no matter which cycle
/// fetched it.
#[derive(Debug, Clone)]
pub struct Poller {
    client: Client,
}

impl Poller {
    /// A poller driving the given client.
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Run one poll cycle for `address`, merging into `inbox`.
    ///
    /// Returns how many messages were merged; zero is a normal outcome.
    ///
    /// # Errors
    /// A listing failure aborts the cycle and leaves the inbox untouched.
    /// A per-message fetch failure is logged and skipped; the remaining ids
    /// in the same cycle continue unaffected and the cycle still returns
    /// `Ok` with whatever did merge.
    pub async fn tick(&self, address: &Address, inbox: &Arc<Mutex<Inbox>>) -> Result<usize> {
        let summaries = self.client.list_messages(address).await?;

        let unseen: Vec<u64> = {
            let inbox = lock(inbox);
            summaries
                .iter()
                .filter(|s| !inbox.contains(s.id))
                .map(|s| s.id)
                .collect()
        };

        let mut merged = 0;
        for id in unseen {
            let details = match self.client.fetch_message(address, id).await {
                Ok(details) => details,
                Err(err) => {
                    warn!(id, error = %err, "skipping message that failed to fetch");
                    continue;
                }
            };
            // recheck under the lock: a concurrent cycle may have won the race
            if lock(inbox).insert_if_absent(details.into()) {
                merged += 1;
            }
        }

        if merged > 0 {
            debug!(merged, address = %address, "merged new messages");
        }
        Ok(merged)
    }
}

fn lock(inbox: &Mutex<Inbox>) -> MutexGuard<'_, Inbox> {
    inbox.lock().expect("inbox mutex poisoned")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Client, Error};
    use httpmock::Method::GET;
    use httpmock::MockServer;
    use serde_json::json;

    fn test_setup(server: &MockServer) -> (Poller, Address, Arc<Mutex<Inbox>>) {
        let client = Client::builder()
            .relay_url(format!("{}/raw", server.base_url()))
            .build()
            .expect("test client build failed");
        let address = Address {
            local_part: "abc".to_string(),
            domain: "1secmail.com".to_string(),
        };
        (Poller::new(client), address, Arc::new(Mutex::new(Inbox::new())))
    }

    fn list_url() -> &'static str {
        "https://www.1secmail.com/api/v1/?action=getMessages&login=abc&domain=1secmail.com"
    }

    fn read_url(id: u64) -> String {
        format!(
            "https://www.1secmail.com/api/v1/?action=readMessage&login=abc&domain=1secmail.com&id={id}"
        )
    }

    fn summary_json(id: u64) -> serde_json::Value {
        json!({ "id": id, "from": "a@example.com", "subject": "s", "date": "2024-03-01 10:15:00" })
    }

    fn details_json(id: u64) -> serde_json::Value {
        json!({
            "id": id,
            "from": "a@example.com",
            "subject": "s",
            "date": "2024-03-01 10:15:00",
            "textBody": "body"
        })
    }

    #[tokio::test]
    async fn merges_every_unseen_message_as_unread() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/raw").query_param("url", list_url());
            then.status(200)
                .json_body(json!([summary_json(5), summary_json(7)]));
        });
        server.mock(|when, then| {
            when.method(GET).path("/raw").query_param("url", read_url(5));
            then.status(200).json_body(details_json(5));
        });
        server.mock(|when, then| {
            when.method(GET).path("/raw").query_param("url", read_url(7));
            then.status(200).json_body(details_json(7));
        });

        let (poller, address, inbox) = test_setup(&server);
        let merged = poller.tick(&address, &inbox).await.unwrap();

        assert_eq!(merged, 2);
        let inbox = inbox.lock().unwrap();
        assert_eq!(inbox.len(), 2);
        let mut ids: Vec<u64> = inbox.messages().iter().map(|m| m.id).collect();
        ids.sort_unstable();
        assert_eq!(ids, vec![5, 7]);
        assert!(inbox.messages().iter().all(|m| !m.is_read));
    }

    #[tokio::test]
    async fn listing_failure_leaves_the_inbox_untouched() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/raw").query_param("url", list_url());
            then.status(500).body("boom");
        });

        let (poller, address, inbox) = test_setup(&server);
        {
            let details: crate::MessageDetails =
                serde_json::from_value(details_json(1)).unwrap();
            inbox.lock().unwrap().insert_if_absent(details.into());
        }
        let before_unread = inbox.lock().unwrap().unread_count();

        let result = poller.tick(&address, &inbox).await;
        assert!(matches!(result, Err(Error::Request(_))));

        let inbox = inbox.lock().unwrap();
        assert_eq!(inbox.len(), 1);
        assert_eq!(inbox.unread_count(), before_unread);
    }

    #[tokio::test]
    async fn one_failed_fetch_does_not_block_the_rest() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/raw").query_param("url", list_url());
            then.status(200)
                .json_body(json!([summary_json(5), summary_json(7)]));
        });
        server.mock(|when, then| {
            when.method(GET).path("/raw").query_param("url", read_url(5));
            then.status(500).body("boom");
        });
        server.mock(|when, then| {
            when.method(GET).path("/raw").query_param("url", read_url(7));
            then.status(200).json_body(details_json(7));
        });

        let (poller, address, inbox) = test_setup(&server);
        let merged = poller.tick(&address, &inbox).await.unwrap();

        assert_eq!(merged, 1);
        let inbox = inbox.lock().unwrap();
        assert_eq!(inbox.len(), 1);
        assert!(inbox.contains(7));
    }

    #[tokio::test]
    async fn repeated_cycles_do_not_duplicate_messages() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/raw").query_param("url", list_url());
            then.status(200).json_body(json!([summary_json(5)]));
        });
        let read_mock = server.mock(|when, then| {
            when.method(GET).path("/raw").query_param("url", read_url(5));
            then.status(200).json_body(details_json(5));
        });

        let (poller, address, inbox) = test_setup(&server);
        assert_eq!(poller.tick(&address, &inbox).await.unwrap(), 1);
        assert_eq!(poller.tick(&address, &inbox).await.unwrap(), 0);

        assert_eq!(inbox.lock().unwrap().len(), 1);
        // the second cycle saw the id in the inbox and never refetched it
        read_mock.assert_hits(1);
    }
}
