use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::MissedTickBehavior;

use crate::config::SyncConfig;
use crate::constants::messages;
use crate::error::QuoteError;
use crate::models::Quote;
use crate::notifications::{Notification, SharedNotifications};
use crate::store::SharedQuoteStore;

use super::merge::merge;
use super::remote::RemoteClient;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TickReport {
    pub pushed: bool,
    pub fetched: usize,
    pub merged: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Completed(TickReport),
    /// Another tick was still in flight
    Skipped,
}

/// Periodic push / fetch / merge against the remote endpoint.
///
/// Each tick is independent: no cursor, no version vector, no backoff. A
/// failed half is simply retried by the next tick.
pub struct SyncEngine {
    client: RemoteClient,
    store: SharedQuoteStore,
    notifications: SharedNotifications,
    interval: Duration,
    in_flight: AtomicBool,
}

/// Clears the in-flight flag when a tick finishes, including on panic.
struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl SyncEngine {
    pub fn new(
        config: &SyncConfig,
        store: SharedQuoteStore,
        notifications: SharedNotifications,
    ) -> Result<Self, QuoteError> {
        Ok(Self {
            client: RemoteClient::new(config)?,
            store,
            notifications,
            interval: config.interval,
            in_flight: AtomicBool::new(false),
        })
    }

    pub fn client(&self) -> &RemoteClient {
        &self.client
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Send the whole collection to the remote. Returns whether it succeeded.
    pub async fn push_local(&self) -> bool {
        let snapshot: Vec<Quote> = self.store.lock().quotes().to_vec();

        match self.client.push_quotes(&snapshot).await {
            Ok(()) => {
                self.notifications
                    .notify(Notification::success(messages::PUSH_SUCCESS));
                true
            }
            Err(e) => {
                tracing::warn!("sync: push failed: {}", e);
                self.notifications
                    .notify(Notification::error(messages::PUSH_FAILURE));
                false
            }
        }
    }

    /// Merge `remote` against the collection, append what is new and
    /// announce how many arrived. The check and the append share one lock.
    pub fn merge_remote(&self, remote: &[Quote]) -> usize {
        let result = {
            let mut store = self.store.lock();
            let new_records = merge(remote, store.quotes());
            store.append_merged(new_records)
        };
        self.announce_merge(result)
    }

    fn announce_merge(&self, result: Result<usize, QuoteError>) -> usize {
        match result {
            Ok(0) => 0,
            Ok(count) => {
                self.notifications.notify(Notification::info(merged_message(count)));
                count
            }
            Err(e) => {
                tracing::error!("sync: failed to store merged quotes: {}", e);
                self.notifications
                    .notify(Notification::error(format!("Failed to save server quotes: {e}")));
                0
            }
        }
    }

    /// One cycle: push, then fetch, merge and apply. Skipped (not queued)
    /// while a previous tick is still running.
    pub async fn tick(&self) -> TickOutcome {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            tracing::debug!("sync: previous tick still in flight, skipping");
            return TickOutcome::Skipped;
        }
        let _in_flight = InFlight(&self.in_flight);

        let pushed = self.push_local().await;

        let remote = self.client.fetch_remote().await;
        let merged = self.merge_remote(&remote);

        let report = TickReport {
            pushed,
            fetched: remote.len(),
            merged,
        };
        tracing::info!(
            "sync: tick done (pushed={} fetched={} merged={})",
            report.pushed,
            report.fetched,
            report.merged
        );
        TickOutcome::Completed(report)
    }

    /// Tick on a fixed interval until `shutdown` turns true or its sender
    /// is dropped. Each tick runs as its own task so a slow one cannot delay
    /// the timer; overlapping ticks are skipped by the in-flight guard.
    pub async fn run(self: Arc<Self>, mut shutdown: watch::Receiver<bool>) {
        let mut interval = tokio::time::interval(self.interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        tracing::info!(
            "sync: polling {} every {:?}",
            self.client.endpoint(),
            self.interval
        );

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    let engine = Arc::clone(&self);
                    tokio::spawn(async move {
                        engine.tick().await;
                    });
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }

        tracing::info!("sync: stopped");
    }
}

fn merged_message(count: usize) -> String {
    if count == 1 {
        "1 new quote merged from server".to_string()
    } else {
        format!("{count} new quotes merged from server")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merged_message() {
        assert_eq!(merged_message(1), "1 new quote merged from server");
        assert_eq!(merged_message(3), "3 new quotes merged from server");
    }
}
