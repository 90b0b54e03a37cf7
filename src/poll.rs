//! Background polling.
//!
//! Runs on a dedicated thread with a single-threaded tokio runtime.  Each
//! cycle fetches the source, reports the outcome to the UI thread over an
//! [`mpsc`] channel, then waits for the interval to elapse.  The UI can ask
//! for an immediate refresh and ends the loop through the
//! [`CancellationToken`] owned by [`Poller`].
//!
//! Exactly one lookup is in flight at a time: the loop awaits each fetch to
//! completion before it looks at the clock, commands, or the token again.

use std::thread;
use std::time::{Duration, Instant};

use chrono::Utc;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::MAX_INTERVAL_SECS;
use crate::error::FetchError;
use crate::source::{DataSource, FetchResponse};
use crate::storage::{LastVisit, LastVisitStore};

/// Messages sent from the poller to the UI thread.
#[derive(Debug)]
pub enum PollMsg {
    /// One lookup finished, successfully or not.
    Fetched(Result<FetchResponse, FetchError>),
    /// A new countdown starts at this instant.
    CycleStarted(Instant),
}

/// Requests from the UI thread to the poller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollCommand {
    /// Fetch now and restart the countdown, keeping the scheduled tick.
    Refresh,
}

/// Handle to a running poll loop.  Dropping it stops the loop.
pub struct Poller {
    messages: mpsc::UnboundedReceiver<PollMsg>,
    commands: mpsc::UnboundedSender<PollCommand>,
    cancel: CancellationToken,
}

impl Poller {
    /// Next pending message, if any.  Never blocks.
    pub fn try_recv(&mut self) -> Option<PollMsg> {
        self.messages.try_recv().ok()
    }

    pub fn refresh(&self) {
        if self.commands.send(PollCommand::Refresh).is_err() {
            debug!(event = "poll.refresh_ignored", "poll loop has already stopped");
        }
    }

    /// Stop scheduling further lookups.  A lookup already in flight is
    /// allowed to finish.
    pub fn shutdown(&self) {
        self.cancel.cancel();
    }
}

impl Drop for Poller {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// Spawn the polling thread and return its handle.
pub fn spawn<S>(source: S, interval: Duration, store: Option<LastVisitStore>) -> std::io::Result<Poller>
where
    S: DataSource + 'static,
{
    let (msg_tx, messages) = mpsc::unbounded_channel();
    let (commands, cmd_rx) = mpsc::unbounded_channel();
    let cancel = CancellationToken::new();

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let token = cancel.clone();
    thread::Builder::new()
        .name("poller".into())
        .spawn(move || runtime.block_on(run(source, interval, store, msg_tx, cmd_rx, token)))?;

    Ok(Poller {
        messages,
        commands,
        cancel,
    })
}

/// Fetch once, persist on success and report the outcome.
///
/// Returns `false` when the receiving side is gone.
async fn lookup<S: DataSource>(
    source: &S,
    store: Option<&LastVisitStore>,
    tx: &mpsc::UnboundedSender<PollMsg>,
) -> bool {
    let outcome = source.fetch().await;

    match &outcome {
        Ok(response) => {
            info!(
                event = "poll.lookup_completed",
                source = source.name(),
                products = response.snapshot.len()
            );
            if let Some(store) = store {
                let visit = LastVisit::new(response.raw.clone(), Utc::now());
                if let Err(e) = store.save(&visit) {
                    warn!(event = "poll.persist_failed", error = %e);
                }
            }
        }
        Err(e) => {
            warn!(
                event = "poll.lookup_failed",
                source = source.name(),
                kind = e.title(),
                error = %e
            );
        }
    }

    tx.send(PollMsg::Fetched(outcome)).is_ok()
}

/// The poll loop.
///
/// Fetches immediately, then once per `interval` until `cancel` fires, the
/// command channel closes or the message receiver is dropped.  Failed
/// lookups never stop the loop; the next cycle is scheduled regardless.
pub async fn run<S: DataSource>(
    source: S,
    interval: Duration,
    store: Option<LastVisitStore>,
    tx: mpsc::UnboundedSender<PollMsg>,
    mut commands: mpsc::UnboundedReceiver<PollCommand>,
    cancel: CancellationToken,
) {
    let interval = interval.min(Duration::from_secs(MAX_INTERVAL_SECS));
    info!(event = "poll.started", source = source.name(), interval_secs = interval.as_secs());

    loop {
        if cancel.is_cancelled() {
            break;
        }

        if !lookup(&source, store.as_ref(), &tx).await {
            break;
        }

        let started = Instant::now();
        if tx.send(PollMsg::CycleStarted(started)).is_err() {
            break;
        }
        let deadline = tokio::time::Instant::from_std(started + interval);

        let keep_going = loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => break false,
                _ = tokio::time::sleep_until(deadline) => break true,
                command = commands.recv() => match command {
                    Some(PollCommand::Refresh) => {
                        debug!(event = "poll.refresh_requested");
                        if tx.send(PollMsg::CycleStarted(Instant::now())).is_err() {
                            break false;
                        }
                        if !lookup(&source, store.as_ref(), &tx).await {
                            break false;
                        }
                    }
                    None => break false,
                },
            }
        };

        if !keep_going {
            break;
        }
    }

    info!(event = "poll.stopped", source = source.name());
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
