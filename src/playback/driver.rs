//! Driver spawns and owns the playback task

use futures::Stream;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{mpsc, oneshot, watch};
use tokio::time::MissedTickBehavior;
use tokio_stream::wrappers::WatchStream;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace};

use super::PlaybackAction;
use crate::session::{OverlaySession, OverlaySnapshot, ValidationReport};
use crate::types::Game;
use crate::{OverlayError, Result};

/// Depth of the command queue between handles and the playback task
const COMMAND_BUFFER: usize = 32;

/// Requests handled by the playback task, in arrival order.
#[derive(Debug)]
pub enum DriverCommand {
    Action {
        action: PlaybackAction,
        reply: oneshot::Sender<Result<()>>,
    },
    Load {
        text: String,
        reply: oneshot::Sender<ValidationReport>,
    },
    SetGame {
        game: Game,
        reply: oneshot::Sender<()>,
    },
    EvaluateTiming {
        offset: Option<i64>,
        reply: oneshot::Sender<Result<String>>,
    },
    AppendStep {
        reply: oneshot::Sender<Result<String>>,
    },
}

/// Handle to a running playback task.
///
/// Dropping the handle stops the task.
#[derive(Debug)]
pub struct DriverHandle {
    commands: mpsc::Sender<DriverCommand>,
    snapshots: watch::Receiver<Arc<OverlaySnapshot>>,
    cancel: CancellationToken,
}

impl DriverHandle {
    /// Apply a user action.
    pub async fn send(&self, action: PlaybackAction) -> Result<()> {
        self.request(|reply| DriverCommand::Action { action, reply }).await?
    }

    /// Replace the build order with `text`.
    pub async fn load(&self, text: impl Into<String>) -> Result<ValidationReport> {
        let text = text.into();
        self.request(|reply| DriverCommand::Load { text, reply }).await
    }

    pub async fn set_game(&self, game: Game) -> Result<()> {
        self.request(|reply| DriverCommand::SetGame { game, reply }).await
    }

    /// Estimate step times and return the updated build order text.
    ///
    /// `None` uses the session's configured offset.
    pub async fn evaluate_timing(&self, offset: Option<i64>) -> Result<String> {
        self.request(|reply| DriverCommand::EvaluateTiming { offset, reply }).await?
    }

    /// Append a default step and return the updated build order text.
    pub async fn append_step(&self) -> Result<String> {
        self.request(|reply| DriverCommand::AppendStep { reply }).await?
    }

    /// Latest published snapshot.
    pub fn snapshot(&self) -> Arc<OverlaySnapshot> {
        self.snapshots.borrow().clone()
    }

    /// Snapshots as a stream, starting with the current one.
    pub fn snapshots(&self) -> impl Stream<Item = Arc<OverlaySnapshot>> + 'static {
        WatchStream::new(self.snapshots.clone())
    }

    /// Stop the playback task.
    pub fn shutdown(&self) {
        self.cancel.cancel();
    }

    /// Wait until the playback task has exited.
    pub async fn closed(&self) {
        self.commands.closed().await;
    }

    async fn request<T>(
        &self,
        command: impl FnOnce(oneshot::Sender<T>) -> DriverCommand,
    ) -> Result<T> {
        let (reply, response) = oneshot::channel();
        self.commands.send(command(reply)).await.map_err(|_| OverlayError::DriverClosed)?;
        response.await.map_err(|_| OverlayError::DriverClosed)
    }
}

impl Drop for DriverHandle {
    fn drop(&mut self) {
        debug!("Dropping playback driver handle");
        self.cancel.cancel();
    }
}

/// Driver spawns the playback task
///
/// The task owns the [`OverlaySession`]: ticks and commands are handled one
/// at a time, so playback state is never touched concurrently. A snapshot is
/// published after every command and after every tick that moved the clock.
pub struct PlaybackDriver;

impl PlaybackDriver {
    /// Spawn the playback task, ticking every `tick_interval`.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn(session: OverlaySession, tick_interval: Duration) -> DriverHandle {
        let (command_tx, command_rx) = mpsc::channel(COMMAND_BUFFER);
        let (snapshot_tx, snapshot_rx) = watch::channel(Arc::new(session.snapshot()));
        let cancel = CancellationToken::new();

        let cancel_task = cancel.clone();
        tokio::spawn(async move {
            Self::playback_task(session, tick_interval, command_rx, snapshot_tx, cancel_task).await;
        });

        DriverHandle { commands: command_tx, snapshots: snapshot_rx, cancel }
    }

    async fn playback_task(
        mut session: OverlaySession,
        tick_interval: Duration,
        mut commands: mpsc::Receiver<DriverCommand>,
        snapshots: watch::Sender<Arc<OverlaySnapshot>>,
        cancel: CancellationToken,
    ) {
        info!(game = %session.game(), ?tick_interval, "Playback task started");
        let mut ticker = tokio::time::interval(tick_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut ticks = 0u64;

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    info!("Playback task cancelled");
                    break;
                }
                command = commands.recv() => {
                    let Some(command) = command else {
                        debug!("All driver handles dropped");
                        break;
                    };
                    Self::handle_command(&mut session, command);
                    snapshots.send_replace(Arc::new(session.snapshot()));
                }
                _ = ticker.tick() => {
                    ticks += 1;
                    let outcome = session.tick(now());
                    if outcome.time_changed {
                        trace!(
                            ticks,
                            steps_changed = outcome.steps_changed,
                            "Publishing tick snapshot"
                        );
                        snapshots.send_replace(Arc::new(session.snapshot()));
                    }
                }
            }
        }

        info!("Playback task ended after {} ticks", ticks);
    }

    fn handle_command(session: &mut OverlaySession, command: DriverCommand) {
        let now = now();
        match command {
            DriverCommand::Action { action, reply } => {
                let _ = reply.send(session.apply(action, now));
            }
            DriverCommand::Load { text, reply } => {
                let _ = reply.send(session.load_text(&text, now).clone());
            }
            DriverCommand::SetGame { game, reply } => {
                session.set_game(game, now);
                let _ = reply.send(());
            }
            DriverCommand::EvaluateTiming { offset, reply } => {
                let _ = reply.send(session.evaluate_timing(offset, now));
            }
            DriverCommand::AppendStep { reply } => {
                let _ = reply.send(session.append_step(now));
            }
        }
    }
}

/// Current instant on the tokio clock, so paused test time applies.
fn now() -> Instant {
    tokio::time::Instant::now().into_std()
}
