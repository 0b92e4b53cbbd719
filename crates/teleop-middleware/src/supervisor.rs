//! [`ConnectionSupervisor`] – owns the listening socket and the single live
//! controller connection.
//!
//! # Lifecycle
//!
//! ```text
//! Idle ──tick──▶ Listening ──accept──▶ Connected ──error/EOF/watchdog──▶ Closing ──▶ Idle
//! ```
//!
//! Every `reconnect_interval` the supervisor tries to take the
//! connection-attempt exclusion.  If it is free, a task binds the listening
//! socket (retrying every `bind_retry`), accepts exactly one controller and
//! reads from it until the stream ends, a record fails to decode, a read
//! fails, or the [`LatencyWatchdog`] trips because no complete record arrived
//! within `watchdog` of the previous one.  Whatever the reason, the task
//! then calls [`ControlSink::emergency_stop`], closes the socket, publishes
//! [`ConnectionPhase::Idle`] and releases the exclusion.
//!
//! Each decoded event is dispatched on its own task.  At most
//! `max_inflight_events` dispatches run at once; frames arriving beyond that
//! are dropped, which is harmless because the controller resends its full
//! state at 20 Hz.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use teleop_kernel::{Exclusion, ExclusionGuard, LatencyWatchdog};
use teleop_types::{ControlEvent, TeleopError};
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::net::TcpListener;
use tokio::sync::{Semaphore, watch};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{Instrument, debug, info, info_span, warn};
use uuid::Uuid;

use crate::framer::Framer;
use crate::sink::ControlSink;

// ─────────────────────────────────────────────────────────────────────────────
// Configuration & phase
// ─────────────────────────────────────────────────────────────────────────────

/// Socket and timing parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupervisorConfig {
    pub bind_host: String,
    pub port: u16,
    pub reconnect_interval: Duration,
    pub bind_retry: Duration,
    pub watchdog: Duration,
    pub read_buffer_bytes: usize,
    pub max_inflight_events: usize,
}

impl SupervisorConfig {
    /// Defaults for listening on `bind_host:8888`.
    pub fn new(bind_host: impl Into<String>) -> Self {
        Self {
            bind_host: bind_host.into(),
            port: 8888,
            reconnect_interval: Duration::from_secs(2),
            bind_retry: Duration::from_secs(1),
            watchdog: Duration::from_secs(2),
            read_buffer_bytes: 2048,
            max_inflight_events: 32,
        }
    }
}

/// Published on every lifecycle transition; see [`ConnectionSupervisor::phase`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionPhase {
    Idle,
    Listening(SocketAddr),
    Connected { id: Uuid, peer: SocketAddr },
    Closing,
}

/// How a connection ended without an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disconnect {
    PeerClosed,
    Shutdown,
}

// ─────────────────────────────────────────────────────────────────────────────
// ConnectionSupervisor
// ─────────────────────────────────────────────────────────────────────────────

pub struct ConnectionSupervisor {
    config: SupervisorConfig,
    sink: Arc<dyn ControlSink>,
    attempt: Exclusion,
    inflight: Arc<Semaphore>,
    phase: watch::Sender<ConnectionPhase>,
}

impl ConnectionSupervisor {
    pub fn new(config: SupervisorConfig, sink: Arc<dyn ControlSink>) -> Self {
        let inflight = Arc::new(Semaphore::new(config.max_inflight_events.max(1)));
        let (phase, _) = watch::channel(ConnectionPhase::Idle);
        Self {
            config,
            sink,
            attempt: Exclusion::new("connection-attempt"),
            inflight,
            phase,
        }
    }

    /// Subscribe to lifecycle transitions.
    pub fn phase(&self) -> watch::Receiver<ConnectionPhase> {
        self.phase.subscribe()
    }

    /// Start connection attempts until `shutdown` turns `true`, then wait
    /// for the current attempt to wind down.
    pub async fn run(self: Arc<Self>, shutdown: watch::Receiver<bool>) {
        let mut ticker = tokio::time::interval(self.config.reconnect_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut stop = shutdown.clone();
        let mut current: Option<JoinHandle<()>> = None;

        loop {
            tokio::select! {
                biased;
                _ = stopped(&mut stop) => break,
                _ = ticker.tick() => {
                    let Some(guard) = self.attempt.try_acquire() else {
                        continue;
                    };
                    info!("attempting connection");
                    let this = Arc::clone(&self);
                    let attempt_shutdown = shutdown.clone();
                    current = Some(tokio::spawn(async move {
                        this.attempt(guard, attempt_shutdown).await;
                    }));
                }
            }
        }

        info!("supervisor stopping");
        if let Some(handle) = current {
            if let Err(e) = handle.await {
                warn!(error = %e, "connection task failed");
            }
        }
    }

    async fn attempt(&self, _guard: ExclusionGuard, mut shutdown: watch::Receiver<bool>) {
        let id = Uuid::new_v4();
        async {
            match self.listen_and_serve(id, &mut shutdown).await {
                Ok(Disconnect::PeerClosed) => info!("controller disconnected"),
                Ok(Disconnect::Shutdown) => info!("connection closed for shutdown"),
                Err(e) => warn!(error = %e, class = ?e.class(), "connection terminated"),
            }
            self.phase.send_replace(ConnectionPhase::Closing);
            warn!("bringing robot to full stop");
            self.sink.emergency_stop().await;
            self.phase.send_replace(ConnectionPhase::Idle);
            info!("connection closed");
        }
        .instrument(info_span!("connection", %id))
        .await
    }

    async fn listen_and_serve(
        &self,
        id: Uuid,
        shutdown: &mut watch::Receiver<bool>,
    ) -> Result<Disconnect, TeleopError> {
        let host = self.config.bind_host.as_str();
        let port = self.config.port;

        let (stream, peer) = loop {
            let listener = match TcpListener::bind((host, port)).await {
                Ok(listener) => listener,
                Err(e) => {
                    warn!(error = %e, host, port, "unable to bind, retrying");
                    if pause(self.config.bind_retry, shutdown).await {
                        return Ok(Disconnect::Shutdown);
                    }
                    continue;
                }
            };
            let local = listener
                .local_addr()
                .map_err(|e| TeleopError::Transport(format!("local address: {e}")))?;
            self.phase.send_replace(ConnectionPhase::Listening(local));
            info!(%local, "waiting for controller");

            tokio::select! {
                _ = stopped(shutdown) => return Ok(Disconnect::Shutdown),
                accepted = listener.accept() => match accepted {
                    Ok(pair) => break pair,
                    Err(e) => {
                        warn!(error = %e, "unable to accept, retrying");
                        if pause(self.config.bind_retry, shutdown).await {
                            return Ok(Disconnect::Shutdown);
                        }
                    }
                },
            }
        };

        info!(%peer, "controller connected");
        self.phase
            .send_replace(ConnectionPhase::Connected { id, peer });
        self.serve_connection(stream, shutdown).await
    }

    /// Read, frame and dispatch one controller stream until it ends.
    ///
    /// # Errors
    ///
    /// * [`TeleopError::Transport`] – the read failed.
    /// * [`TeleopError::Protocol`] – a record failed to decode.
    /// * [`TeleopError::WatchdogTimeout`] – the stream went silent for longer
    ///   than the watchdog threshold after its first frame.
    pub async fn serve_connection<R: AsyncRead + Unpin>(
        &self,
        mut reader: R,
        shutdown: &mut watch::Receiver<bool>,
    ) -> Result<Disconnect, TeleopError> {
        let mut framer = Framer::new();
        let mut watchdog = LatencyWatchdog::new(self.config.watchdog);
        let mut buf = vec![0u8; self.config.read_buffer_bytes.max(1)];

        loop {
            let deadline = watchdog.deadline().map(Instant::from_std);
            let read = tokio::select! {
                _ = stopped(shutdown) => return Ok(Disconnect::Shutdown),
                read = read_before(&mut reader, &mut buf, deadline) => read,
            };
            let n = match read {
                Some(Ok(0)) => return Ok(Disconnect::PeerClosed),
                Some(Ok(n)) => n,
                Some(Err(e)) => return Err(TeleopError::Transport(format!("read failed: {e}"))),
                None => {
                    let now = Instant::now();
                    let overdue = deadline
                        .map(|d| now.saturating_duration_since(d))
                        .unwrap_or_default();
                    let health = watchdog.health(now.into_std());
                    warn!(?health, "high latency detected");
                    return Err(TeleopError::WatchdogTimeout {
                        gap_ms: millis(watchdog.threshold() + overdue),
                    });
                }
            };

            // Only a complete record counts as a frame; partial records,
            // blank lines and noise leave the watchdog clock running.
            let Some(event) = framer.push(&buf[..n])? else {
                continue;
            };
            let now = Instant::now().into_std();
            let health = watchdog.health(now);
            if let Err(gap) = watchdog.observe(now) {
                warn!(?health, "high latency detected");
                return Err(TeleopError::WatchdogTimeout {
                    gap_ms: millis(gap),
                });
            }
            self.dispatch(event);
        }
    }

    fn dispatch(&self, event: ControlEvent) {
        let Ok(permit) = Arc::clone(&self.inflight).try_acquire_owned() else {
            debug!("dispatch saturated, frame dropped");
            return;
        };
        let sink = Arc::clone(&self.sink);
        tokio::spawn(
            async move {
                sink.dispatch(event).await;
                drop(permit);
            }
            .in_current_span(),
        );
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Helpers
// ─────────────────────────────────────────────────────────────────────────────

/// Resolves once shutdown is requested.  Never resolves if the sender is gone.
pub(crate) async fn stopped(shutdown: &mut watch::Receiver<bool>) {
    let requested = shutdown.wait_for(|stop| *stop).await.is_ok();
    if !requested {
        std::future::pending::<()>().await;
    }
}

/// Sleep for `delay`; `true` when shutdown was requested meanwhile.
pub(crate) async fn pause(delay: Duration, shutdown: &mut watch::Receiver<bool>) -> bool {
    tokio::select! {
        _ = stopped(shutdown) => true,
        _ = tokio::time::sleep(delay) => false,
    }
}

/// One read, or `None` when `deadline` passes first.
async fn read_before<R: AsyncRead + Unpin>(
    reader: &mut R,
    buf: &mut [u8],
    deadline: Option<Instant>,
) -> Option<std::io::Result<usize>> {
    match deadline {
        Some(at) => tokio::time::timeout_at(at, reader.read(buf)).await.ok(),
        None => Some(reader.read(buf).await),
    }
}

fn millis(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
