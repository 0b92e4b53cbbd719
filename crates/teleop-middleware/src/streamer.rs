//! [`EventStreamer`] – the controller side of the wire protocol.
//!
//! Input capture updates the shared event through an [`EventHandle`]; the
//! streamer sends the current event as one JSON line every `period`
//! (20 Hz by default).  Momentary buttons are released once they have been
//! sent, while the stick positions persist until changed.  When the server
//! is unreachable or the connection drops, the streamer reconnects every
//! `retry`.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use teleop_types::{ControlEvent, TeleopError};
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::supervisor::{pause, stopped};

/// Shared, updatable view of the event being streamed.
#[derive(Debug, Clone, Default)]
pub struct EventHandle(Arc<Mutex<ControlEvent>>);

impl EventHandle {
    fn lock(&self) -> MutexGuard<'_, ControlEvent> {
        self.0.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Modify the pending event.
    pub fn update(&self, edit: impl FnOnce(&mut ControlEvent)) {
        edit(&mut self.lock());
    }

    pub fn current(&self) -> ControlEvent {
        *self.lock()
    }

    /// The event to send now; buttons are released for the next send.
    fn take_frame(&self) -> ControlEvent {
        let mut pending = self.lock();
        let frame = *pending;
        pending.release_buttons();
        frame
    }
}

pub struct EventStreamer {
    addr: String,
    period: Duration,
    retry: Duration,
    event: EventHandle,
}

impl EventStreamer {
    /// Stream to `addr` (`host:port`) at 20 Hz, retrying every second.
    pub fn new(addr: impl Into<String>) -> Self {
        Self {
            addr: addr.into(),
            period: Duration::from_millis(50),
            retry: Duration::from_secs(1),
            event: EventHandle::default(),
        }
    }

    pub fn with_period(mut self, period: Duration) -> Self {
        self.period = period;
        self
    }

    pub fn with_retry(mut self, retry: Duration) -> Self {
        self.retry = retry;
        self
    }

    pub fn handle(&self) -> EventHandle {
        self.event.clone()
    }

    /// Connect and stream until `shutdown` turns `true`.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) -> Result<(), TeleopError> {
        loop {
            let Some(stream) = self.connect(&mut shutdown).await else {
                return Ok(());
            };
            match self.stream(stream, &mut shutdown).await {
                Ok(()) => return Ok(()),
                Err(e) => warn!(error = %e, "connection to robot lost"),
            }
        }
    }

    async fn connect(&self, shutdown: &mut watch::Receiver<bool>) -> Option<TcpStream> {
        loop {
            if *shutdown.borrow() {
                return None;
            }
            match TcpStream::connect(self.addr.as_str()).await {
                Ok(stream) => {
                    info!(addr = %self.addr, "connected to robot");
                    return Some(stream);
                }
                Err(e) => {
                    warn!(addr = %self.addr, error = %e, "unable to connect to robot, is the server running?");
                }
            }
            if pause(self.retry, shutdown).await {
                return None;
            }
        }
    }

    async fn stream(
        &self,
        mut stream: TcpStream,
        shutdown: &mut watch::Receiver<bool>,
    ) -> Result<(), TeleopError> {
        let mut ticker = tokio::time::interval(self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            tokio::select! {
                _ = stopped(shutdown) => return Ok(()),
                _ = ticker.tick() => {}
            }
            let mut line = serde_json::to_vec(&self.event.take_frame())
                .map_err(|e| TeleopError::Protocol(format!("encode failed: {e}")))?;
            line.push(b'\n');
            stream
                .write_all(&line)
                .await
                .map_err(|e| TeleopError::Transport(format!("send failed: {e}")))?;
            debug!(bytes = line.len(), "event sent");
        }
    }
}
