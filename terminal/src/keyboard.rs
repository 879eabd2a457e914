//! Stdin routing. A terminal only hands over whole lines, so each line either
//! dismisses the splash message currently on screen or is split into key
//! presses for the engine.

use std::sync::{Arc, Mutex, MutexGuard};

use engine::KeyCode;
use futures_channel::mpsc::UnboundedSender;
use futures_channel::oneshot;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{debug, trace, warn};

#[derive(Debug, Default)]
struct SlotState {
    pending: Option<oneshot::Sender<()>>,
    /// Set once stdin is exhausted; nothing can acknowledge a splash after that.
    closed: bool,
}

/// Acknowledgement sender for the splash being shown, if any.
#[derive(Debug, Clone, Default)]
pub struct SplashSlot(Arc<Mutex<SlotState>>);

impl SplashSlot {
    fn state(&self) -> MutexGuard<'_, SlotState> {
        self.0.lock().unwrap_or_else(|poisoned| {
            warn!("splash slot lock poisoned, recovering");
            poisoned.into_inner()
        })
    }

    /// Register a pending splash and get the receiver that resolves on Enter.
    /// Once the slot is closed the receiver comes back already cancelled.
    pub fn arm(&self) -> oneshot::Receiver<()> {
        let (tx, rx) = oneshot::channel();
        let mut state = self.state();
        if !state.closed {
            state.pending = Some(tx);
        }
        rx
    }

    /// Drop any pending acknowledgement and refuse new ones.
    pub fn close(&self) {
        let mut state = self.state();
        state.closed = true;
        state.pending = None;
    }

    fn take(&self) -> Option<oneshot::Sender<()>> {
        self.state().pending.take()
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum Routed {
    Acknowledged,
    Keys(usize),
}

pub fn route_line(line: &str, splash: &SplashSlot, keys: &UnboundedSender<KeyCode>) -> Routed {
    if let Some(ack) = splash.take() {
        let _ = ack.send(());
        return Routed::Acknowledged;
    }

    let mut sent = 0;
    for code in line.chars().filter_map(KeyCode::from_char) {
        if keys.unbounded_send(code).is_ok() {
            sent += 1;
        }
    }
    Routed::Keys(sent)
}

/// Forward lines from `reader` until it is exhausted. On return the splash
/// slot is closed and dropping `keys` closes the engine's input.
pub async fn pump<R>(reader: R, splash: SplashSlot, keys: UnboundedSender<KeyCode>) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
{
    let result = forward_lines(reader, &splash, &keys).await;
    splash.close();
    debug!("stdin closed");
    result
}

async fn forward_lines<R>(
    reader: R,
    splash: &SplashSlot,
    keys: &UnboundedSender<KeyCode>,
) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    while let Some(line) = lines.next_line().await? {
        let routed = route_line(&line, splash, keys);
        trace!(?routed, "stdin line");
    }
    Ok(())
}
