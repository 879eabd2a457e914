//! Key input contract and a channel-backed implementation.

use async_trait::async_trait;
use futures_channel::mpsc::{self, UnboundedReceiver, UnboundedSender};
use futures_util::StreamExt;
use serde::{Deserialize, Serialize};

/// Raw key code as reported by the host (DOM `keyCode` numbering).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeyCode(pub u32);

impl KeyCode {
    pub const SPACE: KeyCode = KeyCode(32);

    /// Key code for an ASCII letter, digit or space; `'e'` and `'E'` both map to 69.
    pub fn from_char(c: char) -> Option<Self> {
        if c.is_ascii_alphanumeric() {
            Some(KeyCode(c.to_ascii_uppercase() as u32))
        } else if c == ' ' {
            Some(Self::SPACE)
        } else {
            None
        }
    }
}

/// Source of discrete key presses.
///
/// The engine subscribes when a response window opens and unsubscribes as
/// soon as the attempt resolves. Keys pressed while unsubscribed must never
/// be delivered to a later window.
#[async_trait]
pub trait InputSource: Send {
    fn subscribe(&mut self);

    fn unsubscribe(&mut self);

    /// Next key pressed while subscribed. `None` once the source is closed.
    async fn next_key(&mut self) -> Option<KeyCode>;
}

/// Input fed through an unbounded channel; the host keeps the sender.
#[derive(Debug)]
pub struct ChannelInput {
    rx: UnboundedReceiver<KeyCode>,
    subscribed: bool,
}

impl ChannelInput {
    pub fn new(rx: UnboundedReceiver<KeyCode>) -> Self {
        Self {
            rx,
            subscribed: false,
        }
    }

    pub fn channel() -> (UnboundedSender<KeyCode>, Self) {
        let (tx, rx) = mpsc::unbounded();
        (tx, Self::new(rx))
    }

    pub fn is_subscribed(&self) -> bool {
        self.subscribed
    }
}

#[async_trait]
impl InputSource for ChannelInput {
    fn subscribe(&mut self) {
        // Anything queued now was pressed while nobody was listening.
        while let Ok(Some(_)) = self.rx.try_next() {}
        self.subscribed = true;
    }

    fn unsubscribe(&mut self) {
        self.subscribed = false;
    }

    async fn next_key(&mut self) -> Option<KeyCode> {
        if !self.subscribed {
            return std::future::pending().await;
        }
        self.rx.next().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_letters_case_insensitively() {
        assert_eq!(KeyCode::from_char('e'), Some(KeyCode(69)));
        assert_eq!(KeyCode::from_char('I'), Some(KeyCode(73)));
        assert_eq!(KeyCode::from_char(' '), Some(KeyCode::SPACE));
        assert_eq!(KeyCode::from_char('?'), None);
    }

    #[tokio::test]
    async fn keys_pressed_before_subscribe_are_discarded() {
        let (tx, mut input) = ChannelInput::channel();
        tx.unbounded_send(KeyCode(69)).unwrap();
        input.subscribe();
        tx.unbounded_send(KeyCode(73)).unwrap();

        assert_eq!(input.next_key().await, Some(KeyCode(73)));
    }

    #[tokio::test]
    async fn closed_source_yields_none() {
        let (tx, mut input) = ChannelInput::channel();
        input.subscribe();
        drop(tx);
        assert_eq!(input.next_key().await, None);
    }
}
