//! Engine configuration: timing constants and the response key bindings.
//!
//! Durations are expressed in milliseconds when (de)serialised so a host can
//! keep its settings in a plain JSON file:
//!
//! ```json
//! { "response_window_ms": 10000, "feedback_ms": 500, "bindings": { "left": 69, "right": 73 } }
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::io::input::KeyCode;
use crate::tasks::iat::Side;

/// `E` in the DOM key code table.
pub const KEYCODE_E_LEFT: KeyCode = KeyCode(69);
/// `I` in the DOM key code table.
pub const KEYCODE_I_RIGHT: KeyCode = KeyCode(73);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IatConfig {
    /// How long a participant has to answer one attempt.
    #[serde(rename = "response_window_ms", with = "millis")]
    pub response_window: Duration,
    /// How long the corrective feedback stays active after a wrong answer or timeout.
    #[serde(rename = "feedback_ms", with = "millis")]
    pub feedback_duration: Duration,
    /// Tick quantum of the drift-corrected clock.
    #[serde(rename = "clock_quantum_ms", with = "millis")]
    pub clock_quantum: Duration,
    pub bindings: KeyBindings,
    /// Fixed seed for reproducible trial order. `None` seeds from entropy.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    /// Button label used when a splash/post message omits one.
    pub default_button_text: String,
}

impl Default for IatConfig {
    fn default() -> Self {
        Self {
            response_window: Duration::from_secs(10),
            feedback_duration: Duration::from_millis(500),
            clock_quantum: Duration::from_millis(100),
            bindings: KeyBindings::default(),
            seed: None,
            default_button_text: "Continue".to_string(),
        }
    }
}

impl IatConfig {
    /// Short windows and a fixed seed, for tests and dry runs.
    pub fn testing() -> Self {
        Self {
            response_window: Duration::from_secs(2),
            feedback_duration: Duration::from_millis(50),
            seed: Some(7),
            ..Self::default()
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_response_window(mut self, window: Duration) -> Self {
        self.response_window = window;
        self
    }
}

/// Maps the two physical response keys to screen sides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyBindings {
    pub left: KeyCode,
    pub right: KeyCode,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            left: KEYCODE_E_LEFT,
            right: KEYCODE_I_RIGHT,
        }
    }
}

impl KeyBindings {
    /// Side bound to `code`, or `None` for any other key.
    pub fn side_for(&self, code: KeyCode) -> Option<Side> {
        if code == self.left {
            Some(Side::Left)
        } else if code == self.right {
            Some(Side::Right)
        } else {
            None
        }
    }

    pub fn key_for(&self, side: Side) -> KeyCode {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }
}

mod millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_bindings_follow_e_and_i() {
        let bindings = KeyBindings::default();
        assert_eq!(bindings.side_for(KeyCode(69)), Some(Side::Left));
        assert_eq!(bindings.side_for(KeyCode(73)), Some(Side::Right));
        assert_eq!(bindings.side_for(KeyCode(32)), None);
        assert_eq!(bindings.key_for(Side::Right), KeyCode(73));
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config: IatConfig =
            serde_json::from_str(r#"{ "response_window_ms": 1500, "seed": 3 }"#).unwrap();
        assert_eq!(config.response_window, Duration::from_millis(1500));
        assert_eq!(config.feedback_duration, Duration::from_millis(500));
        assert_eq!(config.seed, Some(3));
        assert_eq!(config.bindings, KeyBindings::default());
    }

    #[test]
    fn serialises_durations_as_millis() {
        let value = serde_json::to_value(IatConfig::default()).unwrap();
        assert_eq!(value["response_window_ms"], 10_000);
        assert_eq!(value["clock_quantum_ms"], 100);
        assert!(value.get("seed").is_none());
    }
}
