use async_trait::async_trait;
use engine::{BlockProgress, DisplayChoices, KeyBindings, KeyCode, Presenter, Trial};

use crate::keyboard::SplashSlot;

const WIDTH: usize = 40;

/// Writes stimuli and messages to stdout; splash messages wait for Enter.
pub struct TerminalPresenter {
    bindings: KeyBindings,
    splash: SplashSlot,
}

impl TerminalPresenter {
    pub fn new(bindings: KeyBindings, splash: SplashSlot) -> Self {
        Self { bindings, splash }
    }
}

fn key_label(code: KeyCode) -> String {
    match char::from_u32(code.0) {
        Some(c) if c.is_ascii_graphic() => c.to_string(),
        _ => format!("#{}", code.0),
    }
}

/// The three lines shown for one stimulus: labels, keys, and the centred item.
pub fn stimulus_lines(choices: &DisplayChoices, bindings: &KeyBindings, item: &str) -> [String; 3] {
    let gap = WIDTH.saturating_sub(choices.left.len() + choices.right.len()).max(1);
    let labels = format!("{}{}{}", choices.left, " ".repeat(gap), choices.right);

    let left_key = format!("[{}]", key_label(bindings.left));
    let right_key = format!("[{}]", key_label(bindings.right));
    let gap = WIDTH.saturating_sub(left_key.len() + right_key.len()).max(1);
    let keys = format!("{left_key}{}{right_key}", " ".repeat(gap));

    let pad = WIDTH.saturating_sub(item.len()) / 2;
    let stimulus = format!("{}{item}", " ".repeat(pad));

    [labels, keys, stimulus]
}

#[async_trait]
impl Presenter<String> for TerminalPresenter {
    fn render_stimulus(&self, choices: &DisplayChoices, trial: &Trial<String>) {
        println!();
        for line in stimulus_lines(choices, &self.bindings, &trial.item) {
            println!("{line}");
        }
    }

    fn render_feedback(&self, active: bool) {
        if active {
            println!("{:^width$}", "X", width = WIDTH);
        }
    }

    async fn render_splash(&self, message: &str, button_text: &str) {
        let ack = self.splash.arm();
        println!();
        if !message.is_empty() {
            println!("{message}");
        }
        println!("[{button_text}] press Enter");
        // A cancelled acknowledgement means stdin closed; carry on and let the
        // next response window report it.
        let _ = ack.await;
    }

    fn render_progress(&self, progress: &BlockProgress) {
        let mut line = format!("-- trial {}/{}", progress.completed + 1, progress.total);
        if progress.attempt > 1 {
            line.push_str(&format!(" (attempt {})", progress.attempt));
        }
        println!("{line}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stimulus_lines_put_labels_on_their_keys() {
        let choices = DisplayChoices {
            left: "flower".into(),
            right: "insect".into(),
        };
        let [labels, keys, stimulus] = stimulus_lines(&choices, &KeyBindings::default(), "rose");

        assert!(labels.starts_with("flower"));
        assert!(labels.ends_with("insect"));
        assert_eq!(labels.len(), WIDTH);
        assert!(keys.starts_with("[E]"));
        assert!(keys.ends_with("[I]"));
        assert_eq!(stimulus.trim_start(), "rose");
        assert_eq!(stimulus.len(), WIDTH / 2 - 2 + 4);
    }

    #[test]
    fn unprintable_keys_show_their_code() {
        assert_eq!(key_label(KeyCode(69)), "E");
        assert_eq!(key_label(KeyCode::SPACE), "#32");
    }
}
