//! Scripted participant used by the integration tests.
//!
//! The participant is the presenter: whenever a stimulus is rendered it looks
//! up what to do for that item and attempt, and pushes the matching key into
//! the input channel. Everything the engine renders is appended to a shared log.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use engine::core::config::KeyBindings;
use engine::{
    BlockDefinition, BlockProgress, CategorySet, ChannelInput, DisplayChoices, KeyCode, Presenter,
    Side, Trial,
};
use futures_channel::mpsc::UnboundedSender;

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Splash { message: String, button: String },
    Stimulus { item: String, left: String, right: String },
    Feedback(bool),
    Progress(BlockProgress),
}

#[derive(Debug, Clone)]
pub enum Answer {
    Correct,
    Wrong,
    Silent,
    /// Press these keys in order, immediately.
    Keys(Vec<KeyCode>),
    /// Press the correct key after a delay.
    CorrectAfter(Duration),
}

type Script = dyn Fn(&str, u32) -> Answer + Send + Sync;

pub struct Participant {
    tx: UnboundedSender<KeyCode>,
    bindings: KeyBindings,
    script: Box<Script>,
    attempts: Mutex<HashMap<String, u32>>,
    log: Arc<Mutex<Vec<Event>>>,
}

impl Participant {
    /// A participant plus the input source its key presses arrive on.
    pub fn new<F>(script: F) -> (Self, ChannelInput)
    where
        F: Fn(&str, u32) -> Answer + Send + Sync + 'static,
    {
        let (tx, input) = ChannelInput::channel();
        let participant = Self {
            tx,
            bindings: KeyBindings::default(),
            script: Box::new(script),
            attempts: Mutex::new(HashMap::new()),
            log: Arc::new(Mutex::new(Vec::new())),
        };
        (participant, input)
    }

    pub fn always_correct() -> (Self, ChannelInput) {
        Self::new(|_, _| Answer::Correct)
    }

    pub fn log(&self) -> Arc<Mutex<Vec<Event>>> {
        self.log.clone()
    }

    pub fn events(&self) -> Vec<Event> {
        self.log.lock().unwrap().clone()
    }

    pub fn stimuli(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                Event::Stimulus { item, .. } => Some(item),
                _ => None,
            })
            .collect()
    }

    fn press(&self, code: KeyCode) {
        let _ = self.tx.unbounded_send(code);
    }

    fn side_for(choices: &DisplayChoices, category: &str, correct: bool) -> Side {
        let side = choices.side_of(category).expect("trial category is on screen");
        match (side, correct) {
            (side, true) => side,
            (Side::Left, false) => Side::Right,
            (Side::Right, false) => Side::Left,
        }
    }
}

#[async_trait]
impl Presenter<String> for Participant {
    fn render_stimulus(&self, choices: &DisplayChoices, trial: &Trial<String>) {
        self.log.lock().unwrap().push(Event::Stimulus {
            item: trial.item.clone(),
            left: choices.left.clone(),
            right: choices.right.clone(),
        });

        let attempt = {
            let mut attempts = self.attempts.lock().unwrap();
            let count = attempts.entry(trial.item.clone()).or_insert(0);
            *count += 1;
            *count
        };

        match (self.script)(&trial.item, attempt) {
            Answer::Correct => {
                let side = Self::side_for(choices, &trial.category, true);
                self.press(self.bindings.key_for(side));
            }
            Answer::Wrong => {
                let side = Self::side_for(choices, &trial.category, false);
                self.press(self.bindings.key_for(side));
            }
            Answer::Silent => {}
            Answer::Keys(codes) => {
                for code in codes {
                    self.press(code);
                }
            }
            Answer::CorrectAfter(delay) => {
                let side = Self::side_for(choices, &trial.category, true);
                let code = self.bindings.key_for(side);
                let tx = self.tx.clone();
                tokio::spawn(async move {
                    tokio::time::sleep(delay).await;
                    let _ = tx.unbounded_send(code);
                });
            }
        }
    }

    fn render_feedback(&self, active: bool) {
        self.log.lock().unwrap().push(Event::Feedback(active));
    }

    async fn render_splash(&self, message: &str, button_text: &str) {
        self.log.lock().unwrap().push(Event::Splash {
            message: message.to_string(),
            button: button_text.to_string(),
        });
    }

    fn render_progress(&self, progress: &BlockProgress) {
        self.log.lock().unwrap().push(Event::Progress(*progress));
    }
}

pub fn flowers_and_insects() -> BlockDefinition<String> {
    BlockDefinition::new(
        CategorySet::new("flower", vec!["rose".to_string(), "tulip".to_string()]),
        CategorySet::new("insect", vec!["wasp".to_string()]),
    )
}

pub fn good_and_bad() -> BlockDefinition<String> {
    BlockDefinition::new(
        CategorySet::new("good", vec!["joy".to_string()]),
        CategorySet::new("bad", vec!["agony".to_string()]),
    )
}
