//! Pronunciation playback.
//!
//! Speaking never blocks the caller and never fails loudly: a missing or
//! broken speech command only produces a warning.

use std::process::Stdio;
use std::sync::{Arc, Mutex};
use tracing::{debug, warn};

pub const DEFAULT_LOCALE: &str = "en-US";

pub trait SpeechService: Send + Sync {
    fn speak(&self, text: &str, locale: &str);
}

/// Runs an external program per utterance, e.g. `espeak-ng -v {locale}`.
/// `{locale}` is substituted and the text is passed as the last argument.
pub struct CommandSpeech {
    program: String,
    args: Vec<String>,
}

impl CommandSpeech {
    /// `None` for a blank command line.
    pub fn parse(command: &str) -> Option<Self> {
        let mut parts = command.split_whitespace().map(str::to_string);
        let program = parts.next()?;
        Some(Self {
            program,
            args: parts.collect(),
        })
    }

    fn args_for(&self, text: &str, locale: &str) -> Vec<String> {
        let mut args: Vec<String> = self
            .args
            .iter()
            .map(|a| a.replace("{locale}", locale))
            .collect();
        args.push(text.to_string());
        args
    }
}

impl SpeechService for CommandSpeech {
    fn speak(&self, text: &str, locale: &str) {
        if text.trim().is_empty() {
            return;
        }
        if tokio::runtime::Handle::try_current().is_err() {
            warn!("Speech requested outside the runtime; skipping '{}'", text);
            return;
        }

        let spawned = tokio::process::Command::new(&self.program)
            .args(self.args_for(text, locale))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn();
        match spawned {
            Ok(mut child) => {
                tokio::spawn(async move {
                    if let Err(e) = child.wait().await {
                        warn!("Speech process failed: {}", e);
                    }
                });
            }
            Err(e) => warn!("Could not start speech command '{}': {}", self.program, e),
        }
    }
}

/// Logs instead of speaking.
pub struct SilentSpeech;

impl SpeechService for SilentSpeech {
    fn speak(&self, text: &str, locale: &str) {
        debug!("(silent) speak '{}' [{}]", text, locale);
    }
}

#[derive(Clone, Default)]
pub struct MockSpeech {
    calls: Arc<Mutex<Vec<(String, String)>>>,
}

impl MockSpeech {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }
}

impl SpeechService for MockSpeech {
    fn speak(&self, text: &str, locale: &str) {
        self.calls
            .lock()
            .unwrap()
            .push((text.to_string(), locale.to_string()));
    }
}
