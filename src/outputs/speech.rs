use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Context};
use async_trait::async_trait;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::SpeechSink;

/// A speech engine. `say` resolves when the utterance has finished playing.
#[async_trait]
pub trait Voice: Send + Sync + 'static {
    async fn say(&self, text: &str) -> anyhow::Result<()>;
}

/// Runs an external TTS program once per utterance (`espeak`, `say`, ...).
/// The child is killed if the utterance is flushed.
pub struct CommandVoice {
    program: String,
    args: Vec<String>,
}

impl CommandVoice {
    pub fn new(program: impl Into<String>) -> Self {
        Self { program: program.into(), args: Vec::new() }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }
}

#[async_trait]
impl Voice for CommandVoice {
    async fn say(&self, text: &str) -> anyhow::Result<()> {
        let status = tokio::process::Command::new(&self.program)
            .args(&self.args)
            .arg(text)
            .kill_on_drop(true)
            .status()
            .await
            .with_context(|| format!("spawning '{}'", self.program))?;
        if !status.success() {
            return Err(anyhow!("'{}' exited with {}", self.program, status));
        }
        Ok(())
    }
}

/// Logs utterances instead of playing them.
pub struct LogVoice;

#[async_trait]
impl Voice for LogVoice {
    async fn say(&self, text: &str) -> anyhow::Result<()> {
        info!("[SPEAK] {}", text);
        Ok(())
    }
}

/// At most one utterance exists at a time. A new one aborts the previous task,
/// whether it is still waiting on its presentation delay or already speaking.
pub struct FlushingSpeaker<V> {
    voice: Arc<V>,
    current: Option<(Uuid, JoinHandle<()>)>,
}

impl<V: Voice> FlushingSpeaker<V> {
    pub fn new(voice: V) -> Self {
        Self { voice: Arc::new(voice), current: None }
    }

    /// True while an utterance is pending or playing.
    pub fn is_busy(&self) -> bool {
        self.current.as_ref().map(|(_, task)| !task.is_finished()).unwrap_or(false)
    }
}

impl<V: Voice> SpeechSink for FlushingSpeaker<V> {
    fn speak(&mut self, phrase: &str, delay: Duration) {
        self.stop();

        let id = Uuid::new_v4();
        let voice = self.voice.clone();
        let phrase = phrase.to_string();
        let task = tokio::spawn(async move {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            debug!("Utterance {} started", id);
            if let Err(e) = voice.say(&phrase).await {
                warn!("Utterance {} failed: {}", id, e);
            }
        });
        self.current = Some((id, task));
    }

    fn stop(&mut self) {
        if let Some((id, task)) = self.current.take() {
            if !task.is_finished() {
                debug!("Flushing utterance {}", id);
                task.abort();
            }
        }
    }
}

impl<V> Drop for FlushingSpeaker<V> {
    fn drop(&mut self) {
        if let Some((_, task)) = self.current.take() {
            task.abort();
        }
    }
}
