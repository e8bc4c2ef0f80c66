// src/assistant/mod.rs — Chat-style assistant conversation
//
// Holds the append-only message log for one conversation. History lives
// only as long as the view that owns it; nothing here is persisted.

pub mod voice;

use base64::Engine;

use crate::api::ApiClient;
use crate::infra::errors::PulsedeckError;

/// Reply the user sees when the assistant endpoint fails. The view keeps
/// working; the failure is contained to this one message.
pub const APOLOGY: &str = "Sorry, something went wrong on my end. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone)]
pub struct Message {
    pub role: Role,
    pub text: String,
    /// Decoded reply audio, when the server synthesized speech.
    pub audio: Option<Vec<u8>>,
}

impl Message {
    fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
            audio: None,
        }
    }

    fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            text: text.into(),
            audio: None,
        }
    }
}

pub struct Conversation {
    api: ApiClient,
    messages: Vec<Message>,
    busy: bool,
}

impl Conversation {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            messages: vec![Message::assistant(
                "Hi! I'm your assistant. Ask me anything about your accounts, content, or numbers.",
            )],
            busy: false,
        }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Whether a submission is in flight. Views disable input affordances
    /// while this is true; `submit` also rejects overlapping calls itself.
    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// Send a text turn. Appends the user message, queries the assistant
    /// endpoint, and appends the reply. An endpoint failure appends the
    /// apology instead of surfacing an error; only an authorization failure
    /// propagates, so the router can force the login screen.
    pub async fn submit(&mut self, text: &str) -> Result<(), PulsedeckError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(PulsedeckError::Validation("message is empty".into()));
        }
        if self.busy {
            return Err(PulsedeckError::Validation(
                "a submission is already in flight".into(),
            ));
        }

        self.messages.push(Message::user(text));
        self.busy = true;
        let result = self.api.voice_query(text).await;
        self.busy = false;

        match result {
            Ok(reply) => {
                self.messages.push(Message::assistant(reply.response));
                Ok(())
            }
            Err(PulsedeckError::Unauthorized) => Err(PulsedeckError::Unauthorized),
            Err(e) => {
                tracing::warn!("Assistant query failed: {e}");
                self.messages.push(Message::assistant(APOLOGY));
                Ok(())
            }
        }
    }

    /// Send a recorded clip. The server transcribes it, so both the
    /// transcribed user turn and the assistant reply come back together.
    /// Returns decoded reply audio for best-effort playback by the caller.
    pub async fn submit_audio(&mut self, clip: Vec<u8>) -> Result<Option<Vec<u8>>, PulsedeckError> {
        if clip.is_empty() {
            return Err(PulsedeckError::Validation("recording is empty".into()));
        }
        if self.busy {
            return Err(PulsedeckError::Validation(
                "a submission is already in flight".into(),
            ));
        }

        self.busy = true;
        let result = self.api.voice_speak(clip).await;
        self.busy = false;

        match result {
            Ok(reply) => {
                if let Some(query) = reply.query {
                    self.messages.push(Message::user(query));
                }
                let audio = reply.audio.as_deref().and_then(decode_reply_audio);
                let mut message = Message::assistant(reply.response);
                message.audio = audio.clone();
                self.messages.push(message);
                Ok(audio)
            }
            Err(PulsedeckError::Unauthorized) => Err(PulsedeckError::Unauthorized),
            Err(e) => {
                tracing::warn!("Voice submission failed: {e}");
                self.messages
                    .push(Message::assistant("Couldn't process that recording."));
                Ok(None)
            }
        }
    }
}

fn decode_reply_audio(encoded: &str) -> Option<Vec<u8>> {
    match base64::engine::general_purpose::STANDARD.decode(encoded) {
        Ok(bytes) => Some(bytes),
        Err(e) => {
            tracing::warn!("Reply audio was not valid base64: {e}");
            None
        }
    }
}
