use std::future::Future;

use anyhow::Result;

pub type UserId = i64;
pub type ChatId = i64;
pub type MessageId = i64;

/// A message received from a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncomingMessage {
    pub message_id: MessageId,
    pub chat_id: ChatId,
    pub from: UserId,
    pub text: String,
}

/// One item from the update stream. Updates without a message (edits,
/// joins, ...) carry `None` and are skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Update {
    pub update_id: u64,
    pub message: Option<IncomingMessage>,
}

/// A message the bot wants delivered.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OutgoingMessage {
    pub text: String,
    pub markdown: bool,
    /// Reply keyboard rows; `None` leaves the current keyboard alone.
    pub keyboard: Option<Vec<Vec<String>>>,
}

impl OutgoingMessage {
    pub fn plain<S: Into<String>>(text: S) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn markdown<S: Into<String>>(text: S) -> Self {
        Self {
            text: text.into(),
            markdown: true,
            keyboard: None,
        }
    }

    pub fn with_keyboard(mut self, rows: Vec<Vec<String>>) -> Self {
        self.keyboard = Some(rows);
        self
    }
}

/// Connection to a chat platform.
///
/// `next_update` resolves to `None` once the stream has ended.
pub trait ChatTransport {
    fn next_update(&mut self) -> impl Future<Output = Result<Option<Update>>> + Send;

    fn send(
        &mut self,
        chat: ChatId,
        message: OutgoingMessage,
    ) -> impl Future<Output = Result<MessageId>> + Send;

    fn delete(
        &mut self,
        chat: ChatId,
        message: MessageId,
    ) -> impl Future<Output = Result<()>> + Send;
}
