use std::time::Duration;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader, Lines, Stdin, Stdout};
use tracing::{debug, trace};

use crate::transport::{ChatId, ChatTransport, IncomingMessage, MessageId, OutgoingMessage, Update, UserId};

/// Line-oriented transport for playing from a terminal.
///
/// Every input line is one message. A line starting with `@<id>` is sent as
/// that user, anything else as `default_user`. Chat ids equal user ids.
pub struct ConsoleTransport<R, W> {
    lines: Lines<R>,
    out: W,
    default_user: UserId,
    poll_timeout: Duration,
    next_update_id: u64,
    next_message_id: MessageId,
}

impl ConsoleTransport<BufReader<Stdin>, Stdout> {
    pub fn stdio(default_user: UserId, poll_timeout: Duration) -> Self {
        Self::new(BufReader::new(tokio::io::stdin()), tokio::io::stdout(), default_user, poll_timeout)
    }
}

impl<R, W> ConsoleTransport<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    pub fn new(reader: R, out: W, default_user: UserId, poll_timeout: Duration) -> Self {
        Self {
            lines: reader.lines(),
            out,
            default_user,
            poll_timeout,
            next_update_id: 0,
            next_message_id: 0,
        }
    }

    pub fn into_writer(self) -> W {
        self.out
    }

    fn next_message_id(&mut self) -> MessageId {
        self.next_message_id += 1;
        self.next_message_id
    }

    fn make_update(&mut self, line: &str) -> Update {
        let (from, text) = split_sender(line, self.default_user);
        self.next_update_id += 1;
        let message_id = self.next_message_id();
        Update {
            update_id: self.next_update_id,
            message: Some(IncomingMessage {
                message_id,
                chat_id: from,
                from,
                text: text.to_string(),
            }),
        }
    }
}

/// `"@42 left"` -> `(42, "left")`; lines without a valid prefix belong to `default_user`.
fn split_sender(line: &str, default_user: UserId) -> (UserId, &str) {
    if let Some(rest) = line.strip_prefix('@') {
        let (id, text) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
        if let Ok(id) = id.parse() {
            return (id, text.trim());
        }
    }
    (default_user, line)
}

fn format_keyboard(rows: &[Vec<String>]) -> String {
    rows.iter()
        .map(|row| format!("[ {} ]\n", row.join(" | ")))
        .collect()
}

impl<R, W> ChatTransport for ConsoleTransport<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    async fn next_update(&mut self) -> Result<Option<Update>> {
        loop {
            let line = match tokio::time::timeout(self.poll_timeout, self.lines.next_line()).await {
                Err(_elapsed) => {
                    trace!("poll timed out, waiting again");
                    continue;
                }
                Ok(line) => line.context("failed to read input line")?,
            };
            let Some(line) = line else {
                return Ok(None);
            };
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            return Ok(Some(self.make_update(line)));
        }
    }

    async fn send(&mut self, chat: ChatId, message: OutgoingMessage) -> Result<MessageId> {
        let id = self.next_message_id();
        let mut block = format!("--- #{id} to {chat} ---\n{}\n", message.text.trim_end());
        if let Some(rows) = &message.keyboard {
            block.push_str(&format_keyboard(rows));
        }
        self.out
            .write_all(block.as_bytes())
            .await
            .context("failed to write message")?;
        self.out.flush().await?;
        Ok(id)
    }

    async fn delete(&mut self, chat: ChatId, message: MessageId) -> Result<()> {
        debug!(chat, message, "deleting message");
        Ok(())
    }
}
