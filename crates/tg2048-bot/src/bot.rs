use anyhow::{Context, Result};
use tg2048_engine::MoveOutcome;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::command::{Command, game_keyboard};
use crate::config::Config;
use crate::session::{Session, SessionRegistry};
use crate::transport::{ChatId, ChatTransport, MessageId, OutgoingMessage, Update};

pub const DEFAULT_GREETING: &str = "**tg2048**
2048 clone chat bot

Press any button to start

/stop - stop the game and reset the best score
/restart - restart the current game";

/// Routes chat updates to per-user games.
///
/// Updates are handled one at a time, so a user's game is never touched by
/// two commands at once.
pub struct Bot {
    sessions: SessionRegistry,
    greeting: String,
}

impl Bot {
    pub fn new(config: &Config) -> Self {
        Self {
            sessions: SessionRegistry::new(config.game.seed),
            greeting: config
                .bot
                .greeting
                .clone()
                .unwrap_or_else(|| DEFAULT_GREETING.to_string()),
        }
    }

    pub fn sessions(&self) -> &SessionRegistry {
        &self.sessions
    }

    /// Pull updates until the stream ends or `cancel` fires.
    pub async fn run<T: ChatTransport>(
        &mut self,
        transport: &mut T,
        cancel: CancellationToken,
    ) -> Result<()> {
        loop {
            let update = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    info!("shutdown requested");
                    break;
                }
                res = transport.next_update() => res.context("failed to receive update")?,
            };
            let Some(update) = update else {
                info!("update stream ended");
                break;
            };
            self.handle(transport, update).await?;
        }
        info!(sessions = self.sessions.len(), "bot stopped");
        Ok(())
    }

    /// React to a single update.
    pub async fn handle<T: ChatTransport>(&mut self, transport: &mut T, update: Update) -> Result<()> {
        let Some(msg) = update.message else {
            return Ok(());
        };
        let chat = msg.chat_id;
        let user = msg.from;
        let session = self.sessions.get_or_insert(user);
        debug!(user, text = %msg.text, best = session.best_score, "incoming message");

        if !session.greeted {
            info!(user, "greeting user");
            return greet(transport, chat, session, &self.greeting).await;
        }

        delete_quietly(transport, chat, msg.message_id).await;

        match Command::parse(&msg.text) {
            Some(Command::Stop) => {
                if let Some(last) = session.last_message.take() {
                    delete_quietly(transport, chat, last).await;
                }
                self.sessions.remove(user);
                info!(user, "session stopped");
            }
            Some(Command::Restart) => {
                if let Some(last) = session.last_message.take() {
                    delete_quietly(transport, chat, last).await;
                }
                session.restart();
                info!(user, best = session.best_score, "game restarted");
                greet(transport, chat, session, &self.greeting).await?;
            }
            Some(Command::Direction(dir)) => {
                if let Some(last) = session.last_message.take() {
                    delete_quietly(transport, chat, last).await;
                }
                match session.game.apply_direction(dir)? {
                    MoveOutcome::Moved { delta, spawn } => {
                        debug!(user, ?dir, delta, row = spawn.row, col = spawn.col, "moved");
                        send_field(transport, chat, session).await?;
                    }
                    MoveOutcome::GameOver { score } => {
                        info!(user, score, "game over");
                        transport
                            .send(chat, OutgoingMessage::plain(format!("Game over. Your score is {score}")))
                            .await
                            .context("failed to send game over message")?;
                        session.restart();
                        greet(transport, chat, session, &self.greeting).await?;
                    }
                }
            }
            Some(Command::Start) | Some(Command::Unknown) | None => {
                debug!(user, "ignoring input");
            }
        }
        Ok(())
    }
}

async fn greet<T: ChatTransport>(
    transport: &mut T,
    chat: ChatId,
    session: &mut Session,
    greeting: &str,
) -> Result<()> {
    let hello = OutgoingMessage::markdown(greeting).with_keyboard(game_keyboard());
    transport
        .send(chat, hello)
        .await
        .context("failed to send greeting")?;
    send_field(transport, chat, session).await?;
    session.greeted = true;
    Ok(())
}

async fn send_field<T: ChatTransport>(transport: &mut T, chat: ChatId, session: &mut Session) -> Result<()> {
    let id = transport
        .send(chat, OutgoingMessage::markdown(session.render()))
        .await
        .context("failed to send field")?;
    session.last_message = Some(id);
    Ok(())
}

async fn delete_quietly<T: ChatTransport>(transport: &mut T, chat: ChatId, message: MessageId) {
    if let Err(err) = transport.delete(chat, message).await {
        warn!(chat, message, error = %err, "failed to delete message");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::{IncomingMessage, UserId};
    use anyhow::bail;
    use std::collections::VecDeque;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use tg2048_engine::{Game, Grid};

    #[derive(Default)]
    struct Recording {
        inbox: VecDeque<Update>,
        sent: Vec<(ChatId, MessageId, OutgoingMessage)>,
        deleted: Vec<(ChatId, MessageId)>,
        next_id: MessageId,
        fail_deletes: bool,
    }

    impl ChatTransport for Recording {
        async fn next_update(&mut self) -> Result<Option<Update>> {
            Ok(self.inbox.pop_front())
        }

        async fn send(&mut self, chat: ChatId, message: OutgoingMessage) -> Result<MessageId> {
            self.next_id += 1;
            self.sent.push((chat, self.next_id, message));
            Ok(self.next_id)
        }

        async fn delete(&mut self, chat: ChatId, message: MessageId) -> Result<()> {
            if self.fail_deletes {
                bail!("message {message} can't be deleted");
            }
            self.deleted.push((chat, message));
            Ok(())
        }
    }

    fn update(from: UserId, message_id: MessageId, text: &str) -> Update {
        Update {
            update_id: message_id as u64,
            message: Some(IncomingMessage {
                message_id,
                chat_id: from,
                from,
                text: text.to_string(),
            }),
        }
    }

    fn resumed(grid: Grid, score: u32) -> Game {
        Game::resume(grid, score, StdRng::seed_from_u64(0))
    }

    fn seeded_bot() -> Bot {
        let mut config = Config::default();
        config.game.seed = Some(2048);
        Bot::new(&config)
    }

    #[tokio::test]
    async fn test_greets_on_first_contact() {
        let mut bot = seeded_bot();
        let mut t = Recording::default();
        bot.handle(&mut t, update(1, 100, "hello")).await.unwrap();

        assert_eq!(t.sent.len(), 2);
        let (_, _, hello) = &t.sent[0];
        assert_eq!(hello.text, DEFAULT_GREETING);
        assert_eq!(hello.keyboard, Some(game_keyboard()));
        let (chat, field_id, field) = &t.sent[1];
        assert_eq!(*chat, 1);
        assert!(field.markdown);
        assert!(field.text.starts_with("Score: 0 Best: 0\n```\n"));
        assert!(t.deleted.is_empty());

        let session = bot.sessions().get(1).unwrap();
        assert!(session.greeted);
        assert_eq!(session.last_message, Some(*field_id));
    }

    #[tokio::test]
    async fn test_moves_and_replaces_field() {
        let mut bot = seeded_bot();
        let mut t = Recording::default();
        bot.handle(&mut t, update(1, 100, "hi")).await.unwrap();
        let first_field = bot.sessions().get(1).unwrap().last_message.unwrap();

        bot.handle(&mut t, update(1, 101, "\u{2b05}\u{fe0f}")).await.unwrap();
        assert_eq!(t.deleted, vec![(1, 101), (1, first_field)]);
        assert_eq!(t.sent.len(), 3);
        let session = bot.sessions().get(1).unwrap();
        assert_eq!(session.game.grid().occupied(), 3 - usize::from(session.game.score() > 0));
        assert_eq!(session.last_message, Some(t.sent[2].1));
        assert!(t.sent[2].2.text.starts_with(&format!("Score: {} Best: 0", session.game.score())));
    }

    #[tokio::test]
    async fn test_ignores_chatter_without_touching_field() {
        let mut bot = seeded_bot();
        let mut t = Recording::default();
        bot.handle(&mut t, update(1, 100, "hi")).await.unwrap();
        let field = bot.sessions().get(1).unwrap().last_message;

        bot.handle(&mut t, update(1, 101, "what now?")).await.unwrap();
        bot.handle(&mut t, update(1, 102, " ")).await.unwrap();
        assert_eq!(t.sent.len(), 2);
        assert_eq!(t.deleted, vec![(1, 101), (1, 102)]);
        assert_eq!(bot.sessions().get(1).unwrap().last_message, field);
    }

    #[tokio::test]
    async fn test_stops_and_forgets_user() {
        let mut bot = seeded_bot();
        let mut t = Recording::default();
        bot.handle(&mut t, update(7, 1, "hi")).await.unwrap();
        bot.handle(&mut t, update(7, 2, "/stop")).await.unwrap();
        assert!(bot.sessions().get(7).is_none());
        assert_eq!(t.sent.len(), 2);

        // Coming back starts over with a greeting.
        bot.handle(&mut t, update(7, 3, "up")).await.unwrap();
        assert_eq!(t.sent.len(), 4);
        assert_eq!(t.sent[2].2.text, DEFAULT_GREETING);
    }

    #[tokio::test]
    async fn test_restarts_and_keeps_best() {
        let mut bot = seeded_bot();
        let mut t = Recording::default();
        bot.handle(&mut t, update(3, 1, "hi")).await.unwrap();
        bot.sessions.get_mut(3).unwrap().game = resumed(Grid::from_rows([[4, 0, 0, 0], [0; 4], [0; 4], [0; 4]]), 64);

        bot.handle(&mut t, update(3, 2, "/restart")).await.unwrap();
        let session = bot.sessions().get(3).unwrap();
        assert_eq!(session.best_score, 64);
        assert_eq!(session.game.score(), 0);
        assert_eq!(session.game.grid().occupied(), 2);
        assert!(session.greeted);
        assert_eq!(t.sent.len(), 4);
        assert_eq!(t.sent[2].2.text, DEFAULT_GREETING);
        assert!(t.sent[3].2.text.starts_with("Score: 0 Best: 64\n"));
        assert_eq!(session.last_message, Some(t.sent[3].1));
    }

    #[tokio::test]
    async fn test_reports_game_over_and_restarts() {
        let mut bot = seeded_bot();
        let mut t = Recording::default();
        bot.handle(&mut t, update(4, 1, "hi")).await.unwrap();
        let stuck = Grid::from_rows([
            [2, 4, 2, 4],
            [4, 2, 4, 2],
            [2, 4, 2, 4],
            [4, 2, 4, 2],
        ]);
        bot.sessions.get_mut(4).unwrap().game = resumed(stuck, 500);

        bot.handle(&mut t, update(4, 2, "down")).await.unwrap();
        let texts: Vec<&str> = t.sent[2..].iter().map(|(_, _, m)| m.text.as_str()).collect();
        assert_eq!(texts.len(), 3);
        assert_eq!(texts[0], "Game over. Your score is 500");
        assert!(!t.sent[2].2.markdown);
        assert_eq!(texts[1], DEFAULT_GREETING);
        assert!(texts[2].starts_with("Score: 0 Best: 500\n"));

        let session = bot.sessions().get(4).unwrap();
        assert_eq!(session.best_score, 500);
        assert!(!session.game.is_over());
        assert!(session.greeted);
    }

    #[tokio::test]
    async fn test_survives_failed_deletes() {
        let mut bot = seeded_bot();
        let mut t = Recording {
            fail_deletes: true,
            ..Recording::default()
        };
        bot.handle(&mut t, update(1, 1, "hi")).await.unwrap();
        bot.handle(&mut t, update(1, 2, "right")).await.unwrap();
        assert_eq!(t.sent.len(), 3);
        assert!(t.deleted.is_empty());
    }

    #[tokio::test]
    async fn test_runs_until_stream_ends() {
        let mut bot = seeded_bot();
        let mut t = Recording::default();
        t.inbox.extend([
            update(1, 1, "hi"),
            Update {
                update_id: 2,
                message: None,
            },
            update(2, 3, "hi"),
            update(1, 4, "up"),
        ]);
        bot.run(&mut t, CancellationToken::new()).await.unwrap();
        assert_eq!(bot.sessions().len(), 2);
        assert_eq!(t.sent.len(), 5);
    }

    #[tokio::test]
    async fn test_stops_when_cancelled() {
        let mut bot = seeded_bot();
        let mut t = Recording::default();
        t.inbox.push_back(update(1, 1, "hi"));
        let cancel = CancellationToken::new();
        cancel.cancel();
        bot.run(&mut t, cancel).await.unwrap();
        assert!(t.sent.is_empty());
        assert_eq!(t.inbox.len(), 1);
    }
}
