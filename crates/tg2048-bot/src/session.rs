use std::collections::HashMap;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tg2048_engine::Game;

use crate::transport::{MessageId, UserId};

/// Per-user state kept by the bot.
#[derive(Debug)]
pub struct Session {
    pub game: Game,
    pub best_score: u32,
    pub greeted: bool,
    /// Last field message sent to this user, deleted before the next one.
    pub last_message: Option<MessageId>,
}

impl Session {
    pub fn new(game: Game) -> Self {
        Self {
            game,
            best_score: 0,
            greeted: false,
            last_message: None,
        }
    }

    /// Fold the current score into the best score and start a new game.
    pub fn restart(&mut self) {
        self.best_score = self.best_score.max(self.game.score());
        self.game.restart();
        self.last_message = None;
        self.greeted = false;
    }

    /// Score line plus the grid, fenced for monospaced display.
    pub fn render(&self) -> String {
        format!(
            "Score: {} Best: {}\n```\n{}```\n",
            self.game.score(),
            self.best_score,
            self.game.grid()
        )
    }
}

/// Sessions keyed by user id.
///
/// When built with a seed, each new game draws its own seed from a master
/// RNG so a whole bot run is reproducible.
#[derive(Debug)]
pub struct SessionRegistry {
    sessions: HashMap<UserId, Session>,
    seeder: Option<StdRng>,
}

impl SessionRegistry {
    pub fn new(seed: Option<u64>) -> Self {
        Self {
            sessions: HashMap::new(),
            seeder: seed.map(StdRng::seed_from_u64),
        }
    }

    /// Session for `user`, created with a fresh game on first contact.
    pub fn get_or_insert(&mut self, user: UserId) -> &mut Session {
        let seeder = &mut self.seeder;
        self.sessions
            .entry(user)
            .or_insert_with(|| Session::new(new_game(seeder)))
    }

    pub fn get(&self, user: UserId) -> Option<&Session> {
        self.sessions.get(&user)
    }

    pub fn get_mut(&mut self, user: UserId) -> Option<&mut Session> {
        self.sessions.get_mut(&user)
    }

    pub fn remove(&mut self, user: UserId) -> Option<Session> {
        self.sessions.remove(&user)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

fn new_game(seeder: &mut Option<StdRng>) -> Game {
    match seeder {
        Some(seeder) => Game::from_seed(seeder.r#gen()),
        None => Game::new(),
    }
}
