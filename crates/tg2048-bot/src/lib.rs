//! tg2048-bot: chat front end for the tg2048 engine
//!
//! - `transport` defines the chat platform boundary (`ChatTransport`)
//! - `console` is a stdin/stdout transport for local play
//! - `session` keeps one game and best score per user
//! - `bot` routes updates: greeting, moves, restart and stop
//! - `config` loads TOML settings and the access token
pub mod bot;
pub mod command;
pub mod config;
pub mod console;
pub mod session;
pub mod transport;

pub use bot::Bot;
pub use config::Config;
