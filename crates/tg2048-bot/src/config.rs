use std::io::Read;

use anyhow::{Context, Result};

#[derive(Clone, Debug, PartialEq, Default, serde::Deserialize)]
pub struct Config {
    #[serde(default)]
    pub bot: Bot,
    #[serde(default)]
    pub game: Game,
    #[serde(default)]
    pub console: Console,
}

#[derive(Clone, Debug, PartialEq, serde::Deserialize)]
pub struct Bot {
    /// Environment variable holding the chat platform access token.
    #[serde(default = "defaults::token_env")]
    pub token_env: String,
    /// Long-poll timeout handed to the transport, in seconds.
    #[serde(default = "defaults::poll_timeout_s")]
    pub poll_timeout_s: u64,
    /// Replaces the built-in greeting when set.
    #[serde(default)]
    pub greeting: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Default, serde::Deserialize)]
pub struct Game {
    /// When set, every new game is seeded from a master RNG built from this value.
    #[serde(default)]
    pub seed: Option<u64>,
}

#[derive(Clone, Debug, PartialEq, serde::Deserialize)]
pub struct Console {
    /// User id assigned to input lines that do not start with `@<id>`.
    #[serde(default = "defaults::default_user")]
    pub default_user: i64,
}

impl Default for Bot {
    fn default() -> Self {
        Self {
            token_env: defaults::token_env(),
            poll_timeout_s: defaults::poll_timeout_s(),
            greeting: None,
        }
    }
}

impl Default for Console {
    fn default() -> Self {
        Self { default_user: defaults::default_user() }
    }
}

impl Config {
    pub fn from_toml<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let mut file = std::fs::File::open(path)
            .with_context(|| format!("failed to open config {}", path.display()))?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;
        let cfg: Self = toml::from_str(&contents)
            .with_context(|| format!("failed to parse config {}", path.display()))?;
        Ok(cfg)
    }

    /// Read the access token from the configured environment variable.
    pub fn token(&self) -> Result<String> {
        std::env::var(&self.bot.token_env)
            .with_context(|| format!("environment variable {} is not set", self.bot.token_env))
    }
}

mod defaults {
    pub fn token_env() -> String { "TELEGRAM_API_TOKEN".to_string() }
    pub fn poll_timeout_s() -> u64 { 30 }
    pub fn default_user() -> i64 { 1 }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_fills_defaults() {
        let cfg: Config = toml::from_str("").unwrap();
        assert_eq!(cfg, Config::default());
        assert_eq!(cfg.bot.token_env, "TELEGRAM_API_TOKEN");
        assert_eq!(cfg.bot.poll_timeout_s, 30);
        assert_eq!(cfg.game.seed, None);
        assert_eq!(cfg.console.default_user, 1);
    }

    #[test]
    fn test_reads_toml_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
            [bot]
            token_env = "MY_TOKEN"
            greeting = "hi"

            [game]
            seed = 42

            [console]
            default_user = 7
            "#
        )
        .unwrap();
        let cfg = Config::from_toml(file.path()).unwrap();
        assert_eq!(cfg.bot.token_env, "MY_TOKEN");
        assert_eq!(cfg.bot.poll_timeout_s, 30);
        assert_eq!(cfg.bot.greeting.as_deref(), Some("hi"));
        assert_eq!(cfg.game.seed, Some(42));
        assert_eq!(cfg.console.default_user, 7);
    }

    #[test]
    fn test_reports_missing_file() {
        let err = Config::from_toml("/definitely/not/here.toml").unwrap_err();
        assert!(err.to_string().contains("failed to open config"));
    }

    #[test]
    fn test_reports_missing_token() {
        let mut cfg = Config::default();
        cfg.bot.token_env = "TG2048_TEST_TOKEN_THAT_IS_NEVER_SET".to_string();
        assert!(cfg.token().is_err());
    }
}
