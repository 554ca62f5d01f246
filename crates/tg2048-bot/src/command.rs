use tg2048_engine::Move;

/// Button labels of the reply keyboard, in layout order.
pub const LEFT_BUTTON: &str = "\u{2b05}\u{fe0f}";
pub const UP_BUTTON: &str = "\u{2b06}\u{fe0f}";
pub const RIGHT_BUTTON: &str = "\u{27a1}\u{fe0f}";
pub const DOWN_BUTTON: &str = "\u{2b07}\u{fe0f}";
pub const BLANK_BUTTON: &str = " ";

/// Two-row arrow keyboard shown with the greeting.
pub fn game_keyboard() -> Vec<Vec<String>> {
    vec![
        vec![LEFT_BUTTON.into(), UP_BUTTON.into(), RIGHT_BUTTON.into()],
        vec![BLANK_BUTTON.into(), DOWN_BUTTON.into(), BLANK_BUTTON.into()],
    ]
}

/// What a user message asks the bot to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Direction(Move),
    Restart,
    Stop,
    Start,
    /// Any other slash command.
    Unknown,
}

impl Command {
    /// Parse a message text. Returns `None` for text that is not a command
    /// at all (blank buttons, chatter).
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        if let Some(rest) = text.strip_prefix('/') {
            // "/restart@tg2048_bot extra" -> "restart"
            let name = rest
                .split_whitespace()
                .next()
                .unwrap_or("")
                .split('@')
                .next()
                .unwrap_or("");
            return Some(match name.to_ascii_lowercase().as_str() {
                "restart" => Command::Restart,
                "stop" => Command::Stop,
                "start" => Command::Start,
                _ => Command::Unknown,
            });
        }
        parse_direction(text).map(Command::Direction)
    }
}

/// Arrow buttons arrive with stray variation selectors depending on the
/// client, so those are dropped before matching.
fn parse_direction(text: &str) -> Option<Move> {
    let cleaned: String = text
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '\u{fe0f}' && *c != '\u{fe0e}')
        .collect();
    match cleaned.to_lowercase().as_str() {
        "\u{2b05}" | "left" => Some(Move::Left),
        "\u{2b06}" | "up" => Some(Move::Up),
        "\u{27a1}" | "right" => Some(Move::Right),
        "\u{2b07}" | "down" => Some(Move::Down),
        _ => None,
    }
}
