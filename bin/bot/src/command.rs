//! Slash commands.

/// A recognized bot command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `/start`: greeting.
    Start,
    /// `/clear`: forget the conversation.
    Clear,
    /// `/help`: list commands.
    Help,
    /// `/stats`: usage counters.
    Stats,
    /// `/favorites`: favorited topics.
    Favorites,
    /// Anything else.
    Unknown(String),
}

impl Command {
    /// Maps a lowercase command name (without the slash) to a command.
    #[must_use]
    pub fn parse(name: &str) -> Self {
        match name {
            "start" => Self::Start,
            "clear" => Self::Clear,
            "help" => Self::Help,
            "stats" => Self::Stats,
            "favorites" => Self::Favorites,
            other => Self::Unknown(other.to_string()),
        }
    }
}
