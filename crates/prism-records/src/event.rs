//! The closed set of recorded event kinds.

/// What happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    BlockBreak,
    BlockDecay,
    BlockGrow,
    BlockPlace,
    EntityDeath,
    PlayerJoin,
    PlayerQuit,
}

impl EventKind {
    /// Returns the canonical event name stamped into records.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::BlockBreak => "block-break",
            Self::BlockDecay => "block-decay",
            Self::BlockGrow => "block-grow",
            Self::BlockPlace => "block-place",
            Self::EntityDeath => "entity-death",
            Self::PlayerJoin => "player-join",
            Self::PlayerQuit => "player-quit",
        }
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
