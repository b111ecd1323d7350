use serde::{Deserialize, Serialize};

/// Canonical player-visible state stored by the board engine.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum EngineCell {
    #[default]
    Hidden,
    Flagged,
    /// A revealed safe cell with its adjacent mine count.
    Revealed(u8),
    /// A revealed mine, only shown once the game is lost.
    Mine,
}

impl EngineCell {
    pub const fn is_unrevealed(self) -> bool {
        matches!(self, Self::Hidden | Self::Flagged)
    }

    pub const fn is_revealed(self) -> bool {
        !self.is_unrevealed()
    }

    pub const fn is_flagged(self) -> bool {
        matches!(self, Self::Flagged)
    }
}

/// Flattened view of one cell, as consumed by a renderer.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellView {
    pub is_revealed: bool,
    pub is_flagged: bool,
    pub is_mine: bool,
    /// Number of adjacent mines, 0 for mines and for boards without a layout yet.
    pub adjacent_count: u8,
}
