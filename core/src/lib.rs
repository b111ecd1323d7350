#![no_std]

extern crate alloc;

use core::ops::BitOr;
use serde::{Deserialize, Serialize};

pub use difficulty::*;
pub use engine::*;
pub use error::*;
pub use generator::*;
pub use layout::*;
pub use session::*;
pub use tile::*;
pub use timer::*;
pub use types::*;

mod difficulty;
mod engine;
mod error;
mod generator;
mod layout;
mod session;
mod tile;
mod timer;
mod types;

/// Board dimensions as `(rows, cols)` plus the number of mines to place.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    pub size: Coord2,
    pub mines: CellCount,
}

impl GameConfig {
    pub const fn new_unchecked(size: Coord2, mines: CellCount) -> Self {
        Self { size, mines }
    }

    /// Validates that the board is non-empty and that `mines` fit outside the
    /// largest possible first-click exclusion zone.
    pub fn new(rows: Coord, cols: Coord, mines: CellCount) -> Result<Self> {
        if rows == 0 || cols == 0 {
            return Err(GameError::EmptyBoard);
        }
        let config = Self::new_unchecked((rows, cols), mines);
        if mines > config.max_mines() {
            return Err(GameError::TooManyMines);
        }
        Ok(config)
    }

    pub const fn rows(&self) -> Coord {
        self.size.0
    }

    pub const fn cols(&self) -> Coord {
        self.size.1
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.size.0, self.size.1)
    }

    pub const fn safe_cells(&self) -> CellCount {
        self.total_cells().saturating_sub(self.mines)
    }

    /// Size of the 3x3 exclusion zone around `center`, clipped at the edges.
    pub const fn exclusion_zone_len(&self, center: Coord2) -> CellCount {
        const fn span(pos: Coord, len: Coord) -> Coord {
            let lo = pos.saturating_sub(1);
            let hi = if pos.saturating_add(1) < len {
                pos + 1
            } else {
                len.saturating_sub(1)
            };
            hi.saturating_sub(lo) + 1
        }
        mult(span(center.0, self.size.0), span(center.1, self.size.1))
    }

    /// Most mines that can be placed whatever cell is clicked first.
    pub const fn max_mines(&self) -> CellCount {
        let zone_rows = if self.size.0 < 3 { self.size.0 } else { 3 };
        let zone_cols = if self.size.1 < 3 { self.size.1 } else { 3 };
        self.total_cells().saturating_sub(mult(zone_rows, zone_cols))
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MarkOutcome {
    NoChange,
    Changed,
}

impl MarkOutcome {
    pub const fn has_update(self) -> bool {
        match self {
            Self::NoChange => false,
            Self::Changed => true,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RevealOutcome {
    NoChange,
    Revealed,
    HitMine,
    Won,
}

impl RevealOutcome {
    pub const fn has_update(self) -> bool {
        use RevealOutcome::*;
        match self {
            NoChange => false,
            Revealed => true,
            HitMine => true,
            Won => true,
        }
    }

    pub const fn is_final(self) -> bool {
        matches!(self, Self::HitMine | Self::Won)
    }
}

/// Merges outcomes, a hit mine takes priority over a win, then over a plain reveal.
impl BitOr for RevealOutcome {
    type Output = RevealOutcome;

    fn bitor(self, rhs: Self) -> Self::Output {
        use RevealOutcome::*;
        match (self, rhs) {
            (HitMine, _) => HitMine,
            (_, HitMine) => HitMine,
            (Won, _) => Won,
            (_, Won) => Won,
            (Revealed, _) => Revealed,
            (_, Revealed) => Revealed,
            (NoChange, NoChange) => NoChange,
        }
    }
}
