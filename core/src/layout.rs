use core::ops::Index;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// Immutable mine placement together with the adjacency count of every cell.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MineLayout {
    mine_mask: Array2<bool>,
    adjacent: Array2<u8>,
    mine_count: CellCount,
}

impl MineLayout {
    pub fn from_mine_mask(mine_mask: Array2<bool>) -> Self {
        let mine_count = mine_mask.iter().filter(|&&is_mine| is_mine).count();
        let mine_count = CellCount::try_from(mine_count).unwrap_or(CellCount::MAX);

        let adjacent = Array2::from_shape_fn(mine_mask.dim(), |(row, col)| {
            if mine_mask[(row, col)] {
                return 0;
            }
            // both axes fit in a Coord because the mask was sized from one
            let coords = (row as Coord, col as Coord);
            mine_mask
                .iter_neighbors(coords)
                .filter(|&pos| mine_mask[pos.to_nd_index()])
                .count() as u8
        });

        Self {
            mine_mask,
            adjacent,
            mine_count,
        }
    }

    pub fn from_mine_coords(size: Coord2, mine_coords: &[Coord2]) -> Result<Self> {
        let mut mine_mask: Array2<bool> = Array2::default(size.to_nd_index());

        for &coords in mine_coords {
            if coords.0 >= size.0 || coords.1 >= size.1 {
                return Err(GameError::InvalidCoords);
            }
            mine_mask[coords.to_nd_index()] = true;
        }

        Ok(Self::from_mine_mask(mine_mask))
    }

    pub fn game_config(&self) -> GameConfig {
        GameConfig::new_unchecked(self.size(), self.mine_count)
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        let size = self.size();
        if coords.0 < size.0 && coords.1 < size.1 {
            Ok(coords)
        } else {
            Err(GameError::InvalidCoords)
        }
    }

    pub fn size(&self) -> Coord2 {
        array_size(&self.mine_mask)
    }

    pub fn safe_cell_count(&self) -> CellCount {
        self.total_cells() - self.mine_count
    }

    pub fn total_cells(&self) -> CellCount {
        CellCount::try_from(self.mine_mask.len()).unwrap_or(CellCount::MAX)
    }

    pub fn mine_count(&self) -> CellCount {
        self.mine_count
    }

    pub fn contains_mine(&self, coords: Coord2) -> bool {
        self[coords]
    }

    /// Number of mines around `coords`, 0 when `coords` is itself a mine.
    pub fn adjacent_mine_count(&self, coords: Coord2) -> u8 {
        self.adjacent[coords.to_nd_index()]
    }

    pub fn iter_mines(&self) -> impl Iterator<Item = Coord2> + '_ {
        self.mine_mask
            .indexed_iter()
            .filter(|&(_, &is_mine)| is_mine)
            .map(|((row, col), _)| (row as Coord, col as Coord))
    }

    pub fn iter_neighbors(&self, coords: Coord2) -> NeighborIter {
        self.mine_mask.iter_neighbors(coords)
    }
}

impl Index<Coord2> for MineLayout {
    type Output = bool;

    fn index(&self, (row, col): Coord2) -> &Self::Output {
        &self.mine_mask[(row as usize, col as usize)]
    }
}
