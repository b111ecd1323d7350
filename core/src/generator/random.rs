use ndarray::Array2;

use super::*;

/// Purely random placement that keeps the first-clicked cell and its
/// neighbors free of mines.
#[derive(Clone, Debug, PartialEq)]
pub struct RandomLayoutGenerator {
    seed: u64,
    exclude: Coord2,
}

impl RandomLayoutGenerator {
    pub fn new(seed: u64, exclude: Coord2) -> Self {
        Self { seed, exclude }
    }
}

impl LayoutGenerator for RandomLayoutGenerator {
    fn generate(self, config: GameConfig) -> MineLayout {
        use rand::prelude::*;

        let (rows, cols) = config.size;
        let mut mine_mask: Array2<bool> = Array2::default(config.size.to_nd_index());
        if rows == 0 || cols == 0 {
            log::warn!("Empty board requested, no mines placed");
            return MineLayout::from_mine_mask(mine_mask);
        }

        let available = config
            .total_cells()
            .saturating_sub(config.exclusion_zone_len(self.exclude));
        let mines = if config.mines > available {
            log::warn!(
                "Too many mines for a safe first click, requested {} but only fits {}",
                config.mines,
                available
            );
            available
        } else {
            config.mines
        };

        // rejection sampling, fine while mines are sparse relative to the board
        let mut rng = SmallRng::seed_from_u64(self.seed);
        let mut placed = 0;
        while placed < mines {
            let coords = (rng.random_range(0..rows), rng.random_range(0..cols));
            if is_within_one(coords, self.exclude) || mine_mask[coords.to_nd_index()] {
                continue;
            }
            mine_mask[coords.to_nd_index()] = true;
            placed += 1;
        }

        log::debug!(
            "Placed {} mines on {}x{} board, excluding around {:?}",
            placed,
            rows,
            cols,
            self.exclude
        );
        MineLayout::from_mine_mask(mine_mask)
    }
}
