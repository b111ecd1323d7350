use alloc::vec;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BoardState {
    /// No cell revealed yet, mines may not be placed.
    #[default]
    Ready,
    Active,
    Won,
    Lost,
}

impl BoardState {
    pub const fn is_ready(self) -> bool {
        matches!(self, Self::Ready)
    }

    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

/// Grid state for a single game, from the first click to a win or a loss.
///
/// Mines are placed lazily by the first [`Board::reveal`], never within one
/// cell of the revealed position.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Board {
    config: GameConfig,
    seed: u64,
    mine_layout: Option<MineLayout>,
    cells: Array2<EngineCell>,
    revealed_count: CellCount,
    flagged_count: CellCount,
    state: BoardState,
    triggered_mine: Option<Coord2>,
}

impl Board {
    /// Fresh board without mines, they are placed using `seed` on the first reveal.
    pub fn new(config: GameConfig, seed: u64) -> Self {
        Self {
            config,
            seed,
            mine_layout: None,
            cells: Array2::default(config.size.to_nd_index()),
            revealed_count: 0,
            flagged_count: 0,
            state: BoardState::Ready,
            triggered_mine: None,
        }
    }

    /// Board over a known layout, the first reveal skips placement.
    pub fn from_layout(mine_layout: MineLayout) -> Self {
        let mut board = Self::new(mine_layout.game_config(), 0);
        board.mine_layout = Some(mine_layout);
        board
    }

    /// Rebuilds a board from per-cell revealed and flagged facets.
    pub fn restore(
        mine_layout: MineLayout,
        revealed: &Array2<bool>,
        flagged: &Array2<bool>,
    ) -> Result<Self> {
        let dim = mine_layout.size().to_nd_index();
        if revealed.shape() != dim || flagged.shape() != dim {
            return Err(GameError::InvalidBoardShape);
        }

        let mut cells: Array2<EngineCell> = Array2::default(dim);
        let mut revealed_count = 0;
        let mut flagged_count = 0;
        let mut triggered_mine = None;
        for ((row, col), cell) in cells.indexed_iter_mut() {
            let coords = (row as Coord, col as Coord);
            *cell = match (revealed[(row, col)], flagged[(row, col)]) {
                (true, true) => return Err(GameError::ConflictingCellState),
                (false, false) => EngineCell::Hidden,
                (false, true) => {
                    flagged_count += 1;
                    EngineCell::Flagged
                }
                (true, false) if mine_layout.contains_mine(coords) => {
                    if triggered_mine.is_none() {
                        triggered_mine = Some(coords);
                    }
                    EngineCell::Mine
                }
                (true, false) => {
                    revealed_count += 1;
                    EngineCell::Revealed(mine_layout.adjacent_mine_count(coords))
                }
            };
        }

        let mut board = Self::from_layout(mine_layout);
        board.cells = cells;
        board.revealed_count = revealed_count;
        board.flagged_count = flagged_count;

        if triggered_mine.is_some() {
            board.triggered_mine = triggered_mine;
            board.reveal_mines();
            board.state = BoardState::Lost;
        } else if revealed_count > 0 {
            board.state = BoardState::Active;
        }
        Ok(board)
    }

    pub fn state(&self) -> BoardState {
        self.state
    }

    pub fn is_finished(&self) -> bool {
        self.state.is_finished()
    }

    pub fn game_over(&self) -> bool {
        self.is_finished()
    }

    pub fn did_win(&self) -> bool {
        matches!(self.state, BoardState::Won)
    }

    /// Whether the next reveal will place the mines.
    pub fn is_first_click(&self) -> bool {
        self.mine_layout.is_none()
    }

    pub fn config(&self) -> GameConfig {
        self.config
    }

    pub fn size(&self) -> Coord2 {
        self.config.size
    }

    pub fn total_mines(&self) -> CellCount {
        self.mine_layout
            .as_ref()
            .map_or(self.config.mines, MineLayout::mine_count)
    }

    pub fn mine_layout(&self) -> Option<&MineLayout> {
        self.mine_layout.as_ref()
    }

    pub fn revealed_count(&self) -> CellCount {
        self.revealed_count
    }

    /// Flags placed by the player, unchanged by revealing mines on a loss.
    pub fn flagged_count(&self) -> CellCount {
        self.flagged_count
    }

    /// Mines minus flags placed, negative when the player over-flags.
    ///
    /// Frozen once the game ends, flags covered by revealed mines still count.
    pub fn remaining_mine_count(&self) -> isize {
        (self.total_mines() as isize) - (self.flagged_count as isize)
    }

    pub fn triggered_mine(&self) -> Option<Coord2> {
        self.triggered_mine
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        let (rows, cols) = self.size();
        if coords.0 < rows && coords.1 < cols {
            Ok(coords)
        } else {
            Err(GameError::InvalidCoords)
        }
    }

    pub fn cell_at(&self, coords: Coord2) -> EngineCell {
        self.cells[coords.to_nd_index()]
    }

    pub fn cell_view(&self, coords: Coord2) -> CellView {
        let cell = self.cell_at(coords);
        let (is_mine, adjacent_count) = self.mine_layout.as_ref().map_or((false, 0), |layout| {
            (
                layout.contains_mine(coords),
                layout.adjacent_mine_count(coords),
            )
        });
        CellView {
            is_revealed: cell.is_revealed(),
            is_flagged: cell.is_flagged(),
            is_mine,
            adjacent_count,
        }
    }

    /// Every cell in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = (Coord2, CellView)> + '_ {
        self.cells.indexed_iter().map(|((row, col), _)| {
            let coords = (row as Coord, col as Coord);
            (coords, self.cell_view(coords))
        })
    }

    pub fn toggle_flag(&mut self, coords: Coord2) -> Result<MarkOutcome> {
        use EngineCell::*;
        use MarkOutcome::*;

        let coords = self.validate_coords(coords)?;
        if self.state.is_finished() {
            return Ok(NoChange);
        }

        Ok(match self.cells[coords.to_nd_index()] {
            Hidden => {
                self.cells[coords.to_nd_index()] = Flagged;
                self.flagged_count += 1;
                Changed
            }
            Flagged => {
                self.cells[coords.to_nd_index()] = Hidden;
                self.flagged_count -= 1;
                Changed
            }
            Revealed(_) | Mine => NoChange,
        })
    }

    pub fn reveal(&mut self, coords: Coord2) -> Result<RevealOutcome> {
        let coords = self.validate_coords(coords)?;

        if self.state.is_finished() || !matches!(self.cell_at(coords), EngineCell::Hidden) {
            return Ok(RevealOutcome::NoChange);
        }

        let config = self.config;
        let seed = self.seed;
        let layout = self
            .mine_layout
            .get_or_insert_with(|| RandomLayoutGenerator::new(seed, coords).generate(config));

        if layout.contains_mine(coords) {
            self.triggered_mine = Some(coords);
            self.reveal_mines();
            self.end_game(false);
            return Ok(RevealOutcome::HitMine);
        }

        let opened = Self::flood_reveal(layout, &mut self.cells, coords);
        self.revealed_count += opened;
        log::debug!("Revealed {} cells starting at {:?}", opened, coords);

        self.mark_started();
        Ok(if self.check_win() {
            RevealOutcome::Won
        } else {
            RevealOutcome::Revealed
        })
    }

    /// Win iff every safe cell is revealed, flags are not required.
    pub fn check_win(&mut self) -> bool {
        match self.state {
            BoardState::Won => return true,
            BoardState::Lost => return false,
            BoardState::Ready | BoardState::Active => {}
        }

        let Some(layout) = self.mine_layout.as_ref() else {
            return false;
        };

        if self.revealed_count == layout.safe_cell_count() {
            self.end_game(true);
            true
        } else {
            false
        }
    }

    /// Reveals `start` and spreads through zero cells up to their numbered
    /// border, returning how many cells were opened.
    fn flood_reveal(
        layout: &MineLayout,
        cells: &mut Array2<EngineCell>,
        start: Coord2,
    ) -> CellCount {
        let mut opened = 0;
        let mut to_visit = vec![start];

        while let Some(visit_coords) = to_visit.pop() {
            // flags and already opened cells stop the spread
            if !matches!(cells[visit_coords.to_nd_index()], EngineCell::Hidden) {
                continue;
            }

            let adjacent_mines = layout.adjacent_mine_count(visit_coords);
            cells[visit_coords.to_nd_index()] = EngineCell::Revealed(adjacent_mines);
            opened += 1;
            log::trace!(
                "Flood revealed cell at {:?}, mine count: {}",
                visit_coords,
                adjacent_mines
            );

            if adjacent_mines == 0 {
                to_visit.extend(
                    layout
                        .iter_neighbors(visit_coords)
                        .filter(|&pos| matches!(cells[pos.to_nd_index()], EngineCell::Hidden)),
                );
            }
        }

        opened
    }

    fn reveal_mines(&mut self) {
        let Self {
            mine_layout,
            cells,
            ..
        } = self;
        let Some(layout) = mine_layout.as_ref() else {
            return;
        };

        // flags are not counted back, the mine counter stays as it was
        for coords in layout.iter_mines() {
            cells[coords.to_nd_index()] = EngineCell::Mine;
        }
    }

    fn mark_started(&mut self) {
        if matches!(self.state, BoardState::Ready) {
            log::debug!("Board started");
            self.state = BoardState::Active;
        }
    }

    fn end_game(&mut self, won: bool) {
        if self.state.is_finished() {
            return;
        }

        self.state = if won {
            BoardState::Won
        } else {
            BoardState::Lost
        };
        log::debug!("Board finished: {:?}", self.state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout(size: Coord2, mines: &[Coord2]) -> MineLayout {
        MineLayout::from_mine_coords(size, mines).unwrap()
    }

    fn wall_board() -> Board {
        let mines = [(0, 2), (1, 2), (2, 2), (3, 2), (4, 2)];
        Board::from_layout(layout((5, 5), &mines))
    }

    #[test]
    fn new_board_is_blank() {
        let board = Board::new(Difficulty::Easy.config(), 1);

        assert_eq!(board.state(), BoardState::Ready);
        assert!(board.is_first_click());
        assert!(!board.game_over());
        assert_eq!(board.remaining_mine_count(), 10);
        assert!(board.cells().all(|(_, cell)| cell == CellView::default()));
    }

    #[test]
    fn first_reveal_places_mines_away_from_click() {
        for seed in 0..16 {
            let mut board = Board::new(Difficulty::Easy.config(), seed);

            let outcome = board.reveal((4, 4)).unwrap();

            assert_ne!(outcome, RevealOutcome::HitMine);
            assert!(!board.is_first_click());
            assert_eq!(board.total_mines(), 10);
            assert_eq!(board.cells().filter(|(_, cell)| cell.is_mine).count(), 10);
            for row in 3..=5 {
                for col in 3..=5 {
                    assert!(!board.cell_view((row, col)).is_mine);
                }
            }
        }
    }

    #[test]
    fn empty_three_by_three_wins_on_first_reveal() {
        let mut board = Board::new(GameConfig::new(3, 3, 0).unwrap(), 0);

        assert_eq!(board.reveal((2, 1)).unwrap(), RevealOutcome::Won);
        assert_eq!(board.revealed_count(), 9);
        assert!(board.did_win());
    }

    #[test]
    fn flood_stops_at_numbered_border() {
        let mut board = wall_board();

        assert_eq!(board.reveal((0, 0)).unwrap(), RevealOutcome::Revealed);

        for row in 0..5 {
            assert_eq!(board.cell_at((row, 0)), EngineCell::Revealed(0));
            assert!(matches!(board.cell_at((row, 1)), EngineCell::Revealed(n) if n >= 2));
            for col in 2..5 {
                assert_eq!(board.cell_at((row, col)), EngineCell::Hidden);
            }
        }
        assert_eq!(board.cell_at((2, 1)), EngineCell::Revealed(3));
        assert_eq!(board.revealed_count(), 10);
        assert_eq!(board.state(), BoardState::Active);
    }

    #[test]
    fn numbered_cell_reveals_only_itself() {
        let mut board = wall_board();

        assert_eq!(board.reveal((2, 3)).unwrap(), RevealOutcome::Revealed);
        assert_eq!(board.revealed_count(), 1);
        assert_eq!(board.cell_at((2, 3)), EngineCell::Revealed(3));
    }

    #[test]
    fn flags_block_flood_and_reveal() {
        let mut board = Board::from_layout(layout((3, 3), &[]));

        assert_eq!(board.toggle_flag((2, 2)).unwrap(), MarkOutcome::Changed);
        assert_eq!(board.reveal((2, 2)).unwrap(), RevealOutcome::NoChange);
        assert_eq!(board.reveal((0, 0)).unwrap(), RevealOutcome::Revealed);
        assert_eq!(board.revealed_count(), 8);
        assert_eq!(board.cell_at((2, 2)), EngineCell::Flagged);

        board.toggle_flag((2, 2)).unwrap();
        assert_eq!(board.reveal((2, 2)).unwrap(), RevealOutcome::Won);
    }

    #[test]
    fn hitting_mine_reveals_only_mines_and_freezes_board() {
        let mut board = Board::from_layout(layout((3, 3), &[(0, 0), (2, 2)]));

        assert_eq!(board.reveal((0, 2)).unwrap(), RevealOutcome::Revealed);
        assert_eq!(board.revealed_count(), 4);
        board.toggle_flag((2, 2)).unwrap();

        assert_eq!(board.reveal((0, 0)).unwrap(), RevealOutcome::HitMine);
        assert_eq!(board.state(), BoardState::Lost);
        assert_eq!(board.triggered_mine(), Some((0, 0)));
        assert_eq!(board.cell_at((0, 0)), EngineCell::Mine);
        assert_eq!(board.cell_at((2, 2)), EngineCell::Mine);
        assert_eq!(board.revealed_count(), 4);
        for coords in [(1, 0), (2, 0), (2, 1)] {
            assert_eq!(board.cell_at(coords), EngineCell::Hidden);
        }

        assert_eq!(board.reveal((1, 0)).unwrap(), RevealOutcome::NoChange);
        assert_eq!(board.toggle_flag((1, 0)).unwrap(), MarkOutcome::NoChange);
        assert_eq!(board.cell_at((1, 0)), EngineCell::Hidden);
    }

    #[test]
    fn mine_counter_is_frozen_on_loss() {
        let mut board = Board::from_layout(layout((3, 3), &[(0, 0), (2, 2)]));
        board.toggle_flag((2, 2)).unwrap();
        board.toggle_flag((1, 0)).unwrap();
        assert_eq!(board.remaining_mine_count(), 0);

        assert_eq!(board.reveal((0, 0)).unwrap(), RevealOutcome::HitMine);

        assert_eq!(board.cell_at((2, 2)), EngineCell::Mine);
        assert_eq!(board.cell_at((1, 0)), EngineCell::Flagged);
        assert_eq!(board.flagged_count(), 2);
        assert_eq!(board.remaining_mine_count(), 0);
    }

    #[test]
    fn toggling_flag_twice_restores_cell() {
        let mut board = Board::new(Difficulty::Easy.config(), 3);

        assert_eq!(board.toggle_flag((0, 0)).unwrap(), MarkOutcome::Changed);
        assert!(board.cell_view((0, 0)).is_flagged);
        assert_eq!(board.remaining_mine_count(), 9);

        assert_eq!(board.toggle_flag((0, 0)).unwrap(), MarkOutcome::Changed);
        assert_eq!(board.cell_at((0, 0)), EngineCell::Hidden);
        assert_eq!(board.remaining_mine_count(), 10);
    }

    #[test]
    fn toggling_revealed_cell_is_noop() {
        let mut board = wall_board();
        board.reveal((2, 3)).unwrap();

        assert_eq!(board.toggle_flag((2, 3)).unwrap(), MarkOutcome::NoChange);
        assert!(!board.cell_view((2, 3)).is_flagged);
        assert_eq!(board.flagged_count(), 0);
    }

    #[test]
    fn remaining_mine_count_goes_negative() {
        let mut board = Board::new(GameConfig::new(4, 4, 1).unwrap(), 0);
        for col in 0..3 {
            board.toggle_flag((0, col)).unwrap();
        }
        assert_eq!(board.remaining_mine_count(), -2);
    }

    #[test]
    fn out_of_range_coords_are_rejected() {
        let mut board = Board::new(Difficulty::Easy.config(), 0);
        assert_eq!(board.reveal((9, 0)), Err(GameError::InvalidCoords));
        assert_eq!(board.toggle_flag((0, 9)), Err(GameError::InvalidCoords));
        assert!(board.is_first_click());
    }

    #[test]
    fn restored_board_with_all_safe_cells_revealed_wins() {
        let layout = layout((2, 3), &[(0, 0)]);
        let mut revealed = Array2::from_elem([2, 3], true);
        revealed[[0, 0]] = false;
        let flagged = Array2::from_elem([2, 3], false);

        let mut board = Board::restore(layout, &revealed, &flagged).unwrap();
        assert_eq!(board.state(), BoardState::Active);
        assert!(board.check_win());
        assert!(board.did_win());
        assert!(board.check_win());
    }

    #[test]
    fn check_win_false_while_safe_cells_hidden() {
        let layout = layout((2, 2), &[(0, 0)]);
        let mut revealed = Array2::from_elem([2, 2], false);
        revealed[[1, 1]] = true;
        let flagged = Array2::from_elem([2, 2], false);

        let mut board = Board::restore(layout, &revealed, &flagged).unwrap();
        assert!(!board.check_win());
        assert_eq!(board.cell_at((1, 1)), EngineCell::Revealed(1));
        assert_eq!(board.state(), BoardState::Active);
    }

    #[test]
    fn restore_rejects_bad_facets() {
        let layout = layout((2, 2), &[(0, 0)]);
        let hidden = Array2::from_elem([2, 2], false);
        let all = Array2::from_elem([2, 2], true);

        assert_eq!(
            Board::restore(layout.clone(), &all, &all),
            Err(GameError::ConflictingCellState)
        );
        assert_eq!(
            Board::restore(layout, &Array2::from_elem([3, 2], false), &hidden),
            Err(GameError::InvalidBoardShape)
        );
    }

    #[test]
    fn restore_with_revealed_mine_is_lost() {
        let layout = layout((2, 2), &[(0, 0)]);
        let mut revealed = Array2::from_elem([2, 2], false);
        revealed[[0, 0]] = true;
        let flagged = Array2::from_elem([2, 2], false);

        let mut board = Board::restore(layout, &revealed, &flagged).unwrap();
        assert!(board.game_over());
        assert!(!board.check_win());
        assert_eq!(board.reveal((1, 1)).unwrap(), RevealOutcome::NoChange);
    }

    #[test]
    fn restore_with_revealed_mine_shows_every_mine() {
        let layout = layout((3, 3), &[(0, 0), (1, 1), (2, 2)]);
        let mut revealed = Array2::from_elem([3, 3], false);
        revealed[[2, 2]] = true;
        revealed[[0, 1]] = true;
        let mut flagged = Array2::from_elem([3, 3], false);
        flagged[[1, 1]] = true;

        let board = Board::restore(layout, &revealed, &flagged).unwrap();

        assert_eq!(board.state(), BoardState::Lost);
        assert_eq!(board.triggered_mine(), Some((2, 2)));
        for coords in [(0, 0), (1, 1), (2, 2)] {
            assert_eq!(board.cell_at(coords), EngineCell::Mine);
        }
        assert_eq!(board.cell_at((0, 1)), EngineCell::Revealed(2));
        assert_eq!(board.cell_at((1, 0)), EngineCell::Hidden);
        assert_eq!(board.revealed_count(), 1);
        assert_eq!(board.flagged_count(), 1);
    }

    #[test]
    fn hard_board_flood_from_corner_terminates() {
        let mut board = Board::new(Difficulty::Hard.config(), 42);

        let outcome = board.reveal((0, 0)).unwrap();

        assert!(matches!(outcome, RevealOutcome::Revealed | RevealOutcome::Won));
        assert!(board.revealed_count() >= 4);
        assert_eq!(board.cell_at((0, 0)), EngineCell::Revealed(0));
    }
}
