//! Board occupancy shared by the command handlers.

use crate::types::{GridPos, TileState, BOARD_COLS, BOARD_ROWS};

const TILE_COUNT: usize = (BOARD_COLS * BOARD_ROWS) as usize;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileStatus {
    cells: [TileState; TILE_COUNT],
}

impl Default for TileStatus {
    fn default() -> Self {
        Self::new()
    }
}

impl TileStatus {
    pub fn new() -> Self {
        Self {
            cells: [TileState::Empty; TILE_COUNT],
        }
    }

    /// `None` when `pos` is off the board.
    pub fn get(&self, pos: GridPos) -> Option<TileState> {
        pos.index().map(|i| self.cells[i])
    }

    /// Returns `false` and leaves the board untouched when `pos` is off the board.
    pub fn set(&mut self, pos: GridPos, state: TileState) -> bool {
        match pos.index() {
            Some(i) => {
                self.cells[i] = state;
                true
            }
            None => false,
        }
    }

    pub fn clear(&mut self) {
        self.cells.fill(TileState::Empty);
    }

    pub fn count(&self, state: TileState) -> usize {
        self.cells.iter().filter(|c| **c == state).count()
    }

    pub fn cells(&self) -> &[TileState] {
        &self.cells
    }
}
