use serde::{Deserialize, Deserializer, Serialize};

pub mod tag;

pub use tag::{generate_tag, IdentityTag};

pub const ROWS: usize = 6;
pub const COLUMNS: usize = 7;

/// Seeded key of the one record that exists at startup.
pub const C4_ID: &str = "c4";

pub type Board = [[String; COLUMNS]; ROWS];

/// Snapshot of one Connect-Four game as the client last wrote it.
///
/// Nothing here is validated: cell markers, `current_player` and `winner`
/// are free-form and `move_history` is kept in the order it was sent.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct GameState {
    #[serde(deserialize_with = "fit_board")]
    pub board: Board,
    pub current_player: String,
    pub winner: String,
    pub move_history: Vec<i64>,
}

impl GameState {
    /// Empty board with red to move.
    pub fn initial() -> Self {
        Self {
            current_player: "red".to_string(),
            ..Self::default()
        }
    }
}

/// Reads a board of any size, keeping the top-left 6x7 window. Missing rows
/// or cells, and `null` ones, come out empty.
fn fit_board<'de, D>(deserializer: D) -> Result<Board, D::Error>
where
    D: Deserializer<'de>,
{
    let rows = Option::<Vec<Option<Vec<Option<String>>>>>::deserialize(deserializer)?;
    let mut board = Board::default();
    for (slot, row) in board.iter_mut().zip(rows.into_iter().flatten()) {
        for (cell, value) in slot.iter_mut().zip(row.into_iter().flatten()) {
            *cell = value.unwrap_or_default();
        }
    }
    Ok(board)
}

/// Container stored under each id. Game kinds hang off their own key.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Data {
    pub c4: GameState,
}

impl Data {
    pub fn initial() -> Self {
        Self {
            c4: GameState::initial(),
        }
    }
}
