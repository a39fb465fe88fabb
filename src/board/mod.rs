//! Task-board capability and its Trello implementation.

pub mod trello;

use serde::{Deserialize, Serialize};

pub use trello::TrelloClient;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardList {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub id: String,
    pub name: String,
    #[serde(rename = "idList")]
    pub list_id: String,
    #[serde(default, rename = "desc")]
    pub body: String,
}

/// The operations the reconciler needs from a kanban board service.
/// Implementations neither retry nor paginate.
pub trait TaskBoard {
    fn list_boards(&self) -> anyhow::Result<Vec<Board>>;

    fn open_lists(&self, board: &Board) -> anyhow::Result<Vec<BoardList>>;

    /// Every card on the board, archived ones included.
    fn all_cards(&self, board: &Board) -> anyhow::Result<Vec<Card>>;

    fn add_card(&self, list: &BoardList, name: &str, body: &str) -> anyhow::Result<Card>;

    fn delete_card(&self, card: &Card) -> anyhow::Result<()>;
}
