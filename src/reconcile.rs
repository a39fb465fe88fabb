use anyhow::Context as _;

use crate::board::{Board, BoardList, Card, TaskBoard};
use crate::error::BoardError;
use crate::formats::EnrichedCourse;

pub const PYTHON_LIST: &str = "Python";
pub const R_LIST: &str = "R";

/// First board named `name`.
pub fn select_board(boards: Vec<Board>, name: &str) -> Result<Board, BoardError> {
    boards
        .into_iter()
        .find(|board| board.name == name)
        .ok_or_else(|| BoardError::BoardNotFound(name.to_owned()))
}

/// Open lists bucketed by the technology they receive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassifiedLists {
    pub python: Option<BoardList>,
    pub r: Option<BoardList>,
    /// Only the last list that is neither `Python` nor `R`.
    pub other: Option<BoardList>,
}

impl ClassifiedLists {
    fn target(&self, technology: &str) -> Result<&BoardList, BoardError> {
        let (slot, label) = match technology.to_lowercase().as_str() {
            "python" => (&self.python, PYTHON_LIST),
            "r" => (&self.r, R_LIST),
            _ => (&self.other, "other"),
        };
        slot.as_ref()
            .ok_or_else(|| BoardError::MissingList(label.to_owned()))
    }
}

/// Splits lists into `Python`, `R` and a single `other` slot. When several
/// lists fall into `other`, each one overwrites the previous.
#[must_use]
pub fn classify_lists(lists: Vec<BoardList>) -> ClassifiedLists {
    let mut classified = ClassifiedLists::default();
    for list in lists {
        if list.name == PYTHON_LIST {
            classified.python = Some(list);
        } else if list.name == R_LIST {
            classified.r = Some(list);
        } else if let Some(previous) = classified.other.replace(list) {
            tracing::debug!(list = %previous.name, "other list replaced by a later one");
        }
    }
    classified
}

#[derive(Debug)]
pub struct PlannedCard<'a> {
    pub list: &'a BoardList,
    pub course: &'a EnrichedCourse,
}

#[derive(Debug, Default)]
pub struct Plan<'a> {
    pub create: Vec<PlannedCard<'a>>,
    pub skipped: Vec<&'a str>,
}

/// Decides which courses need a card. A course is skipped when a card with
/// exactly its name exists anywhere on the board or is already planned.
/// Fails before anything is written if a needed list is absent.
pub fn plan<'a>(
    courses: &'a [EnrichedCourse],
    existing: &[Card],
    lists: &'a ClassifiedLists,
) -> Result<Plan<'a>, BoardError> {
    let mut plan = Plan::default();
    for course in courses {
        let name = course.course.name.as_str();
        let duplicate = existing.iter().any(|card| card.name == name)
            || plan.create.iter().any(|p| p.course.course.name == name);
        if duplicate {
            plan.skipped.push(name);
            continue;
        }

        let list = lists.target(&course.course.technology)?;
        plan.create.push(PlannedCard { list, course });
    }
    Ok(plan)
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    pub created: Vec<String>,
    pub skipped: Vec<String>,
}

/// Creates a card for every course not yet on the board. Created cards are
/// appended to `existing`, so `existing` tracks the board afterwards.
pub fn reconcile<B: TaskBoard + ?Sized>(
    board: &B,
    courses: &[EnrichedCourse],
    existing: &mut Vec<Card>,
    lists: &ClassifiedLists,
) -> anyhow::Result<ReconcileReport> {
    let plan = plan(courses, existing, lists)?;

    let mut report = ReconcileReport {
        skipped: plan.skipped.iter().map(|name| (*name).to_owned()).collect(),
        ..ReconcileReport::default()
    };
    for skipped in &report.skipped {
        tracing::debug!(card = %skipped, "card already on board");
    }

    for PlannedCard { list, course } in plan.create {
        let name = &course.course.name;
        let card = board
            .add_card(list, name, &course.card_body())
            .with_context(|| format!("create card `{name}` in list `{}`", list.name))?;
        tracing::info!(card = %card.name, list = %list.name, "created card");
        report.created.push(card.name.clone());
        existing.push(card);
    }

    Ok(report)
}

/// Deletes every card on `board`. Returns how many were deleted.
pub fn reset_board<B: TaskBoard + ?Sized>(api: &B, board: &Board) -> anyhow::Result<usize> {
    let cards = api.all_cards(board).context("list cards")?;
    for card in &cards {
        api.delete_card(card)
            .with_context(|| format!("delete card `{}`", card.name))?;
        tracing::info!(card = %card.name, "deleted card");
    }
    Ok(cards.len())
}
