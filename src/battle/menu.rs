//! Cursor state for the battle menus.
use crate::battle::input::Key;
use schema::BagPocket;

/// Entries of the 2x2 action menu, in grid order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionChoice {
    Fight,
    Bag,
    Party,
    Run,
}

impl ActionChoice {
    const GRID: [ActionChoice; 4] = [
        ActionChoice::Fight,
        ActionChoice::Bag,
        ActionChoice::Party,
        ActionChoice::Run,
    ];

    pub fn from_index(index: usize) -> ActionChoice {
        Self::GRID[index.min(3)]
    }
}

/// Move a cursor over a 2x2 grid laid out as
/// ```text
/// 0 1
/// 2 3
/// ```
/// Returns the new index, or `None` when the move would leave the grid or land on a slot
/// `occupied` rejects.
pub fn grid_step(index: usize, key: Key, occupied: impl Fn(usize) -> bool) -> Option<usize> {
    let next = match (key, index) {
        (Key::Left, 1 | 3) => index - 1,
        (Key::Right, 0 | 2) => index + 1,
        (Key::Up, 2 | 3) => index - 2,
        (Key::Down, 0 | 1) => index + 2,
        _ => return None,
    };
    occupied(next).then_some(next)
}

/// Rows of a bag pocket visible at once, including CLOSE BAG.
pub const BAG_VISIBLE_ROWS: usize = 8;

/// What the highlighted bag row refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BagSelection {
    Item(usize),
    CloseBag,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BagCursor {
    pub pocket: usize,
    /// Highlighted row within the visible window.
    pub cursor: usize,
    /// Index of the first visible row.
    pub offset: usize,
}

impl BagCursor {
    pub fn pocket(&self) -> BagPocket {
        match self.pocket {
            0 => BagPocket::Items,
            1 => BagPocket::PokeBalls,
            2 => BagPocket::TmsHms,
            3 => BagPocket::Berries,
            _ => BagPocket::KeyItems,
        }
    }

    /// Switch pocket to the left or right. Returns whether the pocket changed.
    pub fn switch_pocket(&mut self, key: Key) -> bool {
        let next = match key {
            Key::Left if self.pocket > 0 => self.pocket - 1,
            Key::Right if self.pocket + 1 < BagPocket::COUNT => self.pocket + 1,
            _ => return false,
        };
        *self = BagCursor {
            pocket: next,
            ..BagCursor::default()
        };
        true
    }

    /// Move the highlight up or down over a pocket holding `items` stacks, scrolling once the
    /// cursor reaches the edge of the window. Returns whether anything moved.
    pub fn scroll(&mut self, key: Key, items: usize) -> bool {
        let rows = items + 1;
        let visible = rows.min(BAG_VISIBLE_ROWS);
        match key {
            Key::Up if self.cursor > 0 => self.cursor -= 1,
            Key::Up if self.offset > 0 => self.offset -= 1,
            Key::Down if self.cursor + 1 < visible => self.cursor += 1,
            Key::Down if self.offset + self.cursor < items => self.offset += 1,
            _ => return false,
        }
        true
    }

    pub fn selection(&self, items: usize) -> BagSelection {
        let row = self.offset + self.cursor;
        if row >= items {
            BagSelection::CloseBag
        } else {
            BagSelection::Item(row)
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConfirmChoice {
    #[default]
    Yes,
    No,
}

impl ConfirmChoice {
    pub fn step(self, key: Key) -> ConfirmChoice {
        match key {
            Key::Up => ConfirmChoice::Yes,
            Key::Down => ConfirmChoice::No,
            _ => self,
        }
    }
}
