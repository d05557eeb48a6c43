//! Houses (rows, columns, boxes) and the static peer table.
//!
//! Cells are addressed by their row-major index `row * 9 + column` (0-80).
//! All tables in this module are evaluated at compile time.

use crate::{CellMask, HouseMask};

/// A Sudoku house (row, column, or 3×3 box).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum House {
    /// A row identified by its index (0-8, top to bottom).
    Row {
        /// Row index (0-8).
        y: u8,
    },
    /// A column identified by its index (0-8, left to right).
    Column {
        /// Column index (0-8).
        x: u8,
    },
    /// A 3×3 box identified by its index (0-8, left to right, top to bottom).
    Box {
        /// Box index (0-8).
        index: u8,
    },
}

/// Returns the row (0-8) of `cell`.
#[must_use]
#[inline]
pub const fn row_of(cell: u8) -> u8 {
    cell / 9
}

/// Returns the column (0-8) of `cell`.
#[must_use]
#[inline]
pub const fn column_of(cell: u8) -> u8 {
    cell % 9
}

/// Returns the box (0-8) of `cell`.
#[must_use]
#[inline]
pub const fn box_of(cell: u8) -> u8 {
    row_of(cell) / 3 * 3 + column_of(cell) / 3
}

/// Returns the cell index at `(row, column)`.
#[must_use]
#[inline]
pub const fn cell_at(row: u8, column: u8) -> u8 {
    row * 9 + column
}

const fn box_cell(index: u8, i: u8) -> u8 {
    cell_at(index / 3 * 3 + i / 3, index % 3 * 3 + i % 3)
}

const fn build_house_masks() -> [[CellMask; 9]; 3] {
    let mut masks = [[CellMask::EMPTY; 9]; 3];
    let mut house = 0;
    while house < 9 {
        let mut i = 0;
        while i < 9 {
            masks[0][house as usize].insert(cell_at(house, i));
            masks[1][house as usize].insert(cell_at(i, house));
            masks[2][house as usize].insert(box_cell(house, i));
            i += 1;
        }
        house += 1;
    }
    masks
}

static HOUSE_MASKS: [[CellMask; 9]; 3] = build_house_masks();

const fn build_peers() -> [CellMask; 81] {
    let houses = build_house_masks();
    let mut peers = [CellMask::EMPTY; 81];
    let mut cell = 0;
    while cell < 81 {
        let mut mask = houses[0][row_of(cell) as usize]
            .union(houses[1][column_of(cell) as usize])
            .union(houses[2][box_of(cell) as usize]);
        mask.remove(cell);
        peers[cell as usize] = mask;
        cell += 1;
    }
    peers
}

static PEERS: [CellMask; 81] = build_peers();

/// Returns the 20 cells sharing a row, column or box with `cell`.
///
/// # Panics
///
/// Panics if `cell` is not in the range 0-80.
#[must_use]
#[inline]
pub fn peers(cell: u8) -> CellMask {
    PEERS[usize::from(cell)]
}

impl House {
    /// Array containing all houses in row, column, box order.
    pub const ALL: [Self; 27] = {
        let mut all = [Self::Row { y: 0 }; 27];
        let mut i = 0;
        while i < 9 {
            all[i as usize] = Self::Row { y: i };
            all[i as usize + 9] = Self::Column { x: i };
            all[i as usize + 18] = Self::Box { index: i };
            i += 1;
        }
        all
    };

    /// Returns the houses containing `cell`: its row, column and box.
    #[must_use]
    #[inline]
    pub const fn of_cell(cell: u8) -> [Self; 3] {
        [
            Self::Row { y: row_of(cell) },
            Self::Column {
                x: column_of(cell),
            },
            Self::Box {
                index: box_of(cell),
            },
        ]
    }

    /// Returns the cell index of the `i`-th cell (0-8) of this house.
    ///
    /// Row cells run left to right, column cells top to bottom, box cells
    /// left to right then top to bottom.
    ///
    /// # Panics
    ///
    /// Panics if `i` is not in the range 0-8.
    #[must_use]
    #[inline]
    pub fn cell_at(self, i: u8) -> u8 {
        assert!(i < 9);
        match self {
            House::Row { y } => cell_at(y, i),
            House::Column { x } => cell_at(i, x),
            House::Box { index } => box_cell(index, i),
        }
    }

    /// Returns all cells of this house.
    #[must_use]
    #[inline]
    pub fn cells(self) -> CellMask {
        match self {
            House::Row { y } => HOUSE_MASKS[0][usize::from(y)],
            House::Column { x } => HOUSE_MASKS[1][usize::from(x)],
            House::Box { index } => HOUSE_MASKS[2][usize::from(index)],
        }
    }

    /// Projects `cells` onto this house, returning the in-house positions (0-8)
    /// of the members that lie inside it.
    ///
    /// # Examples
    ///
    /// ```
    /// use deduce_core::{CellMask, House, HouseMask};
    ///
    /// let cells = CellMask::from_iter([2, 7, 20]);
    /// let row = House::Row { y: 0 };
    /// assert_eq!(row.locate(cells), HouseMask::from_iter([2, 7]));
    /// ```
    #[must_use]
    pub fn locate(self, cells: CellMask) -> HouseMask {
        let inside = cells & self.cells();
        let mut positions = HouseMask::EMPTY;
        if inside.is_empty() {
            return positions;
        }
        for i in 0..9 {
            if inside.contains(self.cell_at(i)) {
                positions.insert(i);
            }
        }
        positions
    }
}
