//! Grid primitives for diagram cells.
//!
//! This module provides the integer coordinate types used to address cells
//! of a `tikzcd` matrix and to express displacements between them.
//!
//! # Overview
//!
//! - [`GridPosition`] - The `(column, row)` address of a cell
//! - [`GridOffset`] - A displacement between two cells
//! - [`Direction`] - One of the four direction letters used by arrow codes
//! - [`GridBounds`] - The inclusive bounding box of a set of positions
//!
//! # Coordinate System
//!
//! ```text
//!   (0,0) ────────► +column
//!     │
//!     │
//!     ▼
//!   +row
//! ```
//!
//! - **Origin**: The first cell after `\begin{tikzcd}`
//! - **Columns**: Increase rightward, one per `&`
//! - **Rows**: Increase downward, one per `\\`

use std::{fmt, ops::Add};

use serde::{Deserialize, Serialize};

/// The `(column, row)` address of a cell in the diagram grid.
///
/// Serialized as a two-element array `[column, row]`.
///
/// # Examples
///
/// ```
/// # use tikzcd_core::geometry::{GridOffset, GridPosition};
/// let origin = GridPosition::new(0, 0);
/// let moved = origin + GridOffset::new(2, -1);
/// assert_eq!(moved, GridPosition::new(2, -1));
/// ```
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(from = "[i32; 2]", into = "[i32; 2]")]
pub struct GridPosition {
    column: i32,
    row: i32,
}

impl GridPosition {
    /// Creates a new grid position.
    pub fn new(column: i32, row: i32) -> Self {
        Self { column, row }
    }

    /// Returns the column index.
    pub fn column(self) -> i32 {
        self.column
    }

    /// Returns the row index.
    pub fn row(self) -> i32 {
        self.row
    }

    /// Returns the position one column to the right.
    pub fn next_column(self) -> Self {
        Self::new(self.column + 1, self.row)
    }

    /// Returns the first position of the following row.
    pub fn next_row(self) -> Self {
        Self::new(0, self.row + 1)
    }

    /// Returns the displacement that leads from `self` to `other`.
    ///
    /// Components saturate at the `i32` range.
    pub fn offset_to(self, other: GridPosition) -> GridOffset {
        GridOffset::new(
            other.column.saturating_sub(self.column),
            other.row.saturating_sub(self.row),
        )
    }
}

impl Add<GridOffset> for GridPosition {
    type Output = GridPosition;

    fn add(self, offset: GridOffset) -> Self::Output {
        Self::new(
            self.column.saturating_add(offset.columns),
            self.row.saturating_add(offset.rows),
        )
    }
}

impl From<[i32; 2]> for GridPosition {
    fn from([column, row]: [i32; 2]) -> Self {
        Self::new(column, row)
    }
}

impl From<GridPosition> for [i32; 2] {
    fn from(position: GridPosition) -> Self {
        [position.column, position.row]
    }
}

impl fmt::Display for GridPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.column, self.row)
    }
}

/// One of the four direction letters accepted in arrow direction codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// `l`, one column to the left.
    Left,
    /// `r`, one column to the right.
    Right,
    /// `u`, one row up.
    Up,
    /// `d`, one row down.
    Down,
}

impl Direction {
    /// Parses a direction letter.
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'l' => Some(Direction::Left),
            'r' => Some(Direction::Right),
            'u' => Some(Direction::Up),
            'd' => Some(Direction::Down),
            _ => None,
        }
    }

    /// Returns the letter used for this direction in markup.
    pub fn as_char(self) -> char {
        match self {
            Direction::Left => 'l',
            Direction::Right => 'r',
            Direction::Up => 'u',
            Direction::Down => 'd',
        }
    }

    /// Returns the unit displacement of this direction.
    pub fn unit(self) -> GridOffset {
        match self {
            Direction::Left => GridOffset::new(-1, 0),
            Direction::Right => GridOffset::new(1, 0),
            Direction::Up => GridOffset::new(0, -1),
            Direction::Down => GridOffset::new(0, 1),
        }
    }
}

/// A displacement in grid units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct GridOffset {
    columns: i32,
    rows: i32,
}

impl GridOffset {
    /// Creates a new offset.
    pub fn new(columns: i32, rows: i32) -> Self {
        Self { columns, rows }
    }

    /// Returns the horizontal component.
    pub fn columns(self) -> i32 {
        self.columns
    }

    /// Returns the vertical component.
    pub fn rows(self) -> i32 {
        self.rows
    }

    /// Checks if both components are zero.
    pub fn is_zero(self) -> bool {
        self.columns == 0 && self.rows == 0
    }

    /// Sums the unit vectors of every letter of a direction code.
    ///
    /// Returns `None` if the code contains a character that is not one of
    /// `l`, `r`, `u`, `d`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use tikzcd_core::geometry::GridOffset;
    /// assert_eq!(GridOffset::from_direction_code("rrd"), Some(GridOffset::new(2, 1)));
    /// assert_eq!(GridOffset::from_direction_code("lr"), Some(GridOffset::new(0, 0)));
    /// assert_eq!(GridOffset::from_direction_code("x"), None);
    /// ```
    pub fn from_direction_code(code: &str) -> Option<Self> {
        code.chars().try_fold(Self::default(), |acc, c| {
            Direction::from_char(c).map(|direction| acc + direction.unit())
        })
    }

    /// Builds the shortest direction code for this offset.
    ///
    /// Horizontal letters come first, repeated by the magnitude of the column
    /// delta, followed by the vertical letters.
    ///
    /// # Examples
    ///
    /// ```
    /// # use tikzcd_core::geometry::GridOffset;
    /// assert_eq!(GridOffset::new(-2, 1).direction_code(), "lld");
    /// assert_eq!(GridOffset::new(0, 0).direction_code(), "");
    /// ```
    pub fn direction_code(self) -> String {
        let horizontal = if self.columns < 0 {
            Direction::Left
        } else {
            Direction::Right
        };
        let vertical = if self.rows < 0 {
            Direction::Up
        } else {
            Direction::Down
        };

        let mut code = String::new();
        code.extend(std::iter::repeat_n(
            horizontal.as_char(),
            self.columns.unsigned_abs() as usize,
        ));
        code.extend(std::iter::repeat_n(
            vertical.as_char(),
            self.rows.unsigned_abs() as usize,
        ));
        code
    }
}

impl Add for GridOffset {
    type Output = GridOffset;

    fn add(self, other: GridOffset) -> Self::Output {
        Self::new(self.columns + other.columns, self.rows + other.rows)
    }
}

/// Inclusive bounding box of a set of grid positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridBounds {
    min: GridPosition,
    max: GridPosition,
}

impl GridBounds {
    /// Computes the bounds of the given positions, or `None` if there are none.
    pub fn from_positions(positions: impl IntoIterator<Item = GridPosition>) -> Option<Self> {
        positions.into_iter().fold(None, |bounds, position| {
            Some(match bounds {
                None => Self {
                    min: position,
                    max: position,
                },
                Some(Self { min, max }) => Self {
                    min: GridPosition::new(
                        min.column.min(position.column),
                        min.row.min(position.row),
                    ),
                    max: GridPosition::new(
                        max.column.max(position.column),
                        max.row.max(position.row),
                    ),
                },
            })
        })
    }

    /// Returns the top-left corner.
    pub fn min(&self) -> GridPosition {
        self.min
    }

    /// Returns the bottom-right corner.
    pub fn max(&self) -> GridPosition {
        self.max
    }

    /// Number of columns covered by the bounds.
    pub fn columns(&self) -> usize {
        (self.max.column.abs_diff(self.min.column) as usize).saturating_add(1)
    }

    /// Number of rows covered by the bounds.
    pub fn rows(&self) -> usize {
        (self.max.row.abs_diff(self.min.row) as usize).saturating_add(1)
    }

    /// Converts an absolute position into `(column, row)` indices relative to
    /// the top-left corner.
    pub fn cell_index(&self, position: GridPosition) -> (usize, usize) {
        (
            position.column.abs_diff(self.min.column) as usize,
            position.row.abs_diff(self.min.row) as usize,
        )
    }
}
