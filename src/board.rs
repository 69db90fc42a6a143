//! Grid representation, group discovery and liberty counting.
//!
//! The board is a flat `N * N` array of cells addressed by `(x, y)`, with `x`
//! the column (left to right) and `y` the row (top to bottom). Groups are
//! computed on demand with an explicit worklist, so a query costs at most
//! one pass over the board and never recurses.

use std::fmt;
use std::str::FromStr;

use anyhow::bail;

use crate::constants::{BOARD_AREA, CHAR_BLACK, CHAR_EMPTY, CHAR_WHITE, DIRECTIONS, N};

/// Stone color. Also used to say whose turn it is.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Color {
    Black,
    White,
}

impl Color {
    pub fn opponent(self) -> Self {
        match self {
            Color::Black => Color::White,
            Color::White => Color::Black,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::Black => write!(f, "black"),
            Color::White => write!(f, "white"),
        }
    }
}

impl FromStr for Color {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "b" | "black" => Ok(Color::Black),
            "w" | "white" => Ok(Color::White),
            _ => bail!("invalid color: {s}"),
        }
    }
}

/// A point on the board as `(x, y)`.
pub type Point = (usize, usize);

/// Convert signed coordinates into a point, or `None` if off the board.
pub fn to_point(x: isize, y: isize) -> Option<Point> {
    if x < 0 || y < 0 || x >= N as isize || y >= N as isize {
        return None;
    }
    Some((x as usize, y as usize))
}

/// Orthogonal neighbors of a point that lie on the board.
pub fn neighbors((x, y): Point) -> impl Iterator<Item = Point> {
    DIRECTIONS
        .into_iter()
        .filter_map(move |(dx, dy)| to_point(x as isize + dx, y as isize + dy))
}

#[inline]
fn idx((x, y): Point) -> usize {
    debug_assert!(x < N && y < N, "point ({x}, {y}) is off the board");
    y * N + x
}

/// A maximal set of 4-connected stones of one color.
///
/// Stones are kept sorted so two traversals of the same group compare equal
/// regardless of the seed point.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Group {
    pub color: Color,
    stones: Vec<Point>,
}

impl Group {
    pub(crate) fn empty(color: Color) -> Self {
        Self {
            color,
            stones: Vec::new(),
        }
    }

    pub fn stones(&self) -> &[Point] {
        &self.stones
    }

    pub fn len(&self) -> usize {
        self.stones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stones.is_empty()
    }

    pub fn contains(&self, p: Point) -> bool {
        self.stones.binary_search(&p).is_ok()
    }

    pub fn into_stones(self) -> Vec<Point> {
        self.stones
    }
}

/// The N x N grid. `None` is an empty intersection.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Board {
    cells: [Option<Color>; BOARD_AREA],
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    pub fn new() -> Self {
        Self {
            cells: [None; BOARD_AREA],
        }
    }

    pub fn size(&self) -> usize {
        N
    }

    pub fn get(&self, p: Point) -> Option<Color> {
        self.cells[idx(p)]
    }

    pub(crate) fn set(&mut self, p: Point, cell: Option<Color>) {
        self.cells[idx(p)] = cell;
    }

    pub fn is_empty_at(&self, p: Point) -> bool {
        self.get(p).is_none()
    }

    /// All empty points in row-major order.
    pub fn empty_points(&self) -> impl Iterator<Item = Point> + '_ {
        (0..BOARD_AREA)
            .filter(|&i| self.cells[i].is_none())
            .map(|i| (i % N, i / N))
    }

    /// Number of stones of `color` on the board.
    pub fn stone_count(&self, color: Color) -> usize {
        self.cells.iter().filter(|&&c| c == Some(color)).count()
    }

    /// Collect the group of `color` containing `start`.
    ///
    /// Returns an empty group when `start` does not hold `color`.
    pub fn group(&self, start: Point, color: Color) -> Group {
        if self.get(start) != Some(color) {
            return Group::empty(color);
        }

        let mut stones = Vec::new();
        let mut stack = vec![start];
        let mut visited = [false; BOARD_AREA];
        visited[idx(start)] = true;

        while let Some(pt) = stack.pop() {
            stones.push(pt);
            for n in neighbors(pt) {
                if !visited[idx(n)] && self.get(n) == Some(color) {
                    visited[idx(n)] = true;
                    stack.push(n);
                }
            }
        }
        stones.sort_unstable();
        Group { color, stones }
    }

    /// The group of whatever stone sits at `p`, if any.
    pub fn group_at(&self, p: Point) -> Option<Group> {
        self.get(p).map(|color| self.group(p, color))
    }

    /// Count distinct empty points adjacent to any stone of `group`.
    pub fn liberties(&self, group: &Group) -> usize {
        let mut seen = [false; BOARD_AREA];
        let mut libs = 0;
        for &pt in group.stones() {
            for n in neighbors(pt) {
                if self.is_empty_at(n) && !seen[idx(n)] {
                    seen[idx(n)] = true;
                    libs += 1;
                }
            }
        }
        libs
    }

    /// The empty points adjacent to `group`, in row-major order.
    pub fn liberty_points(&self, group: &Group) -> Vec<Point> {
        let mut seen = [false; BOARD_AREA];
        for &pt in group.stones() {
            for n in neighbors(pt) {
                if self.is_empty_at(n) {
                    seen[idx(n)] = true;
                }
            }
        }
        (0..BOARD_AREA)
            .filter(|&i| seen[i])
            .map(|i| (i % N, i / N))
            .collect()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..N {
            for x in 0..N {
                let ch = match self.get((x, y)) {
                    Some(Color::Black) => CHAR_BLACK,
                    Some(Color::White) => CHAR_WHITE,
                    None => CHAR_EMPTY,
                };
                if x + 1 < N {
                    write!(f, "{ch} ")?;
                } else {
                    write!(f, "{ch}")?;
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Parse a GTP vertex (e.g. "D4") into a point.
///
/// Columns use letters A-T skipping I, rows count up from the bottom edge.
pub fn parse_vertex(s: &str) -> Option<Point> {
    let s = s.trim();
    let mut chars = s.chars();
    let col_char = chars.next()?.to_ascii_uppercase();
    if !col_char.is_ascii_uppercase() || col_char == 'I' {
        return None;
    }
    let mut col = (col_char as u8 - b'A') as usize;
    if col_char > 'I' {
        col -= 1;
    }

    let row: usize = chars.as_str().parse().ok()?;
    if col >= N || row == 0 || row > N {
        return None;
    }
    Some((col, N - row))
}

/// Convert a point to a GTP vertex string (e.g. "D4").
pub fn vertex_name((x, y): Point) -> String {
    let mut c = b'A' + x as u8;
    if c >= b'I' {
        c += 1;
    }
    format!("{}{}", c as char, N - y)
}
