//! Integer geometry for diagram nodes.
//!
//! Layout is computed elsewhere; the model only stores where each node was
//! placed, so positions are plain integer coordinates.

use std::fmt;

/// A point in diagram space.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Point {
    x: i32,
    y: i32,
}

impl Point {
    /// Creates a new point at the given coordinates.
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Returns the x coordinate.
    pub fn x(self) -> i32 {
        self.x
    }

    /// Returns the y coordinate.
    pub fn y(self) -> i32 {
        self.y
    }

    /// Returns this point moved by the given offsets.
    pub fn translate(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x.saturating_add(dx), self.y.saturating_add(dy))
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}
