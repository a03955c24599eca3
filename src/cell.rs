use crate::Point;
use std::fmt;

/// Classification of a [`Cell`] used by vertical movement rules.
///
/// The built-in Neighborhoods treat both kinds the same way. The field is carried so that
/// Grids built from terrain data keep the information around.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Terrain {
	/// A Cell resting on solid ground (default)
	#[default]
	Ground,
	/// A Cell floating above the ground
	Air,
}

/// A single discrete Position of a [`NavGrid`](crate::NavGrid).
///
/// Cells only hold static data. Everything a search needs to remember about a Cell
/// (costs, parent, position in the open list) is kept by the search itself, so any number of
/// searches can look at the same Cell at the same time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Cell {
	pub(crate) pos: Point,
	pub(crate) walkable: bool,
	pub(crate) terrain: Terrain,
}

impl Cell {
	/// Creates a new Cell on the ground
	pub fn new(pos: Point, walkable: bool) -> Cell {
		Cell {
			pos,
			walkable,
			terrain: Terrain::Ground,
		}
	}

	/// The `(x, y, z)` coordinates of the Cell. `y` is the layer.
	pub fn pos(&self) -> Point {
		self.pos
	}
	/// The x coordinate
	pub fn x(&self) -> usize {
		self.pos.0
	}
	/// The layer of the Cell
	pub fn y(&self) -> usize {
		self.pos.1
	}
	/// The z coordinate
	pub fn z(&self) -> usize {
		self.pos.2
	}

	/// `false` if the Cell can never be part of a Path
	pub fn is_walkable(&self) -> bool {
		self.walkable
	}

	/// The [`Terrain`] of this Cell
	pub fn terrain(&self) -> Terrain {
		self.terrain
	}
}

impl fmt::Display for Cell {
	fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
		write!(fmt, "({}, {}, {})", self.pos.0, self.pos.1, self.pos.2)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn accessors() {
		let cell = Cell::new((1, 2, 3), true);
		assert_eq!(cell.pos(), (1, 2, 3));
		assert_eq!((cell.x(), cell.y(), cell.z()), (1, 2, 3));
		assert!(cell.is_walkable());
		assert_eq!(cell.terrain(), Terrain::Ground);
	}

	#[test]
	fn display() {
		assert_eq!(format!("{}", Cell::new((4, 0, 2), false)), "(4, 0, 2)");
	}
}
