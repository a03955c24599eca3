//! A Module with the Neighborhoods for moving across a layered Grid

use crate::{path::Cost, Cell, Point};
use std::fmt::Debug;

/// A signed step `(dx, dy, dz)` from one Cell to another
pub type Offset = (isize, isize, isize);

/// Cost of a step along the x or z axis
pub const STRAIGHT_COST: Cost = 10;
/// Cost of a diagonal step in the horizontal plane
pub const DIAGONAL_COST: Cost = 14;
/// Cost of changing the layer by one
pub const LAYER_COST: Cost = 10;

/// Defines how a Path can move along the Grid.
///
/// A Neighborhood provides the candidate steps around a Cell, decides whether a blocked step
/// may fall back to the layer below or above, and provides the Heuristic that estimates the
/// Cost of reaching a goal.
///
/// The provided implementations are:
/// - [`FlatNeighborhood`] for Agents that stay on their layer and move in the 8 horizontal
/// directions
/// - [`LayeredNeighborhood`] for Agents that may also climb or drop between layers
pub trait Neighborhood: Clone + Debug + Send + Sync + 'static {
	/// All steps that are considered around a Cell
	fn offsets(&self) -> &'static [Offset];
	/// `true` if a step onto a missing or blocked Cell may use the Cell one layer below,
	/// or else the one above, instead
	fn layer_fallback(&self) -> bool;
	/// Gives a Heuristic for the Cost of reaching `goal` from `point`.
	///
	/// The search only returns the cheapest Paths if this never overestimates the actual
	/// Cost, and never drops by more than the Cost of a step between two neighbors. If you
	/// are unsure, simply return 0: the Paths stay just as cheap, the search only takes longer.
	///
	/// The Cost of each step is always the [`octile_distance`] between the two Cells,
	/// no matter what this returns.
	fn heuristic(&self, point: Point, goal: Point) -> Cost {
		octile_distance(point, goal)
	}
}

/// The octile distance in the horizontal plane plus [`LAYER_COST`] for every layer in between.
///
/// ## Examples
/// ```
/// use nav_lattice::neighbors::octile_distance;
///
/// assert_eq!(octile_distance((0, 0, 0), (4, 0, 4)), 56);
/// assert_eq!(octile_distance((0, 0, 0), (3, 0, 1)), 14 + 2 * 10);
/// assert_eq!(octile_distance((1, 2, 1), (1, 0, 1)), 20);
/// ```
pub fn octile_distance(a: Point, b: Point) -> Cost {
	let dx = a.0.abs_diff(b.0);
	let dy = a.1.abs_diff(b.1);
	let dz = a.2.abs_diff(b.2);
	let (long, short) = if dx > dz { (dx, dz) } else { (dz, dx) };
	DIAGONAL_COST * short + STRAIGHT_COST * (long - short) + LAYER_COST * dy
}

const FLAT_OFFSETS: [Offset; 8] = [
	(-1, 0, -1),
	(-1, 0, 0),
	(-1, 0, 1),
	(0, 0, -1),
	(0, 0, 1),
	(1, 0, -1),
	(1, 0, 0),
	(1, 0, 1),
];

const LAYERED_OFFSETS: [Offset; 26] = [
	(-1, -1, -1),
	(-1, -1, 0),
	(-1, -1, 1),
	(-1, 0, -1),
	(-1, 0, 0),
	(-1, 0, 1),
	(-1, 1, -1),
	(-1, 1, 0),
	(-1, 1, 1),
	(0, -1, -1),
	(0, -1, 0),
	(0, -1, 1),
	(0, 0, -1),
	(0, 0, 1),
	(0, 1, -1),
	(0, 1, 0),
	(0, 1, 1),
	(1, -1, -1),
	(1, -1, 0),
	(1, -1, 1),
	(1, 0, -1),
	(1, 0, 0),
	(1, 0, 1),
	(1, 1, -1),
	(1, 1, 0),
	(1, 1, 1),
];

/// A Neighborhood for Agents that stay on a single layer.
///
/// ```no_code
/// A: Agent, o: reachable in one step
/// o o o
///  \|/
/// o-A-o
///  /|\
/// o o o
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FlatNeighborhood;

impl Neighborhood for FlatNeighborhood {
	fn offsets(&self) -> &'static [Offset] {
		&FLAT_OFFSETS
	}
	fn layer_fallback(&self) -> bool {
		false
	}
}

/// A Neighborhood for Agents that move across layers.
///
/// All 26 Cells of the surrounding 3x3x3 cube are candidates. If the Cell at a step is missing
/// or not walkable, the Cell one layer below is used instead, and if that does not work either,
/// the one above. This lets Agents follow uneven terrain.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LayeredNeighborhood;

impl Neighborhood for LayeredNeighborhood {
	fn offsets(&self) -> &'static [Offset] {
		&LAYERED_OFFSETS
	}
	fn layer_fallback(&self) -> bool {
		true
	}
}

/// Collects all Cells that can be reached from `current` in a single step.
///
/// `lookup` returns the Cell at signed coordinates, or `None` outside of the Grid. Every call
/// is an independent lookup, so a shared Grid only needs to be locked for one Cell at a time.
///
/// A step is admitted if:
/// - the Cell at the step exists and is walkable, or the Neighborhood allows a
/// [`layer_fallback`](Neighborhood::layer_fallback) and the Cell below or above is walkable
/// - for steps that are diagonal in the horizontal plane, both Cells next to `current` that
/// share the step's x or z are walkable. Otherwise the step would cut through a solid corner.
///
/// Each resulting Cell appears at most once in `target`.
pub fn walkable_neighbors<N: Neighborhood>(
	neighborhood: &N,
	current: Point,
	mut lookup: impl FnMut(isize, isize, isize) -> Option<Cell>,
	target: &mut Vec<Cell>,
) {
	let (cx, cy, cz) = (current.0 as isize, current.1 as isize, current.2 as isize);
	let mut open = |x, y, z| lookup(x, y, z).filter(Cell::is_walkable);

	for &(dx, dy, dz) in neighborhood.offsets() {
		let diagonal = dx != 0 && dz != 0;
		if diagonal && (open(cx + dx, cy, cz).is_none() || open(cx, cy, cz + dz).is_none()) {
			continue;
		}

		let (x, y, z) = (cx + dx, cy + dy, cz + dz);
		let mut found = open(x, y, z);
		if found.is_none() && neighborhood.layer_fallback() {
			found = open(x, y - 1, z);
			if found.is_none() {
				found = open(x, y + 1, z);
			}
		}

		if let Some(cell) = found {
			if cell.pos() != current && !target.contains(&cell) {
				target.push(cell);
			}
		}
	}
}
