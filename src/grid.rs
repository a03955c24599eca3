use crate::{cell::Terrain, Cell, CellId, Point};

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// The `(size_x, size_y, size_z)` of a Grid together with the mapping between Points and
/// [`CellId`]s.
///
/// Cells are stored x-major: `id = (x * size_y + y) * size_z + z`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GridBounds {
	size: (usize, usize, usize),
}

impl GridBounds {
	/// Creates the bounds of a Grid with the given size
	pub fn new(size: (usize, usize, usize)) -> GridBounds {
		GridBounds { size }
	}

	/// The size of the Grid along each axis
	pub fn size(&self) -> (usize, usize, usize) {
		self.size
	}

	/// The total number of Cells
	pub fn len(&self) -> usize {
		self.size.0 * self.size.1 * self.size.2
	}

	/// `true` if any of the axes has length 0
	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Checks if signed coordinates lie inside of the Grid
	pub fn contains(&self, x: isize, y: isize, z: isize) -> bool {
		x >= 0
			&& y >= 0
			&& z >= 0
			&& (x as usize) < self.size.0
			&& (y as usize) < self.size.1
			&& (z as usize) < self.size.2
	}

	/// The [`CellId`] of `pos`, or `None` if `pos` is outside of the Grid
	pub fn id_of(&self, pos: Point) -> Option<CellId> {
		let (x, y, z) = pos;
		if x < self.size.0 && y < self.size.1 && z < self.size.2 {
			Some((x * self.size.1 + y) * self.size.2 + z)
		} else {
			None
		}
	}

	/// The inverse of [`id_of`](GridBounds::id_of)
	pub fn point_of(&self, id: CellId) -> Option<Point> {
		if id >= self.len() {
			return None;
		}
		let z = id % self.size.2;
		let rest = id / self.size.2;
		Some((rest / self.size.1, rest % self.size.1, z))
	}

	fn signed_id(&self, x: isize, y: isize, z: isize) -> Option<CellId> {
		if self.contains(x, y, z) {
			self.id_of((x as usize, y as usize, z as usize))
		} else {
			None
		}
	}
}

/// A 3D Grid of [`Cell`]s.
///
/// The Grid owns all of its Cells. After it was built, only the walkability and the
/// [`Terrain`] of single Cells may change. It is never resized.
///
/// To share a NavGrid between concurrent searches, wrap it in a [`SharedGrid`].
#[derive(Clone, Debug)]
pub struct NavGrid {
	bounds: GridBounds,
	spacing: [f32; 3],
	cells: Vec<Cell>,
}

impl NavGrid {
	/// Builds a new NavGrid.
	///
	/// ## Arguments
	/// - `size` - the number of Cells along the x, y (layer) and z axis
	/// - `spacing` - the distance between two neighboring Cells in world units, per axis
	/// - `is_obstructed` - called exactly once for the world position of every Cell. A Cell
	/// is walkable if this returns `false`.
	///
	/// ## Examples
	/// ```
	/// use nav_lattice::NavGrid;
	///
	/// // a pillar at world x = 2.0, z = 2.0
	/// let grid = NavGrid::new((4, 2, 4), [1.0, 2.5, 1.0], |[x, _, z]| x == 2.0 && z == 2.0);
	///
	/// assert_eq!(grid.len(), 32);
	/// assert!(!grid.cell((2, 1, 2)).unwrap().is_walkable());
	/// assert!(grid.cell((1, 1, 2)).unwrap().is_walkable());
	/// ```
	pub fn new(
		size: (usize, usize, usize),
		spacing: [f32; 3],
		mut is_obstructed: impl FnMut([f32; 3]) -> bool,
	) -> NavGrid {
		let bounds = GridBounds::new(size);
		let mut cells = Vec::with_capacity(bounds.len());
		for x in 0..size.0 {
			for y in 0..size.1 {
				for z in 0..size.2 {
					let world = [
						x as f32 * spacing[0],
						y as f32 * spacing[1],
						z as f32 * spacing[2],
					];
					cells.push(Cell::new((x, y, z), !is_obstructed(world)));
				}
			}
		}
		log::debug!("built {}x{}x{} NavGrid", size.0, size.1, size.2);
		NavGrid {
			bounds,
			spacing,
			cells,
		}
	}

	/// Builds a NavGrid with a spacing of 1 from a function that decides whether the Cell at
	/// a Point is walkable.
	///
	/// ## Examples
	/// ```
	/// use nav_lattice::NavGrid;
	///
	/// // a wall along x = 2
	/// let grid = NavGrid::from_fn((5, 1, 5), |(x, _, _)| x != 2);
	///
	/// assert!(!grid.cell((2, 0, 3)).unwrap().is_walkable());
	/// assert!(grid.cell((3, 0, 3)).unwrap().is_walkable());
	/// ```
	pub fn from_fn(
		size: (usize, usize, usize),
		mut walkable: impl FnMut(Point) -> bool,
	) -> NavGrid {
		NavGrid::new(size, [1.0; 3], |[x, y, z]| {
			!walkable((x as usize, y as usize, z as usize))
		})
	}

	/// The [`GridBounds`] of this Grid
	pub fn bounds(&self) -> GridBounds {
		self.bounds
	}

	/// The number of Cells along each axis
	pub fn dimensions(&self) -> (usize, usize, usize) {
		self.bounds.size()
	}

	/// The total number of Cells
	pub fn len(&self) -> usize {
		self.cells.len()
	}

	/// `true` if the Grid has no Cells
	pub fn is_empty(&self) -> bool {
		self.cells.is_empty()
	}

	/// The Cell at signed coordinates.
	///
	/// Coordinates outside of the Grid are not an error and simply return `None`.
	pub fn get(&self, x: isize, y: isize, z: isize) -> Option<&Cell> {
		self.bounds
			.signed_id(x, y, z)
			.and_then(|id| self.cells.get(id))
	}

	/// The Cell at `pos`
	pub fn cell(&self, pos: Point) -> Option<&Cell> {
		self.bounds.id_of(pos).and_then(|id| self.cells.get(id))
	}

	/// The Cell with the given [`CellId`]
	pub fn cell_by_id(&self, id: CellId) -> Option<&Cell> {
		self.cells.get(id)
	}

	/// The [`CellId`] of `pos`
	pub fn id_of(&self, pos: Point) -> Option<CellId> {
		self.bounds.id_of(pos)
	}

	/// Iterates over all Cells in [`CellId`] order
	pub fn cells(&self) -> std::slice::Iter<'_, Cell> {
		self.cells.iter()
	}

	/// Changes whether the Cell at `pos` is walkable.
	///
	/// Returns `false` if `pos` is outside of the Grid.
	pub fn set_walkable(&mut self, pos: Point, walkable: bool) -> bool {
		match self.cell_mut(pos) {
			Some(cell) => {
				cell.walkable = walkable;
				true
			}
			None => false,
		}
	}

	/// Changes the [`Terrain`] of the Cell at `pos`.
	///
	/// Returns `false` if `pos` is outside of the Grid.
	pub fn set_terrain(&mut self, pos: Point, terrain: Terrain) -> bool {
		match self.cell_mut(pos) {
			Some(cell) => {
				cell.terrain = terrain;
				true
			}
			None => false,
		}
	}

	/// The world position of a Cell
	pub fn world_position(&self, pos: Point) -> [f32; 3] {
		[
			pos.0 as f32 * self.spacing[0],
			pos.1 as f32 * self.spacing[1],
			pos.2 as f32 * self.spacing[2],
		]
	}

	/// The Point of the Cell closest to a world position, or `None` if that is outside of
	/// the Grid.
	///
	/// ## Examples
	/// ```
	/// use nav_lattice::NavGrid;
	///
	/// let grid = NavGrid::new((4, 2, 4), [2.0, 3.0, 2.0], |_| false);
	///
	/// assert_eq!(grid.point_from_world([3.9, 3.2, 0.4]), Some((2, 1, 0)));
	/// assert_eq!(grid.point_from_world([-1.5, 0.0, 0.0]), None);
	/// ```
	pub fn point_from_world(&self, world: [f32; 3]) -> Option<Point> {
		let mut signed = [0isize; 3];
		for axis in 0..3 {
			let spacing = self.spacing[axis];
			let scaled = if spacing == 0.0 {
				0.0
			} else {
				world[axis] / spacing
			};
			signed[axis] = scaled.round() as isize;
		}
		let [x, y, z] = signed;
		if self.bounds.contains(x, y, z) {
			Some((x as usize, y as usize, z as usize))
		} else {
			None
		}
	}

	fn cell_mut(&mut self, pos: Point) -> Option<&mut Cell> {
		self.bounds.id_of(pos).and_then(|id| self.cells.get_mut(id))
	}
}

/// A cloneable, thread-safe handle to a [`NavGrid`].
///
/// All concurrent searches read the Grid through this handle. Every lookup takes the lock for
/// exactly one Cell and returns a copy of it, so a search never holds the lock while it does
/// anything else.
#[derive(Clone, Debug)]
pub struct SharedGrid {
	inner: Arc<RwLock<NavGrid>>,
	bounds: GridBounds,
}

impl SharedGrid {
	/// Moves `grid` behind a lock
	pub fn new(grid: NavGrid) -> SharedGrid {
		SharedGrid {
			bounds: grid.bounds(),
			inner: Arc::new(RwLock::new(grid)),
		}
	}

	/// The [`GridBounds`] of the Grid. Does not take the lock.
	pub fn bounds(&self) -> GridBounds {
		self.bounds
	}

	/// The total number of Cells. Does not take the lock.
	pub fn len(&self) -> usize {
		self.bounds.len()
	}

	/// `true` if the Grid has no Cells
	pub fn is_empty(&self) -> bool {
		self.bounds.is_empty()
	}

	/// A copy of the Cell at signed coordinates, see [`NavGrid::get`]
	pub fn get(&self, x: isize, y: isize, z: isize) -> Option<Cell> {
		self.read().get(x, y, z).copied()
	}

	/// A copy of the Cell at `pos`
	pub fn cell(&self, pos: Point) -> Option<Cell> {
		self.read().cell(pos).copied()
	}

	/// Changes whether the Cell at `pos` is walkable, see [`NavGrid::set_walkable`].
	///
	/// Searches that are already running see the change from their next lookup on.
	pub fn set_walkable(&self, pos: Point, walkable: bool) -> bool {
		self.write().set_walkable(pos, walkable)
	}

	/// Locks the Grid for reading.
	///
	/// Keep the guard short-lived, every search waits on it for its next lookup.
	pub fn read(&self) -> RwLockReadGuard<'_, NavGrid> {
		// Cells are plain data, a panic while holding the lock cannot leave them torn
		self.inner.read().unwrap_or_else(PoisonError::into_inner)
	}

	/// Locks the Grid for writing
	pub fn write(&self) -> RwLockWriteGuard<'_, NavGrid> {
		self.inner.write().unwrap_or_else(PoisonError::into_inner)
	}
}

impl From<NavGrid> for SharedGrid {
	fn from(grid: NavGrid) -> SharedGrid {
		SharedGrid::new(grid)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn id_round_trip() {
		let bounds = GridBounds::new((3, 2, 4));
		assert_eq!(bounds.len(), 24);
		assert_eq!(bounds.id_of((0, 0, 0)), Some(0));
		assert_eq!(bounds.id_of((0, 0, 1)), Some(1));
		assert_eq!(bounds.id_of((0, 1, 0)), Some(4));
		assert_eq!(bounds.id_of((1, 0, 0)), Some(8));
		assert_eq!(bounds.id_of((2, 1, 3)), Some(23));
		assert_eq!(bounds.point_of(23), Some((2, 1, 3)));
		assert_eq!(bounds.point_of(24), None);
		assert_eq!(bounds.id_of((3, 0, 0)), None);
	}

	#[test]
	fn out_of_bounds_is_none() {
		let grid = NavGrid::from_fn((2, 2, 2), |_| true);
		assert!(grid.get(0, 0, 0).is_some());
		assert!(grid.get(-1, 0, 0).is_none());
		assert!(grid.get(0, 2, 0).is_none());
		assert!(grid.get(1, 1, 2).is_none());
		assert!(grid.cell((5, 0, 0)).is_none());
	}

	#[test]
	fn obstruction_test_runs_once_per_cell() {
		let mut calls = 0;
		let grid = NavGrid::new((3, 2, 3), [1.0, 1.0, 1.0], |[_, y, _]| {
			calls += 1;
			y > 0.5
		});
		assert_eq!(calls, 18);
		assert_eq!(grid.cells().filter(|cell| cell.is_walkable()).count(), 9);
		for cell in grid.cells() {
			assert_eq!(grid.cell(cell.pos()), Some(cell));
		}
	}

	#[test]
	fn mutation() {
		let mut grid = NavGrid::from_fn((2, 1, 2), |_| true);
		assert!(grid.set_walkable((1, 0, 1), false));
		assert!(!grid.cell((1, 0, 1)).unwrap().is_walkable());
		assert!(!grid.set_walkable((2, 0, 1), false));

		assert!(grid.set_terrain((0, 0, 0), Terrain::Air));
		assert_eq!(grid.cell((0, 0, 0)).unwrap().terrain(), Terrain::Air);
	}

	#[test]
	fn world_mapping() {
		let grid = NavGrid::new((3, 3, 3), [0.5, 2.0, 0.5], |_| false);
		assert_eq!(grid.world_position((2, 1, 1)), [1.0, 2.0, 0.5]);
		assert_eq!(grid.point_from_world([1.0, 2.0, 0.5]), Some((2, 1, 1)));
		assert_eq!(grid.point_from_world([1.6, 0.0, 0.0]), None);
	}

	#[test]
	fn shared_grid() {
		let shared = SharedGrid::new(NavGrid::from_fn((2, 1, 2), |_| true));
		let other = shared.clone();
		assert_eq!(shared.len(), 4);
		assert!(other.set_walkable((0, 0, 1), false));
		assert!(!shared.cell((0, 0, 1)).unwrap().is_walkable());
		assert_eq!(shared.get(-1, 0, 0), None);

		let handle = std::thread::spawn(move || other.get(1, 0, 1));
		assert_eq!(handle.join().unwrap(), Some(Cell::new((1, 0, 1), true)));
	}
}
