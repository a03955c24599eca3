//! A* search over a [`SharedGrid`].

use crate::{
	cell_id::{cell_id_map_with_cap, cell_id_set_with_cap, CellIdMap},
	heap::{HeapSlots, IndexedHeap},
	neighbors::{octile_distance, walkable_neighbors, Neighborhood},
	path::{Cost, Path},
	Cell, CellId, NavGrid, PathError, PathResult, Point, SharedGrid,
};

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

/// What a single search remembers about a Cell it has seen.
#[derive(Clone, Copy, Debug)]
struct Scratch {
	cell: Cell,
	g: Cost,
	h: Cost,
	parent: Option<CellId>,
	heap_index: Option<usize>,
}

/// The per-search side table. Cells themselves are never written to, so concurrent searches
/// over the same region do not interfere with each other.
struct ScratchTable {
	entries: CellIdMap<Scratch>,
}

impl HeapSlots<CellId> for ScratchTable {
	/// `(f, h)`: among equal f-costs the Cell closer to the goal comes first
	type Priority = (Cost, Cost);

	fn priority(&self, id: CellId) -> (Cost, Cost) {
		let entry = &self.entries[&id];
		(entry.g + entry.h, entry.h)
	}
	fn heap_index(&self, id: CellId) -> Option<usize> {
		self.entries.get(&id).and_then(|entry| entry.heap_index)
	}
	fn set_heap_index(&mut self, id: CellId, index: Option<usize>) {
		if let Some(entry) = self.entries.get_mut(&id) {
			entry.heap_index = index;
		}
	}
}

/// Calculates the cheapest Path from `start` to `goal`.
///
/// The returned Path excludes `start` and ends with `goal`. It is empty if `start` is `goal`,
/// if either of them lies outside of the Grid, or if `goal` cannot be reached.
///
/// Every Grid lookup locks the [`SharedGrid`] for that one Cell only, so any number of
/// searches can run on the same Grid at the same time.
///
/// ## Examples
/// ```
/// use nav_lattice::{find_path, neighbors::FlatNeighborhood, NavGrid, SharedGrid};
///
/// let grid = SharedGrid::new(NavGrid::from_fn((5, 1, 5), |_| true));
///
/// let path = find_path(&grid, &FlatNeighborhood, (0, 0, 0), (4, 0, 4));
///
/// assert_eq!(path.len(), 4);
/// assert_eq!(path.cost(), 4 * 14);
/// assert_eq!(path.last().map(|cell| cell.pos()), Some((4, 0, 4)));
///
/// assert!(find_path(&grid, &FlatNeighborhood, (2, 0, 2), (2, 0, 2)).is_empty());
/// ```
pub fn find_path<N: Neighborhood>(
	grid: &SharedGrid,
	neighborhood: &N,
	start: Point,
	goal: Point,
) -> Path<Cell> {
	let never = AtomicBool::new(false);
	a_star_search(grid, neighborhood, start, goal, &never).unwrap_or_default()
}

/// Checks that `start` and `goal` are inside of the Grid and walkable.
///
/// ## Examples
/// ```
/// use nav_lattice::{search::validate_request, NavGrid, PathError};
///
/// let grid = NavGrid::from_fn((3, 1, 3), |pos| pos != (2, 0, 2));
///
/// assert!(validate_request(&grid, (0, 0, 0), (1, 0, 1)).is_ok());
/// assert!(matches!(
/// 	validate_request(&grid, (0, 0, 0), (2, 0, 2)),
/// 	Err(PathError::GoalBlocked((2, 0, 2)))
/// ));
/// assert!(matches!(
/// 	validate_request(&grid, (0, 3, 0), (1, 0, 1)),
/// 	Err(PathError::StartOutOfBounds(_))
/// ));
/// ```
pub fn validate_request(grid: &NavGrid, start: Point, goal: Point) -> PathResult<()> {
	match grid.cell(start) {
		None => return Err(PathError::StartOutOfBounds(start)),
		Some(cell) if !cell.is_walkable() => return Err(PathError::StartBlocked(start)),
		Some(_) => {}
	}
	match grid.cell(goal) {
		None => Err(PathError::GoalOutOfBounds(goal)),
		Some(cell) if !cell.is_walkable() => Err(PathError::GoalBlocked(goal)),
		Some(_) => Ok(()),
	}
}

/// The actual search. Returns `None` if `cancel` was set before the search finished.
pub(crate) fn a_star_search<N: Neighborhood>(
	grid: &SharedGrid,
	neighborhood: &N,
	start: Point,
	goal: Point,
	cancel: &AtomicBool,
) -> Option<Path<Cell>> {
	if start == goal {
		return Some(Path::default());
	}
	let bounds = grid.bounds();
	let (Some(start_id), Some(goal_id)) = (bounds.id_of(start), bounds.id_of(goal)) else {
		log::debug!("search {:?} -> {:?} outside of the grid", start, goal);
		return Some(Path::default());
	};
	let Some(start_cell) = grid.cell(start) else {
		return Some(Path::default());
	};

	let timer = Instant::now();
	let size_hint = bounds.len().min(1024);

	let mut open = IndexedHeap::with_reserved(bounds.len(), size_hint);
	let mut closed = cell_id_set_with_cap(size_hint);
	let mut scratch = ScratchTable {
		entries: cell_id_map_with_cap(size_hint),
	};
	scratch.entries.insert(
		start_id,
		Scratch {
			cell: start_cell,
			g: 0,
			h: neighborhood.heuristic(start, goal),
			parent: None,
			heap_index: None,
		},
	);
	open.push(&mut scratch, start_id);

	let mut neighbors = Vec::with_capacity(neighborhood.offsets().len());

	while let Some(current_id) = open.pop(&mut scratch) {
		if cancel.load(Ordering::Relaxed) {
			log::debug!("search {:?} -> {:?} cancelled", start, goal);
			return None;
		}
		closed.insert(current_id);

		let current = scratch.entries[&current_id];
		if current_id == goal_id {
			let path = backtrack(&scratch, goal_id);
			log::trace!(
				"search {:?} -> {:?}: {} steps, cost {}, {} cells closed in {:?}",
				start,
				goal,
				path.len(),
				path.cost(),
				closed.len(),
				timer.elapsed()
			);
			return Some(path);
		}

		neighbors.clear();
		walkable_neighbors(
			neighborhood,
			current.cell.pos(),
			|x, y, z| grid.get(x, y, z),
			&mut neighbors,
		);

		for &neighbor in neighbors.iter() {
			let Some(neighbor_id) = bounds.id_of(neighbor.pos()) else {
				continue;
			};
			if closed.contains(&neighbor_id) {
				continue;
			}
			let tentative = current.g + octile_distance(current.cell.pos(), neighbor.pos());

			if open.contains(&scratch, neighbor_id) {
				match scratch.entries.get_mut(&neighbor_id) {
					Some(entry) if tentative < entry.g => {
						entry.g = tentative;
						entry.parent = Some(current_id);
					}
					_ => continue,
				}
				open.update_higher(&mut scratch, neighbor_id);
			} else {
				scratch.entries.insert(
					neighbor_id,
					Scratch {
						cell: neighbor,
						g: tentative,
						h: neighborhood.heuristic(neighbor.pos(), goal),
						parent: Some(current_id),
						heap_index: None,
					},
				);
				open.push(&mut scratch, neighbor_id);
			}
		}
	}

	log::trace!(
		"search {:?} -> {:?}: no path, {} cells closed in {:?}",
		start,
		goal,
		closed.len(),
		timer.elapsed()
	);
	Some(Path::default())
}

/// Follows the parents from `goal` back to the start, which is left out.
fn backtrack(scratch: &ScratchTable, goal: CellId) -> Path<Cell> {
	let goal_entry = &scratch.entries[&goal];
	let mut steps = vec![];
	let mut current = goal_entry;
	while let Some(parent) = current.parent {
		steps.push(current.cell);
		current = &scratch.entries[&parent];
	}
	steps.reverse();
	Path::new(steps, goal_entry.g)
}
