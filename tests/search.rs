use nav_lattice::neighbors::octile_distance;
use nav_lattice::prelude::*;
use nanorand::{Rng, WyRand};

use std::collections::{BinaryHeap, HashMap};
use std::cmp::Reverse;

/// Dijkstra over the same step rules, used as the reference for optimal costs
fn reference_cost<N: Neighborhood>(
	grid: &SharedGrid,
	neighborhood: &N,
	start: Point,
	goal: Point,
) -> Option<usize> {
	let mut best = HashMap::new();
	let mut next = BinaryHeap::new();
	best.insert(start, 0);
	next.push(Reverse((0, start)));
	let mut neighbors = vec![];
	while let Some(Reverse((cost, current))) = next.pop() {
		if current == goal {
			return Some(cost);
		}
		if cost > best[&current] {
			continue;
		}
		neighbors.clear();
		nav_lattice::neighbors::walkable_neighbors(
			neighborhood,
			current,
			|x, y, z| grid.get(x, y, z),
			&mut neighbors,
		);
		for cell in neighbors.iter() {
			let other = cell.pos();
			let other_cost = cost + octile_distance(current, other);
			if best.get(&other).map_or(true, |&known| other_cost < known) {
				best.insert(other, other_cost);
				next.push(Reverse((other_cost, other)));
			}
		}
	}
	None
}

fn random_grid(rng: &mut WyRand, size: (usize, usize, usize), walls: u32) -> NavGrid {
	NavGrid::from_fn(size, |_| rng.generate_range(0..100u32) >= walls)
}

fn assert_valid_path(grid: &SharedGrid, start: Point, goal: Point, path: &Path<Cell>) {
	assert_eq!(path.last().map(Cell::pos), Some(goal));
	assert!(path.iter().all(|cell| cell.pos() != start));
	let mut previous = start;
	let mut total = 0;
	for cell in path.iter() {
		assert!(grid.cell(cell.pos()).unwrap().is_walkable());
		let (a, b) = (previous, cell.pos());
		assert!(a.0.abs_diff(b.0) <= 1 && a.2.abs_diff(b.2) <= 1);
		total += octile_distance(a, b);
		previous = b;
	}
	assert_eq!(total, path.cost());
}

#[test]
fn flat_example() {
	let grid = SharedGrid::new(NavGrid::from_fn((5, 1, 5), |_| true));
	let path = find_path(&grid, &LayeredNeighborhood, (0, 0, 0), (4, 0, 4));
	assert_eq!(path.len(), 4);
	assert_eq!(path.cost(), 56);
}

#[test]
fn matches_reference_on_random_flat_grids() {
	let _ = env_logger::builder().is_test(true).try_init();
	let mut rng = WyRand::new_seed(4);
	for _ in 0..20 {
		let grid = SharedGrid::new(random_grid(&mut rng, (12, 1, 12), 25));
		let start = (rng.generate_range(0..12usize), 0, rng.generate_range(0..12usize));
		let goal = (rng.generate_range(0..12usize), 0, rng.generate_range(0..12usize));
		if !grid.cell(start).unwrap().is_walkable() || !grid.cell(goal).unwrap().is_walkable() {
			continue;
		}

		let path = find_path(&grid, &FlatNeighborhood, start, goal);
		match reference_cost(&grid, &FlatNeighborhood, start, goal) {
			Some(0) => assert!(path.is_empty()),
			Some(cost) => {
				assert_valid_path(&grid, start, goal, &path);
				assert_eq!(path.cost(), cost);
			}
			None => assert!(path.is_empty()),
		}
	}
}

#[test]
fn matches_reference_on_random_layered_grids() {
	let mut rng = WyRand::new_seed(17);
	for _ in 0..10 {
		let grid = SharedGrid::new(random_grid(&mut rng, (8, 3, 8), 40));
		let start = (0, 0, 0);
		let goal = (7, 2, 7);
		grid.set_walkable(start, true);
		grid.set_walkable(goal, true);

		let path = find_path(&grid, &LayeredNeighborhood, start, goal);
		match reference_cost(&grid, &LayeredNeighborhood, start, goal) {
			Some(cost) => {
				assert_valid_path(&grid, start, goal, &path);
				assert_eq!(path.cost(), cost);
			}
			None => assert!(path.is_empty()),
		}
	}
}

#[test]
fn blocked_goal_terminates() {
	// a ring of walls around the goal
	let grid = SharedGrid::new(NavGrid::from_fn((9, 2, 9), |(x, _, z)| {
		let ring = x.abs_diff(6) <= 1 && z.abs_diff(6) <= 1 && (x, z) != (6, 6);
		!ring
	}));
	assert!(find_path(&grid, &LayeredNeighborhood, (0, 0, 0), (6, 0, 6)).is_empty());
	assert!(find_path(&grid, &FlatNeighborhood, (0, 1, 0), (6, 1, 6)).is_empty());
}

#[test]
fn walks_down_a_staircase() {
	// each column x is solid ground on layer (3 - x), empty air everywhere else
	let grid = SharedGrid::new(NavGrid::from_fn((4, 4, 1), |(x, y, _)| y == 3 - x));
	let path = find_path(&grid, &LayeredNeighborhood, (0, 3, 0), (3, 0, 0));
	let points: Vec<Point> = path.points().collect();
	assert_eq!(points, vec![(1, 2, 0), (2, 1, 0), (3, 0, 0)]);
	assert_eq!(path.cost(), 3 * 20);
}

#[test]
fn concurrent_searches_on_one_grid() {
	let grid = SharedGrid::new(NavGrid::from_fn((32, 2, 32), |(x, y, z)| {
		y == 0 && !(x == 16 && z < 28)
	}));
	let handles: Vec<_> = (0..8)
		.map(|i| {
			let grid = grid.clone();
			std::thread::spawn(move || {
				find_path(&grid, &LayeredNeighborhood, (0, 0, i), (31, 0, 31 - i))
			})
		})
		.collect();
	let costs: Vec<usize> = handles
		.into_iter()
		.map(|handle| handle.join().unwrap().cost())
		.collect();

	for (i, cost) in costs.into_iter().enumerate() {
		let expected = find_path(&grid, &LayeredNeighborhood, (0, 0, i), (31, 0, 31 - i)).cost();
		assert_eq!(cost, expected);
		assert!(cost > 0);
	}
}
