#![warn(
	missing_docs,
	missing_debug_implementations,
	trivial_casts,
	trivial_numeric_casts,
	unsafe_code,
	unstable_features,
	unused_import_braces,
	unused_qualifications
)]

//! A crate to find Paths on layered 3D Grids without stalling the simulation that needs them.
//!
//! ## Introduction
//! Agents in a real-time simulation regularly need Paths across the world, but a single A*
//! search over a large Grid can easily take longer than a frame. This crate runs those searches
//! on worker threads and hands the results back on the thread that asked for them.
//!
//! The world is described by a [`NavGrid`]: a 3D array of [`Cell`]s, where `y` is the layer
//! axis. Each Cell is either walkable or not. Agents move in the horizontal plane and, with the
//! [`LayeredNeighborhood`](neighbors::LayeredNeighborhood), follow the terrain up and down
//! between layers. Diagonal steps never cut through a solid corner.
//!
//! Paths are returned as a sequence of Cells that starts right after the start and ends with
//! the goal. The Cost of a straight step is 10, a horizontal diagonal costs 14 and every layer
//! climbed or dropped adds 10.
//!
//! ## Examples
//! Finding a Path right away:
//! ```
//! use nav_lattice::prelude::*;
//!
//! // 0 = walkable, 1 = wall. x goes to the right, z goes down
//! let layout = [
//!     [0, 0, 0, 0, 0],
//!     [0, 1, 1, 1, 0],
//!     [0, 0, 0, 1, 0],
//!     [0, 0, 0, 1, 0],
//!     [0, 0, 0, 1, 0],
//! ];
//!
//! let grid = SharedGrid::new(NavGrid::from_fn((5, 1, 5), |(x, _, z)| layout[z][x] == 0));
//!
//! let path = find_path(&grid, &FlatNeighborhood, (2, 0, 3), (4, 0, 3));
//!
//! let steps = path.steps();
//! assert_eq!(steps.last().map(|cell| cell.pos()), Some((4, 0, 3)));
//! assert!(path.iter().all(|cell| layout[cell.z()][cell.x()] == 0));
//! ```
//!
//! ### Asynchronous requests
//! A [`PathScheduler`] runs up to [`max_jobs`](SchedulerConfig::max_jobs) searches at the same
//! time. Requests beyond that wait in the order they were submitted. The scheduler never
//! blocks: call [`tick`](PathScheduler::tick) once per frame to start waiting requests and
//! to receive finished Paths through their callbacks.
//! ```
//! use nav_lattice::prelude::*;
//! use std::{cell::RefCell, rc::Rc};
//!
//! let grid = SharedGrid::new(NavGrid::from_fn((16, 2, 16), |(_, y, _)| y == 0));
//!
//! let mut scheduler = PathScheduler::new(
//!     grid.clone(),
//!     LayeredNeighborhood,
//!     SchedulerConfig::with_max_jobs(2),
//! )?;
//!
//! let lengths = Rc::new(RefCell::new(vec![]));
//! for goal in [(15, 0, 15), (0, 0, 15), (15, 0, 0)] {
//!     let lengths = lengths.clone();
//!     scheduler.submit((0, 0, 0), goal, move |path| lengths.borrow_mut().push(path.len()))?;
//! }
//!
//! // invalid requests are rejected right away
//! assert!(scheduler.submit((0, 0, 0), (3, 1, 3), |_| {}).is_err());
//!
//! while !scheduler.is_idle() {
//!     scheduler.tick(); // once per frame
//!     assert!(scheduler.running_len() <= 2);
//!     std::thread::yield_now();
//! }
//!
//! let mut lengths = lengths.borrow().clone();
//! lengths.sort();
//! assert_eq!(lengths, vec![15, 15, 15]);
//! # Ok::<(), PathError>(())
//! ```
//!
//! ### Updating the Grid
//! The walkability of single Cells can change at any time through the [`SharedGrid`]. Searches
//! that are already running see the change from their next lookup on.
//! ```
//! # use nav_lattice::prelude::*;
//! let grid = SharedGrid::new(NavGrid::from_fn((3, 1, 3), |_| true));
//!
//! grid.set_walkable((1, 0, 1), false);
//!
//! let path = find_path(&grid, &FlatNeighborhood, (0, 0, 1), (2, 0, 1));
//! assert_eq!(path.len(), 4);
//! assert!(path.iter().all(|cell| cell.pos() != (1, 0, 1)));
//! ```

/// A shorthand for Points on the Grid: `(x, y, z)` with `y` as the layer
pub type Point = (usize, usize, usize);

mod cell;
pub use self::cell::{Cell, Terrain};

pub mod cell_id;
pub use self::cell_id::CellId;

mod config;
pub use self::config::SchedulerConfig;

mod error;
pub use self::error::{PathError, PathResult};

mod grid;
pub use self::grid::{GridBounds, NavGrid, SharedGrid};

pub mod heap;

pub mod neighbors;

mod path;
pub use self::path::{Cost, Path};

pub mod search;
pub use self::search::find_path;

mod scheduler;
pub use self::scheduler::{JobId, PathScheduler};

/// The prelude for this crate.
pub mod prelude {
	pub use crate::{
		find_path,
		neighbors::{FlatNeighborhood, LayeredNeighborhood, Neighborhood},
		Cell, NavGrid, Path, PathError, PathScheduler, Point, SchedulerConfig, SharedGrid,
	};
}
