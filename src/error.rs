//! Error types for submitting path requests.

use crate::Point;
use thiserror::Error;

/// Errors that can occur when creating a [`PathScheduler`](crate::PathScheduler) or submitting
/// a request to it.
///
/// Not finding a Path is not an error. Such a request completes with an empty
/// [`Path`](crate::Path).
#[derive(Debug, Error)]
pub enum PathError {
	/// The start lies outside of the Grid.
	#[error("start {0:?} lies outside of the grid")]
	StartOutOfBounds(Point),

	/// The goal lies outside of the Grid.
	#[error("goal {0:?} lies outside of the grid")]
	GoalOutOfBounds(Point),

	/// The start Cell is not walkable.
	#[error("start {0:?} is not walkable")]
	StartBlocked(Point),

	/// The goal Cell is not walkable.
	#[error("goal {0:?} is not walkable")]
	GoalBlocked(Point),

	/// The config allows no job to run.
	#[error("max_jobs must be at least 1")]
	NoWorkers,

	/// The worker pool could not be created.
	#[cfg(feature = "parallel")]
	#[error("failed to build the worker pool: {0}")]
	WorkerPool(#[from] rayon::ThreadPoolBuildError),
}

impl PathError {
	/// `true` for errors caused by the start or goal of a request
	pub fn is_invalid_request(&self) -> bool {
		matches!(
			self,
			PathError::StartOutOfBounds(_)
				| PathError::GoalOutOfBounds(_)
				| PathError::StartBlocked(_)
				| PathError::GoalBlocked(_)
		)
	}
}

/// Result type for path requests.
pub type PathResult<T> = std::result::Result<T, PathError>;
