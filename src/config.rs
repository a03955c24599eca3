/// Options for configuring the [`PathScheduler`](crate::PathScheduler)
///
/// Default options:
/// ```
/// # use nav_lattice::SchedulerConfig;
/// assert_eq!(
/// 	SchedulerConfig {
/// 		max_jobs: 4,
/// 		validate_requests: true,
/// 	},
/// 	Default::default()
/// );
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SchedulerConfig {
	/// The maximum number of searches that run at the same time (defaults to `4`)
	///
	/// This is also the number of worker threads. Requests beyond this limit wait in the
	/// order they were submitted.
	pub max_jobs: usize,
	/// `true` (default): requests whose start or goal is outside of the Grid or not walkable
	/// are rejected when they are submitted.
	///
	/// `false`: such requests are queued like any other and usually complete with an empty
	/// Path after the search ran out of Cells.
	pub validate_requests: bool,
}

impl SchedulerConfig {
	/// a SchedulerConfig that runs one search at a time
	///
	/// Values:
	/// ```
	/// # use nav_lattice::SchedulerConfig;
	/// assert_eq!(
	/// 	SchedulerConfig {
	/// 		max_jobs: 1,
	/// 		validate_requests: true,
	/// 	},
	/// 	SchedulerConfig::SERIAL
	/// );
	/// ```
	pub const SERIAL: SchedulerConfig = SchedulerConfig {
		max_jobs: 1,
		validate_requests: true,
	};
	/// a SchedulerConfig that accepts every request without checking it first
	///
	/// Values:
	/// ```
	/// # use nav_lattice::SchedulerConfig;
	/// assert_eq!(
	/// 	SchedulerConfig {
	/// 		max_jobs: 4,
	/// 		validate_requests: false,
	/// 	},
	/// 	SchedulerConfig::UNCHECKED
	/// );
	/// ```
	pub const UNCHECKED: SchedulerConfig = SchedulerConfig {
		max_jobs: 4,
		validate_requests: false,
	};

	/// The default config with a different [`max_jobs`](SchedulerConfig::max_jobs)
	pub fn with_max_jobs(max_jobs: usize) -> SchedulerConfig {
		SchedulerConfig {
			max_jobs,
			..Default::default()
		}
	}
}

impl Default for SchedulerConfig {
	fn default() -> SchedulerConfig {
		SchedulerConfig {
			max_jobs: 4,
			validate_requests: true,
		}
	}
}
