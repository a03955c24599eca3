//! Runs many path requests concurrently without ever blocking the caller.

use crate::{
	neighbors::Neighborhood, search, Cell, Path, PathError, PathResult, Point, SchedulerConfig,
	SharedGrid,
};

use std::collections::VecDeque;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;

/// Identifies a request submitted to a [`PathScheduler`].
///
/// Ids are handed out in submission order and never reused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct JobId(u64);

impl fmt::Display for JobId {
	fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
		write!(fmt, "#{}", self.0)
	}
}

type Callback = Box<dyn FnOnce(Path<Cell>)>;

struct PendingJob {
	id: JobId,
	start: Point,
	goal: Point,
	on_complete: Callback,
}

struct RunningJob {
	id: JobId,
	on_complete: Callback,
	cancel: Arc<AtomicBool>,
}

/// Sent by a worker once its search ended. `path` is `None` if the search was cancelled.
struct Completion {
	slot: usize,
	path: Option<Path<Cell>>,
}

/// Schedules path requests onto a bounded set of worker threads.
///
/// Requests are queued with [`submit`](PathScheduler::submit), which returns immediately.
/// [`tick`](PathScheduler::tick) has to be called regularly (for example once per frame) on the
/// thread that owns the scheduler. Each tick
/// 1. invokes the callbacks of all searches that finished since the last tick and
/// 2. starts waiting requests, in submission order, until
/// [`max_jobs`](SchedulerConfig::max_jobs) searches are running.
///
/// Callbacks therefore always run on the thread that calls `tick`, never on a worker. They are
/// invoked in the order the searches finish, which may differ from the submission order.
///
/// With the `parallel` feature (default), the searches run on a dedicated
/// [`rayon::ThreadPool`] with `max_jobs` threads. Without it, every running search gets its
/// own thread.
///
/// ## Examples
/// ```
/// use nav_lattice::prelude::*;
/// use std::{cell::RefCell, rc::Rc};
///
/// let grid = SharedGrid::new(NavGrid::from_fn((5, 1, 5), |_| true));
/// let mut scheduler = PathScheduler::new(grid, LayeredNeighborhood, SchedulerConfig::default())?;
///
/// let found = Rc::new(RefCell::new(None));
/// let sink = found.clone();
/// scheduler.submit((0, 0, 0), (4, 0, 4), move |path| {
/// 	*sink.borrow_mut() = Some(path.cost());
/// })?;
///
/// // usually called once per frame
/// while !scheduler.is_idle() {
/// 	scheduler.tick();
/// 	std::thread::yield_now();
/// }
///
/// assert_eq!(*found.borrow(), Some(56));
/// # Ok::<(), PathError>(())
/// ```
pub struct PathScheduler<N: Neighborhood> {
	grid: SharedGrid,
	neighborhood: N,
	config: SchedulerConfig,
	pending: VecDeque<PendingJob>,
	running: slab::Slab<RunningJob>,
	completions: Receiver<Completion>,
	sender: Sender<Completion>,
	next_id: u64,
	#[cfg(feature = "parallel")]
	pool: rayon::ThreadPool,
}

impl<N: Neighborhood> PathScheduler<N> {
	/// Creates a new PathScheduler
	///
	/// ## Arguments
	/// - `grid` - the Grid all searches run on
	/// - `neighborhood` - how Paths may move across the Grid. (See [`Neighborhood`])
	/// - `config` - the options for the scheduler. (See [`SchedulerConfig`])
	///
	/// ## Errors
	/// [`PathError::NoWorkers`] if `config.max_jobs` is 0, or `PathError::WorkerPool` if
	/// the worker threads could not be created.
	pub fn new(
		grid: SharedGrid,
		neighborhood: N,
		config: SchedulerConfig,
	) -> PathResult<PathScheduler<N>> {
		if config.max_jobs == 0 {
			return Err(PathError::NoWorkers);
		}

		#[cfg(feature = "parallel")]
		let pool = rayon::ThreadPoolBuilder::new()
			.num_threads(config.max_jobs)
			.thread_name(|index| format!("nav-lattice-worker-{}", index))
			.build()?;

		let (sender, completions) = mpsc::channel();
		log::debug!(
			"created PathScheduler with {} workers on a {:?} grid",
			config.max_jobs,
			grid.bounds().size()
		);

		Ok(PathScheduler {
			grid,
			neighborhood,
			config,
			pending: VecDeque::new(),
			running: slab::Slab::with_capacity(config.max_jobs),
			completions,
			sender,
			next_id: 0,
			#[cfg(feature = "parallel")]
			pool,
		})
	}

	/// Queues a request for a Path from `start` to `goal`.
	///
	/// Returns immediately. `on_complete` is invoked by a later [`tick`](PathScheduler::tick)
	/// with the Path (see [`find_path`](crate::find_path)), which is empty if there is none.
	///
	/// ## Errors
	/// If [`validate_requests`](SchedulerConfig::validate_requests) is set, requests with a
	/// start or goal that is outside of the Grid or not walkable are rejected right away.
	/// `on_complete` is dropped without being called in that case.
	pub fn submit(
		&mut self,
		start: Point,
		goal: Point,
		on_complete: impl FnOnce(Path<Cell>) + 'static,
	) -> PathResult<JobId> {
		if self.config.validate_requests {
			if let Err(err) = search::validate_request(&self.grid.read(), start, goal) {
				log::warn!("rejected path request {:?} -> {:?}: {}", start, goal, err);
				return Err(err);
			}
		}

		let id = JobId(self.next_id);
		self.next_id += 1;
		self.pending.push_back(PendingJob {
			id,
			start,
			goal,
			on_complete: Box::new(on_complete),
		});
		log::debug!("queued job {} {:?} -> {:?}", id, start, goal);
		Ok(id)
	}

	/// Advances the scheduler. Never blocks.
	///
	/// Invokes the callbacks of all finished searches and starts waiting requests while fewer
	/// than [`max_jobs`](SchedulerConfig::max_jobs) are running.
	///
	/// Returns the number of callbacks that were invoked.
	pub fn tick(&mut self) -> usize {
		let mut notified = 0;
		while let Ok(completion) = self.completions.try_recv() {
			if self.complete(completion) {
				notified += 1;
			}
		}
		self.dispatch_pending();
		notified
	}

	/// Ticks until every submitted request finished, blocking while searches are running.
	///
	/// Meant for shutting down or for tools that do not run a frame loop.
	///
	/// Returns the number of callbacks that were invoked.
	pub fn block_until_idle(&mut self) -> usize {
		let mut notified = self.tick();
		while !self.running.is_empty() {
			// the scheduler holds a sender itself, so this cannot disconnect
			let Ok(completion) = self.completions.recv() else {
				break;
			};
			if self.complete(completion) {
				notified += 1;
			}
			notified += self.tick();
		}
		notified
	}

	/// Cancels a request.
	///
	/// A waiting request is removed right away. A running search stops at its next step and
	/// frees its slot on a later tick. The callback of a cancelled request is never invoked.
	///
	/// Returns `false` if the request already completed or is unknown.
	pub fn cancel(&mut self, id: JobId) -> bool {
		if let Some(index) = self.pending.iter().position(|job| job.id == id) {
			self.pending.remove(index);
			log::debug!("cancelled waiting job {}", id);
			return true;
		}
		match self.running.iter_mut().find(|(_, job)| job.id == id) {
			Some((_, job)) => {
				job.cancel.store(true, Ordering::Relaxed);
				log::debug!("cancelling running job {}", id);
				true
			}
			None => false,
		}
	}

	/// The number of requests waiting for a free slot
	pub fn pending_len(&self) -> usize {
		self.pending.len()
	}

	/// The number of searches currently running, including cancelled ones that have not
	/// stopped yet
	pub fn running_len(&self) -> usize {
		self.running.len()
	}

	/// `true` if no request is waiting or running
	pub fn is_idle(&self) -> bool {
		self.pending.is_empty() && self.running.is_empty()
	}

	/// The Grid that the searches run on
	pub fn grid(&self) -> &SharedGrid {
		&self.grid
	}

	/// The Neighborhood used by all searches
	pub fn neighborhood(&self) -> &N {
		&self.neighborhood
	}

	/// The config of this scheduler
	pub fn config(&self) -> &SchedulerConfig {
		&self.config
	}

	/// Frees the slot of a finished search and invokes its callback.
	///
	/// Returns `false` if the search was cancelled.
	fn complete(&mut self, completion: Completion) -> bool {
		if !self.running.contains(completion.slot) {
			log::error!("completion for unknown slot {}", completion.slot);
			return false;
		}
		let job = self.running.remove(completion.slot);
		match completion.path {
			Some(path) if !job.cancel.load(Ordering::Relaxed) => {
				log::debug!("job {} finished with {} steps", job.id, path.len());
				(job.on_complete)(path);
				true
			}
			_ => {
				log::debug!("job {} stopped after being cancelled", job.id);
				false
			}
		}
	}

	fn dispatch_pending(&mut self) {
		while self.running.len() < self.config.max_jobs {
			let Some(job) = self.pending.pop_front() else {
				break;
			};
			self.dispatch(job);
		}
	}

	fn dispatch(&mut self, job: PendingJob) {
		let PendingJob {
			id,
			start,
			goal,
			on_complete,
		} = job;
		let cancel = Arc::new(AtomicBool::new(false));
		let slot = self.running.insert(RunningJob {
			id,
			on_complete,
			cancel: cancel.clone(),
		});

		let grid = self.grid.clone();
		let neighborhood = self.neighborhood.clone();
		let sender = self.sender.clone();
		let work = move || {
			let result = panic::catch_unwind(AssertUnwindSafe(|| {
				search::a_star_search(&grid, &neighborhood, start, goal, &cancel)
			}));
			let path = result.unwrap_or_else(|_| {
				log::error!("search for job {} panicked", id);
				Some(Path::default())
			});
			// the receiver is gone once the scheduler was dropped, nobody is waiting then
			let _ = sender.send(Completion { slot, path });
		};

		log::debug!("starting job {} in slot {}", id, slot);
		#[cfg(feature = "parallel")]
		self.pool.spawn(work);
		#[cfg(not(feature = "parallel"))]
		drop(std::thread::spawn(work));
	}
}

impl<N: Neighborhood> fmt::Debug for PathScheduler<N> {
	fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
		fmt.debug_struct("PathScheduler")
			.field("grid", &self.grid.bounds())
			.field("neighborhood", &self.neighborhood)
			.field("config", &self.config)
			.field("pending", &self.pending.len())
			.field("running", &self.running.len())
			.finish()
	}
}
