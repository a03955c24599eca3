use std::sync::Arc;

/// a Type to represent the Cost of traversing the Grid
pub type Cost = usize;

/// A Path across the Grid.
///
/// The steps are stored in a shared buffer, so cloning a Path is cheap and it can be handed
/// between threads.
///
/// The first step is the Cell right after the start, the last step is the goal. The start
/// itself is not part of the Path. An empty Path means that the start already was the goal or
/// that the goal could not be reached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Path<P> {
	path: Arc<[P]>,
	cost: Cost,
}

impl<P> Path<P> {
	/// Creates a new Path
	pub fn new(path: Vec<P>, cost: Cost) -> Path<P> {
		Path {
			path: path.into(),
			cost,
		}
	}

	/// The total Cost of walking the Path
	pub fn cost(&self) -> Cost {
		self.cost
	}

	/// The number of steps
	pub fn len(&self) -> usize {
		self.path.len()
	}

	/// `true` if the Path has no steps
	pub fn is_empty(&self) -> bool {
		self.path.is_empty()
	}

	/// The steps as a slice
	pub fn steps(&self) -> &[P] {
		&self.path
	}

	/// The final step, which is the goal of the search
	pub fn last(&self) -> Option<&P> {
		self.path.last()
	}

	/// Returns an Iterator over the Path
	pub fn iter(&self) -> std::slice::Iter<'_, P> {
		self.path.iter()
	}
}

impl Path<crate::Cell> {
	/// The Points of all steps
	pub fn points(&self) -> impl Iterator<Item = crate::Point> + '_ {
		self.path.iter().map(|cell| cell.pos())
	}
}

impl<P> Default for Path<P> {
	fn default() -> Path<P> {
		Path::new(Vec::new(), 0)
	}
}

impl<'a, P> IntoIterator for &'a Path<P> {
	type Item = &'a P;
	type IntoIter = std::slice::Iter<'a, P>;
	fn into_iter(self) -> Self::IntoIter {
		self.iter()
	}
}

use std::fmt;
impl<P: fmt::Display> fmt::Display for Path<P> {
	fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
		write!(fmt, "Path[Cost = {}]: ", self.cost)?;
		if self.path.is_empty() {
			write!(fmt, "<empty>")
		} else {
			write!(fmt, "{}", self.path[0])?;
			for p in self.path.iter().skip(1) {
				write!(fmt, " -> {}", p)?;
			}
			Ok(())
		}
	}
}

#[cfg(test)]
mod tests {
	use super::Path;
	use crate::Cell;

	#[test]
	fn steps() {
		let path = Path::new(vec![4, 2, 0], 42);

		assert_eq!(path.steps(), &[4, 2, 0]);
		assert_eq!(path.last(), Some(&0));
		assert_eq!(path.len(), 3);
		assert_eq!(path.cost(), 42);
	}

	#[test]
	fn display() {
		let path = Path::new(vec![Cell::new((1, 0, 1), true), Cell::new((2, 0, 2), true)], 28);

		assert_eq!(&format!("{}", path), "Path[Cost = 28]: (1, 0, 1) -> (2, 0, 2)");
	}

	#[test]
	fn display_empty() {
		let path = Path::<Cell>::default();

		assert!(path.is_empty());
		assert_eq!(&format!("{}", path), "Path[Cost = 0]: <empty>");
	}

	#[test]
	fn points() {
		let path = Path::new(vec![Cell::new((0, 0, 1), true), Cell::new((0, 1, 2), true)], 24);
		let points: Vec<_> = path.points().collect();
		assert_eq!(points, vec![(0, 0, 1), (0, 1, 2)]);
	}
}
