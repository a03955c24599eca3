//! An indexed binary Heap that is used as the open list of a search.
//!
//! Unlike [`BinaryHeap`](std::collections::BinaryHeap), every element knows its own position
//! inside of the Heap. This makes membership tests O(1) and allows an element to be moved to
//! its new place after its priority changed, without searching for it first.
//!
//! The Heap itself only stores keys. The priority and the current position of each key are
//! stored in a side table that implements [`HeapSlots`], which is passed to every operation.

/// Storage for the priority and the Heap position of the keys in an [`IndexedHeap`].
///
/// ## Examples
/// ```
/// use nav_lattice::heap::{HeapSlots, IndexedHeap};
///
/// struct Slots(Vec<(u32, Option<usize>)>);
///
/// impl HeapSlots<usize> for Slots {
/// 	type Priority = u32;
/// 	fn priority(&self, key: usize) -> u32 {
/// 		self.0[key].0
/// 	}
/// 	fn heap_index(&self, key: usize) -> Option<usize> {
/// 		self.0[key].1
/// 	}
/// 	fn set_heap_index(&mut self, key: usize, index: Option<usize>) {
/// 		self.0[key].1 = index;
/// 	}
/// }
///
/// let mut slots = Slots(vec![(5, None), (1, None), (3, None)]);
/// let mut heap = IndexedHeap::with_capacity(3);
/// for key in 0..3 {
/// 	heap.push(&mut slots, key);
/// }
///
/// assert!(heap.contains(&slots, 2));
/// assert_eq!(heap.pop(&mut slots), Some(1));
/// assert_eq!(heap.pop(&mut slots), Some(2));
/// assert!(!heap.contains(&slots, 2));
/// ```
pub trait HeapSlots<K> {
	/// The ordering key. The smallest Priority is removed first.
	///
	/// Use [`Reverse`](std::cmp::Reverse) to turn the Heap into a max-heap.
	type Priority: Ord;
	/// The current Priority of `key`
	fn priority(&self, key: K) -> Self::Priority;
	/// The last position stored with [`set_heap_index`](HeapSlots::set_heap_index)
	fn heap_index(&self, key: K) -> Option<usize>;
	/// Stores the position of `key`. `None` means that `key` left the Heap.
	fn set_heap_index(&mut self, key: K, index: Option<usize>);
}

/// A binary min-heap over keys whose positions are tracked in a [`HeapSlots`] table.
///
/// The capacity is fixed on creation. Pushing beyond it is a logic error and panics.
#[derive(Clone, Debug)]
pub struct IndexedHeap<K> {
	items: Vec<K>,
	capacity: usize,
}

impl<K: Copy + PartialEq> IndexedHeap<K> {
	/// Creates an empty Heap that can hold up to `capacity` keys
	pub fn with_capacity(capacity: usize) -> IndexedHeap<K> {
		IndexedHeap::with_reserved(capacity, capacity)
	}

	/// Creates an empty Heap that can hold up to `capacity` keys, but only allocates room for
	/// `reserved` of them up front. The storage grows as needed.
	///
	/// ## Examples
	/// ```
	/// use nav_lattice::heap::IndexedHeap;
	///
	/// let heap = IndexedHeap::<usize>::with_reserved(1 << 30, 16);
	/// assert_eq!(heap.capacity(), 1 << 30);
	/// assert!(heap.is_empty());
	/// ```
	pub fn with_reserved(capacity: usize, reserved: usize) -> IndexedHeap<K> {
		IndexedHeap {
			items: Vec::with_capacity(reserved.min(capacity)),
			capacity,
		}
	}

	/// The number of keys currently in the Heap
	pub fn len(&self) -> usize {
		self.items.len()
	}

	/// `true` if the Heap holds no keys
	pub fn is_empty(&self) -> bool {
		self.items.is_empty()
	}

	/// The maximum number of keys the Heap can hold
	pub fn capacity(&self) -> usize {
		self.capacity
	}

	/// Inserts `key` with the Priority currently stored in `slots`.
	///
	/// ## Panics
	/// if the Heap is already full.
	#[track_caller]
	pub fn push<S: HeapSlots<K>>(&mut self, slots: &mut S, key: K) {
		assert!(
			self.items.len() < self.capacity,
			"IndexedHeap overflow: capacity is {}",
			self.capacity
		);
		debug_assert!(!self.contains(slots, key), "key pushed twice");

		let index = self.items.len();
		self.items.push(key);
		slots.set_heap_index(key, Some(index));
		self.sift_up(slots, index);
	}

	/// Removes and returns the key with the smallest Priority.
	///
	/// Returns `None` if the Heap is empty.
	pub fn pop<S: HeapSlots<K>>(&mut self, slots: &mut S) -> Option<K> {
		if self.items.is_empty() {
			return None;
		}
		let best = self.items.swap_remove(0);
		slots.set_heap_index(best, None);

		if let Some(&root) = self.items.first() {
			slots.set_heap_index(root, Some(0));
			self.sift_down(slots, 0);
		}
		Some(best)
	}

	/// The key with the smallest Priority, without removing it
	pub fn peek(&self) -> Option<K> {
		self.items.first().copied()
	}

	/// Checks if `key` is in the Heap, using the position stored in `slots`
	pub fn contains<S: HeapSlots<K>>(&self, slots: &S, key: K) -> bool {
		slots
			.heap_index(key)
			.and_then(|index| self.items.get(index))
			.map_or(false, |&stored| stored == key)
	}

	/// Moves `key` towards the top after its Priority was decreased
	#[track_caller]
	pub fn update_higher<S: HeapSlots<K>>(&mut self, slots: &mut S, key: K) {
		let index = self.index_of(slots, key);
		self.sift_up(slots, index);
	}

	/// Moves `key` towards the bottom after its Priority was increased
	#[track_caller]
	pub fn update_lower<S: HeapSlots<K>>(&mut self, slots: &mut S, key: K) {
		let index = self.index_of(slots, key);
		self.sift_down(slots, index);
	}

	/// Removes all keys from the Heap
	pub fn clear<S: HeapSlots<K>>(&mut self, slots: &mut S) {
		for key in self.items.drain(..) {
			slots.set_heap_index(key, None);
		}
	}

	#[track_caller]
	fn index_of<S: HeapSlots<K>>(&self, slots: &S, key: K) -> usize {
		match slots.heap_index(key) {
			Some(index) if self.items.get(index) == Some(&key) => index,
			_ => panic!("key is not part of this IndexedHeap"),
		}
	}

	fn sift_up<S: HeapSlots<K>>(&mut self, slots: &mut S, mut index: usize) {
		while index > 0 {
			let parent = (index - 1) / 2;
			if slots.priority(self.items[index]) < slots.priority(self.items[parent]) {
				self.swap(slots, index, parent);
				index = parent;
			} else {
				break;
			}
		}
	}

	fn sift_down<S: HeapSlots<K>>(&mut self, slots: &mut S, mut index: usize) {
		loop {
			let left = index * 2 + 1;
			let right = left + 1;
			if left >= self.items.len() {
				// a complete tree has no right child without a left one
				return;
			}

			let mut best = left;
			if right < self.items.len()
				&& slots.priority(self.items[right]) < slots.priority(self.items[left])
			{
				best = right;
			}

			if slots.priority(self.items[best]) < slots.priority(self.items[index]) {
				self.swap(slots, index, best);
				index = best;
			} else {
				return;
			}
		}
	}

	fn swap<S: HeapSlots<K>>(&mut self, slots: &mut S, a: usize, b: usize) {
		self.items.swap(a, b);
		slots.set_heap_index(self.items[a], Some(a));
		slots.set_heap_index(self.items[b], Some(b));
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use nanorand::{Rng, WyRand};

	/// (f, h, heap index) per key
	struct TestSlots(Vec<(u32, u32, Option<usize>)>);

	impl HeapSlots<usize> for TestSlots {
		type Priority = (u32, u32);
		fn priority(&self, key: usize) -> (u32, u32) {
			(self.0[key].0, self.0[key].1)
		}
		fn heap_index(&self, key: usize) -> Option<usize> {
			self.0[key].2
		}
		fn set_heap_index(&mut self, key: usize, index: Option<usize>) {
			self.0[key].2 = index;
		}
	}

	fn slots(priorities: &[(u32, u32)]) -> TestSlots {
		TestSlots(priorities.iter().map(|&(f, h)| (f, h, None)).collect())
	}

	#[test]
	fn pops_in_order() {
		let mut slots = slots(&[(7, 0), (3, 0), (9, 0), (1, 0), (5, 0)]);
		let mut heap = IndexedHeap::with_capacity(5);
		for key in 0..5 {
			heap.push(&mut slots, key);
		}
		assert_eq!(heap.len(), 5);
		assert_eq!(heap.peek(), Some(3));

		let order: Vec<usize> = std::iter::from_fn(|| heap.pop(&mut slots)).collect();
		assert_eq!(order, vec![3, 1, 4, 0, 2]);
		assert!(heap.is_empty());
		assert_eq!(heap.pop(&mut slots), None);
	}

	#[test]
	fn ties_prefer_smaller_h() {
		let mut slots = slots(&[(20, 10), (20, 4), (20, 8)]);
		let mut heap = IndexedHeap::with_capacity(3);
		for key in 0..3 {
			heap.push(&mut slots, key);
		}
		assert_eq!(heap.pop(&mut slots), Some(1));
		assert_eq!(heap.pop(&mut slots), Some(2));
		assert_eq!(heap.pop(&mut slots), Some(0));
	}

	#[test]
	fn contains_after_mixed_operations() {
		let mut slots = slots(&[(4, 0), (2, 0), (6, 0), (8, 0)]);
		let mut heap = IndexedHeap::with_capacity(4);
		heap.push(&mut slots, 0);
		heap.push(&mut slots, 1);
		heap.push(&mut slots, 2);
		assert!(!heap.contains(&slots, 3));

		assert_eq!(heap.pop(&mut slots), Some(1));
		assert!(!heap.contains(&slots, 1));
		assert!(heap.contains(&slots, 0));
		assert!(heap.contains(&slots, 2));

		heap.push(&mut slots, 3);
		slots.0[3].0 = 1;
		heap.update_higher(&mut slots, 3);
		assert_eq!(heap.peek(), Some(3));

		slots.0[3].0 = 10;
		heap.update_lower(&mut slots, 3);
		assert_eq!(heap.peek(), Some(0));
		assert!(heap.contains(&slots, 3));

		heap.clear(&mut slots);
		assert!((0..4).all(|key| !heap.contains(&slots, key)));
	}

	#[test]
	fn stale_index_is_not_membership() {
		let mut slots = slots(&[(1, 0), (2, 0)]);
		let mut heap = IndexedHeap::with_capacity(2);
		heap.push(&mut slots, 0);
		// an index that points at another key must not count
		slots.0[1].2 = Some(0);
		assert!(!heap.contains(&slots, 1));
	}

	#[test]
	fn reserved_storage_grows_up_to_capacity() {
		let mut slots = slots(&[(5, 0), (4, 0), (3, 0), (2, 0), (1, 0)]);
		let mut heap = IndexedHeap::with_reserved(5, 2);
		for key in 0..5 {
			heap.push(&mut slots, key);
		}
		assert_eq!(heap.len(), 5);
		assert_eq!(heap.capacity(), 5);
		assert_eq!(heap.pop(&mut slots), Some(4));
	}

	#[test]
	#[should_panic(expected = "IndexedHeap overflow")]
	fn overflow_panics() {
		let mut slots = slots(&[(1, 0), (2, 0)]);
		let mut heap = IndexedHeap::with_capacity(1);
		heap.push(&mut slots, 0);
		heap.push(&mut slots, 1);
	}

	#[test]
	fn random_operations_keep_order_and_membership() {
		let mut rng = WyRand::new_seed(4);
		let count = 200;
		let mut slots = TestSlots(
			(0..count)
				.map(|_| (rng.generate_range(0..50u32), rng.generate_range(0..50u32), None))
				.collect(),
		);
		let mut heap = IndexedHeap::with_capacity(count);
		let mut outside: Vec<usize> = (0..count).collect();

		for _ in 0..4000 {
			let action = rng.generate_range(0..5u32);
			if action < 2 && !outside.is_empty() {
				let at = rng.generate_range(0..outside.len());
				let key = outside.swap_remove(at);
				heap.push(&mut slots, key);
			} else if action < 4 && !heap.is_empty() {
				let inside: Vec<usize> = (0..count).filter(|key| !outside.contains(key)).collect();
				let key = inside[rng.generate_range(0..inside.len())];
				let old = slots.0[key].0;
				let new = rng.generate_range(0..50u32);
				slots.0[key].0 = new;
				if new < old {
					heap.update_higher(&mut slots, key);
				} else {
					heap.update_lower(&mut slots, key);
				}
			} else if let Some(best) = heap.pop(&mut slots) {
				let expected = (0..count)
					.filter(|&key| heap.contains(&slots, key))
					.map(|key| slots.priority(key))
					.min();
				if let Some(expected) = expected {
					assert!(slots.priority(best) <= expected);
				}
				outside.push(best);
			}

			for key in 0..count {
				assert_eq!(heap.contains(&slots, key), !outside.contains(&key));
			}
		}
	}
}
