//! A Module with some utilities for working with CellIds

/// The Type used to reference a [`Cell`](crate::Cell) inside of a [`NavGrid`](crate::NavGrid)
///
/// This is the flat index of the Cell, see [`NavGrid::id_of`](crate::NavGrid::id_of).
pub type CellId = usize;

/// A specialized [`HashMap`](hashbrown::HashMap) for CellIds with a faster Hasher
pub type CellIdMap<V> = hashbrown::HashMap<CellId, V, BuildCellIdHasher>;
/// A specialized [`HashSet`](hashbrown::HashSet) for CellIds with a faster Hasher
pub type CellIdSet = hashbrown::HashSet<CellId, BuildCellIdHasher>;

/// A [`BuildHasher`](std::hash::BuildHasher) specialized on CellIds
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BuildCellIdHasher;

/// A [`Hasher`](std::hash::Hasher) specialized on CellIds
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CellIdHasher(u64);

impl std::hash::BuildHasher for BuildCellIdHasher {
	type Hasher = CellIdHasher;
	fn build_hasher(&self) -> CellIdHasher {
		CellIdHasher(0)
	}
}
impl std::hash::Hasher for CellIdHasher {
	/// panics, since only CellIds are supposed to be used
	fn write(&mut self, _: &[u8]) {
		unreachable!("This Hasher only works with CellIds")
	}
	/// Writes a single CellId into this hasher.
	///
	/// The id is spread over all bits, since hashbrown uses the top bits as a tag.
	fn write_usize(&mut self, id: CellId) {
		self.0 = (id as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15)
	}
	fn finish(&self) -> u64 {
		self.0
	}
}

/// create a new [`CellIdMap`] by calling the [`with_hasher`](hashbrown::HashMap::with_hasher) Function
pub fn cell_id_map<V>() -> CellIdMap<V> {
	CellIdMap::with_hasher(BuildCellIdHasher)
}
/// create a new [`CellIdSet`] by calling the [`with_hasher`](hashbrown::HashSet::with_hasher) Function
pub fn cell_id_set() -> CellIdSet {
	CellIdSet::with_hasher(BuildCellIdHasher)
}

/// create a new [`CellIdMap`] by calling the [`with_capacity_and_hasher`](hashbrown::HashMap::with_capacity_and_hasher) Function
pub fn cell_id_map_with_cap<V>(capacity: usize) -> CellIdMap<V> {
	CellIdMap::with_capacity_and_hasher(capacity, BuildCellIdHasher)
}
/// create a new [`CellIdSet`] by calling the [`with_capacity_and_hasher`](hashbrown::HashSet::with_capacity_and_hasher) Function
pub fn cell_id_set_with_cap(capacity: usize) -> CellIdSet {
	CellIdSet::with_capacity_and_hasher(capacity, BuildCellIdHasher)
}
