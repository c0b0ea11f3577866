use std::sync::atomic::{AtomicU64, Ordering};

use sift_domain::Generation;

/// Mints strictly increasing generation tokens and answers whether one is still current.
#[derive(Debug, Default)]
pub struct GenerationAllocator {
	latest: AtomicU64,
}
impl GenerationAllocator {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn allocate(&self) -> Generation {
		Generation::new(self.latest.fetch_add(1, Ordering::AcqRel) + 1)
	}

	pub fn current(&self) -> Generation {
		Generation::new(self.latest.load(Ordering::Acquire))
	}

	pub fn is_current(&self, generation: Generation) -> bool {
		self.current() == generation
	}
}
