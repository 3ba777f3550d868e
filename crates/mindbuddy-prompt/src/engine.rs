use std::sync::{Arc, Mutex, PoisonError};

use mindbuddy_persist::ThreadMemoryStore;
use mindbuddy_types::{Language, DEFAULT_THREAD_ID};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::branch::Selection;
use crate::selector::PromptSelector;

/// Prompt selection bound to the shared thread memory store.
///
/// Holds the RNG so phrasing picks are reproducible when seeded.
pub struct PromptEngine {
    store: Arc<ThreadMemoryStore>,
    selector: PromptSelector,
    rng: Mutex<StdRng>,
}

impl PromptEngine {
    pub fn new(store: Arc<ThreadMemoryStore>) -> Self {
        Self::with_rng(store, StdRng::from_entropy())
    }

    pub fn with_seed(store: Arc<ThreadMemoryStore>, seed: u64) -> Self {
        Self::with_rng(store, StdRng::seed_from_u64(seed))
    }

    pub fn with_rng(store: Arc<ThreadMemoryStore>, rng: StdRng) -> Self {
        Self {
            store,
            selector: PromptSelector::new(),
            rng: Mutex::new(rng),
        }
    }

    pub fn store(&self) -> &Arc<ThreadMemoryStore> {
        &self.store
    }

    /// Build the instruction for one user message, updating the thread's memory
    pub fn prepare(&self, thread_id: Option<&str>, text: &str, language: Language) -> Selection {
        let thread_id = thread_id.unwrap_or(DEFAULT_THREAD_ID);
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);

        self.store.update(thread_id, |memory| {
            self.selector.select(text, language, memory, &mut *rng)
        })
    }

    pub fn record_reply(&self, thread_id: Option<&str>, reply: &str) {
        self.store
            .record_response(thread_id.unwrap_or(DEFAULT_THREAD_ID), reply);
    }

    /// Run `f` with the engine's RNG (fallback and welcome phrasing share it)
    pub fn with_rng_mut<T>(&self, f: impl FnOnce(&mut StdRng) -> T) -> T {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut rng)
    }
}
