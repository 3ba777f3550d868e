// Thread memory store (in-memory, TTL-based)

use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

use super::thread::ThreadMemory;

#[derive(Debug, Clone, Deserialize)]
pub struct MemoryConfig {
    /// Entries idle for longer than this are dropped by the sweep
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,
    #[serde(default = "default_ttl_secs")]
    pub sweep_interval_secs: u64,
    /// When set, a thread is dropped this long after its connection closes
    #[serde(default)]
    pub disconnect_grace_secs: Option<u64>,
    #[serde(default = "default_max_recent_responses")]
    pub max_recent_responses: usize,
}

fn default_ttl_secs() -> u64 {
    3600
}

fn default_max_recent_responses() -> usize {
    5
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            ttl_secs: default_ttl_secs(),
            sweep_interval_secs: default_ttl_secs(),
            disconnect_grace_secs: None,
            max_recent_responses: default_max_recent_responses(),
        }
    }
}

impl MemoryConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs.max(1))
    }

    pub fn disconnect_grace(&self) -> Option<Duration> {
        self.disconnect_grace_secs.map(Duration::from_secs)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MemoryStats {
    pub total_entries: usize,
    pub idle_entries: usize,
    pub active_entries: usize,
}

/// Process-wide map from thread id to [`ThreadMemory`].
///
/// Entries are only ever created by get-or-create on an inbound message
/// (`get_or_create`, `touch`, `update`).
pub struct ThreadMemoryStore {
    entries: RwLock<HashMap<String, ThreadMemory>>,
    ttl: chrono::Duration,
    max_recent_responses: usize,
}

impl ThreadMemoryStore {
    pub fn new(config: &MemoryConfig) -> Self {
        Self::with_ttl(config.ttl(), config.max_recent_responses)
    }

    pub fn with_ttl(ttl: Duration, max_recent_responses: usize) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl: chrono::Duration::from_std(ttl).unwrap_or_else(|_| chrono::Duration::hours(1)),
            max_recent_responses,
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, ThreadMemory>> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, ThreadMemory>> {
        self.entries.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn ttl(&self) -> chrono::Duration {
        self.ttl
    }

    /// Snapshot of the thread's memory, creating a fresh entry if needed
    pub fn get_or_create(&self, thread_id: &str) -> ThreadMemory {
        self.write()
            .entry(thread_id.to_string())
            .or_insert_with(|| ThreadMemory::new(thread_id))
            .clone()
    }

    /// Snapshot without creating
    pub fn get(&self, thread_id: &str) -> Option<ThreadMemory> {
        self.read().get(thread_id).cloned()
    }

    pub fn touch(&self, thread_id: &str) {
        self.update(thread_id, |_| ());
    }

    /// Get-or-create, refresh `last_activity`, then mutate, all under one write lock
    pub fn update<R>(&self, thread_id: &str, f: impl FnOnce(&mut ThreadMemory) -> R) -> R {
        let mut entries = self.write();
        let memory = entries
            .entry(thread_id.to_string())
            .or_insert_with(|| ThreadMemory::new(thread_id));
        memory.touch();
        f(memory)
    }

    /// Fingerprint a bot reply into the thread's recent responses (no-op for unknown threads)
    pub fn record_response(&self, thread_id: &str, reply: &str) {
        if let Some(memory) = self.write().get_mut(thread_id) {
            memory.record_response(reply, self.max_recent_responses);
        }
    }

    pub fn remove(&self, thread_id: &str) -> bool {
        self.write().remove(thread_id).is_some()
    }

    /// Remove the entry only if it has not been touched for `idle`
    pub fn remove_if_idle(&self, thread_id: &str, idle: Duration) -> bool {
        let idle = chrono::Duration::from_std(idle).unwrap_or(self.ttl);
        let now = Utc::now();
        let mut entries = self.write();
        let expired = entries
            .get(thread_id)
            .map(|m| m.is_idle(now, idle))
            .unwrap_or(false);
        if expired {
            entries.remove(thread_id);
        }
        expired
    }

    pub fn sweep_expired(&self) -> usize {
        self.sweep_expired_at(Utc::now())
    }

    /// Drop every entry idle for longer than the TTL as of `now`
    pub fn sweep_expired_at(&self, now: DateTime<Utc>) -> usize {
        let ttl = self.ttl;
        let mut entries = self.write();
        let before = entries.len();
        entries.retain(|_, memory| !memory.is_idle(now, ttl));
        before - entries.len()
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    pub fn contains(&self, thread_id: &str) -> bool {
        self.read().contains_key(thread_id)
    }

    pub fn clear(&self) {
        self.write().clear();
    }

    pub fn stats(&self) -> MemoryStats {
        let now = Utc::now();
        let entries = self.read();
        let total = entries.len();
        let idle = entries.values().filter(|m| m.is_idle(now, self.ttl)).count();

        MemoryStats {
            total_entries: total,
            idle_entries: idle,
            active_entries: total - idle,
        }
    }
}

impl Default for ThreadMemoryStore {
    fn default() -> Self {
        Self::new(&MemoryConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_or_create_is_idempotent() {
        let store = ThreadMemoryStore::default();

        let first = store.get_or_create("t1");
        let second = store.get_or_create("t1");

        assert_eq!(store.len(), 1);
        assert_eq!(first.created_at, second.created_at);
    }

    #[test]
    fn test_update_persists_mutation() {
        let store = ThreadMemoryStore::default();

        let count = store.update("t1", |m| {
            m.greeting_count += 1;
            m.greeting_count
        });

        assert_eq!(count, 1);
        assert_eq!(store.get("t1").unwrap().greeting_count, 1);
    }

    #[test]
    fn test_record_response_does_not_create() {
        let store = ThreadMemoryStore::default();

        store.record_response("ghost", "hello");
        assert!(!store.contains("ghost"));

        store.touch("t1");
        store.record_response("t1", "hello there");
        assert_eq!(store.get("t1").unwrap().last_responses.len(), 1);
    }

    #[test]
    fn test_sweep_removes_only_stale_entries() {
        let store = ThreadMemoryStore::with_ttl(Duration::from_secs(3600), 5);
        store.touch("stale");
        store.touch("fresh");

        let now = Utc::now();
        store.update("stale", |m| m.last_activity = now - chrono::Duration::minutes(90));
        store.update("fresh", |m| m.last_activity = now - chrono::Duration::minutes(59));

        let removed = store.sweep_expired_at(now);

        assert_eq!(removed, 1);
        assert!(!store.contains("stale"));
        assert!(store.contains("fresh"));
    }

    #[test]
    fn test_remove_if_idle_keeps_recent() {
        let store = ThreadMemoryStore::default();
        store.touch("t1");

        assert!(!store.remove_if_idle("t1", Duration::from_secs(60)));
        assert!(store.contains("t1"));

        store.update("t1", |m| m.last_activity = Utc::now() - chrono::Duration::minutes(5));
        assert!(store.remove_if_idle("t1", Duration::from_secs(60)));
        assert!(!store.contains("t1"));
    }

    #[test]
    fn test_stats() {
        let store = ThreadMemoryStore::default();
        store.touch("a");
        store.touch("b");
        store.update("b", |m| m.last_activity = Utc::now() - chrono::Duration::hours(2));

        let stats = store.stats();
        assert_eq!(stats.total_entries, 2);
        assert_eq!(stats.idle_entries, 1);
        assert_eq!(stats.active_entries, 1);
    }
}
