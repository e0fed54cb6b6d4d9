use chrono::{DateTime, Duration, Local};
use std::collections::HashMap;
use std::hash::Hash;

fn is_live(ttl: Duration, stored_at: &DateTime<Local>, now: DateTime<Local>) -> bool {
    stored_at
        .checked_add_signed(ttl)
        .is_none_or(|expires| now < expires)
}

/// Time-boxed memo of store reads. Entries expire `ttl` after insertion
/// and can be dropped explicitly after a write to the same key.
#[derive(Debug, Clone)]
pub struct TtlCache<K, V> {
    ttl: Duration,
    entries: HashMap<K, (V, DateTime<Local>)>,
}

impl<K: Eq + Hash, V: Clone> TtlCache<K, V> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: HashMap::new(),
        }
    }

    pub fn with_secs(secs: u64) -> Self {
        let secs = i64::try_from(secs).unwrap_or(i64::MAX);
        Self::new(Duration::try_seconds(secs).unwrap_or(Duration::MAX))
    }

    pub fn get_at(&self, key: &K, now: DateTime<Local>) -> Option<V> {
        self.entries
            .get(key)
            .filter(|(_, stored_at)| is_live(self.ttl, stored_at, now))
            .map(|(value, _)| value.clone())
    }

    pub fn get(&self, key: &K) -> Option<V> {
        self.get_at(key, Local::now())
    }

    /// Store `value` and drop every entry that has expired by `now`.
    pub fn insert_at(&mut self, key: K, value: V, now: DateTime<Local>) {
        let ttl = self.ttl;
        self.entries
            .retain(|_, (_, stored_at)| is_live(ttl, stored_at, now));
        self.entries.insert(key, (value, now));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn insert(&mut self, key: K, value: V) {
        self.insert_at(key, value, Local::now());
    }

    pub fn invalidate(&mut self, key: &K) {
        self.entries.remove(key);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
