//! In-process entity cache with multiple access paths.

use parking_lot::RwLock;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, warn};

/// Name of an access path (`"id"`, `"email"`, `"vin"`, ...).
pub type IndexName = &'static str;

/// The primary-key access path every cache has.
pub const ID_INDEX: IndexName = "id";

/// A natural-key access path value, e.g. `email = "a@x.com"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IndexKey {
    pub index: IndexName,
    pub value: String,
}

impl IndexKey {
    pub fn new(index: IndexName, value: impl Into<String>) -> Self {
        Self {
            index,
            value: value.into(),
        }
    }
}

/// A foreign-key grouping, e.g. "cars whose `customer` is 7".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GroupKey {
    pub group: IndexName,
    pub parent_id: i64,
}

impl GroupKey {
    pub fn new(group: IndexName, parent_id: i64) -> Self {
        Self { group, parent_id }
    }
}

/// An entity that can live in an [`IndexedCache`].
pub trait Cacheable: Clone + Send + Sync + 'static {
    /// Primary key.
    fn id(&self) -> i64;

    /// Unique natural keys computed from the current attribute values.
    fn natural_keys(&self) -> Vec<IndexKey> {
        Vec::new()
    }

    /// Parent groupings the entity belongs to.
    fn group_keys(&self) -> Vec<GroupKey> {
        Vec::new()
    }
}

/// Logical time captured before a store read or write.
///
/// A fill made with a ticket is accepted only if nothing touched the same
/// keys after the ticket was issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ReadTicket(u64);

/// Point-in-time counters of one cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheStats {
    pub name: &'static str,
    pub enabled: bool,
    pub entries: usize,
    pub groups: usize,
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
}

struct Entry<T> {
    value: T,
    keys: Vec<IndexKey>,
    groups: Vec<GroupKey>,
}

/// Stamps kept before the freshness maps are reset.
const STAMP_LIMIT: usize = 65_536;

/// Everything guarded by the cache lock.
///
/// Invariant: every id listed in `groups[g]` has an entry whose `groups`
/// contains `g`.
struct Inner<T> {
    clock: u64,
    cleared_at: u64,
    stamp_limit: usize,
    entries: HashMap<i64, Entry<T>>,
    keys: HashMap<IndexName, HashMap<String, i64>>,
    groups: HashMap<GroupKey, HashSet<i64>>,
    stamps: HashMap<i64, u64>,
    group_stamps: HashMap<GroupKey, u64>,
}

impl<T: Cacheable> Inner<T> {
    fn new() -> Self {
        Self {
            clock: 0,
            cleared_at: 0,
            stamp_limit: STAMP_LIMIT,
            entries: HashMap::new(),
            keys: HashMap::new(),
            groups: HashMap::new(),
            stamps: HashMap::new(),
            group_stamps: HashMap::new(),
        }
    }

    /// Advances the clock.
    ///
    /// Once the stamp maps outgrow `stamp_limit` they are reset and every
    /// outstanding ticket is invalidated, which is what the dropped stamps
    /// would have guarded against.
    fn tick(&mut self) -> u64 {
        self.clock += 1;
        if self.stamps.len() + self.group_stamps.len() > self.stamp_limit {
            debug!(
                "Freshness stamps reset ({} ids, {} groups)",
                self.stamps.len(),
                self.group_stamps.len()
            );
            self.stamps.clear();
            self.group_stamps.clear();
            self.cleared_at = self.clock;
        }
        self.clock
    }

    fn holder(&self, index: &str, value: &str) -> Option<i64> {
        self.keys.get(index)?.get(value).copied()
    }

    fn unregister_keys(&mut self, id: i64, keys: &[IndexKey]) {
        for key in keys {
            if let Some(values) = self.keys.get_mut(key.index)
                && values.get(&key.value) == Some(&id)
            {
                values.remove(&key.value);
                if values.is_empty() {
                    self.keys.remove(key.index);
                }
            }
        }
    }

    fn id_is_fresh(&self, ticket: ReadTicket, id: i64) -> bool {
        self.cleared_at <= ticket.0 && self.stamps.get(&id).is_none_or(|s| *s <= ticket.0)
    }

    fn group_is_fresh(&self, ticket: ReadTicket, key: &GroupKey) -> bool {
        self.cleared_at <= ticket.0 && self.group_stamps.get(key).is_none_or(|s| *s <= ticket.0)
    }

    fn drop_group(&mut self, key: &GroupKey, stamp: u64) {
        self.groups.remove(key);
        self.group_stamps.insert(*key, stamp);
    }

    /// Removes `id` and every access path pointing at it. Returns true if an
    /// entry was present.
    fn remove(&mut self, id: i64, stamp: u64) -> bool {
        self.stamps.insert(id, stamp);
        let Some(old) = self.entries.remove(&id) else {
            return false;
        };
        self.unregister_keys(id, &old.keys);
        for group in &old.groups {
            self.drop_group(group, stamp);
        }
        true
    }

    /// Registers `value` under all of its access paths, replacing any
    /// previous registration of the same id.
    ///
    /// Every group the entity enters or leaves is stamped, materialised or
    /// not, so a group fill read before this change is rejected even when
    /// the entity is missing from its member list.
    fn insert(&mut self, value: T, stamp: u64) -> usize {
        let id = value.id();
        let keys = value.natural_keys();
        let groups = value.group_keys();
        let mut displaced = 0;

        let old = self.entries.remove(&id);
        if let Some(old) = &old {
            self.unregister_keys(id, &old.keys);
            for group in old.groups.iter().filter(|g| !groups.contains(g)) {
                if let Some(members) = self.groups.get_mut(group) {
                    members.remove(&id);
                }
                self.group_stamps.insert(*group, stamp);
            }
        }

        // Another entity still registered under one of our keys is stale.
        for key in &keys {
            if let Some(holder) = self.holder(key.index, &key.value)
                && holder != id
                && self.remove(holder, stamp)
            {
                displaced += 1;
            }
        }

        for group in &groups {
            let entered = old.as_ref().is_none_or(|o| !o.groups.contains(group));
            if let Some(members) = self.groups.get_mut(group) {
                members.insert(id);
            }
            if entered {
                self.group_stamps.insert(*group, stamp);
            }
        }

        for key in &keys {
            self.keys
                .entry(key.index)
                .or_default()
                .insert(key.value.clone(), id);
        }
        self.stamps.insert(id, stamp);
        self.entries.insert(id, Entry { value, keys, groups });
        displaced
    }
}

/// A cache of one entity kind, retrievable by id, by any natural key and
/// by parent grouping.
///
/// Every operation takes the internal lock exactly once, so all access paths
/// of an entity change together: a concurrent reader sees either the old
/// registration or the new one, never a mix. Operations never fail and never
/// block on I/O.
pub struct IndexedCache<T> {
    name: &'static str,
    enabled: bool,
    inner: RwLock<Inner<T>>,
    hits: AtomicU64,
    misses: AtomicU64,
    evictions: AtomicU64,
}

impl<T: Cacheable> IndexedCache<T> {
    /// Creates an empty cache.
    pub fn new(name: &'static str) -> Self {
        Self::build(name, true)
    }

    /// Creates a cache that never stores anything.
    ///
    /// Every lookup misses and every fill is dropped, so all reads go to the
    /// store.
    pub fn disabled(name: &'static str) -> Self {
        debug!("Cache {} disabled", name);
        Self::build(name, false)
    }

    fn build(name: &'static str, enabled: bool) -> Self {
        Self {
            name,
            enabled,
            inner: RwLock::new(Inner::new()),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            evictions: AtomicU64::new(0),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Looks an entity up by access path.
    ///
    /// `index` is [`ID_INDEX`] or one of the natural-key index names the
    /// entity declares. Unknown indexes and keys are plain misses.
    pub fn get(&self, index: &str, key: &str) -> Option<T> {
        let found = if index == ID_INDEX {
            key.parse::<i64>().ok().and_then(|id| self.lookup_id(id))
        } else {
            let inner = self.inner.read();
            inner
                .holder(index, key)
                .and_then(|id| inner.entries.get(&id))
                .map(|e| e.value.clone())
        };
        self.record(index, key, found.is_some());
        found
    }

    /// Looks an entity up by primary key.
    pub fn get_by_id(&self, id: i64) -> Option<T> {
        let found = self.lookup_id(id);
        self.record(ID_INDEX, &id.to_string(), found.is_some());
        found
    }

    fn lookup_id(&self, id: i64) -> Option<T> {
        if !self.enabled {
            return None;
        }
        self.inner.read().entries.get(&id).map(|e| e.value.clone())
    }

    /// Returns every member of a materialised group, ordered by id.
    ///
    /// `None` means the group was never loaded or was invalidated; an empty
    /// vector means the parent is known to have no children.
    pub fn get_group(&self, key: GroupKey) -> Option<Vec<T>> {
        let found = if self.enabled {
            let inner = self.inner.read();
            inner.groups.get(&key).map(|ids| {
                let mut members: Vec<T> = ids
                    .iter()
                    .filter_map(|id| inner.entries.get(id).map(|e| e.value.clone()))
                    .collect();
                members.sort_by_key(|m| m.id());
                members
            })
        } else {
            None
        };
        self.record(key.group, &key.parent_id.to_string(), found.is_some());
        found
    }

    /// Issues a ticket for a store read or write that will be followed by
    /// [`Self::put_fresh`] or [`Self::put_group`].
    pub fn begin(&self) -> ReadTicket {
        ReadTicket(self.inner.read().clock)
    }

    /// Inserts or replaces `value` under every access path computed from its
    /// current attributes. Keys from the previous registration are evicted
    /// in the same step.
    pub fn put(&self, value: T) {
        if !self.enabled {
            return;
        }
        let id = value.id();
        let mut inner = self.inner.write();
        let stamp = inner.tick();
        let displaced = inner.insert(value, stamp);
        drop(inner);
        self.count_evictions(displaced as u64);
        debug!("Cache PUT: {}#{}", self.name, id);
    }

    /// Like [`Self::put`], but only if nothing touched `value`'s id since
    /// `ticket` was issued. Returns whether the value was stored.
    pub fn put_fresh(&self, ticket: ReadTicket, value: T) -> bool {
        if !self.enabled {
            return false;
        }
        let id = value.id();
        let mut inner = self.inner.write();
        if !inner.id_is_fresh(ticket, id) {
            drop(inner);
            debug!("Cache fill rejected (stale ticket): {}#{}", self.name, id);
            return false;
        }
        let stamp = inner.tick();
        let displaced = inner.insert(value, stamp);
        drop(inner);
        self.count_evictions(displaced as u64);
        debug!("Cache PUT: {}#{}", self.name, id);
        true
    }

    /// Stores the complete member list of a group loaded from the store.
    ///
    /// Rejected when the group or any member changed after `ticket`.
    pub fn put_group(&self, ticket: ReadTicket, key: GroupKey, members: Vec<T>) -> bool {
        if !self.enabled {
            return false;
        }
        if members.iter().any(|m| !m.group_keys().contains(&key)) {
            warn!(
                "Cache {} refused group {}={} with foreign members",
                self.name, key.group, key.parent_id
            );
            return false;
        }

        let mut inner = self.inner.write();
        let fresh = inner.group_is_fresh(ticket, &key)
            && members.iter().all(|m| inner.id_is_fresh(ticket, m.id()));
        if !fresh {
            drop(inner);
            debug!(
                "Group fill rejected (stale ticket): {} {}={}",
                self.name, key.group, key.parent_id
            );
            return false;
        }

        let stamp = inner.tick();
        let mut displaced = 0;
        let ids: HashSet<i64> = members.iter().map(|m| m.id()).collect();
        for member in members {
            displaced += inner.insert(member, stamp);
        }
        inner.groups.insert(key, ids);
        inner.group_stamps.insert(key, stamp);
        drop(inner);
        self.count_evictions(displaced as u64);
        debug!("Cache PUT group: {} {}={}", self.name, key.group, key.parent_id);
        true
    }

    /// Removes the entity registered under `index = key` from all of its
    /// access paths. Returns whether anything was removed; evicting an absent
    /// key is a no-op.
    pub fn evict(&self, index: &str, key: &str) -> bool {
        if !self.enabled {
            return false;
        }
        let mut inner = self.inner.write();
        let id = if index == ID_INDEX {
            key.parse::<i64>().ok()
        } else {
            inner.holder(index, key)
        };
        let Some(id) = id else {
            return false;
        };
        let stamp = inner.tick();
        let removed = inner.remove(id, stamp);
        drop(inner);
        self.finish_eviction(id, removed)
    }

    /// Removes an entity by primary key.
    ///
    /// Stamps the id even when nothing is cached, so a read-through that
    /// started before the eviction cannot store its result afterwards.
    pub fn evict_id(&self, id: i64) -> bool {
        if !self.enabled {
            return false;
        }
        let mut inner = self.inner.write();
        let stamp = inner.tick();
        let removed = inner.remove(id, stamp);
        drop(inner);
        self.finish_eviction(id, removed)
    }

    /// Removes `entity` from every access path it is registered under and
    /// drops the groups implied by both its cached and its given attributes.
    pub fn evict_entity(&self, entity: &T) -> bool {
        if !self.enabled {
            return false;
        }
        let id = entity.id();
        let mut inner = self.inner.write();
        let stamp = inner.tick();
        let removed = inner.remove(id, stamp);
        for group in entity.group_keys() {
            inner.drop_group(&group, stamp);
        }
        drop(inner);
        self.finish_eviction(id, removed)
    }

    /// Forgets a materialised group without touching its members.
    pub fn evict_group(&self, key: GroupKey) {
        if !self.enabled {
            return;
        }
        let mut inner = self.inner.write();
        let stamp = inner.tick();
        inner.drop_group(&key, stamp);
    }

    /// Drops every entry and invalidates all outstanding tickets.
    pub fn clear(&self) {
        if !self.enabled {
            return;
        }
        let mut inner = self.inner.write();
        let stamp = inner.tick();
        let dropped = inner.entries.len();
        inner.entries.clear();
        inner.keys.clear();
        inner.groups.clear();
        inner.stamps.clear();
        inner.group_stamps.clear();
        inner.cleared_at = stamp;
        drop(inner);
        self.count_evictions(dropped as u64);
        debug!("Cache CLEAR: {} ({} entries)", self.name, dropped);
    }

    /// Returns current counters.
    pub fn stats(&self) -> CacheStats {
        let inner = self.inner.read();
        CacheStats {
            name: self.name,
            enabled: self.enabled,
            entries: inner.entries.len(),
            groups: inner.groups.len(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
        }
    }

    fn record(&self, index: &str, key: &str, hit: bool) {
        if hit {
            self.hits.fetch_add(1, Ordering::Relaxed);
            metrics::counter!("cache_hits_total", "cache" => self.name).increment(1);
            debug!("Cache HIT: {} {}={}", self.name, index, key);
        } else {
            self.misses.fetch_add(1, Ordering::Relaxed);
            metrics::counter!("cache_misses_total", "cache" => self.name).increment(1);
            debug!("Cache MISS: {} {}={}", self.name, index, key);
        }
    }

    fn finish_eviction(&self, id: i64, removed: bool) -> bool {
        if removed {
            self.count_evictions(1);
            debug!("Cache INVALIDATE: {}#{}", self.name, id);
        }
        removed
    }

    fn count_evictions(&self, n: u64) {
        if n > 0 {
            self.evictions.fetch_add(n, Ordering::Relaxed);
            metrics::counter!("cache_evictions_total", "cache" => self.name).increment(n);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[derive(Debug, Clone, PartialEq, Eq)]
    struct Part {
        id: i64,
        code: String,
        label: String,
        bin: i64,
    }

    impl Part {
        fn new(id: i64, code: &str, bin: i64) -> Self {
            Self {
                id,
                code: code.to_string(),
                label: format!("label-{code}"),
                bin,
            }
        }
    }

    impl Cacheable for Part {
        fn id(&self) -> i64 {
            self.id
        }

        fn natural_keys(&self) -> Vec<IndexKey> {
            vec![
                IndexKey::new("code", self.code.clone()),
                IndexKey::new("label", self.label.clone()),
            ]
        }

        fn group_keys(&self) -> Vec<GroupKey> {
            vec![GroupKey::new("bin", self.bin)]
        }
    }

    fn bin(id: i64) -> GroupKey {
        GroupKey::new("bin", id)
    }

    #[test]
    fn test_put_then_get_by_every_index() {
        let cache = IndexedCache::new("parts");
        let part = Part::new(1, "A-1", 10);

        cache.put(part.clone());

        assert_eq!(cache.get_by_id(1), Some(part.clone()));
        assert_eq!(cache.get(ID_INDEX, "1"), Some(part.clone()));
        assert_eq!(cache.get("code", "A-1"), Some(part.clone()));
        assert_eq!(cache.get("label", "label-A-1"), Some(part));
    }

    #[test]
    fn test_unknown_index_and_key_miss() {
        let cache = IndexedCache::new("parts");
        cache.put(Part::new(1, "A-1", 10));

        assert!(cache.get("colour", "red").is_none());
        assert!(cache.get("code", "nope").is_none());
        assert!(cache.get(ID_INDEX, "not-a-number").is_none());
        assert!(cache.get_by_id(99).is_none());
    }

    #[test]
    fn test_changed_natural_key_evicts_old_key() {
        let cache = IndexedCache::new("parts");
        cache.put(Part::new(1, "A-1", 10));

        cache.put(Part::new(1, "A-2", 10));

        assert!(cache.get("code", "A-1").is_none());
        assert_eq!(cache.get("code", "A-2").map(|p| p.id), Some(1));
        assert_eq!(cache.stats().entries, 1);
    }

    #[test]
    fn test_key_taken_over_displaces_stale_holder() {
        let cache = IndexedCache::new("parts");
        cache.put(Part::new(1, "A-1", 10));

        // Part 2 now owns the code in the store, so part 1's entry is stale.
        cache.put(Part::new(2, "A-1", 10));

        assert!(cache.get_by_id(1).is_none());
        assert_eq!(cache.get("code", "A-1").map(|p| p.id), Some(2));
    }

    #[test]
    fn test_evict_is_idempotent() {
        let cache = IndexedCache::new("parts");
        cache.put(Part::new(1, "A-1", 10));

        assert!(cache.evict("code", "A-1"));
        assert!(!cache.evict("code", "A-1"));
        assert!(!cache.evict_id(1));

        assert!(cache.get_by_id(1).is_none());
        assert!(cache.get("label", "label-A-1").is_none());
        assert_eq!(cache.stats().evictions, 1);
    }

    #[test]
    fn test_clear_drops_everything() {
        let cache = IndexedCache::new("parts");
        cache.put(Part::new(1, "A-1", 10));
        cache.put(Part::new(2, "B-1", 10));

        cache.clear();

        assert!(cache.get_by_id(1).is_none());
        assert!(cache.get("code", "B-1").is_none());
        assert_eq!(cache.stats().entries, 0);
    }

    #[test]
    fn test_stale_ticket_is_rejected() {
        let cache = IndexedCache::new("parts");

        let reader = cache.begin();
        cache.evict_id(1);

        assert!(!cache.put_fresh(reader, Part::new(1, "A-1", 10)));
        assert!(cache.get_by_id(1).is_none());

        let later = cache.begin();
        assert!(cache.put_fresh(later, Part::new(1, "A-1", 10)));
        assert!(cache.get_by_id(1).is_some());
    }

    #[test]
    fn test_ticket_for_other_id_is_still_fresh() {
        let cache = IndexedCache::new("parts");

        let reader = cache.begin();
        cache.put(Part::new(2, "B-1", 10));

        assert!(cache.put_fresh(reader, Part::new(1, "A-1", 11)));
    }

    #[test]
    fn test_clear_invalidates_outstanding_tickets() {
        let cache = IndexedCache::new("parts");

        let reader = cache.begin();
        cache.clear();

        assert!(!cache.put_fresh(reader, Part::new(1, "A-1", 10)));
    }

    #[test]
    fn test_group_roundtrip_and_membership_moves() {
        let cache = IndexedCache::new("parts");
        let ticket = cache.begin();
        assert!(cache.put_group(
            ticket,
            bin(10),
            vec![Part::new(1, "A-1", 10), Part::new(2, "B-1", 10)]
        ));
        let ticket = cache.begin();
        assert!(cache.put_group(ticket, bin(20), vec![]));

        // Moving part 2 keeps both materialised groups complete.
        cache.put(Part::new(2, "B-1", 20));

        let ten: Vec<i64> = cache.get_group(bin(10)).unwrap().iter().map(|p| p.id).collect();
        let twenty: Vec<i64> = cache.get_group(bin(20)).unwrap().iter().map(|p| p.id).collect();
        assert_eq!(ten, vec![1]);
        assert_eq!(twenty, vec![2]);
    }

    #[test]
    fn test_new_member_joins_materialised_group() {
        let cache = IndexedCache::new("parts");
        let ticket = cache.begin();
        cache.put_group(ticket, bin(10), vec![Part::new(1, "A-1", 10)]);

        cache.put(Part::new(3, "C-1", 10));

        assert_eq!(cache.get_group(bin(10)).unwrap().len(), 2);
    }

    #[test]
    fn test_evicting_member_drops_group() {
        let cache = IndexedCache::new("parts");
        let ticket = cache.begin();
        cache.put_group(ticket, bin(10), vec![Part::new(1, "A-1", 10)]);

        cache.evict_id(1);

        assert!(cache.get_group(bin(10)).is_none());
    }

    #[test]
    fn test_evict_entity_drops_groups_of_given_value() {
        let cache = IndexedCache::new("parts");
        let ticket = cache.begin();
        cache.put_group(ticket, bin(20), vec![]);
        cache.put(Part::new(1, "A-1", 10));

        // The store now says part 1 lives in bin 20, which must be reloaded.
        cache.evict_entity(&Part::new(1, "A-1", 20));

        assert!(cache.get_by_id(1).is_none());
        assert!(cache.get_group(bin(20)).is_none());
    }

    #[test]
    fn test_group_fill_rejected_after_member_change() {
        let cache = IndexedCache::new("parts");
        let ticket = cache.begin();

        cache.put(Part::new(1, "A-1", 20));

        assert!(!cache.put_group(ticket, bin(10), vec![Part::new(1, "A-1", 10)]));
        assert!(cache.get_group(bin(10)).is_none());
        assert_eq!(cache.get_by_id(1).map(|p| p.bin), Some(20));
    }

    #[test]
    fn test_group_fill_rejected_after_member_joins_unloaded_group() {
        let cache = IndexedCache::new("parts");
        let ticket = cache.begin();

        // Part 3 joins bin 10 after the group was read but before it is stored.
        cache.put(Part::new(3, "C-1", 10));

        assert!(!cache.put_group(ticket, bin(10), vec![Part::new(1, "A-1", 10)]));
        assert!(cache.get_group(bin(10)).is_none());
        assert_eq!(cache.get_by_id(3).map(|p| p.bin), Some(10));
    }

    #[test]
    fn test_group_fill_rejected_after_member_leaves_unloaded_group() {
        let cache = IndexedCache::new("parts");
        cache.put(Part::new(2, "B-1", 10));
        let ticket = cache.begin();

        cache.put(Part::new(2, "B-1", 20));

        assert!(!cache.put_group(ticket, bin(20), vec![]));
        assert!(cache.get_group(bin(20)).is_none());
    }

    #[test]
    fn test_group_fill_survives_unrelated_write() {
        let cache = IndexedCache::new("parts");
        cache.put(Part::new(1, "A-1", 10));
        let ticket = cache.begin();

        cache.put(Part::new(4, "D-1", 40));

        assert!(cache.put_group(ticket, bin(10), vec![Part::new(1, "A-1", 10)]));
        assert_eq!(cache.get_group(bin(10)).map(|g| g.len()), Some(1));
    }

    #[test]
    fn test_natural_key_lookup_with_many_entries() {
        let cache = IndexedCache::new("parts");
        for id in 1..=5_000 {
            cache.put(Part::new(id, &format!("P-{id}"), id % 7));
        }

        assert_eq!(cache.get("code", "P-4321").map(|p| p.id), Some(4321));
        assert_eq!(cache.get("label", "label-P-17").map(|p| p.id), Some(17));
        assert!(cache.get("code", "P-5001").is_none());
        assert!(cache.get("label", "P-17").is_none());

        cache.put(Part::new(4321, "Q-1", 0));
        assert!(cache.get("code", "P-4321").is_none());
        assert!(cache.evict("code", "Q-1"));
        assert!(cache.get_by_id(4321).is_none());
        assert_eq!(cache.stats().entries, 4_999);
    }

    #[test]
    fn test_stamp_maps_stay_bounded() {
        let cache = IndexedCache::new("parts");
        cache.inner.write().stamp_limit = 16;
        cache.put(Part::new(1, "A-1", 10));

        for id in 100..1_000 {
            cache.evict_id(id);
        }

        let inner = cache.inner.read();
        assert!(inner.stamps.len() + inner.group_stamps.len() <= 17);
        drop(inner);
        assert_eq!(cache.get("code", "A-1").map(|p| p.id), Some(1));
    }

    #[test]
    fn test_stamp_reset_invalidates_outstanding_tickets() {
        let cache = IndexedCache::new("parts");
        cache.inner.write().stamp_limit = 4;
        let reader = cache.begin();

        // The read below raced an eviction whose stamp is gone after the reset.
        cache.evict_id(1);
        for id in 100..110 {
            cache.evict_id(id);
        }

        assert!(!cache.put_fresh(reader, Part::new(1, "A-1", 10)));
        let later = cache.begin();
        assert!(cache.put_fresh(later, Part::new(1, "A-1", 10)));
    }

    #[test]
    fn test_group_with_foreign_member_refused() {
        let cache = IndexedCache::new("parts");
        let ticket = cache.begin();

        assert!(!cache.put_group(ticket, bin(10), vec![Part::new(1, "A-1", 11)]));
    }

    #[test]
    fn test_disabled_cache_never_stores() {
        let cache = IndexedCache::disabled("parts");
        cache.put(Part::new(1, "A-1", 10));
        let ticket = cache.begin();

        assert!(!cache.put_fresh(ticket, Part::new(1, "A-1", 10)));
        assert!(cache.get_by_id(1).is_none());
        assert!(!cache.evict_id(1));
        assert!(!cache.stats().enabled);
    }

    #[test]
    fn test_hit_and_miss_counters() {
        let cache = IndexedCache::new("parts");
        cache.put(Part::new(1, "A-1", 10));

        cache.get_by_id(1);
        cache.get_by_id(2);
        cache.get("code", "A-1");

        let stats = cache.stats();
        assert_eq!(stats.hits, 2);
        assert_eq!(stats.misses, 1);
    }

    #[test]
    fn test_concurrent_readers_never_see_mixed_registration() {
        let cache = Arc::new(IndexedCache::new("parts"));
        cache.put(Part::new(1, "gen-0", 10));

        std::thread::scope(|scope| {
            let writer = Arc::clone(&cache);
            scope.spawn(move || {
                for generation in 1..2_000 {
                    writer.put(Part::new(1, &format!("gen-{generation}"), 10));
                }
            });

            for _ in 0..4 {
                let reader = Arc::clone(&cache);
                scope.spawn(move || {
                    for _ in 0..2_000 {
                        if let Some(part) = reader.get_by_id(1) {
                            // Each value carries the code it was registered under.
                            assert_eq!(part.label, format!("label-{}", part.code));
                            if let Some(by_code) = reader.get("code", &part.code) {
                                assert_eq!(by_code.id, 1);
                            }
                        }
                    }
                });
            }
        });

        let last = cache.get_by_id(1).unwrap();
        assert_eq!(last.code, "gen-1999");
        assert_eq!(cache.stats().entries, 1);
    }
}
