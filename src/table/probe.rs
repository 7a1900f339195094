//! Linear-probe table implementation.

use std::cell::Cell;

use tracing::debug;

use super::config::TableConfig;
use super::types::{Named, ProbeStats};
use crate::error::{Error, Result};
use crate::primes::PrimeSequence;

const HASH_BASE: u64 = 5333;
const HASH_BASE_STEP: u64 = 7919;

/// Outcome of walking a probe chain.
struct Probe {
    /// Slot holding the key, or the first empty slot. `None` if the chain
    /// wrapped all the way around without finding either.
    position: Option<usize>,
    found: bool,
    steps: usize,
}

/// Open-addressing map from `String` keys to `V`, sized in primes.
///
/// # Examples
///
/// ```
/// use u_allocore::table::ProbeTable;
///
/// let mut rates: ProbeTable<f64> = ProbeTable::new(4);
/// rates.set("Gold Nugget", 7.7).unwrap();
/// rates.set("Gold Nugget", 9.1).unwrap();
///
/// assert_eq!(rates.lookup("Gold Nugget"), Some(&9.1));
/// assert!(!rates.contains("Coal"));
/// assert!(rates.load_factor() <= 0.5);
/// ```
#[derive(Debug, Clone)]
pub struct ProbeTable<V> {
    slots: Vec<Option<(String, V)>>,
    count: usize,
    primes: PrimeSequence,
    config: TableConfig,
    stats: Cell<ProbeStats>,
}

impl<V> ProbeTable<V> {
    /// Creates a table sized for about `expected` entries with the default
    /// configuration.
    pub fn new(expected: usize) -> Self {
        let config = TableConfig::default();
        let target = initial_target(expected, config.size_multiplier);
        Self::sized(target, config)
    }

    /// Creates a table sized for about `expected` entries.
    pub fn with_config(expected: usize, config: TableConfig) -> Result<Self> {
        config.validate().map_err(Error::InvalidConfig)?;
        let target = initial_target(expected, config.size_multiplier);
        Ok(Self::sized(target, config))
    }

    /// Creates a table with an explicit starting capacity.
    ///
    /// The capacity is used as given; growth still follows the prime
    /// sequence seeded from it.
    pub fn with_capacity_override(capacity: usize, config: TableConfig) -> Result<Self> {
        config.validate().map_err(Error::InvalidConfig)?;
        if capacity == 0 {
            return Err(Error::InvalidConfig("capacity override must be positive".into()));
        }
        let mut primes = PrimeSequence::new(capacity.max(3), config.growth_factor);
        primes.next_prime()?;
        Ok(Self::from_parts(capacity, primes, config))
    }

    /// `target` is at least 2, so the sequence always has a prime to give.
    fn sized(target: usize, config: TableConfig) -> Self {
        let mut primes = PrimeSequence::new(target + 1, config.growth_factor);
        let capacity = primes.next().unwrap_or(2);
        Self::from_parts(capacity, primes, config)
    }

    fn from_parts(capacity: usize, primes: PrimeSequence, config: TableConfig) -> Self {
        Self {
            slots: empty_slots(capacity),
            count: 0,
            primes,
            config,
            stats: Cell::new(ProbeStats::default()),
        }
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        self.count
    }

    /// Whether the table holds no entries.
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Whether every slot is occupied.
    pub fn is_full(&self) -> bool {
        self.count == self.capacity()
    }

    /// Number of slots.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Current `len / capacity` ratio.
    pub fn load_factor(&self) -> f64 {
        self.count as f64 / self.capacity() as f64
    }

    /// Snapshot of the lifetime probe counters.
    pub fn statistics(&self) -> ProbeStats {
        self.stats.get()
    }

    /// Home slot of `key` for the current capacity.
    ///
    /// Polynomial digest whose base is re-scrambled after every character:
    /// `value = (value * base + code(c) % cap) % cap`, then
    /// `base = base * 7919 % cap`.
    pub fn hash(&self, key: &str) -> usize {
        let cap = self.capacity() as u64;
        let mut value = 0u64;
        let mut base = HASH_BASE;
        for c in key.chars() {
            value = (value * base + u64::from(c) % cap) % cap;
            base = (base * HASH_BASE_STEP) % cap;
        }
        value as usize
    }

    /// Inserts or overwrites `key`.
    ///
    /// A new key that would push the load factor past the limit triggers a
    /// rehash into the next prime capacity first.
    pub fn set(&mut self, key: impl Into<String>, value: V) -> Result<()> {
        let key = key.into();
        let mut probe = self.probe(&key);
        if !probe.found {
            if self.exceeds_load(self.count + 1) {
                self.grow_for(self.count + 1)?;
                probe = self.probe(&key);
            }
            if self.is_full() {
                return Err(Error::TableFull {
                    capacity: self.capacity(),
                });
            }
        }
        let position = probe.position.ok_or(Error::TableFull {
            capacity: self.capacity(),
        })?;
        self.record(probe.steps, true);
        if !probe.found {
            self.count += 1;
        }
        self.slots[position] = Some((key, value));
        Ok(())
    }

    /// Returns the value stored under `key`.
    pub fn get(&self, key: &str) -> Result<&V> {
        self.lookup(key).ok_or_else(|| Error::KeyNotFound { key: key.into() })
    }

    /// Returns the value stored under `key`, or `None` when absent.
    pub fn lookup(&self, key: &str) -> Option<&V> {
        let probe = self.probe(key);
        self.record(probe.steps, false);
        if !probe.found {
            return None;
        }
        let position = probe.position?;
        self.slots[position].as_ref().map(|(_, v)| v)
    }

    /// Mutable counterpart of [`lookup`](Self::lookup).
    pub fn lookup_mut(&mut self, key: &str) -> Option<&mut V> {
        let probe = self.probe(key);
        self.record(probe.steps, false);
        if !probe.found {
            return None;
        }
        let position = probe.position?;
        self.slots[position].as_mut().map(|(_, v)| v)
    }

    /// Whether `key` is present.
    pub fn contains(&self, key: &str) -> bool {
        self.lookup(key).is_some()
    }

    /// Removes `key` and returns its value.
    ///
    /// Entries later in the same cluster are re-seated so that every
    /// remaining key stays reachable from its home slot.
    pub fn remove(&mut self, key: &str) -> Result<V> {
        let probe = self.probe(key);
        self.record(probe.steps, false);
        let position = match probe.position {
            Some(p) if probe.found => p,
            _ => return Err(Error::KeyNotFound { key: key.into() }),
        };
        let (_, value) = self.slots[position]
            .take()
            .ok_or_else(|| Error::KeyNotFound { key: key.into() })?;
        self.count -= 1;

        let cap = self.capacity();
        let mut next = (position + 1) % cap;
        while let Some((moved_key, moved_value)) = self.slots[next].take() {
            if let Some(slot) = self.probe(&moved_key).position {
                self.slots[slot] = Some((moved_key, moved_value));
            }
            next = (next + 1) % cap;
        }
        Ok(value)
    }

    /// Live keys in slot order.
    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.iter().map(|(k, _)| k)
    }

    /// Live values in slot order.
    pub fn values(&self) -> impl Iterator<Item = &V> + '_ {
        self.iter().map(|(_, v)| v)
    }

    /// Live `(key, value)` pairs in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> + '_ {
        self.slots
            .iter()
            .filter_map(|slot| slot.as_ref().map(|(k, v)| (k.as_str(), v)))
    }

    /// [`set`](Self::set) keyed by the record's name.
    pub fn set_named<N: Named + ?Sized>(&mut self, item: &N, value: V) -> Result<()> {
        self.set(item.name(), value)
    }

    /// [`get`](Self::get) keyed by the record's name.
    pub fn get_named<N: Named + ?Sized>(&self, item: &N) -> Result<&V> {
        self.get(item.name())
    }

    /// [`lookup`](Self::lookup) keyed by the record's name.
    pub fn lookup_named<N: Named + ?Sized>(&self, item: &N) -> Option<&V> {
        self.lookup(item.name())
    }

    /// [`contains`](Self::contains) keyed by the record's name.
    pub fn contains_named<N: Named + ?Sized>(&self, item: &N) -> bool {
        self.contains(item.name())
    }

    fn exceeds_load(&self, count: usize) -> bool {
        count as f64 > self.capacity() as f64 * self.config.load_factor
    }

    fn grow_for(&mut self, count: usize) -> Result<()> {
        while self.exceeds_load(count) {
            self.rehash()?;
        }
        Ok(())
    }

    /// Rebuilds into the next prime capacity larger than the current one.
    fn rehash(&mut self) -> Result<()> {
        let old_capacity = self.capacity();
        let mut capacity = self.primes.next_prime()?;
        while capacity <= old_capacity {
            capacity = self.primes.next_prime()?;
        }

        let old = std::mem::replace(&mut self.slots, empty_slots(capacity));
        self.count = 0;
        for (key, value) in old.into_iter().flatten() {
            let probe = self.probe(&key);
            let position = probe.position.ok_or(Error::TableFull { capacity })?;
            self.record(probe.steps, true);
            self.slots[position] = Some((key, value));
            self.count += 1;
        }

        let mut stats = self.stats.get();
        stats.rehashes += 1;
        self.stats.set(stats);
        debug!(
            from = old_capacity,
            to = capacity,
            entries = self.count,
            "probe table rehashed"
        );
        Ok(())
    }

    fn probe(&self, key: &str) -> Probe {
        let cap = self.capacity();
        let mut position = self.hash(key);
        for steps in 0..cap {
            match &self.slots[position] {
                None => {
                    return Probe {
                        position: Some(position),
                        found: false,
                        steps,
                    }
                }
                Some((k, _)) if k == key => {
                    return Probe {
                        position: Some(position),
                        found: true,
                        steps,
                    }
                }
                Some(_) => position = (position + 1) % cap,
            }
        }
        Probe {
            position: None,
            found: false,
            steps: cap,
        }
    }

    fn record(&self, steps: usize, is_insert: bool) {
        let mut stats = self.stats.get();
        stats.record(steps, is_insert);
        self.stats.set(stats);
    }
}

/// `round(multiplier * expected)` with ties to even, never below 2.
fn initial_target(expected: usize, multiplier: f64) -> usize {
    ((multiplier * expected as f64).round_ties_even() as usize).max(2)
}

fn empty_slots<V>(capacity: usize) -> Vec<Option<(String, V)>> {
    std::iter::repeat_with(|| None).take(capacity).collect()
}
