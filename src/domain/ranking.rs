use std::cmp::Ordering;

/// Total order over `f64` rank keys, so negated scores and timestamps can
/// drive a [`RankedCollector`] without NaN handling at every call site.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankKey(pub f64);

impl Eq for RankKey {}

impl PartialOrd for RankKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for RankKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl From<f64> for RankKey {
    fn from(value: f64) -> Self {
        Self(value)
    }
}

struct Ranked<T, K> {
    key: K,
    arrival: u64,
    item: T,
}

/// Keeps at most `capacity` items sorted ascending by `key_fn`; the item with
/// the largest key is evicted once an insert goes over capacity. Equal keys
/// keep arrival order.
pub struct RankedCollector<T, K, F>
where
    K: Ord,
    F: Fn(&T) -> K,
{
    capacity: usize,
    key_fn: F,
    next_arrival: u64,
    items: Vec<Ranked<T, K>>,
}

impl<T, K, F> RankedCollector<T, K, F>
where
    K: Ord,
    F: Fn(&T) -> K,
{
    pub fn new(capacity: usize, key_fn: F) -> Self {
        Self {
            capacity,
            key_fn,
            next_arrival: 0,
            items: Vec::with_capacity(capacity.saturating_add(1).min(64)),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn insert(&mut self, item: T) {
        let key = (self.key_fn)(&item);
        let arrival = self.next_arrival;
        self.next_arrival += 1;

        let at = self
            .items
            .partition_point(|ranked| (&ranked.key, ranked.arrival) <= (&key, arrival));
        self.items.insert(at, Ranked { key, arrival, item });

        if self.items.len() > self.capacity {
            self.evict_worst();
        }
    }

    pub fn extend<I>(&mut self, items: I)
    where
        I: IntoIterator<Item = T>,
    {
        for item in items {
            self.insert(item);
        }
    }

    /// Removes and returns the item with the largest key.
    pub fn evict_worst(&mut self) -> Option<T> {
        self.items.pop().map(|ranked| ranked.item)
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index).map(|ranked| &ranked.item)
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &T> + '_ {
        self.items.iter().map(|ranked| &ranked.item)
    }

    pub fn into_vec(self) -> Vec<T> {
        self.items.into_iter().map(|ranked| ranked.item).collect()
    }
}
