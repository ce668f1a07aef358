/// Counts-of-counts with a bounded number of buckets
///
/// Bucket `i` holds the number of entities whose count is `i + 1`; the last
/// bucket holds every count at or above `overflow`. Zero counts are not
/// recorded.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Histogram {
    counts: Vec<usize>,
}

impl Default for Histogram {
    fn default() -> Histogram {
        Histogram::new(Histogram::DEFAULT_OVERFLOW)
    }
}

impl Histogram {
    /// Buckets `1, 2, 3, 4, 5, >=6`
    pub const DEFAULT_OVERFLOW: usize = 6;

    /// Create an empty histogram whose last bucket is `>=overflow`.
    /// An `overflow` of 0 is treated as 1.
    pub fn new(overflow: usize) -> Histogram {
        Histogram {
            counts: vec![0; overflow.max(1)],
        }
    }

    pub fn overflow(&self) -> usize {
        self.counts.len()
    }

    /// Record one entity with `n` hits
    pub fn add(&mut self, n: usize) {
        if n == 0 {
            return;
        }
        let idx = n.min(self.overflow()) - 1;
        self.counts[idx] += 1;
    }

    pub fn counts(&self) -> &[usize] {
        &self.counts
    }

    /// Number of recorded entities, i.e. entities with at least one hit
    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    /// Bucket labels in order: `1`, `2`, ..., `>=overflow`
    pub fn labels(&self) -> Vec<String> {
        let n = self.overflow();
        (1..n)
            .map(|i| i.to_string())
            .chain(std::iter::once(format!(">={}", n)))
            .collect()
    }

    /// `(label, count)` for every bucket, including empty ones
    pub fn rows(&self) -> Vec<(String, usize)> {
        self.labels()
            .into_iter()
            .zip(self.counts.iter().copied())
            .collect()
    }

    /// Fill a histogram with an explicit overflow from an iterator of counts
    pub fn collect_with<I: IntoIterator<Item = usize>>(overflow: usize, iter: I) -> Histogram {
        let mut h = Histogram::new(overflow);
        for n in iter {
            h.add(n);
        }
        h
    }
}

impl FromIterator<usize> for Histogram {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        Histogram::collect_with(Histogram::DEFAULT_OVERFLOW, iter)
    }
}
