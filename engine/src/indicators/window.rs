// Fixed-capacity ring buffer over the trailing `capacity` values of a series.
// Keeps a running sum and sum of squares so mean and variance are O(1) per step.

#[derive(Debug, Clone)]
pub struct RollingWindow {
    buf: Vec<f64>,
    head: usize, // slot the next value is written to
    len: usize,
    sum: f64,
    sum_sq: f64,
}

impl RollingWindow {
    /// `capacity` must be at least 1.
    pub fn new(capacity: usize) -> Self {
        debug_assert!(capacity >= 1, "rolling window needs a capacity of at least 1");
        Self {
            buf: vec![0.0; capacity.max(1)],
            head: 0,
            len: 0,
            sum: 0.0,
            sum_sq: 0.0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn is_full(&self) -> bool {
        self.len == self.buf.len()
    }

    /// Adds `value`, returning the value that left the window once it is full.
    pub fn push(&mut self, value: f64) -> Option<f64> {
        let evicted = if self.is_full() {
            let old = self.buf[self.head];
            self.sum -= old;
            self.sum_sq -= old * old;
            Some(old)
        } else {
            self.len += 1;
            None
        };
        self.buf[self.head] = value;
        self.sum += value;
        self.sum_sq += value * value;
        self.head = (self.head + 1) % self.buf.len();
        evicted
    }

    pub fn sum(&self) -> f64 {
        self.sum
    }

    pub fn mean(&self) -> Option<f64> {
        if self.is_empty() {
            None
        } else {
            Some(self.sum / self.len as f64)
        }
    }

    /// Population variance of the values currently held, clamped at zero since
    /// `sum_sq/n - mean²` can come out slightly negative from rounding.
    /// An overflowed sum of squares yields NaN rather than a clamped zero.
    pub fn population_variance(&self) -> Option<f64> {
        let mean = self.mean()?;
        let variance = self.sum_sq / self.len as f64 - mean * mean;
        Some(if variance < 0.0 { 0.0 } else { variance })
    }
}
