//! Fixed-capacity ring buffer with running statistics.

/// Circular buffer of the last `capacity` summed corner loads.
///
/// Storage is zero-initialized and statistics are always computed over the
/// full backing slice, so before the first wrap-around the zero padding
/// drags mean and stddev down. That bias is deliberate: the convergence
/// engine's lower-bound gate rejects a zero-dominated mean, which keeps a
/// half-filled buffer from ever being declared stable.
#[derive(Debug)]
pub struct RingBuffer {
    data: Vec<f64>,
    index: usize,
    filled: bool,
}

impl RingBuffer {
    /// Create a zero-filled buffer.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "ring buffer capacity must be non-zero");
        Self {
            data: vec![0.0; capacity],
            index: 0,
            filled: false,
        }
    }

    /// Push one value, overwriting the oldest once full.
    pub fn push(&mut self, value: f64) {
        self.data[self.index] = value;
        self.index = (self.index + 1) % self.data.len();
        if self.index == 0 {
            self.filled = true;
        }
    }

    /// Whether every slot has been written at least once.
    #[must_use]
    pub const fn is_filled(&self) -> bool {
        self.filled
    }

    /// Mean over the full backing storage, zero padding included.
    #[must_use]
    pub fn mean(&self) -> f64 {
        let len = self.data.len() as f64;
        self.data.iter().sum::<f64>() / len
    }

    /// Population standard deviation over the full backing storage.
    #[must_use]
    pub fn stddev(&self) -> f64 {
        let mean = self.mean();
        let len = self.data.len() as f64;
        let variance = self
            .data
            .iter()
            .map(|value| {
                let diff = value - mean;
                diff * diff
            })
            .sum::<f64>()
            / len;
        variance.sqrt()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn starts_zeroed_and_unfilled() {
        let buffer = RingBuffer::new(10);
        assert!(!buffer.is_filled());
        assert_eq!(buffer.mean(), 0.0);
        assert_eq!(buffer.stddev(), 0.0);
    }

    #[test]
    fn fills_after_capacity_pushes() {
        let mut buffer = RingBuffer::new(4);
        for _ in 0..3 {
            buffer.push(1.0);
            assert!(!buffer.is_filled());
        }
        buffer.push(1.0);
        assert!(buffer.is_filled());
    }

    #[test]
    fn zero_padding_biases_partial_mean_down() {
        let mut buffer = RingBuffer::new(4);
        buffer.push(100.0);
        buffer.push(100.0);
        // Two real samples, two zero slots.
        assert_eq!(buffer.mean(), 50.0);
        assert_eq!(buffer.stddev(), 50.0);
    }

    #[test]
    fn constant_values_converge_to_zero_stddev() {
        let mut buffer = RingBuffer::new(8);
        for _ in 0..8 {
            buffer.push(150.0);
        }
        assert_eq!(buffer.mean(), 150.0);
        assert_eq!(buffer.stddev(), 0.0);
    }

    #[test]
    fn overwrites_oldest_once_full() {
        let mut buffer = RingBuffer::new(2);
        buffer.push(10.0);
        buffer.push(20.0);
        buffer.push(30.0); // evicts 10.0
        assert_eq!(buffer.mean(), 25.0);
    }

    #[test]
    #[should_panic(expected = "capacity must be non-zero")]
    fn zero_capacity_panics() {
        let _ = RingBuffer::new(0);
    }
}
