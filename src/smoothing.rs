//! Sliding-window smoothing for noisy per-frame measurements.
//!
//! Raw per-frame angle, distance and gaze readings jitter with the landmark
//! detector. A short trailing median (numeric channels) or majority vote
//! (categorical channel) suppresses single-frame spikes without the lag of a
//! long moving average. Both windows share the same FIFO eviction policy:
//! at most `capacity` samples, oldest dropped first.

use std::collections::VecDeque;

/// Fixed-capacity window reducing to the median of the held samples
#[derive(Debug, Clone)]
pub struct MedianWindow {
    capacity: usize,
    samples: VecDeque<f64>,
}

impl MedianWindow {
    /// Create a window holding at most `capacity` samples
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            samples: VecDeque::with_capacity(capacity),
        }
    }

    /// Append a sample, evicting the oldest if the window is full
    pub fn push(&mut self, value: f64) {
        if self.samples.len() >= self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(value);
    }

    /// Median of the currently held samples, `None` while empty.
    ///
    /// During warm-up the median is taken over however many samples are
    /// held, not over `capacity`.
    #[must_use]
    pub fn median(&self) -> Option<f64> {
        if self.samples.is_empty() {
            return None;
        }
        let mut sorted: Vec<f64> = self.samples.iter().copied().collect();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        let len = sorted.len();
        if len % 2 == 0 {
            Some((sorted[len / 2 - 1] + sorted[len / 2]) / 2.0)
        } else {
            Some(sorted[len / 2])
        }
    }

    /// Number of samples currently held
    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// True if no samples have been pushed yet
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Samples currently held, oldest first
    #[must_use]
    pub fn samples(&self) -> impl Iterator<Item = f64> + '_ {
        self.samples.iter().copied()
    }
}

/// Fixed-capacity window reducing to the majority label.
///
/// Same eviction policy as [`MedianWindow`]; the reduction is a vote over
/// the held labels. Ties are broken deterministically in favor of the label
/// pushed most recently among those with the maximum count.
#[derive(Debug, Clone)]
pub struct MajorityWindow<T> {
    capacity: usize,
    labels: VecDeque<T>,
}

impl<T: Clone + Eq> MajorityWindow<T> {
    /// Create a window holding at most `capacity` labels
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            labels: VecDeque::with_capacity(capacity),
        }
    }

    /// Append a label, evicting the oldest if the window is full
    pub fn push(&mut self, label: T) {
        if self.labels.len() >= self.capacity {
            self.labels.pop_front();
        }
        self.labels.push_back(label);
    }

    /// Most frequent label, `None` while empty
    #[must_use]
    pub fn majority(&self) -> Option<T> {
        let mut best: Option<(usize, usize)> = None; // (count, last index)
        for (idx, candidate) in self.labels.iter().enumerate() {
            let count = self.labels.iter().filter(|l| *l == candidate).count();
            let replace = match best {
                None => true,
                Some((best_count, best_idx)) => {
                    count > best_count || (count == best_count && idx > best_idx)
                }
            };
            if replace {
                best = Some((count, idx));
            }
        }
        best.map(|(_, idx)| self.labels[idx].clone())
    }

    /// Number of labels currently held
    #[must_use]
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// True if no labels have been pushed yet
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_median_warm_up() {
        let mut window = MedianWindow::new(7);
        assert_eq!(window.median(), None);

        window.push(10.0);
        assert_eq!(window.median(), Some(10.0));

        window.push(20.0);
        assert_eq!(window.median(), Some(15.0)); // even count averages the middle pair

        window.push(30.0);
        assert_eq!(window.median(), Some(20.0));
    }

    #[test]
    fn test_median_rejects_outlier() {
        let mut window = MedianWindow::new(3);
        window.push(10.0);
        window.push(11.0);
        window.push(100.0);
        assert_eq!(window.median(), Some(11.0));
    }

    #[test]
    fn test_eviction_keeps_last_seven_in_order() {
        let mut window = MedianWindow::new(7);
        for v in 0..10 {
            window.push(f64::from(v));
        }
        assert_eq!(window.len(), 7);
        let held: Vec<f64> = window.samples().collect();
        let expected: Vec<f64> = (3..10).map(f64::from).collect();
        assert_eq!(held, expected);
    }

    #[test]
    fn test_majority_basic_vote() {
        let mut window = MajorityWindow::new(7);
        window.push("left");
        window.push("center");
        window.push("center");
        assert_eq!(window.majority(), Some("center"));
    }

    #[test]
    fn test_majority_tie_breaks_to_most_recent() {
        let mut window = MajorityWindow::new(4);
        window.push("left");
        window.push("left");
        window.push("right");
        window.push("right");
        // Two-way tie; the label seen most recently wins
        assert_eq!(window.majority(), Some("right"));
    }

    #[test]
    fn test_majority_empty() {
        let window: MajorityWindow<&str> = MajorityWindow::new(7);
        assert_eq!(window.majority(), None);
    }

    #[test]
    fn test_majority_eviction() {
        let mut window = MajorityWindow::new(3);
        window.push("left");
        window.push("right");
        window.push("right");
        window.push("right"); // evicts the lone "left"
        assert_eq!(window.len(), 3);
        assert_eq!(window.majority(), Some("right"));
    }

    proptest! {
        #[test]
        fn prop_median_window_never_exceeds_capacity(values in proptest::collection::vec(-1000.0f64..1000.0, 0..50)) {
            let mut window = MedianWindow::new(7);
            for v in values {
                window.push(v);
                prop_assert!(window.len() <= 7);
            }
        }

        #[test]
        fn prop_median_is_bounded_by_held_samples(values in proptest::collection::vec(-1000.0f64..1000.0, 1..20)) {
            let mut window = MedianWindow::new(7);
            for v in &values {
                window.push(*v);
            }
            let median = window.median().unwrap();
            let min = window.samples().fold(f64::INFINITY, f64::min);
            let max = window.samples().fold(f64::NEG_INFINITY, f64::max);
            prop_assert!(median >= min && median <= max);
        }
    }
}
