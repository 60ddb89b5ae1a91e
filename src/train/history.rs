use std::collections::VecDeque;

/// Bounded record of recent mean-error readings, oldest first.
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorHistory {
    capacity: usize,
    values: VecDeque<f64>,
}

impl ErrorHistory {
    pub fn new(capacity: usize) -> ErrorHistory {
        ErrorHistory {
            capacity,
            values: VecDeque::with_capacity(capacity),
        }
    }

    /// Appends `value`, evicting the oldest reading once full.
    pub fn push(&mut self, value: f64) {
        if self.capacity == 0 {
            return;
        }
        if self.values.len() == self.capacity {
            self.values.pop_front();
        }
        self.values.push_back(value);
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn latest(&self) -> Option<f64> {
        self.values.back().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.values.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn evicts_oldest_when_full() {
        let mut h = ErrorHistory::new(3);
        for v in [0.5, 0.4, 0.3, 0.2, 0.1] {
            h.push(v);
        }
        assert_eq!(h.len(), 3);
        assert_eq!(h.iter().collect::<Vec<_>>(), vec![0.3, 0.2, 0.1]);
        assert_eq!(h.latest(), Some(0.1));
    }

    #[test]
    fn zero_capacity_keeps_nothing() {
        let mut h = ErrorHistory::new(0);
        h.push(1.0);
        assert!(h.is_empty());
        assert_eq!(h.latest(), None);
    }
}
