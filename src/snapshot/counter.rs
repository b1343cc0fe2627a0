use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// Thread-safe element count with a hard upper bound.
///
/// Once a request would cross the bound the counter is marked exceeded and
/// every later request is refused, so the accepted count never grows past the
/// first refusal.
#[derive(Debug)]
pub struct BoundedCounter {
    upper_bound: usize,
    count: AtomicUsize,
    attempted: AtomicUsize,
    exceeded: AtomicBool,
}

impl BoundedCounter {
    pub fn new(upper_bound: usize) -> Self {
        Self {
            upper_bound,
            count: AtomicUsize::new(0),
            attempted: AtomicUsize::new(0),
            exceeded: AtomicBool::new(false),
        }
    }

    /// Accepts `n` more elements, or refuses all of them.
    pub fn try_add(&self, n: usize) -> bool {
        self.attempted.fetch_add(n, Ordering::SeqCst);
        if self.exceeded.load(Ordering::SeqCst) {
            return false;
        }

        let mut current = self.count.load(Ordering::SeqCst);
        loop {
            let next = match current.checked_add(n) {
                Some(next) if next <= self.upper_bound => next,
                _ => {
                    self.exceeded.store(true, Ordering::SeqCst);
                    return false;
                }
            };
            match self.count.compare_exchange_weak(current, next, Ordering::SeqCst, Ordering::SeqCst) {
                Ok(_) => return true,
                Err(actual) => current = actual,
            }
        }
    }

    pub fn try_increment(&self) -> bool {
        self.try_add(1)
    }

    pub fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }

    /// Everything ever requested, refused requests included.
    pub fn attempted(&self) -> usize {
        self.attempted.load(Ordering::SeqCst)
    }

    pub fn upper_bound(&self) -> usize {
        self.upper_bound
    }

    pub fn upper_bound_exceeded(&self) -> bool {
        self.exceeded.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn add_then_increment_to_the_bound() {
        let counter = BoundedCounter::new(10);
        assert!(counter.try_add(5));
        for _ in 0..5 {
            assert!(counter.try_increment());
        }
        assert!(!counter.upper_bound_exceeded());
        assert_eq!(counter.count(), 10);

        assert!(!counter.try_increment());
        assert!(counter.upper_bound_exceeded());
        assert_eq!(counter.count(), 10);
        assert_eq!(counter.attempted(), 11);
    }

    #[test]
    fn refusal_is_sticky() {
        let counter = BoundedCounter::new(3);
        assert!(!counter.try_add(4));
        assert!(!counter.try_increment());
        assert_eq!(counter.count(), 0);
    }

    #[test]
    fn concurrent_increments_never_pass_the_bound() {
        let counter = Arc::new(BoundedCounter::new(100));
        let workers: Vec<_> = (0..8)
            .map(|_| {
                let counter = Arc::clone(&counter);
                thread::spawn(move || (0..50).filter(|_| counter.try_increment()).count())
            })
            .collect();
        let accepted: usize = workers.into_iter().map(|w| w.join().unwrap()).sum();
        assert_eq!(accepted, 100);
        assert_eq!(counter.count(), 100);
        assert_eq!(counter.attempted(), 400);
        assert!(counter.upper_bound_exceeded());
    }
}
