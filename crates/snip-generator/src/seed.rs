use async_trait::async_trait;
use snip_core::error::Result;
use snip_core::SeedSource;
use std::sync::atomic::{AtomicU64, Ordering};

/// An in-process monotonic counter.
///
/// Each call to [`SeedSource::next_seed`] returns the current value and
/// advances it by one, so concurrent callers never share a seed. The state
/// lives in this value, not in a global: start several instances at
/// different offsets to get isolated, reproducible sequences.
#[derive(Debug, Default)]
pub struct CounterSeed {
    next: AtomicU64,
}

impl CounterSeed {
    /// Creates a counter starting at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a counter starting from a specific value.
    ///
    /// Useful for resuming from a known state or for handing disjoint
    /// counter ranges to separate processes.
    pub fn starting_at(offset: u64) -> Self {
        Self {
            next: AtomicU64::new(offset),
        }
    }

    /// The seed the next call will return.
    pub fn peek(&self) -> u64 {
        self.next.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SeedSource for CounterSeed {
    async fn next_seed(&self) -> Result<u64> {
        Ok(self.next.fetch_add(1, Ordering::SeqCst))
    }
}

/// Draws a fresh random seed for every attempt.
///
/// Combined with a permuting generator this yields codes spread uniformly
/// over the whole space; uniqueness then rests on the store's atomic insert
/// and the engine's collision retry.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomSeed;

#[async_trait]
impl SeedSource for RandomSeed {
    async fn next_seed(&self) -> Result<u64> {
        Ok(rand::random::<u64>())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;

    #[tokio::test]
    async fn counter_is_sequential() {
        let seed = CounterSeed::new();

        assert_eq!(seed.next_seed().await.unwrap(), 0);
        assert_eq!(seed.next_seed().await.unwrap(), 1);
        assert_eq!(seed.next_seed().await.unwrap(), 2);
        assert_eq!(seed.peek(), 3);
    }

    #[tokio::test]
    async fn counter_with_offset() {
        let seed = CounterSeed::starting_at(1000);

        assert_eq!(seed.next_seed().await.unwrap(), 1000);
        assert_eq!(seed.next_seed().await.unwrap(), 1001);
    }

    #[tokio::test]
    async fn counters_are_independent() {
        let a = CounterSeed::new();
        let b = CounterSeed::new();

        a.next_seed().await.unwrap();
        a.next_seed().await.unwrap();

        assert_eq!(b.next_seed().await.unwrap(), 0);
        assert_eq!(a.peek(), 2);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_callers_never_share_a_seed() {
        let seed = Arc::new(CounterSeed::new());
        let mut handles = vec![];

        for _ in 0..8 {
            let seed = Arc::clone(&seed);
            handles.push(tokio::spawn(async move {
                let mut seen = Vec::with_capacity(100);
                for _ in 0..100 {
                    seen.push(seed.next_seed().await.unwrap());
                }
                seen
            }));
        }

        let mut all = HashSet::new();
        for handle in handles {
            for value in handle.await.unwrap() {
                assert!(all.insert(value), "seed {value} handed out twice");
            }
        }
        assert_eq!(all.len(), 800);
        assert_eq!(seed.peek(), 800);
    }

    #[tokio::test]
    async fn random_seeds_vary() {
        let seed = RandomSeed;
        let drawn: HashSet<u64> = draw(&seed, 32).await;
        // 32 draws from 2^64 values colliding down to one is not a realistic outcome
        assert!(drawn.len() > 1);
    }

    async fn draw(seed: &RandomSeed, n: usize) -> HashSet<u64> {
        let mut out = HashSet::new();
        for _ in 0..n {
            out.insert(seed.next_seed().await.unwrap());
        }
        out
    }
}
