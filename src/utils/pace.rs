use rand::Rng;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use crate::config::DelayRange;

/// Sleep for `duration` unless `cancel` fires first.
///
/// Returns `true` when the full duration elapsed, `false` when cut short.
pub async fn pause(cancel: &CancellationToken, duration: Duration) -> bool {
    if cancel.is_cancelled() {
        return false;
    }
    if duration.is_zero() {
        return true;
    }
    tokio::select! {
        _ = cancel.cancelled() => false,
        _ = tokio::time::sleep(duration) => true,
    }
}

/// Same as [`pause`] with a millisecond count.
pub async fn pause_ms(cancel: &CancellationToken, ms: u64) -> bool {
    pause(cancel, Duration::from_millis(ms)).await
}

/// Draw a duration uniformly from `range` (inclusive). Reversed bounds are
/// swapped rather than rejected.
pub fn jitter<R: Rng + ?Sized>(rng: &mut R, range: DelayRange) -> Duration {
    let (lo, hi) = if range.min_ms <= range.max_ms {
        (range.min_ms, range.max_ms)
    } else {
        (range.max_ms, range.min_ms)
    };
    let ms = if lo == hi { lo } else { rng.random_range(lo..=hi) };
    Duration::from_millis(ms)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use tokio::time::Instant;

    #[test]
    fn jitter_stays_in_range() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..1000 {
            let d = jitter(&mut rng, DelayRange::new(50, 500));
            assert!((50..=500).contains(&(d.as_millis() as u64)));
        }
        let d = jitter(&mut rng, DelayRange::new(900, 100));
        assert!((100..=900).contains(&(d.as_millis() as u64)));
        assert_eq!(jitter(&mut rng, DelayRange::fixed(12)), Duration::from_millis(12));
    }

    #[tokio::test(start_paused = true)]
    async fn pause_runs_full_duration() {
        let cancel = CancellationToken::new();
        let start = Instant::now();
        assert!(pause(&cancel, Duration::from_secs(2)).await);
        assert!(start.elapsed() >= Duration::from_secs(2));
    }

    #[tokio::test(start_paused = true)]
    async fn pause_returns_early_on_cancel() {
        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(300)).await;
            trigger.cancel();
        });
        let start = Instant::now();
        assert!(!pause(&cancel, Duration::from_secs(60)).await);
        assert!(start.elapsed() < Duration::from_secs(60));
    }

    #[tokio::test]
    async fn pause_after_cancel_is_immediate() {
        let cancel = CancellationToken::new();
        cancel.cancel();
        assert!(!pause_ms(&cancel, 10_000).await);
    }
}
