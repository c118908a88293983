use std::sync::Arc;

use rollaudit_core::{DieSpec, FailureKind, RollOutcome};
use tokio::sync::Semaphore;
use tokio::task::{JoinError, JoinSet};

use crate::remote::RollService;

/// Default ceiling on simultaneous in-flight rolls.
pub const DEFAULT_CONCURRENCY: usize = 10;

/// Issue `count` independent rolls with at most `concurrency` in flight.
///
/// Always returns exactly `count` outcomes, in completion order. A worker
/// that panics or is aborted is recorded as a failed outcome, so the batch
/// itself cannot fail.
pub async fn sample_batch(
    service: Arc<dyn RollService>,
    count: usize,
    die: &DieSpec,
    concurrency: usize,
) -> Vec<RollOutcome> {
    let permits = Arc::new(Semaphore::new(concurrency.max(1)));
    let die = Arc::new(die.clone());
    let mut workers = JoinSet::new();

    for _ in 0..count {
        let service = Arc::clone(&service);
        let permits = Arc::clone(&permits);
        let die = Arc::clone(&die);
        workers.spawn(async move {
            let Ok(_permit) = permits.acquire_owned().await else {
                return RollOutcome::failed(FailureKind::Worker, "Exception: worker pool closed");
            };
            service.roll_once(&die).await
        });
    }

    let mut outcomes = Vec::with_capacity(count);
    while let Some(joined) = workers.join_next().await {
        outcomes.push(joined.unwrap_or_else(|err| worker_failure(&err)));
    }
    outcomes
}

fn worker_failure(err: &JoinError) -> RollOutcome {
    let detail = if err.is_panic() {
        format!("Exception: worker panicked: {err}")
    } else {
        format!("Exception: worker cancelled: {err}")
    };
    RollOutcome::failed(FailureKind::Worker, detail)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use rollaudit_core::Grade;
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// Serves call `i` with value `i + 1`, failing or panicking on chosen calls.
    #[derive(Default)]
    struct ScriptedService {
        calls: AtomicUsize,
        in_flight: AtomicUsize,
        peak_in_flight: AtomicUsize,
        transport_failures: HashSet<usize>,
        panics: HashSet<usize>,
        latency: Duration,
    }

    #[async_trait]
    impl RollService for ScriptedService {
        async fn roll_once(&self, _die: &DieSpec) -> RollOutcome {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak_in_flight.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(self.latency).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);

            assert!(!self.panics.contains(&call), "scripted panic on call {call}");
            if self.transport_failures.contains(&call) {
                RollOutcome::failed(FailureKind::Transport, "connection reset by peer")
            } else {
                RollOutcome::rolled(u32::try_from(call + 1).unwrap_or(1), Grade::Success)
            }
        }
    }

    fn die() -> DieSpec {
        DieSpec::default()
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn returns_every_outcome_despite_failures() {
        let service = Arc::new(ScriptedService {
            transport_failures: HashSet::from([1, 3]),
            ..ScriptedService::default()
        });
        let outcomes = sample_batch(service.clone(), 5, &die(), 3).await;

        assert_eq!(outcomes.len(), 5);
        assert_eq!(outcomes.iter().filter(|o| o.is_success()).count(), 3);
        assert_eq!(
            outcomes
                .iter()
                .filter(|o| o.failure_kind() == Some(FailureKind::Transport))
                .count(),
            2
        );
        assert_eq!(service.calls.load(Ordering::SeqCst), 5);
    }

    #[tokio::test]
    async fn empty_batch_issues_no_requests() {
        let service = Arc::new(ScriptedService::default());
        let outcomes = sample_batch(service.clone(), 0, &die(), 4).await;
        assert!(outcomes.is_empty());
        assert_eq!(service.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn never_exceeds_concurrency_ceiling() {
        let service = Arc::new(ScriptedService {
            latency: Duration::from_millis(5),
            ..ScriptedService::default()
        });
        let outcomes = sample_batch(service.clone(), 40, &die(), 4).await;
        assert_eq!(outcomes.len(), 40);
        let peak = service.peak_in_flight.load(Ordering::SeqCst);
        assert!((1..=4).contains(&peak), "peak in flight was {peak}");
    }

    #[tokio::test]
    async fn zero_concurrency_still_makes_progress() {
        let service = Arc::new(ScriptedService::default());
        let outcomes = sample_batch(service, 3, &die(), 0).await;
        assert_eq!(outcomes.len(), 3);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn panicking_worker_becomes_failed_outcome() {
        let service = Arc::new(ScriptedService {
            panics: HashSet::from([0]),
            ..ScriptedService::default()
        });
        let outcomes = sample_batch(service, 4, &die(), 2).await;
        assert_eq!(outcomes.len(), 4);
        let worker_failures: Vec<_> = outcomes
            .iter()
            .filter(|o| o.failure_kind() == Some(FailureKind::Worker))
            .collect();
        assert_eq!(worker_failures.len(), 1);
        assert!(
            worker_failures[0]
                .error_detail()
                .is_some_and(|d| d.starts_with("Exception: worker panicked"))
        );
    }
}
