// ABOUTME: Integration tests verifying the coordinator and dinner work together.
// ABOUTME: Stress runs with skewed delays check safety, deadlock, and starvation freedom.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;

use symposium::prelude::*;

/// Even seats linger over meals, odd seats barely think. Neighbours of a
/// slow eater are the ones at risk of starving.
struct SkewedDelay {
    coordinator: Arc<Coordinator>,
    violations: Arc<AtomicUsize>,
}

#[async_trait]
impl Activity for SkewedDelay {
    async fn perform(&self, id: PhilosopherId, kind: ActivityKind) {
        if kind == ActivityKind::Eat && !self.coordinator.snapshot().adjacent_eaters().is_empty() {
            self.violations.fetch_add(1, Ordering::SeqCst);
        }

        let max_ms = match (kind, id % 2) {
            (ActivityKind::Eat, 0) => 8,
            (ActivityKind::Eat, _) => 1,
            (ActivityKind::Think, 0) => 4,
            (ActivityKind::Think, _) => 0,
            (ActivityKind::Talk, _) => 1,
        };
        let pause = rand::rng().random_range(0..=max_ms);
        tokio::time::sleep(Duration::from_millis(pause)).await;
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_skewed_dinner_terminates_without_starvation() {
    for philosophers in [2, 3, 5, 8] {
        let config = DinnerConfig::new(philosophers)
            .dining_steps(30)
            .talk_probability(0.3)
            .seed(philosophers as u64);
        let dinner = Dinner::new(config).unwrap();
        let violations = Arc::new(AtomicUsize::new(0));
        let activity = SkewedDelay {
            coordinator: dinner.coordinator(),
            violations: violations.clone(),
        };

        let report = tokio::time::timeout(Duration::from_secs(30), dinner.activity(activity).run())
            .await
            .unwrap_or_else(|_| panic!("dinner for {philosophers} deadlocked"))
            .unwrap();

        assert_eq!(violations.load(Ordering::SeqCst), 0);
        for philosopher in &report.philosophers {
            assert_eq!(philosopher.meals, 30, "seat {} starved", philosopher.id);
            assert!(
                philosopher.longest_wait_ms < 2_000,
                "seat {} waited {}ms for a meal",
                philosopher.id,
                philosopher.longest_wait_ms
            );
        }
        assert!(report.table.meal_queue.is_empty());
        assert!(report.table.talk_queue.is_empty());
    }
}

#[tokio::test]
async fn test_lone_philosopher_dines() {
    let config = DinnerConfig::new(1)
        .dining_steps(5)
        .time_to_waste(Duration::from_millis(1))
        .talk_probability(1.0);
    let report = Dinner::new(config).unwrap().run().await.unwrap();

    assert_eq!(report.philosophers[0].meals, 5);
    assert_eq!(report.philosophers[0].speeches, 5);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_neighbours_never_observed_eating_together() {
    let coordinator = Arc::new(Coordinator::new(5));
    let observed = Arc::new(AtomicUsize::new(0));

    let mut handles = Vec::new();
    for id in [0, 1] {
        let coordinator = coordinator.clone();
        let observed = observed.clone();
        handles.push(tokio::spawn(async move {
            for _ in 0..200 {
                coordinator.acquire_resources(id).await;
                let table = coordinator.snapshot();
                if table.states[0] == PhilosopherState::Eating
                    && table.states[1] == PhilosopherState::Eating
                {
                    observed.fetch_add(1, Ordering::SeqCst);
                }
                tokio::task::yield_now().await;
                coordinator.release_resources(id);
            }
        }));
    }

    for handle in handles {
        handle.await.unwrap();
    }
    assert_eq!(observed.load(Ordering::SeqCst), 0);
    assert_eq!(coordinator.snapshot().meals, vec![200, 200, 0, 0, 0]);
}

#[tokio::test]
async fn test_speaker_holds_token_until_release() {
    let coordinator = Arc::new(Coordinator::new(5));
    coordinator.request_token(1).await;

    let waiter = {
        let coordinator = coordinator.clone();
        tokio::spawn(async move { coordinator.request_token(4).await })
    };

    tokio::time::sleep(Duration::from_millis(30)).await;
    assert!(!waiter.is_finished());
    assert_eq!(coordinator.snapshot().speaker, Some(1));
    assert_eq!(coordinator.snapshot().talk_queue, vec![4]);

    coordinator.release_token();
    tokio::time::timeout(Duration::from_secs(1), waiter)
        .await
        .expect("waiter should get the token")
        .unwrap();
    assert_eq!(coordinator.snapshot().speaker, Some(4));
}

#[test]
fn test_errors_unify_under_symposium_error() {
    let err: SymposiumError = MonitorError::Interrupted {
        id: 2,
        request: Request::Token,
    }
    .into();
    assert!(err.to_string().starts_with("Monitor error:"));

    let err: SymposiumError = ConfigError::Invalid("bad".into()).into();
    assert!(err.to_string().contains("bad"));

    let err: SymposiumError = DinnerError::Stopped { id: 4 }.into();
    assert!(err.to_string().contains("philosopher 4"));
}
