//! Idempotent fact creation

use crate::cluster::{classify, ErrorClass, FactStore};
use crate::error::{Error, Result};
use crate::fact::model::Fact;
use crate::retry::{with_backoff, Attempt, RetryError, RetryPolicy};
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishOutcome {
    Created,
    /// A fact with the same name was already stored; it is left as is
    AlreadyExisted,
}

/// Creates facts in a [`FactStore`], retrying transient failures
pub struct FactPublisher<S> {
    store: S,
    policy: RetryPolicy,
}

impl<S: FactStore> FactPublisher<S> {
    pub fn new(store: S, policy: RetryPolicy) -> Self {
        Self { store, policy }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Create `fact` unless one with the same name exists
    pub async fn publish(&self, fact: &Fact) -> Result<PublishOutcome> {
        let store = &self.store;
        let result = with_backoff(&self.policy, move || async move {
            match store.create_fact(fact).await {
                Ok(_) => Ok(PublishOutcome::Created),
                Err(err) => match classify(&err) {
                    ErrorClass::AlreadyExists => {
                        debug!("fact with name '{}' already existed", fact.name());
                        Ok(PublishOutcome::AlreadyExisted)
                    }
                    ErrorClass::Transient => Err(Attempt::Retry(err)),
                    ErrorClass::Fatal => Err(Attempt::Abort(err)),
                },
            }
        })
        .await;

        match result {
            Ok(outcome) => {
                if outcome == PublishOutcome::Created {
                    info!("created fact '{}'", fact.name());
                }
                Ok(outcome)
            }
            Err(RetryError::Aborted(err)) => Err(Error::Api(err)),
            Err(RetryError::Exhausted { attempts, last }) => Err(Error::TransientFailure {
                attempts,
                last_error: last.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cluster::{ApiError, InMemoryCluster};
    use crate::fact::model::ResourceReference;
    use crate::fact::translate::translate;
    use crate::report::{Counter, CoverageReport};
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Replays a fixed sequence of results, then succeeds
    struct ScriptedStore {
        failures: Mutex<Vec<ApiError>>,
        calls: Mutex<u32>,
    }

    impl ScriptedStore {
        fn failing_with(failures: Vec<ApiError>) -> Self {
            Self {
                failures: Mutex::new(failures),
                calls: Mutex::new(0),
            }
        }

        fn calls(&self) -> u32 {
            *self.calls.lock().unwrap()
        }
    }

    #[async_trait]
    impl FactStore for ScriptedStore {
        async fn create_fact(&self, fact: &Fact) -> std::result::Result<Fact, ApiError> {
            *self.calls.lock().unwrap() += 1;
            let mut failures = self.failures.lock().unwrap();
            if failures.is_empty() {
                Ok(fact.clone())
            } else {
                Err(failures.remove(0))
            }
        }
    }

    fn fast() -> RetryPolicy {
        RetryPolicy {
            max_attempts: 3,
            initial_delay_ms: 1,
            max_delay_ms: 2,
            jitter: false,
            ..Default::default()
        }
    }

    fn fact() -> Fact {
        let report = CoverageReport {
            name: "app".to_string(),
            counters: vec![Counter::new("INSTRUCTION", 100, 0)],
        };
        let activity = ResourceReference {
            name: "acme-app-master-1".to_string(),
            ..Default::default()
        };
        translate(&report, &activity, "")
    }

    #[tokio::test]
    async fn test_publish_twice_keeps_one_fact() {
        let publisher = FactPublisher::new(InMemoryCluster::new(), fast());
        let fact = fact();

        assert_eq!(publisher.publish(&fact).await.unwrap(), PublishOutcome::Created);
        assert_eq!(publisher.publish(&fact).await.unwrap(), PublishOutcome::AlreadyExisted);
        assert_eq!(publisher.store().fact_count().await, 1);
    }

    #[tokio::test]
    async fn test_transient_failures_are_retried() {
        let store = ScriptedStore::failing_with(vec![
            ApiError::transport("connection reset"),
            ApiError::new(Some(503), "ServiceUnavailable", "try later"),
        ]);
        let publisher = FactPublisher::new(store, fast());

        assert_eq!(publisher.publish(&fact()).await.unwrap(), PublishOutcome::Created);
        assert_eq!(publisher.store().calls(), 3);
    }

    #[tokio::test]
    async fn test_gives_up_after_max_attempts() {
        let store = ScriptedStore::failing_with(vec![ApiError::transport("down"); 5]);
        let publisher = FactPublisher::new(store, fast());

        match publisher.publish(&fact()).await {
            Err(Error::TransientFailure { attempts, last_error }) => {
                assert_eq!(attempts, 3);
                assert!(last_error.contains("down"));
            }
            other => panic!("Expected TransientFailure, got {:?}", other),
        }
        assert_eq!(publisher.store().calls(), 3);
    }

    #[tokio::test]
    async fn test_fatal_error_is_not_retried() {
        let store = ScriptedStore::failing_with(vec![ApiError::new(Some(403), "Forbidden", "no access")]);
        let publisher = FactPublisher::new(store, fast());

        let result = publisher.publish(&fact()).await;
        assert!(matches!(result, Err(Error::Api(ref e)) if e.reason == "Forbidden"));
        assert_eq!(publisher.store().calls(), 1);
    }
}
