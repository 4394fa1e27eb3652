//! Health reporting.
//!
//! Each subsystem exposes a named [`HealthProbe`]. The [`HealthReporter`] runs
//! every registered probe and folds the results into one [`HealthReport`],
//! whose overall status is the most severe individual status. Adding a check
//! means registering another probe; the aggregation does not change.

use std::sync::Arc;

use async_trait::async_trait;
use futures::future::join_all;
use serde::Serialize;

use crate::store::ForecastStore;

/// Status of a single probe or of the whole report, ordered by severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

/// What a probe observed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeOutcome {
    pub status: HealthStatus,
    pub description: String,
}

impl ProbeOutcome {
    pub fn healthy(description: impl Into<String>) -> Self {
        Self {
            status: HealthStatus::Healthy,
            description: description.into(),
        }
    }

    pub fn unhealthy(description: impl Into<String>) -> Self {
        Self {
            status: HealthStatus::Unhealthy,
            description: description.into(),
        }
    }
}

/// A named, independently invocable check. Probes must not mutate data.
#[async_trait]
pub trait HealthProbe: Send + Sync {
    fn name(&self) -> &str;

    async fn probe(&self) -> ProbeOutcome;
}

/// One entry of a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthCheck {
    pub name: String,
    pub status: HealthStatus,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthReport {
    pub status: HealthStatus,
    pub checks: Vec<HealthCheck>,
}

impl HealthReport {
    /// Build a report from individual checks; the overall status is the worst one.
    pub fn from_checks(checks: Vec<HealthCheck>) -> Self {
        let status = checks
            .iter()
            .map(|check| check.status)
            .fold(HealthStatus::Healthy, Ord::max);

        Self { status, checks }
    }
}

/// Runs the registered probes and aggregates their results.
#[derive(Clone, Default)]
pub struct HealthReporter {
    probes: Vec<Arc<dyn HealthProbe>>,
}

impl HealthReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_probe(mut self, probe: impl HealthProbe + 'static) -> Self {
        self.probes.push(Arc::new(probe));
        self
    }

    /// Run all probes concurrently. Checks are reported in registration order.
    pub async fn check_health(&self) -> HealthReport {
        let outcomes = join_all(self.probes.iter().map(|probe| probe.probe())).await;

        let checks = self
            .probes
            .iter()
            .zip(outcomes)
            .map(|(probe, outcome)| {
                if outcome.status != HealthStatus::Healthy {
                    tracing::warn!(
                        check = probe.name(),
                        status = ?outcome.status,
                        description = %outcome.description,
                        "Health check failed"
                    );
                }
                HealthCheck {
                    name: probe.name().to_string(),
                    status: outcome.status,
                    description: outcome.description,
                }
            })
            .collect();

        HealthReport::from_checks(checks)
    }
}

/// Verifies the forecast store answers a trivial query.
pub struct StoreProbe {
    store: ForecastStore,
}

impl StoreProbe {
    pub const NAME: &'static str = "store";

    pub fn new(store: ForecastStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl HealthProbe for StoreProbe {
    fn name(&self) -> &str {
        Self::NAME
    }

    async fn probe(&self) -> ProbeOutcome {
        match self.store.ping().await {
            Ok(()) => ProbeOutcome::healthy("Forecast store is reachable"),
            Err(e) => ProbeOutcome::unhealthy(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedProbe {
        name: &'static str,
        status: HealthStatus,
    }

    #[async_trait]
    impl HealthProbe for FixedProbe {
        fn name(&self) -> &str {
            self.name
        }

        async fn probe(&self) -> ProbeOutcome {
            ProbeOutcome {
                status: self.status,
                description: format!("{} is {:?}", self.name, self.status),
            }
        }
    }

    fn fixed(name: &'static str, status: HealthStatus) -> FixedProbe {
        FixedProbe { name, status }
    }

    #[test]
    fn test_severity_order() {
        assert!(HealthStatus::Healthy < HealthStatus::Degraded);
        assert!(HealthStatus::Degraded < HealthStatus::Unhealthy);
    }

    #[tokio::test]
    async fn test_no_probes_is_healthy() {
        let report = HealthReporter::new().check_health().await;
        assert_eq!(report.status, HealthStatus::Healthy);
        assert!(report.checks.is_empty());
    }

    #[tokio::test]
    async fn test_worst_status_wins() {
        let reporter = HealthReporter::new()
            .with_probe(fixed("cache", HealthStatus::Degraded))
            .with_probe(fixed("store", HealthStatus::Healthy));
        assert_eq!(reporter.check_health().await.status, HealthStatus::Degraded);

        let reporter = reporter.with_probe(fixed("queue", HealthStatus::Unhealthy));
        assert_eq!(reporter.check_health().await.status, HealthStatus::Unhealthy);
    }

    #[tokio::test]
    async fn test_checks_keep_registration_order() {
        let reporter = HealthReporter::new()
            .with_probe(fixed("b", HealthStatus::Unhealthy))
            .with_probe(fixed("a", HealthStatus::Healthy));

        let report = reporter.check_health().await;
        let names: Vec<_> = report.checks.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["b", "a"]);
        assert_eq!(report.checks[0].description, "b is Unhealthy");
    }

    #[test]
    fn test_report_serialization_shape() {
        let report = HealthReport::from_checks(vec![HealthCheck {
            name: "store".to_string(),
            status: HealthStatus::Healthy,
            description: "ok".to_string(),
        }]);

        assert_eq!(
            serde_json::to_value(&report).unwrap(),
            serde_json::json!({
                "status": "Healthy",
                "checks": [{"name": "store", "status": "Healthy", "description": "ok"}],
            })
        );
    }
}
