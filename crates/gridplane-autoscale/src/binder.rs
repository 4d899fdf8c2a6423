//! Policy binder: attaches a scalable target and step policy to a
//! provisioned service.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::debug;

use crate::policy::StepPolicy;

/// Desired-count bounds applied to every service. Fixed; not exposed
/// through the grid configuration.
pub const MIN_CAPACITY: u32 = 1;
pub const MAX_CAPACITY: u32 = 10;

/// Sampling period for the utilization metric, in seconds.
pub const METRIC_PERIOD_SECS: u64 = 60;

/// Metric namespace the compute platform publishes service
/// utilization under.
pub const METRIC_NAMESPACE: &str = "grid/compute";

/// Metric name for per-service CPU utilization.
pub const CPU_UTILIZATION_METRIC: &str = "CPUUtilization";

/// Names the service a policy binds to. One-to-one with a provisioned
/// service; created immediately after it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScalingPolicyDescriptor {
    pub identifier: String,
    pub cluster_name: String,
    pub service_name: String,
}

/// The scalable-capacity dimension exposed to the platform's
/// autoscaling controller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScalableTargetSpec {
    /// Platform resource path, `service/<cluster>/<service>`.
    pub resource_id: String,
    pub scalable_dimension: String,
    pub min_capacity: u32,
    pub max_capacity: u32,
}

/// Statistic applied to the metric over each sampling period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Statistic {
    Average,
    Maximum,
}

/// A queryable metric handle for the telemetry backend.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricSpec {
    pub namespace: String,
    pub metric_name: String,
    pub statistic: Statistic,
    pub period_secs: u64,
    pub dimensions: BTreeMap<String, String>,
}

/// A step-scaling policy bound to exactly one service.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScalingPolicy {
    pub name: String,
    pub target: ScalableTargetSpec,
    pub metric: MetricSpec,
    pub policy: StepPolicy,
}

/// Bind the grid's CPU step policy to the named service.
///
/// The target bounds are always [1, 10] regardless of configuration;
/// the metric samples per-service CPU utilization every minute, taking
/// the maximum.
pub fn bind_scaling_policy(descriptor: &ScalingPolicyDescriptor) -> ScalingPolicy {
    let mut dimensions = BTreeMap::new();
    dimensions.insert("ClusterName".to_string(), descriptor.cluster_name.clone());
    dimensions.insert("ServiceName".to_string(), descriptor.service_name.clone());

    debug!(
        service = %descriptor.service_name,
        cluster = %descriptor.cluster_name,
        "binding step-scaling policy"
    );

    ScalingPolicy {
        name: format!("step-metric-scaling-{}", descriptor.identifier),
        target: ScalableTargetSpec {
            resource_id: format!(
                "service/{}/{}",
                descriptor.cluster_name, descriptor.service_name
            ),
            scalable_dimension: "service:DesiredCount".to_string(),
            min_capacity: MIN_CAPACITY,
            max_capacity: MAX_CAPACITY,
        },
        metric: MetricSpec {
            namespace: METRIC_NAMESPACE.to_string(),
            metric_name: CPU_UTILIZATION_METRIC.to_string(),
            statistic: Statistic::Maximum,
            period_secs: METRIC_PERIOD_SECS,
            dimensions,
        },
        policy: StepPolicy::cpu_utilization(),
    }
}
