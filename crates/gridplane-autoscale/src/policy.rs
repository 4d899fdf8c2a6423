//! Step-scaling policy: a threshold-driven capacity controller.

use serde::Serialize;

/// Seconds the platform must wait between consecutive scaling actions
/// on the same service.
pub const COOLDOWN_SECS: u64 = 180;

/// Utilization below which one instance is removed.
pub const SCALE_IN_BELOW: f64 = 30.0;

/// Utilization above which one instance is added.
pub const SCALE_OUT_ABOVE: f64 = 70.0;

/// How a step adjustment is applied to the current desired count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AdjustmentType {
    /// Add the step's `change` to the current desired count.
    ChangeInCapacity,
}

/// One step of the policy: a half-open metric interval and the
/// capacity change applied while the metric sits inside it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StepAdjustment {
    /// Exclusive lower bound; unbounded when `None`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lower: Option<f64>,
    /// Exclusive upper bound; unbounded when `None`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upper: Option<f64>,
    /// Signed change in desired count.
    pub change: i32,
}

/// A two-sided step-scaling policy over a single metric.
///
/// Step intervals are disjoint by construction; values on a threshold
/// fall outside both intervals (strict comparisons), so a boundary
/// reading never fires an adjustment and can never fire two.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepPolicy {
    pub adjustment: AdjustmentType,
    pub steps: Vec<StepAdjustment>,
    pub cooldown_secs: u64,
}

impl StepPolicy {
    /// The grid's CPU policy: remove one instance below 30%
    /// utilization, add one above 70%, hold inside the dead zone.
    pub fn cpu_utilization() -> Self {
        StepPolicy {
            adjustment: AdjustmentType::ChangeInCapacity,
            steps: vec![
                StepAdjustment {
                    lower: None,
                    upper: Some(SCALE_IN_BELOW),
                    change: -1,
                },
                StepAdjustment {
                    lower: Some(SCALE_OUT_ABOVE),
                    upper: None,
                    change: 1,
                },
            ],
            cooldown_secs: COOLDOWN_SECS,
        }
    }

    /// Evaluate the policy for a metric reading.
    ///
    /// Pure function of the reading; cooldown enforcement stays with
    /// the platform. Returns the signed desired-count change, 0 when
    /// the reading sits in the dead zone.
    pub fn evaluate(&self, value: f64) -> i32 {
        for step in &self.steps {
            let above_lower = step.lower.is_none_or(|l| value > l);
            let below_upper = step.upper.is_none_or(|u| value < u);
            if above_lower && below_upper {
                return step.change;
            }
        }
        0
    }
}
