//! gridplane-autoscale: elastic capacity for grid services.
//!
//! Models the scalable-capacity target and the CPU-driven step-scaling
//! policy attached to every provisioned service, and provides the pure
//! step evaluation used both in the emitted desired state and in tests.
//!
//! Each service scales on its own CPU signal with no cross-service
//! coordination; hub and nodes saturate independently under load.

pub mod binder;
pub mod policy;

pub use binder::{
    bind_scaling_policy, MetricSpec, ScalableTargetSpec, ScalingPolicy,
    ScalingPolicyDescriptor, Statistic,
};
pub use policy::{AdjustmentType, StepAdjustment, StepPolicy};
