//! Public entry points for running deployments.

pub mod runner;

pub use runner::{DeploymentRunner, DeploymentRunnerBuilder};
