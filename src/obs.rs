//! Optional observability helpers for lifecycle invocations.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `idp_provisioner.lifecycle` with the
//!   `resource` (kind) and `op` (Create/Update/Delete) fields, plus warning events for
//!   soft-failed deletes.
//! - Enable `metrics` to increment the `idp_provisioner_lifecycle_total` counter for every
//!   attempt/success/failure, labeled by `resource` + `op` + `outcome`.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Resource kinds observed by the provisioner.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ResourceKind {
	/// OAuth app client.
	AppClient,
	/// OAuth resource server.
	ResourceServer,
	/// Static environment-metadata lookup.
	EnvironmentInfo,
}
impl ResourceKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			ResourceKind::AppClient => "app_client",
			ResourceKind::ResourceServer => "resource_server",
			ResourceKind::EnvironmentInfo => "environment_info",
		}
	}
}
impl Display for ResourceKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each invocation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InvocationOutcome {
	/// Entry to a lifecycle handler.
	Attempt,
	/// Invocation produced a success outcome.
	Success,
	/// Invocation produced a failure outcome.
	Failure,
}
impl InvocationOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			InvocationOutcome::Attempt => "attempt",
			InvocationOutcome::Success => "success",
			InvocationOutcome::Failure => "failure",
		}
	}
}
impl Display for InvocationOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
