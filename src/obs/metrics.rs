// self
use crate::{
	event::RequestKind,
	obs::{InvocationOutcome, ResourceKind},
};

/// Records a lifecycle invocation outcome via the global metrics recorder (when enabled).
pub fn record_invocation_outcome(
	resource: ResourceKind,
	op: RequestKind,
	outcome: InvocationOutcome,
) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"idp_provisioner_lifecycle_total",
			"resource" => resource.as_str(),
			"op" => op.as_str(),
			"outcome" => outcome.as_str()
		)
		.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (resource, op, outcome);
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn record_invocation_outcome_noop_without_metrics() {
		record_invocation_outcome(
			ResourceKind::AppClient,
			RequestKind::Delete,
			InvocationOutcome::Failure,
		);
	}
}
