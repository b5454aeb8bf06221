// self
use crate::{_prelude::*, event::RequestKind, obs::ResourceKind};

/// Type alias that resolves to an instrumented future when tracing is enabled.
#[cfg(feature = "tracing")]
pub type InstrumentedInvocation<F> = tracing::instrument::Instrumented<F>;
/// Passthrough future type when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedInvocation<F> = F;

/// A span builder used by lifecycle handlers.
#[derive(Clone, Debug)]
pub struct LifecycleSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl LifecycleSpan {
	/// Creates a new span tagged with the resource kind + requested operation.
	pub fn new(resource: ResourceKind, op: RequestKind) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span = tracing::info_span!(
				"idp_provisioner.lifecycle",
				resource = resource.as_str(),
				op = op.as_str(),
			);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (resource, op);

			Self {}
		}
	}

	/// Instruments an async block without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedInvocation<Fut>
	where
		Fut: Future,
	{
		#[cfg(feature = "tracing")]
		{
			use tracing::Instrument;

			fut.instrument(self.span.clone())
		}
		#[cfg(not(feature = "tracing"))]
		{
			fut
		}
	}
}

/// Emits a warning for a delete that found the resource already gone (soft fail).
pub fn warn_already_deleted(resource: ResourceKind, key: &str) {
	#[cfg(feature = "tracing")]
	{
		tracing::warn!(
			resource = resource.as_str(),
			key,
			"Resource was already deleted remotely; treating delete as success.",
		);
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = (resource, key);
	}
}
