//! Environment-info lookup as a lifecycle resource.
//!
//! Nothing lives remotely for this kind: Create and Update resolve the compiled-in metadata
//! table and surface it as output attributes, Delete succeeds with nothing to destroy. An
//! unknown environment name still fails the invocation so misconfigured stacks surface early.

// self
use crate::{
	_prelude::*,
	event::{EnvironmentInfoProperties, EventEnvelope, LifecycleOutcome, OutcomeStatus, RequestKind},
	handler::{self, Provisioner},
	http::{ApiTransport, CredentialsProvider},
	obs::{self, InvocationOutcome, LifecycleSpan, ResourceKind},
};

const RESOURCE: ResourceKind = ResourceKind::EnvironmentInfo;
const KEY_FIELD: &str = "Environment";

impl<T, P> Provisioner<T, P>
where
	T: ?Sized + ApiTransport,
	P: ?Sized + CredentialsProvider,
{
	/// Handles one environment-info lifecycle event, always producing a well-formed outcome.
	pub async fn handle_environment_info(&self, raw: &Json) -> LifecycleOutcome {
		let envelope = match EventEnvelope::parse(raw) {
			Ok(envelope) => envelope,
			Err(e) =>
				return LifecycleOutcome::failed(
					handler::fallback_physical_id_raw(raw, KEY_FIELD),
					e.to_string(),
				),
		};
		let span = LifecycleSpan::new(RESOURCE, envelope.kind);

		obs::record_invocation_outcome(RESOURCE, envelope.kind, InvocationOutcome::Attempt);

		let outcome = match span.instrument(self.environment_info_lifecycle(&envelope)).await {
			Ok(outcome) => outcome,
			Err(e) =>
				LifecycleOutcome::failed(envelope.fallback_physical_id(KEY_FIELD), e.to_string()),
		};
		let label = match outcome.status {
			OutcomeStatus::Success => InvocationOutcome::Success,
			OutcomeStatus::Failed => InvocationOutcome::Failure,
		};

		obs::record_invocation_outcome(RESOURCE, envelope.kind, label);

		outcome
	}

	async fn environment_info_lifecycle(
		&self,
		envelope: &EventEnvelope,
	) -> Result<LifecycleOutcome> {
		let props = EnvironmentInfoProperties::parse(&envelope.properties)?;
		let physical_id = envelope
			.physical_id
			.clone()
			.unwrap_or_else(|| format!("env-info-{}", props.environment));

		match envelope.kind {
			RequestKind::Create | RequestKind::Update => {
				let info = self.environments.resolve(props.environment.as_str())?;
				let mut data = JsonMap::new();

				data.insert("AuthUrl".into(), Json::String(info.auth_url.to_string()));
				data.insert("JwksUrl".into(), Json::String(info.jwks_url.to_string()));
				data.insert("OpenIdUrl".into(), Json::String(info.open_id_url.to_string()));
				data.insert("Issuer".into(), Json::String(info.issuer.to_string()));

				Ok(LifecycleOutcome::success(physical_id, data))
			},
			RequestKind::Delete => Ok(LifecycleOutcome::success(physical_id, JsonMap::new())),
		}
	}
}
