//! App-client lifecycle reconciliation.
//!
//! Create posts the declared state and adopts the remote-assigned name as the physical
//! identifier. Update refuses immutable-type changes without touching the remote service,
//! then replaces the declared state and reads the resource back so the façade always sees
//! canonical attributes. Delete applies the idempotent 404-is-success policy.

// self
use crate::{
	_prelude::*,
	api::{self, AppClientBody},
	error::RemoteError,
	event::{AppClientProperties, EventEnvelope, LifecycleOutcome, OutcomeStatus, RequestKind},
	handler::{self, Provisioner},
	http::{ApiTransport, CredentialsProvider, Method},
	obs::{self, InvocationOutcome, LifecycleSpan, ResourceKind},
};

const RESOURCE: ResourceKind = ResourceKind::AppClient;
const KEY_FIELD: &str = "Name";

impl<T, P> Provisioner<T, P>
where
	T: ?Sized + ApiTransport,
	P: ?Sized + CredentialsProvider,
{
	/// Handles one app-client lifecycle event, always producing a well-formed outcome.
	pub async fn handle_app_client(&self, raw: &Json) -> LifecycleOutcome {
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

		let outcome = match span.instrument(self.app_client_lifecycle(&envelope)).await {
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

	async fn app_client_lifecycle(&self, envelope: &EventEnvelope) -> Result<LifecycleOutcome> {
		let props = AppClientProperties::parse(&envelope.properties)?;

		match envelope.kind {
			RequestKind::Create => {
				let payload = serde_json::to_string(&AppClientBody::from_properties(&props))?;
				let response = self
					.api_call(
						props.environment,
						Method::Post,
						&api::collection_path(api::APP_CLIENTS),
						Some(payload),
					)
					.await?;

				if response.status != 201 {
					return Err(RemoteError::Rejected {
						status: response.status,
						body: response.body,
					}
					.into());
				}

				let created: AppClientBody = api::decode_body(&response)?;
				let physical_id = created.name.clone();

				Ok(LifecycleOutcome::success(physical_id, created.into_output_data()))
			},
			RequestKind::Update => {
				if let Some(previous) = &envelope.previous_properties {
					let previous = AppClientProperties::parse(previous)?;

					if previous.client_type != props.client_type {
						return Err(Error::RequiresReplacement { field: "Type" });
					}
				}

				let key = envelope.physical_id.clone().unwrap_or_else(|| props.name.clone());
				let path = api::resource_path(api::APP_CLIENTS, &key);
				let payload = serde_json::to_string(&AppClientBody::from_properties(&props))?;
				let response =
					self.api_call(props.environment, Method::Put, &path, Some(payload)).await?;

				handler::ensure_ok(&response)?;

				// The PUT response is not trusted to carry full current state; read it back.
				let read = self.api_call(props.environment, Method::Get, &path, None).await?;

				handler::ensure_ok(&read)?;

				let current: AppClientBody = api::decode_body(&read)?;

				Ok(LifecycleOutcome::success(key, current.into_output_data()))
			},
			RequestKind::Delete => {
				let key = envelope.physical_id.clone().unwrap_or_else(|| props.name.clone());

				self.delete_resource(RESOURCE, props.environment, api::APP_CLIENTS, &key).await
			},
		}
	}
}
