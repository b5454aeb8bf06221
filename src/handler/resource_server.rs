//! Resource-server lifecycle reconciliation.
//!
//! Identical machine shape to app clients, keyed by the declared identifier (often a URI, so
//! every path placement is percent-encoded) and with the Title-Case↔snake_case scope
//! translation applied on both request and response paths.

// self
use crate::{
	_prelude::*,
	api::{self, ResourceServerBody},
	error::RemoteError,
	event::{EventEnvelope, LifecycleOutcome, OutcomeStatus, RequestKind, ResourceServerProperties},
	handler::{self, Provisioner},
	http::{ApiTransport, CredentialsProvider, Method},
	obs::{self, InvocationOutcome, LifecycleSpan, ResourceKind},
};

const RESOURCE: ResourceKind = ResourceKind::ResourceServer;
const KEY_FIELD: &str = "Identifier";

impl<T, P> Provisioner<T, P>
where
	T: ?Sized + ApiTransport,
	P: ?Sized + CredentialsProvider,
{
	/// Handles one resource-server lifecycle event, always producing a well-formed outcome.
	pub async fn handle_resource_server(&self, raw: &Json) -> LifecycleOutcome {
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

		let outcome = match span.instrument(self.resource_server_lifecycle(&envelope)).await {
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

	async fn resource_server_lifecycle(
		&self,
		envelope: &EventEnvelope,
	) -> Result<LifecycleOutcome> {
		let props = ResourceServerProperties::parse(&envelope.properties)?;

		match envelope.kind {
			RequestKind::Create => {
				let payload = serde_json::to_string(&ResourceServerBody::from_properties(&props))?;
				let response = self
					.api_call(
						props.environment,
						Method::Post,
						&api::collection_path(api::RESOURCE_SERVERS),
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

				let created: ResourceServerBody = api::decode_body(&response)?;
				let physical_id = created.identifier.clone();

				Ok(LifecycleOutcome::success(physical_id, created.into_output_data()))
			},
			RequestKind::Update => {
				let key = envelope.physical_id.clone().unwrap_or_else(|| props.identifier.clone());
				let path = api::resource_path(api::RESOURCE_SERVERS, &key);
				let payload = serde_json::to_string(&ResourceServerBody::from_properties(&props))?;
				let response =
					self.api_call(props.environment, Method::Put, &path, Some(payload)).await?;

				handler::ensure_ok(&response)?;

				// The PUT response is not trusted to carry full current state; read it back.
				let read = self.api_call(props.environment, Method::Get, &path, None).await?;

				handler::ensure_ok(&read)?;

				let current: ResourceServerBody = api::decode_body(&read)?;

				Ok(LifecycleOutcome::success(key, current.into_output_data()))
			},
			RequestKind::Delete => {
				let key = envelope.physical_id.clone().unwrap_or_else(|| props.identifier.clone());

				self.delete_resource(RESOURCE, props.environment, api::RESOURCE_SERVERS, &key)
					.await
			},
		}
	}
}
