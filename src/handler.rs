//! Lifecycle reconciliation handlers for the delegated identity service.
//!
//! One [`Provisioner`] instance serves all resource kinds; each kind gets its own entrypoint
//! (`handle_app_client`, `handle_resource_server`, `handle_environment_info`) in a dedicated
//! submodule. Every entrypoint is a never-fail boundary: whatever goes wrong inside —
//! malformed events, transport failures, remote rejections — the caller receives exactly one
//! well-formed [`LifecycleOutcome`].

pub mod app_client;
pub mod environment_info;
pub mod resource_server;

// self
use crate::{
	_prelude::*,
	api,
	config::Config,
	environment::{Environment, EnvironmentTable, resolve_base_url},
	error::{ConfigError, RemoteError},
	event::LifecycleOutcome,
	http::{ApiTransport, CredentialsProvider, Method, RawResponse, SignedApiClient},
	obs::{self, ResourceKind},
};
#[cfg(feature = "reqwest")]
use crate::http::{EnvCredentialsProvider, ReqwestTransport};

#[cfg(feature = "reqwest")]
/// Provisioner specialized for the crate's default reqwest transport stack.
pub type ReqwestProvisioner = Provisioner<ReqwestTransport, EnvCredentialsProvider>;

/// Reconciles declarative lifecycle events against the remote identity service.
///
/// The provisioner holds no state of its own between invocations; the remote service is the
/// sole source of truth and every invocation is a fresh reconciliation against it.
pub struct Provisioner<T, P>
where
	T: ?Sized + ApiTransport,
	P: ?Sized + CredentialsProvider,
{
	/// Signed client used for every remote call.
	pub client: SignedApiClient<T, P>,
	/// Immutable process configuration.
	pub config: Config,
	/// Immutable environment-metadata table built from the configuration.
	pub environments: EnvironmentTable,
}
impl<T, P> Provisioner<T, P>
where
	T: ?Sized + ApiTransport,
	P: ?Sized + CredentialsProvider,
{
	/// Creates a provisioner over the given transport and credential capability.
	pub fn new(
		transport: impl Into<Arc<T>>,
		credentials: impl Into<Arc<P>>,
		config: Config,
	) -> Result<Self> {
		let environments = EnvironmentTable::new(&config)?;
		let client = SignedApiClient::new(transport, credentials, config.signing_region.clone());

		Ok(Self { client, config, environments })
	}

	/// Base URL of the delegated-management API for an environment, honoring the endpoint
	/// override when one is configured.
	fn api_base(&self, environment: Environment) -> Result<Url> {
		if let Some(endpoint) = &self.config.endpoint_override {
			return Ok(endpoint.clone());
		}

		let host = resolve_base_url(
			&self.config.base_domain,
			&self.config.api_prefix,
			environment.as_str(),
		);

		Url::parse(&format!("https://{host}"))
			.map_err(|e| ConfigError::InvalidUrl { source: e }.into())
	}

	/// Performs one signed API call against the environment's base URL.
	async fn api_call(
		&self,
		environment: Environment,
		method: Method,
		path: &str,
		body: Option<String>,
	) -> Result<RawResponse> {
		let base = self.api_base(environment)?;
		let headers = if body.is_some() {
			vec![("content-type".into(), "application/json".into())]
		} else {
			Vec::new()
		};

		self.client.send(method, &base, path, body, &headers, None).await
	}

	/// Destroys one remote resource with the idempotent-delete policy: a 404 means the
	/// resource is already in the desired end state and counts as success.
	async fn delete_resource(
		&self,
		resource: ResourceKind,
		environment: Environment,
		collection: &str,
		key: &str,
	) -> Result<LifecycleOutcome> {
		let path = api::resource_path(collection, key);
		let response = self.api_call(environment, Method::Delete, &path, None).await?;

		match response.status {
			200 => Ok(LifecycleOutcome::success(key, JsonMap::new())),
			404 => {
				obs::warn_already_deleted(resource, key);

				Ok(LifecycleOutcome::success(key, JsonMap::new()))
			},
			status => Err(RemoteError::Rejected { status, body: response.body }.into()),
		}
	}
}
#[cfg(feature = "reqwest")]
impl Provisioner<ReqwestTransport, EnvCredentialsProvider> {
	/// Creates a provisioner wired to the process environment: default reqwest transport,
	/// ambient credential variables, and [`Config::from_env`].
	pub fn from_env() -> Result<Self> {
		Self::new(ReqwestTransport::default(), EnvCredentialsProvider, Config::from_env())
	}
}

/// Requires an exact 200 from the remote service, surfacing anything else verbatim.
fn ensure_ok(response: &RawResponse) -> Result<(), RemoteError> {
	if response.status == 200 {
		Ok(())
	} else {
		Err(RemoteError::Rejected { status: response.status, body: response.body.clone() })
	}
}

/// Best-effort physical identifier for events that failed envelope parsing: the raw
/// event-supplied identifier, else the declared key field, else the literal `unknown`.
fn fallback_physical_id_raw(raw: &Json, key_field: &str) -> String {
	raw.get("physicalId")
		.and_then(Json::as_str)
		.or_else(|| {
			raw.get("resourceProperties").and_then(|props| props.get(key_field)).and_then(Json::as_str)
		})
		.unwrap_or("unknown")
		.to_owned()
}

#[cfg(test)]
mod tests {
	// crates.io
	use serde_json::json;
	// self
	use super::*;

	#[test]
	fn raw_fallback_prefers_physical_id_over_declared_key() {
		let raw = json!({
			"physicalId": "existing",
			"resourceProperties": { "Name": "declared" },
		});

		assert_eq!(fallback_physical_id_raw(&raw, "Name"), "existing");

		let raw = json!({ "resourceProperties": { "Name": "declared" } });

		assert_eq!(fallback_physical_id_raw(&raw, "Name"), "declared");
		assert_eq!(fallback_physical_id_raw(&json!({}), "Name"), "unknown");
	}
}
