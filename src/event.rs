//! Lifecycle event and outcome contracts exchanged with the provisioning façade.
//!
//! Events arrive as loosely-typed JSON; everything here is parsed and validated at the
//! boundary so handlers only ever see typed properties. Malformed events are rejected with a
//! typed [`EventError`] before any remote call is considered.

// self
use crate::{_prelude::*, environment::Environment, error::EventError};

/// Lifecycle transition requested by the façade.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RequestKind {
	/// Provision a new remote resource.
	Create,
	/// Reconcile an existing remote resource with new declared state.
	Update,
	/// Destroy a previously-provisioned remote resource.
	Delete,
}
impl RequestKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			RequestKind::Create => "create",
			RequestKind::Update => "update",
			RequestKind::Delete => "delete",
		}
	}
}
impl FromStr for RequestKind {
	type Err = EventError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"Create" => Ok(RequestKind::Create),
			"Update" => Ok(RequestKind::Update),
			"Delete" => Ok(RequestKind::Delete),
			other => Err(EventError::UnknownRequestKind { value: other.into() }),
		}
	}
}
impl Display for RequestKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Envelope fields shared by every lifecycle event, with kind-specific properties left as raw
/// JSON for the per-resource parsers.
#[derive(Clone, Debug)]
pub struct EventEnvelope {
	/// Requested lifecycle transition.
	pub kind: RequestKind,
	/// Identifier of the previously-provisioned remote resource, when one exists.
	pub physical_id: Option<String>,
	/// Declared desired state, kind-specific schema.
	pub properties: Json,
	/// Prior declared state; present only on Update.
	pub previous_properties: Option<Json>,
}
impl EventEnvelope {
	/// Parses the event envelope, leaving kind-specific properties untouched.
	pub fn parse(raw: &Json) -> Result<Self, EventError> {
		let kind = raw
			.get("requestKind")
			.ok_or(EventError::MissingField { field: "requestKind" })?
			.as_str()
			.ok_or(EventError::InvalidField { field: "requestKind", expected: "a string" })?
			.parse()?;
		let physical_id = match raw.get("physicalId") {
			None | Some(Json::Null) => None,
			Some(value) => Some(
				value
					.as_str()
					.ok_or(EventError::InvalidField { field: "physicalId", expected: "a string" })?
					.to_owned(),
			),
		};
		let properties = raw
			.get("resourceProperties")
			.ok_or(EventError::MissingField { field: "resourceProperties" })?
			.clone();

		if !properties.is_object() {
			return Err(EventError::InvalidField {
				field: "resourceProperties",
				expected: "an object",
			});
		}

		let previous_properties = raw.get("previousProperties").cloned();

		Ok(Self { kind, physical_id, properties, previous_properties })
	}

	/// Best-effort physical identifier for failure outcomes: the event-supplied identifier,
	/// else the declared key field, else the literal `unknown`.
	pub fn fallback_physical_id(&self, key_field: &str) -> String {
		self.physical_id
			.clone()
			.or_else(|| {
				self.properties.get(key_field).and_then(Json::as_str).map(str::to_owned)
			})
			.unwrap_or_else(|| "unknown".into())
	}
}

/// Declared shape of an app client.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClientType {
	/// Browser-facing client; never issued a secret.
	Frontend,
	/// Confidential server-side client.
	Backend,
}
impl ClientType {
	/// Returns the label used by both the declarative schema and the remote API.
	pub const fn as_str(self) -> &'static str {
		match self {
			ClientType::Frontend => "frontend",
			ClientType::Backend => "backend",
		}
	}
}
impl FromStr for ClientType {
	type Err = EventError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"frontend" => Ok(ClientType::Frontend),
			"backend" => Ok(ClientType::Backend),
			other => Err(EventError::UnknownClientType { value: other.into() }),
		}
	}
}
impl Display for ClientType {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Validated app-client properties.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppClientProperties {
	/// Target environment of the central identity service.
	pub environment: Environment,
	/// Declared client name; doubles as the remote key.
	pub name: String,
	/// Immutable client type; a change forces replacement.
	pub client_type: ClientType,
	/// OAuth scopes granted to the client.
	pub scopes: Vec<String>,
	/// Allowed redirect URLs after sign-in.
	pub callback_urls: Vec<String>,
	/// Allowed redirect URLs after sign-out.
	pub logout_urls: Vec<String>,
	/// Whether the service should generate a client secret.
	pub generate_secret: bool,
}
impl AppClientProperties {
	/// Parses and validates app-client properties from the declared payload.
	pub fn parse(props: &Json) -> Result<Self> {
		Ok(Self {
			environment: required_str(props, "Environment")?.parse()?,
			name: required_str(props, "Name")?,
			client_type: required_str(props, "Type")?.parse::<ClientType>()?,
			scopes: string_array(props, "Scopes")?,
			callback_urls: string_array(props, "CallbackUrls")?,
			logout_urls: string_array(props, "LogoutUrls")?,
			generate_secret: props.get("GenerateSecret").is_some_and(coerce_bool),
		})
	}
}

/// One declared resource-server scope, Title-Case keyed in the declarative schema.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScopeDeclaration {
	/// Scope name.
	pub name: String,
	/// Human-readable scope description.
	pub description: String,
}

/// Validated resource-server properties.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResourceServerProperties {
	/// Target environment of the central identity service.
	pub environment: Environment,
	/// Declared display name.
	pub name: String,
	/// Declared identifier; doubles as the remote key and may be a URI.
	pub identifier: String,
	/// Declared scopes.
	pub scopes: Vec<ScopeDeclaration>,
}
impl ResourceServerProperties {
	/// Parses and validates resource-server properties from the declared payload.
	pub fn parse(props: &Json) -> Result<Self> {
		let scopes = match props.get("Scopes") {
			None | Some(Json::Null) => Vec::new(),
			Some(Json::Array(entries)) => entries
				.iter()
				.map(|entry| {
					Ok(ScopeDeclaration {
						name: required_str(entry, "Name")?,
						description: required_str(entry, "Description")?,
					})
				})
				.collect::<Result<_>>()?,
			Some(_) =>
				return Err(EventError::InvalidField {
					field: "Scopes",
					expected: "an array of { Name, Description } objects",
				}
				.into()),
		};

		Ok(Self {
			environment: required_str(props, "Environment")?.parse()?,
			name: required_str(props, "Name")?,
			identifier: required_str(props, "Identifier")?,
			scopes,
		})
	}
}

/// Validated environment-info lookup properties.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EnvironmentInfoProperties {
	/// Environment whose static metadata is requested.
	pub environment: Environment,
}
impl EnvironmentInfoProperties {
	/// Parses and validates lookup properties from the declared payload.
	pub fn parse(props: &Json) -> Result<Self> {
		Ok(Self { environment: required_str(props, "Environment")?.parse()? })
	}
}

/// Normalized success/failure label of a lifecycle invocation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum OutcomeStatus {
	/// The requested transition completed (or was already in the desired end state).
	#[serde(rename = "SUCCESS")]
	Success,
	/// The requested transition failed; `reason` carries the cause.
	#[serde(rename = "FAILED")]
	Failed,
}

/// Outcome of one lifecycle invocation, surfaced to the façade.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LifecycleOutcome {
	/// Normalized invocation status.
	pub status: OutcomeStatus,
	/// Stable identifier of the remote resource; never empty.
	pub physical_id: String,
	/// Kind-specific output attributes; populated only on success.
	#[serde(skip_serializing_if = "JsonMap::is_empty")]
	pub data: JsonMap<String, Json>,
	/// Human-readable failure cause; populated only on failure.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub reason: Option<String>,
}
impl LifecycleOutcome {
	/// Builds a success outcome.
	pub fn success(physical_id: impl Into<String>, data: JsonMap<String, Json>) -> Self {
		Self {
			status: OutcomeStatus::Success,
			physical_id: non_empty(physical_id.into()),
			data,
			reason: None,
		}
	}

	/// Builds a failure outcome.
	pub fn failed(physical_id: impl Into<String>, reason: impl Into<String>) -> Self {
		Self {
			status: OutcomeStatus::Failed,
			physical_id: non_empty(physical_id.into()),
			data: JsonMap::new(),
			reason: Some(reason.into()),
		}
	}
}

/// Applies the declarative schema's boolean coercion rule: native booleans are taken as-is,
/// the exact string `"true"` is true, and anything else is false.
pub fn coerce_bool(value: &Json) -> bool {
	match value {
		Json::Bool(flag) => *flag,
		Json::String(text) => text == "true",
		_ => false,
	}
}

fn non_empty(physical_id: String) -> String {
	if physical_id.is_empty() { "unknown".into() } else { physical_id }
}

fn required_str(props: &Json, field: &'static str) -> Result<String, EventError> {
	props
		.get(field)
		.ok_or(EventError::MissingField { field })?
		.as_str()
		.map(str::to_owned)
		.ok_or(EventError::InvalidField { field, expected: "a string" })
}

fn string_array(props: &Json, field: &'static str) -> Result<Vec<String>, EventError> {
	match props.get(field) {
		None | Some(Json::Null) => Ok(Vec::new()),
		Some(Json::Array(entries)) => entries
			.iter()
			.map(|entry| {
				entry
					.as_str()
					.map(str::to_owned)
					.ok_or(EventError::InvalidField { field, expected: "an array of strings" })
			})
			.collect(),
		Some(_) => Err(EventError::InvalidField { field, expected: "an array of strings" }),
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use serde_json::json;
	// self
	use super::*;

	#[test]
	fn envelope_rejects_unknown_request_kind() {
		let raw = json!({ "requestKind": "Upsert", "resourceProperties": {} });
		let err = EventEnvelope::parse(&raw).expect_err("Unknown request kind should be rejected.");

		assert!(matches!(err, EventError::UnknownRequestKind { .. }));
	}

	#[test]
	fn envelope_requires_resource_properties() {
		let raw = json!({ "requestKind": "Create" });
		let err =
			EventEnvelope::parse(&raw).expect_err("Missing resource properties should be rejected.");

		assert!(matches!(err, EventError::MissingField { field: "resourceProperties" }));
	}

	#[test]
	fn fallback_physical_id_prefers_event_identifier() {
		let raw = json!({
			"requestKind": "Delete",
			"physicalId": "existing-client",
			"resourceProperties": { "Name": "declared-client" },
		});
		let envelope = EventEnvelope::parse(&raw).expect("Envelope should parse.");

		assert_eq!(envelope.fallback_physical_id("Name"), "existing-client");
	}

	#[test]
	fn fallback_physical_id_uses_declared_key_then_unknown() {
		let raw = json!({
			"requestKind": "Delete",
			"resourceProperties": { "Name": "declared-client" },
		});
		let envelope = EventEnvelope::parse(&raw).expect("Envelope should parse.");

		assert_eq!(envelope.fallback_physical_id("Name"), "declared-client");
		assert_eq!(envelope.fallback_physical_id("Identifier"), "unknown");
	}

	#[test]
	fn generate_secret_coercion_follows_schema_rules() {
		assert!(coerce_bool(&json!(true)));
		assert!(!coerce_bool(&json!(false)));
		assert!(coerce_bool(&json!("true")));
		assert!(!coerce_bool(&json!("false")));
		assert!(!coerce_bool(&json!("True")));
		assert!(!coerce_bool(&json!("yes")));
		assert!(!coerce_bool(&json!(1)));
	}

	#[test]
	fn app_client_properties_parse_and_validate() {
		let props = json!({
			"Environment": "dev",
			"Name": "orders-web",
			"Type": "frontend",
			"Scopes": ["orders/read"],
			"CallbackUrls": ["https://orders.example.com/callback"],
			"LogoutUrls": [],
			"GenerateSecret": "true",
		});
		let parsed = AppClientProperties::parse(&props)
			.expect("Well-formed app-client properties should parse.");

		assert_eq!(parsed.environment, Environment::Dev);
		assert_eq!(parsed.client_type, ClientType::Frontend);
		assert!(parsed.generate_secret);
		assert!(parsed.logout_urls.is_empty());
	}

	#[test]
	fn app_client_properties_reject_unknown_type_and_environment() {
		let props = json!({ "Environment": "dev", "Name": "x", "Type": "native" });

		assert!(AppClientProperties::parse(&props).is_err());

		let props = json!({ "Environment": "staging", "Name": "x", "Type": "backend" });
		let err = AppClientProperties::parse(&props)
			.expect_err("Unknown environment should be rejected before any remote call.");

		assert!(err.to_string().contains("dev, test, prod"));
	}

	#[test]
	fn resource_server_scopes_require_both_title_case_fields() {
		let props = json!({
			"Environment": "test",
			"Name": "Orders API",
			"Identifier": "https://orders.example.com",
			"Scopes": [{ "Name": "read" }],
		});
		let err = ResourceServerProperties::parse(&props)
			.expect_err("Scope entries without a description should be rejected.");

		assert!(err.to_string().contains("Description"));
	}

	#[test]
	fn outcome_serialization_matches_the_facade_contract() {
		let mut data = JsonMap::new();

		data.insert("ClientId".into(), json!("abc123"));

		let success = serde_json::to_value(LifecycleOutcome::success("orders-web", data))
			.expect("Success outcome should serialize.");

		assert_eq!(
			success,
			json!({
				"status": "SUCCESS",
				"physicalId": "orders-web",
				"data": { "ClientId": "abc123" },
			}),
		);

		let failed = serde_json::to_value(LifecycleOutcome::failed("", "boom"))
			.expect("Failure outcome should serialize.");

		assert_eq!(failed, json!({ "status": "FAILED", "physicalId": "unknown", "reason": "boom" }));
	}
}
