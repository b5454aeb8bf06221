//! Wire models for the remote identity-management REST API.
//!
//! The declarative schema speaks Title-Case (`Name`, `Description`); the remote API speaks
//! snake_case (`name`, `description`). This module owns that boundary: request builders
//! translate declared properties into remote payloads, and output builders translate remote
//! responses back into Title-Case attributes surfaced to the façade.

// self
use crate::{
	_prelude::*,
	error::RemoteError,
	event::{AppClientProperties, ResourceServerProperties, ScopeDeclaration},
	http::RawResponse,
};

/// Collection path segment for app clients.
pub const APP_CLIENTS: &str = "app-clients";
/// Collection path segment for resource servers.
pub const RESOURCE_SERVERS: &str = "resource-servers";

/// Path of a collection, e.g. `/app-clients`.
pub fn collection_path(collection: &str) -> String {
	format!("/{collection}")
}

/// Path of a single resource with its key percent-encoded, e.g.
/// `/resource-servers/https%3A%2F%2Forders.example.com`.
///
/// Keys may be URIs (resource-server identifiers), so encoding is mandatory before the key is
/// placed into a path segment.
pub fn resource_path(collection: &str, key: &str) -> String {
	format!("/{collection}/{}", urlencoding::encode(key))
}

/// App-client payload as the remote API sends and receives it.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AppClientBody {
	/// Client name; the remote key.
	pub name: String,
	/// Client type label (`frontend`/`backend`).
	#[serde(rename = "type")]
	pub client_type: String,
	/// Granted OAuth scopes.
	#[serde(default)]
	pub scopes: Vec<String>,
	/// Allowed post-sign-in redirect URLs.
	#[serde(default)]
	pub callback_urls: Vec<String>,
	/// Allowed post-sign-out redirect URLs.
	#[serde(default)]
	pub logout_urls: Vec<String>,
	/// Whether the service should generate a client secret; request-only.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub generate_secret: Option<bool>,
	/// Service-assigned client identifier; response-only.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub client_id: Option<String>,
	/// Service-generated client secret; response-only, present when requested.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub client_secret: Option<String>,
}
impl AppClientBody {
	/// Builds the request payload for the declared properties.
	pub fn from_properties(props: &AppClientProperties) -> Self {
		Self {
			name: props.name.clone(),
			client_type: props.client_type.as_str().into(),
			scopes: props.scopes.clone(),
			callback_urls: props.callback_urls.clone(),
			logout_urls: props.logout_urls.clone(),
			generate_secret: Some(props.generate_secret),
			client_id: None,
			client_secret: None,
		}
	}

	/// Translates a remote response into the Title-Case attributes surfaced to the façade.
	pub fn into_output_data(self) -> JsonMap<String, Json> {
		let mut data = JsonMap::new();

		data.insert("Name".into(), Json::String(self.name));
		data.insert("Type".into(), Json::String(self.client_type));
		data.insert("Scopes".into(), Json::from(self.scopes));
		data.insert("CallbackUrls".into(), Json::from(self.callback_urls));
		data.insert("LogoutUrls".into(), Json::from(self.logout_urls));

		if let Some(client_id) = self.client_id {
			data.insert("ClientId".into(), Json::String(client_id));
		}
		if let Some(client_secret) = self.client_secret {
			data.insert("ClientSecret".into(), Json::String(client_secret));
		}

		data
	}
}

/// One resource-server scope as the remote API spells it.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ScopeBody {
	/// Scope name.
	pub name: String,
	/// Human-readable scope description.
	pub description: String,
}
impl From<&ScopeDeclaration> for ScopeBody {
	fn from(scope: &ScopeDeclaration) -> Self {
		Self { name: scope.name.clone(), description: scope.description.clone() }
	}
}

/// Resource-server payload as the remote API sends and receives it.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ResourceServerBody {
	/// Resource-server identifier; the remote key, often a URI.
	pub identifier: String,
	/// Display name.
	pub name: String,
	/// Declared scopes.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub scopes: Option<Vec<ScopeBody>>,
}
impl ResourceServerBody {
	/// Builds the request payload for the declared properties.
	pub fn from_properties(props: &ResourceServerProperties) -> Self {
		let scopes = if props.scopes.is_empty() {
			None
		} else {
			Some(props.scopes.iter().map(ScopeBody::from).collect())
		};

		Self { identifier: props.identifier.clone(), name: props.name.clone(), scopes }
	}

	/// Translates a remote response into the Title-Case attributes surfaced to the façade.
	pub fn into_output_data(self) -> JsonMap<String, Json> {
		let mut data = JsonMap::new();

		data.insert("Identifier".into(), Json::String(self.identifier));
		data.insert("Name".into(), Json::String(self.name));

		if let Some(scopes) = self.scopes {
			let scopes = scopes
				.into_iter()
				.map(|scope| {
					let mut entry = JsonMap::new();

					entry.insert("Name".into(), Json::String(scope.name));
					entry.insert("Description".into(), Json::String(scope.description));

					Json::Object(entry)
				})
				.collect::<Vec<_>>();

			data.insert("Scopes".into(), Json::Array(scopes));
		}

		data
	}
}

/// Decodes a remote response body into the expected JSON shape, keeping the failing JSON path
/// in the error when the body is malformed.
pub fn decode_body<T>(response: &RawResponse) -> Result<T, RemoteError>
where
	T: for<'de> Deserialize<'de>,
{
	let mut deserializer = serde_json::Deserializer::from_str(&response.body);

	serde_path_to_error::deserialize(&mut deserializer)
		.map_err(|e| RemoteError::MalformedBody { source: e, status: response.status })
}

#[cfg(test)]
mod tests {
	// crates.io
	use serde_json::json;
	// self
	use super::*;
	use crate::{environment::Environment, event::ClientType};

	#[test]
	fn resource_paths_percent_encode_keys() {
		assert_eq!(collection_path(APP_CLIENTS), "/app-clients");
		assert_eq!(resource_path(APP_CLIENTS, "orders web"), "/app-clients/orders%20web");
		assert_eq!(
			resource_path(RESOURCE_SERVERS, "https://orders.example.com"),
			"/resource-servers/https%3A%2F%2Forders.example.com",
		);
	}

	#[test]
	fn app_client_payload_round_trips_declared_state() {
		let props = AppClientProperties {
			environment: Environment::Dev,
			name: "orders-web".into(),
			client_type: ClientType::Backend,
			scopes: vec!["orders/read".into()],
			callback_urls: vec!["https://orders.example.com/cb".into()],
			logout_urls: Vec::new(),
			generate_secret: true,
		};
		let body = serde_json::to_value(AppClientBody::from_properties(&props))
			.expect("App-client payload should serialize.");

		assert_eq!(
			body,
			json!({
				"name": "orders-web",
				"type": "backend",
				"scopes": ["orders/read"],
				"callback_urls": ["https://orders.example.com/cb"],
				"logout_urls": [],
				"generate_secret": true,
			}),
		);
	}

	#[test]
	fn scope_casing_translates_on_both_paths() {
		let props = ResourceServerProperties {
			environment: Environment::Test,
			name: "Orders API".into(),
			identifier: "https://orders.example.com".into(),
			scopes: vec![ScopeDeclaration { name: "read".into(), description: "x".into() }],
		};
		let body = serde_json::to_value(ResourceServerBody::from_properties(&props))
			.expect("Resource-server payload should serialize.");

		assert_eq!(
			body,
			json!({
				"identifier": "https://orders.example.com",
				"name": "Orders API",
				"scopes": [{ "name": "read", "description": "x" }],
			}),
		);

		let remote: ResourceServerBody = serde_json::from_value(body)
			.expect("Remote payload should deserialize back into the wire model.");
		let data = remote.into_output_data();

		assert_eq!(data["Scopes"], json!([{ "Name": "read", "Description": "x" }]));
	}

	#[test]
	fn malformed_body_keeps_the_status() {
		let response = RawResponse { status: 200, body: "<html>".into(), headers: Vec::new() };
		let err = decode_body::<AppClientBody>(&response)
			.expect_err("Non-JSON body should be rejected.");

		assert!(matches!(err, RemoteError::MalformedBody { status: 200, .. }));
	}
}
