//! Process configuration resolved once at startup and injected everywhere else.

// std
use std::env;
// self
use crate::_prelude::*;

/// Base domain of the production identity service, used unless overridden.
pub const DEFAULT_BASE_DOMAIN: &str = "auth.acmecorp.io";
/// Region used to sign requests unless overridden.
pub const DEFAULT_SIGNING_REGION: &str = "eu-west-1";
/// Namespace segment that prefixes every delegated-management hostname.
pub const API_PREFIX: &str = "delegated";
/// Service name bound into every request signature.
pub const SIGNING_SERVICE: &str = "execute-api";
/// Environment variable overriding [`DEFAULT_BASE_DOMAIN`].
pub const BASE_DOMAIN_VAR: &str = "IDP_BASE_DOMAIN";
/// Environment variable overriding [`DEFAULT_SIGNING_REGION`].
pub const SIGNING_REGION_VAR: &str = "IDP_SIGNING_REGION";

/// Immutable provisioner configuration.
///
/// Constructed once (usually via [`Config::from_env`]) and passed by reference to the
/// environment resolver and handlers; nothing mutates it afterwards.
#[derive(Clone, Debug)]
pub struct Config {
	/// Base domain of the remote identity service.
	pub base_domain: String,
	/// Region bound into request signatures.
	pub signing_region: String,
	/// Namespace segment prefixed to every API hostname.
	pub api_prefix: String,
	/// When set, every API call targets this endpoint instead of the resolved hostname.
	/// Intended for tests pointing the provisioner at a mock server.
	pub endpoint_override: Option<Url>,
}
impl Config {
	/// Builds a configuration from the process environment, falling back to the compiled-in
	/// defaults for anything unset.
	pub fn from_env() -> Self {
		let base_domain =
			env::var(BASE_DOMAIN_VAR).unwrap_or_else(|_| DEFAULT_BASE_DOMAIN.into());
		let signing_region =
			env::var(SIGNING_REGION_VAR).unwrap_or_else(|_| DEFAULT_SIGNING_REGION.into());

		Self { base_domain, signing_region, api_prefix: API_PREFIX.into(), endpoint_override: None }
	}

	/// Replaces the base domain.
	pub fn with_base_domain(mut self, domain: impl Into<String>) -> Self {
		self.base_domain = domain.into();

		self
	}

	/// Replaces the signing region.
	pub fn with_signing_region(mut self, region: impl Into<String>) -> Self {
		self.signing_region = region.into();

		self
	}

	/// Redirects every API call to a fixed endpoint.
	pub fn with_endpoint_override(mut self, endpoint: Url) -> Self {
		self.endpoint_override = Some(endpoint);

		self
	}
}
impl Default for Config {
	fn default() -> Self {
		Self {
			base_domain: DEFAULT_BASE_DOMAIN.into(),
			signing_region: DEFAULT_SIGNING_REGION.into(),
			api_prefix: API_PREFIX.into(),
			endpoint_override: None,
		}
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn default_config_uses_compiled_in_values() {
		let config = Config::default();

		assert_eq!(config.base_domain, DEFAULT_BASE_DOMAIN);
		assert_eq!(config.signing_region, DEFAULT_SIGNING_REGION);
		assert_eq!(config.api_prefix, API_PREFIX);
		assert!(config.endpoint_override.is_none());
	}

	#[test]
	fn builder_style_overrides_apply() {
		let config = Config::default()
			.with_base_domain("auth.internal.test")
			.with_signing_region("us-east-1");

		assert_eq!(config.base_domain, "auth.internal.test");
		assert_eq!(config.signing_region, "us-east-1");
	}
}
