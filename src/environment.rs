//! Environment resolution: hostname composition plus the static per-environment metadata table.

// self
use crate::{_prelude::*, config::Config, error::ConfigError};

/// Environment name that maps to the bare production hostname.
pub const PRODUCTION_ENVIRONMENT: &str = "prod";
/// Every environment name the provisioner recognizes.
pub const VALID_ENVIRONMENTS: [&str; 3] = ["dev", "test", "prod"];

/// A recognized deployment environment of the central identity service.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Environment {
	/// Development environment.
	Dev,
	/// Test environment.
	Test,
	/// Production environment.
	Prod,
}
impl Environment {
	/// Returns the environment name as it appears in hostnames and events.
	pub const fn as_str(self) -> &'static str {
		match self {
			Environment::Dev => "dev",
			Environment::Test => "test",
			Environment::Prod => "prod",
		}
	}
}
impl FromStr for Environment {
	type Err = ConfigError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"dev" => Ok(Environment::Dev),
			"test" => Ok(Environment::Test),
			"prod" => Ok(Environment::Prod),
			other => Err(ConfigError::UnknownEnvironment {
				name: other.into(),
				valid: VALID_ENVIRONMENTS.join(", "),
			}),
		}
	}
}
impl Display for Environment {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Composes the API hostname for an environment.
///
/// Production is syntactically distinguished: it carries no environment segment
/// (`{prefix}.{domain}`), while every other environment name is embedded as
/// `{prefix}.{environment}.{domain}`.
pub fn resolve_base_url(domain: &str, prefix: &str, environment: &str) -> String {
	if environment == PRODUCTION_ENVIRONMENT {
		format!("{prefix}.{domain}")
	} else {
		format!("{prefix}.{environment}.{domain}")
	}
}

/// Joins a base URL with an optional sub-path at the string level.
///
/// An empty path returns the base unchanged. Otherwise exactly one trailing slash is stripped
/// from the base and exactly one leading slash from the path before joining with a single
/// slash. Internal slashes are never deduplicated and no URL validation happens here.
pub fn join_path(base: &str, path: &str) -> String {
	if path.is_empty() {
		return base.into();
	}

	let base = base.strip_suffix('/').unwrap_or(base);
	let path = path.strip_prefix('/').unwrap_or(path);

	format!("{base}/{path}")
}

/// Static, environment-scoped identity metadata surfaced to lookup callers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EnvironmentInfo {
	/// OAuth 2.0 authorization base URL.
	pub auth_url: Url,
	/// JSON Web Key Set URL.
	pub jwks_url: Url,
	/// OpenID Connect discovery document URL.
	pub open_id_url: Url,
	/// Token issuer URI.
	pub issuer: Url,
}

/// Immutable environment-to-metadata table built once from [`Config`].
///
/// Lookups for unrecognized names fail with an explicit error listing the valid values;
/// there is no default entry to fall back to.
#[derive(Clone, Debug)]
pub struct EnvironmentTable {
	entries: Vec<(Environment, EnvironmentInfo)>,
}
impl EnvironmentTable {
	/// Builds the table for every recognized environment against the configured base domain.
	pub fn new(config: &Config) -> Result<Self, ConfigError> {
		let entries = [Environment::Dev, Environment::Test, Environment::Prod]
			.into_iter()
			.map(|environment| Ok((environment, Self::info_for(config, environment)?)))
			.collect::<Result<_, ConfigError>>()?;

		Ok(Self { entries })
	}

	/// Resolves the metadata for an environment name.
	pub fn resolve(&self, name: &str) -> Result<&EnvironmentInfo, ConfigError> {
		let environment = name.parse::<Environment>()?;

		self.entries
			.iter()
			.find(|(candidate, _)| *candidate == environment)
			.map(|(_, info)| info)
			.ok_or(ConfigError::UnknownEnvironment {
				name: name.into(),
				valid: VALID_ENVIRONMENTS.join(", "),
			})
	}

	fn info_for(config: &Config, environment: Environment) -> Result<EnvironmentInfo, ConfigError> {
		let issuer = format!(
			"https://{}",
			resolve_base_url(&config.base_domain, "login", environment.as_str()),
		);
		let parse = |raw: String| Url::parse(&raw).map_err(|e| ConfigError::InvalidUrl { source: e });

		Ok(EnvironmentInfo {
			auth_url: parse(join_path(&issuer, "oauth2"))?,
			jwks_url: parse(join_path(&issuer, ".well-known/jwks.json"))?,
			open_id_url: parse(join_path(&issuer, ".well-known/openid-configuration"))?,
			issuer: parse(issuer)?,
		})
	}
}
