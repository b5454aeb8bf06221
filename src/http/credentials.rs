//! Credential resolution as an injected capability.
//!
//! Handlers never reach for a process-wide singleton: they hold a [`CredentialsProvider`] and
//! resolve it on every call, so tests substitute [`StaticCredentials`] while production wires
//! [`EnvCredentialsProvider`] against the conventional ambient variables.

// std
use std::env;
// self
use crate::{_prelude::*, error::ConfigError};

/// Environment variable holding the signing access key identifier.
pub const ACCESS_KEY_ID_VAR: &str = "AWS_ACCESS_KEY_ID";
/// Environment variable holding the signing secret key.
pub const SECRET_ACCESS_KEY_VAR: &str = "AWS_SECRET_ACCESS_KEY";
/// Environment variable holding the optional session token.
pub const SESSION_TOKEN_VAR: &str = "AWS_SESSION_TOKEN";

/// One resolved credential set used to sign a single request.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
	/// Access key identifier; appears in the signature's credential scope.
	pub access_key_id: String,
	/// Secret key; only ever fed into the signing key derivation.
	pub secret_access_key: String,
	/// Session token attached as a header when present.
	pub session_token: Option<String>,
}
impl Credentials {
	/// Builds a credential set without a session token.
	pub fn new(access_key_id: impl Into<String>, secret_access_key: impl Into<String>) -> Self {
		Self {
			access_key_id: access_key_id.into(),
			secret_access_key: secret_access_key.into(),
			session_token: None,
		}
	}

	/// Attaches a session token.
	pub fn with_session_token(mut self, token: impl Into<String>) -> Self {
		self.session_token = Some(token.into());

		self
	}
}
impl Debug for Credentials {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Credentials")
			.field("access_key_id", &self.access_key_id)
			.field("secret_access_key", &"<redacted>")
			.field("session_token", &self.session_token.as_ref().map(|_| "<redacted>"))
			.finish()
	}
}

/// Boxed future returned by [`CredentialsProvider::resolve`].
pub type CredentialsFuture<'a> =
	Pin<Box<dyn Future<Output = Result<Credentials, ConfigError>> + 'a + Send>>;

/// Capability that yields signing credentials at call time.
///
/// Resolution happens on every request and results are never cached by the signed client;
/// providers that want caching must implement it themselves.
pub trait CredentialsProvider
where
	Self: 'static + Send + Sync,
{
	/// Resolves one credential set.
	fn resolve(&self) -> CredentialsFuture<'_>;
}

/// Resolves credentials from the conventional ambient environment variables.
#[derive(Clone, Copy, Debug, Default)]
pub struct EnvCredentialsProvider;
impl CredentialsProvider for EnvCredentialsProvider {
	fn resolve(&self) -> CredentialsFuture<'_> {
		Box::pin(async {
			let access_key_id = env::var(ACCESS_KEY_ID_VAR)
				.map_err(|_| ConfigError::MissingCredentials { variable: ACCESS_KEY_ID_VAR })?;
			let secret_access_key = env::var(SECRET_ACCESS_KEY_VAR)
				.map_err(|_| ConfigError::MissingCredentials { variable: SECRET_ACCESS_KEY_VAR })?;
			let session_token = env::var(SESSION_TOKEN_VAR).ok();

			Ok(Credentials { access_key_id, secret_access_key, session_token })
		})
	}
}

/// Fixed credential set, primarily for tests.
#[derive(Clone, Debug)]
pub struct StaticCredentials(Credentials);
impl StaticCredentials {
	/// Wraps a fixed access key / secret key pair.
	pub fn new(access_key_id: impl Into<String>, secret_access_key: impl Into<String>) -> Self {
		Self(Credentials::new(access_key_id, secret_access_key))
	}

	/// Attaches a session token to the fixed set.
	pub fn with_session_token(mut self, token: impl Into<String>) -> Self {
		self.0.session_token = Some(token.into());

		self
	}
}
impl From<Credentials> for StaticCredentials {
	fn from(credentials: Credentials) -> Self {
		Self(credentials)
	}
}
impl CredentialsProvider for StaticCredentials {
	fn resolve(&self) -> CredentialsFuture<'_> {
		let credentials = self.0.clone();

		Box::pin(async move { Ok(credentials) })
	}
}
