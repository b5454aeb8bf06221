//! Provisioner-level error types shared across event parsing, transports, and handlers.

// self
use crate::_prelude::*;

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical provisioner error exposed by public APIs.
///
/// Nothing of this taxonomy ever escapes a lifecycle invocation; the handler boundary converts
/// every variant into a `Failed` [`LifecycleOutcome`](crate::event::LifecycleOutcome) whose
/// `reason` carries the rendered message.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Malformed or incomplete lifecycle event.
	#[error(transparent)]
	Event(#[from] EventError),
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Transport failure (DNS, TCP, TLS).
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// Remote identity service rejected or mangled a call.
	#[error(transparent)]
	Remote(#[from] RemoteError),

	/// Request payload could not be encoded as JSON.
	#[error("Request payload could not be encoded as JSON.")]
	Encode(#[from] serde_json::Error),
	/// An immutable field changed on Update; the orchestrator must replace the resource.
	#[error("Field `{field}` cannot be changed in place; the resource requires replacement.")]
	RequiresReplacement {
		/// Declared name of the immutable field.
		field: &'static str,
	},
}

/// Lifecycle event validation failures raised at the invocation boundary.
#[derive(Debug, ThisError)]
pub enum EventError {
	/// A required event field is absent.
	#[error("Event is missing the required field `{field}`.")]
	MissingField {
		/// Declared field name.
		field: &'static str,
	},
	/// An event field carries an unexpected JSON type.
	#[error("Event field `{field}` must be {expected}.")]
	InvalidField {
		/// Declared field name.
		field: &'static str,
		/// Human-readable description of the expected shape.
		expected: &'static str,
	},
	/// The request kind label is not one of Create/Update/Delete.
	#[error("Unknown request kind `{value}`.")]
	UnknownRequestKind {
		/// Raw label received from the façade.
		value: String,
	},
	/// The declared app-client type is not a recognized variant.
	#[error("Unknown app client type `{value}`; expected `frontend` or `backend`.")]
	UnknownClientType {
		/// Raw label received from the façade.
		value: String,
	},
}

/// Configuration and validation failures raised before any network call.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// The environment name is not part of the compiled-in table.
	#[error("Unknown environment `{name}`; valid environments are {valid}.")]
	UnknownEnvironment {
		/// Raw environment name received from the event.
		name: String,
		/// Comma-separated list of recognized environment names.
		valid: String,
	},
	/// A composed endpoint URL failed to parse.
	#[error("Composed endpoint URL is invalid.")]
	InvalidUrl {
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// A required credential variable is absent from the process environment.
	#[error("Credential variable `{variable}` is not set.")]
	MissingCredentials {
		/// Name of the missing environment variable.
		variable: &'static str,
	},
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the identity service.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the identity service.")]
	Io(#[from] std::io::Error),
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		Self::network(e)
	}
}

/// Failures attributed to the remote identity service.
#[derive(Debug, ThisError)]
pub enum RemoteError {
	/// The service answered with a non-success status; the body is carried verbatim.
	#[error("Identity service rejected the request with status {status}: {body}")]
	Rejected {
		/// HTTP status code returned by the service.
		status: u16,
		/// Response body text, unaltered.
		body: String,
	},
	/// The service answered with a body that could not be decoded as the expected JSON shape.
	#[error("Identity service returned malformed JSON (status {status}).")]
	MalformedBody {
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
		/// HTTP status code of the malformed response.
		status: u16,
	},
}
