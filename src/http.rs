//! Transport primitives and the signed API client.
//!
//! [`ApiTransport`] is the crate's only dependency on an HTTP stack: it executes one prepared
//! request and returns the raw status, body, and headers with zero interpretation — status
//! handling belongs to the lifecycle handlers. [`SignedApiClient`] sits on top, resolving
//! credentials at call time and attaching a request signature before dispatch.

/// Injected credential-resolution capability.
pub mod credentials;
/// Request-signature computation.
pub mod sigv4;

pub use credentials::*;

// self
use crate::{_prelude::*, config::SIGNING_SERVICE, error::TransportError, http::sigv4::SigningParams};

/// HTTP method of an outbound API call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Method {
	/// Fetch a resource.
	Get,
	/// Create a resource in a collection.
	Post,
	/// Replace a resource's declared state.
	Put,
	/// Destroy a resource.
	Delete,
}
impl Method {
	/// Returns the method token as it appears on the wire and in signatures.
	pub const fn as_str(self) -> &'static str {
		match self {
			Method::Get => "GET",
			Method::Post => "POST",
			Method::Put => "PUT",
			Method::Delete => "DELETE",
		}
	}
}
impl Display for Method {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// One fully-prepared outbound request, signature headers included.
#[derive(Clone, Debug)]
pub struct TransportRequest {
	/// HTTP method.
	pub method: Method,
	/// Absolute request URL.
	pub url: String,
	/// Headers to attach, signature headers included.
	pub headers: Vec<(String, String)>,
	/// Optional request body.
	pub body: Option<String>,
}

/// Raw response returned by a transport, untouched by any status-code policy.
#[derive(Clone, Debug)]
pub struct RawResponse {
	/// HTTP status code.
	pub status: u16,
	/// Response body text, verbatim.
	pub body: String,
	/// Response headers, verbatim.
	pub headers: Vec<(String, String)>,
}

/// Boxed future returned by [`ApiTransport::execute`].
pub type TransportFuture<'a> =
	Pin<Box<dyn Future<Output = Result<RawResponse, TransportError>> + 'a + Send>>;

/// Abstraction over HTTP stacks capable of executing one signed API call.
///
/// Implementations must be `Send + Sync + 'static` so handlers can share them behind `Arc`
/// without additional wrappers. They perform exactly one attempt per call: no retries, no
/// timeout overrides beyond the stack's own defaults, no status interpretation.
pub trait ApiTransport
where
	Self: 'static + Send + Sync,
{
	/// Executes the prepared request and returns the raw response.
	fn execute(&self, request: TransportRequest) -> TransportFuture<'_>;
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
#[cfg(feature = "reqwest")]
#[derive(Clone, Default)]
pub struct ReqwestTransport(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestTransport {
	/// Wraps an existing [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestTransport {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl ApiTransport for ReqwestTransport {
	fn execute(&self, request: TransportRequest) -> TransportFuture<'_> {
		let client = self.0.clone();

		Box::pin(async move {
			let method = match request.method {
				Method::Get => reqwest::Method::GET,
				Method::Post => reqwest::Method::POST,
				Method::Put => reqwest::Method::PUT,
				Method::Delete => reqwest::Method::DELETE,
			};
			let mut builder = client.request(method, &request.url);

			for (name, value) in &request.headers {
				builder = builder.header(name, value);
			}
			if let Some(body) = request.body {
				builder = builder.body(body);
			}

			let response = builder.send().await.map_err(TransportError::from)?;
			let status = response.status().as_u16();
			let headers = response
				.headers()
				.iter()
				.map(|(name, value)| {
					(name.as_str().to_owned(), String::from_utf8_lossy(value.as_bytes()).into_owned())
				})
				.collect();
			let body = response.text().await.map_err(TransportError::from)?;

			Ok(RawResponse { status, body, headers })
		})
	}
}

/// Signed HTTP client for the remote identity-management API.
///
/// Credentials are resolved fresh on every call — correctness over performance, since each
/// lifecycle invocation is short-lived and infrequent. The signature binds method, host,
/// path, signed headers, payload hash, date, region, and the fixed service name.
pub struct SignedApiClient<T, P>
where
	T: ?Sized + ApiTransport,
	P: ?Sized + CredentialsProvider,
{
	/// Transport used for every outbound call.
	pub transport: Arc<T>,
	/// Credential capability resolved at call time.
	pub credentials: Arc<P>,
	/// Default signing region applied when a call does not override it.
	pub region: String,
}
impl<T, P> SignedApiClient<T, P>
where
	T: ?Sized + ApiTransport,
	P: ?Sized + CredentialsProvider,
{
	/// Creates a signed client over the given transport and credential capability.
	pub fn new(
		transport: impl Into<Arc<T>>,
		credentials: impl Into<Arc<P>>,
		region: impl Into<String>,
	) -> Self {
		Self { transport: transport.into(), credentials: credentials.into(), region: region.into() }
	}

	/// Performs one signed call and returns the raw response.
	///
	/// `base` carries the scheme and authority; `path` must already be percent-encoded.
	/// `region` overrides the client default for this call only.
	pub async fn send(
		&self,
		method: Method,
		base: &Url,
		path: &str,
		body: Option<String>,
		extra_headers: &[(String, String)],
		region: Option<&str>,
	) -> Result<RawResponse> {
		let credentials = self.credentials.resolve().await?;
		let host = authority(base);
		let payload = body.as_deref().unwrap_or_default();
		let mut headers = sigv4::sign(&SigningParams {
			method: method.as_str(),
			host: &host,
			path,
			headers: extra_headers,
			payload: payload.as_bytes(),
			timestamp: OffsetDateTime::now_utc(),
			region: region.unwrap_or(&self.region),
			service: SIGNING_SERVICE,
			credentials: &credentials,
		});

		headers.extend(extra_headers.iter().cloned());

		let url = format!("{}://{host}{path}", base.scheme());
		let request = TransportRequest { method, url, headers, body };

		self.transport.execute(request).await.map_err(Error::from)
	}
}

fn authority(base: &Url) -> String {
	match (base.host_str(), base.port()) {
		(Some(host), Some(port)) => format!("{host}:{port}"),
		(Some(host), None) => host.into(),
		(None, _) => base.as_str().into(),
	}
}
