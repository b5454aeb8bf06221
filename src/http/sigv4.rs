//! Request-signature computation binding method, host, path, headers, payload, date, region,
//! and service name into an `AWS4-HMAC-SHA256` authorization header.
//!
//! The output of [`sign`] is deterministic for a fixed timestamp, which is what the unit tests
//! pin against the published signing example.

// crates.io
use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};
use time::{format_description::BorrowedFormatItem, macros::format_description};
// self
use crate::{_prelude::*, http::credentials::Credentials};

const ALGORITHM: &str = "AWS4-HMAC-SHA256";
const DATE_STAMP_FORMAT: &[BorrowedFormatItem<'static>] =
	format_description!("[year][month][day]");
const AMZ_DATE_FORMAT: &[BorrowedFormatItem<'static>] =
	format_description!("[year][month][day]T[hour][minute][second]Z");

type HmacSha256 = Hmac<Sha256>;

/// Everything a single request signature binds.
#[derive(Clone, Debug)]
pub struct SigningParams<'a> {
	/// HTTP method token.
	pub method: &'a str,
	/// Target authority (host, plus port when non-default).
	pub host: &'a str,
	/// Request path, already percent-encoded.
	pub path: &'a str,
	/// Additional headers that must be bound into the signature.
	pub headers: &'a [(String, String)],
	/// Request payload; empty for body-less methods.
	pub payload: &'a [u8],
	/// Signing timestamp.
	pub timestamp: OffsetDateTime,
	/// Signing region.
	pub region: &'a str,
	/// Signing service name.
	pub service: &'a str,
	/// Resolved credential set.
	pub credentials: &'a Credentials,
}

/// Computes the signature headers for one request: `host`, `x-amz-date`, the session token
/// header when one is present, and `authorization`.
///
/// Caller-supplied extra headers participate in the canonical request but are not returned
/// here; the caller attaches them itself.
pub fn sign(params: &SigningParams) -> Vec<(String, String)> {
	let (date_stamp, amz_date) = format_timestamps(params.timestamp);
	let mut signed: Vec<(String, String)> = vec![
		("host".into(), params.host.trim().into()),
		("x-amz-date".into(), amz_date.clone()),
	];

	if let Some(token) = &params.credentials.session_token {
		signed.push(("x-amz-security-token".into(), token.clone()));
	}
	for (name, value) in params.headers {
		signed.push((name.to_lowercase(), value.trim().into()));
	}

	signed.sort_by(|(a, _), (b, _)| a.cmp(b));

	let canonical_headers =
		signed.iter().map(|(name, value)| format!("{name}:{value}\n")).collect::<String>();
	let signed_headers =
		signed.iter().map(|(name, _)| name.as_str()).collect::<Vec<_>>().join(";");
	let payload_hash = hex::encode(Sha256::digest(params.payload));
	let canonical_uri = if params.path.is_empty() { "/" } else { params.path };
	let canonical_request = format!(
		"{}\n{canonical_uri}\n\n{canonical_headers}\n{signed_headers}\n{payload_hash}",
		params.method,
	);
	let scope = format!("{date_stamp}/{}/{}/aws4_request", params.region, params.service);
	let string_to_sign = format!(
		"{ALGORITHM}\n{amz_date}\n{scope}\n{}",
		hex::encode(Sha256::digest(canonical_request.as_bytes())),
	);
	let secret = format!("AWS4{}", params.credentials.secret_access_key);
	let key = hmac(secret.as_bytes(), date_stamp.as_bytes());
	let key = hmac(&key, params.region.as_bytes());
	let key = hmac(&key, params.service.as_bytes());
	let key = hmac(&key, b"aws4_request");
	let signature = hex::encode(hmac(&key, string_to_sign.as_bytes()));
	let authorization = format!(
		"{ALGORITHM} Credential={}/{scope}, SignedHeaders={signed_headers}, Signature={signature}",
		params.credentials.access_key_id,
	);
	let mut headers: Vec<(String, String)> =
		vec![("host".into(), params.host.into()), ("x-amz-date".into(), amz_date)];

	if let Some(token) = &params.credentials.session_token {
		headers.push(("x-amz-security-token".into(), token.clone()));
	}

	headers.push(("authorization".into(), authorization));

	headers
}

fn format_timestamps(timestamp: OffsetDateTime) -> (String, String) {
	let date_stamp = timestamp
		.format(DATE_STAMP_FORMAT)
		.expect("Constant format description applies to any timestamp.");
	let amz_date = timestamp
		.format(AMZ_DATE_FORMAT)
		.expect("Constant format description applies to any timestamp.");

	(date_stamp, amz_date)
}

fn hmac(key: &[u8], data: &[u8]) -> Vec<u8> {
	let mut mac = HmacSha256::new_from_slice(key).expect("HMAC accepts keys of any length.");

	mac.update(data);

	mac.finalize().into_bytes().to_vec()
}

#[cfg(test)]
mod tests {
	// crates.io
	use time::macros::datetime;
	// self
	use super::*;

	fn header<'a>(headers: &'a [(String, String)], name: &str) -> &'a str {
		headers
			.iter()
			.find(|(candidate, _)| candidate == name)
			.map(|(_, value)| value.as_str())
			.expect("Expected header should be present.")
	}

	#[test]
	fn matches_the_published_signing_example() {
		// The `get-vanilla` case from the published SigV4 test suite.
		let credentials =
			Credentials::new("AKIDEXAMPLE", "wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY");
		let headers = sign(&SigningParams {
			method: "GET",
			host: "example.amazonaws.com",
			path: "/",
			headers: &[],
			payload: b"",
			timestamp: datetime!(2015-08-30 12:36:00 UTC),
			region: "us-east-1",
			service: "service",
			credentials: &credentials,
		});

		assert_eq!(header(&headers, "x-amz-date"), "20150830T123600Z");
		assert_eq!(
			header(&headers, "authorization"),
			"AWS4-HMAC-SHA256 \
			 Credential=AKIDEXAMPLE/20150830/us-east-1/service/aws4_request, \
			 SignedHeaders=host;x-amz-date, \
			 Signature=5fa00fa31553b73ebf1942676e86291e8372ff2a2260956d9b8aae1d763fbf31",
		);
	}

	#[test]
	fn amz_date_components_are_zero_padded() {
		let credentials = Credentials::new("AKIDTEST", "secret");
		let headers = sign(&SigningParams {
			method: "GET",
			host: "delegated.auth.acmecorp.io",
			path: "/",
			headers: &[],
			payload: b"",
			timestamp: datetime!(2026-01-05 04:05:06 UTC),
			region: "eu-west-1",
			service: "execute-api",
			credentials: &credentials,
		});

		assert_eq!(header(&headers, "x-amz-date"), "20260105T040506Z");
		assert!(header(&headers, "authorization").contains("/20260105/"));
	}

	#[test]
	fn signature_is_deterministic_and_region_sensitive() {
		let credentials = Credentials::new("AKIDTEST", "secret");
		let params = SigningParams {
			method: "POST",
			host: "delegated.dev.auth.acmecorp.io",
			path: "/app-clients",
			headers: &[("content-type".into(), "application/json".into())],
			payload: br#"{"name":"orders-web"}"#,
			timestamp: datetime!(2026-01-15 09:30:00 UTC),
			region: "eu-west-1",
			service: "execute-api",
			credentials: &credentials,
		};
		let first = sign(&params);
		let second = sign(&params);

		assert_eq!(first, second);
		assert!(header(&first, "authorization").contains("content-type;host;x-amz-date"));

		let other_region = sign(&SigningParams { region: "us-east-1", ..params });

		assert_ne!(header(&first, "authorization"), header(&other_region, "authorization"));
	}

	#[test]
	fn session_token_is_bound_and_attached() {
		let credentials = Credentials::new("AKIDTEST", "secret").with_session_token("sts-token");
		let headers = sign(&SigningParams {
			method: "GET",
			host: "delegated.auth.acmecorp.io",
			path: "/app-clients/orders-web",
			headers: &[],
			payload: b"",
			timestamp: datetime!(2026-01-15 09:30:00 UTC),
			region: "eu-west-1",
			service: "execute-api",
			credentials: &credentials,
		});

		assert_eq!(header(&headers, "x-amz-security-token"), "sts-token");
		assert!(
			header(&headers, "authorization")
				.contains("SignedHeaders=host;x-amz-date;x-amz-security-token"),
		);
	}
}
