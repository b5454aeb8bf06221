//! Lifecycle provisioner for delegated identity-provider resources—reconcile app clients and
//! resource servers against a centrally-managed authentication API with signed requests.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod api;
pub mod config;
pub mod environment;
pub mod error;
pub mod event;
pub mod handler;
pub mod http;
pub mod obs;
#[cfg(all(any(test, feature = "test"), feature = "reqwest"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for integration tests; enabled via `cfg(test)` or the
	//! `test` crate feature.

	pub use crate::_prelude::*;

	// self
	use crate::{
		config::Config,
		handler::Provisioner,
		http::{ReqwestTransport, StaticCredentials},
	};

	/// Provisioner type alias used by reqwest-backed integration tests.
	pub type ReqwestTestProvisioner = Provisioner<ReqwestTransport, StaticCredentials>;

	/// Builds a reqwest transport that accepts the self-signed certificates produced by
	/// `httpmock` during tests.
	pub fn test_reqwest_transport() -> ReqwestTransport {
		let client = ReqwestClient::builder()
			.danger_accept_invalid_certs(true)
			.danger_accept_invalid_hostnames(true)
			.build()
			.expect("Failed to build insecure Reqwest client for tests.");

		ReqwestTransport::with_client(client)
	}

	/// Constructs a [`Provisioner`] whose remote API calls are redirected to the given mock
	/// endpoint, signed with fixed test credentials.
	pub fn build_test_provisioner(endpoint: &str) -> ReqwestTestProvisioner {
		let endpoint = Url::parse(endpoint).expect("Mock endpoint URL should parse successfully.");
		let config = Config::default().with_endpoint_override(endpoint);
		let credentials = StaticCredentials::new("AKIDTEST", "test-secret-key");

		Provisioner::new(test_reqwest_transport(), credentials, config)
			.expect("Test provisioner should build successfully.")
	}
}

mod _prelude {
	pub use std::{
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		str::FromStr,
		sync::Arc,
	};

	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use serde_json::{Map as JsonMap, Value as Json};
	pub use thiserror::Error as ThisError;
	pub use time::OffsetDateTime;
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(all(test, feature = "reqwest"))]
use {color_eyre as _, httpmock as _, idp_provisioner as _, tokio as _};
