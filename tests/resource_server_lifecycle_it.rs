// crates.io
use httpmock::prelude::*;
use serde_json::json;
// self
use idp_provisioner::{_preludet::*, event::OutcomeStatus};

const IDENTIFIER: &str = "https://orders.example.com";
const ENCODED_PATH: &str = "/resource-servers/https%3A%2F%2Forders.example.com";

// `httpmock` serves its mock endpoints over HTTPS with a self-signed certificate, so the
// provisioner must ride the insecure test transport rather than a stock reqwest client.
fn build_provisioner(server: &MockServer) -> ReqwestTestProvisioner {
	build_test_provisioner(&server.url(""))
}

fn declared_properties() -> serde_json::Value {
	json!({
		"Environment": "test",
		"Name": "Orders API",
		"Identifier": IDENTIFIER,
		"Scopes": [{ "Name": "read", "Description": "x" }],
	})
}

#[tokio::test]
async fn create_translates_scope_casing_on_both_paths() {
	let server = MockServer::start_async().await;
	let provisioner = build_provisioner(&server);
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/resource-servers").header_exists("authorization").json_body(
				json!({
					"identifier": IDENTIFIER,
					"name": "Orders API",
					"scopes": [{ "name": "read", "description": "x" }],
				}),
			);
			then.status(201).header("content-type", "application/json").body(
				r#"{"identifier":"https://orders.example.com","name":"Orders API",
				    "scopes":[{"name":"read","description":"x"}]}"#,
			);
		})
		.await;
	let event = json!({ "requestKind": "Create", "resourceProperties": declared_properties() });
	let outcome = provisioner.handle_resource_server(&event).await;

	mock.assert_calls_async(1).await;

	assert_eq!(outcome.status, OutcomeStatus::Success);
	assert_eq!(outcome.physical_id, IDENTIFIER);
	assert_eq!(outcome.data["Scopes"], json!([{ "Name": "read", "Description": "x" }]));
}

#[tokio::test]
async fn create_rejection_surfaces_status_and_body_verbatim() {
	let server = MockServer::start_async().await;
	let provisioner = build_provisioner(&server);
	let _mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/resource-servers");
			then.status(409).body("identifier already registered");
		})
		.await;
	let event = json!({ "requestKind": "Create", "resourceProperties": declared_properties() });
	let outcome = provisioner.handle_resource_server(&event).await;

	assert_eq!(outcome.status, OutcomeStatus::Failed);
	assert_eq!(outcome.physical_id, IDENTIFIER);

	let reason = outcome.reason.expect("Failure reason should be set.");

	assert!(reason.contains("409"));
	assert!(reason.contains("identifier already registered"));
}

#[tokio::test]
async fn update_percent_encodes_the_identifier_and_reads_back() {
	let server = MockServer::start_async().await;
	let provisioner = build_provisioner(&server);
	let put = server
		.mock_async(|when, then| {
			when.method(PUT).path(ENCODED_PATH);
			then.status(200).body("{}");
		})
		.await;
	let get = server
		.mock_async(|when, then| {
			when.method(GET).path(ENCODED_PATH);
			then.status(200).header("content-type", "application/json").body(
				r#"{"identifier":"https://orders.example.com","name":"Orders API",
				    "scopes":[{"name":"read","description":"x"},
				              {"name":"write","description":"y"}]}"#,
			);
		})
		.await;
	let event = json!({
		"requestKind": "Update",
		"physicalId": IDENTIFIER,
		"resourceProperties": {
			"Environment": "test",
			"Name": "Orders API",
			"Identifier": IDENTIFIER,
			"Scopes": [
				{ "Name": "read", "Description": "x" },
				{ "Name": "write", "Description": "y" },
			],
		},
		"previousProperties": declared_properties(),
	});
	let outcome = provisioner.handle_resource_server(&event).await;

	put.assert_calls_async(1).await;
	get.assert_calls_async(1).await;

	assert_eq!(outcome.status, OutcomeStatus::Success);
	assert_eq!(outcome.physical_id, IDENTIFIER);
	assert_eq!(
		outcome.data["Scopes"],
		json!([
			{ "Name": "read", "Description": "x" },
			{ "Name": "write", "Description": "y" },
		]),
	);
}

#[tokio::test]
async fn delete_treats_missing_resource_as_success() {
	let server = MockServer::start_async().await;
	let provisioner = build_provisioner(&server);
	let mock = server
		.mock_async(|when, then| {
			when.method(DELETE).path(ENCODED_PATH);
			then.status(404).body("no such resource server");
		})
		.await;
	let event = json!({
		"requestKind": "Delete",
		"physicalId": IDENTIFIER,
		"resourceProperties": declared_properties(),
	});
	let outcome = provisioner.handle_resource_server(&event).await;

	mock.assert_calls_async(1).await;

	assert_eq!(outcome.status, OutcomeStatus::Success);
	assert_eq!(outcome.physical_id, IDENTIFIER);
	assert!(outcome.data.is_empty());
}

#[tokio::test]
async fn delete_without_physical_id_falls_back_to_declared_identifier() {
	let server = MockServer::start_async().await;
	let provisioner = build_provisioner(&server);
	let mock = server
		.mock_async(|when, then| {
			when.method(DELETE).path(ENCODED_PATH);
			then.status(200);
		})
		.await;
	let event = json!({ "requestKind": "Delete", "resourceProperties": declared_properties() });
	let outcome = provisioner.handle_resource_server(&event).await;

	mock.assert_calls_async(1).await;

	assert_eq!(outcome.status, OutcomeStatus::Success);
	assert_eq!(outcome.physical_id, IDENTIFIER);
}
