//! Demonstrates listing webhooks through the client with the default reqwest transport and the
//! in-memory token cache, against a local mock of the PayPal sandbox.

// std
use std::sync::Arc;
// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
use url::Url;
// self
use paypal_client::{
	cache::MemoryCache,
	client::{ApiRequest, Client, Method},
	config::ClientConfig,
	error::Error,
	http::ReqwestHttpClient,
	oauth::ReqwestTransportErrorMapper,
	reqwest,
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let token_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/v1/oauth2/token");
			then.status(200).header("content-type", "application/json").body(
				"{\"access_token\":\"demo-access\",\"token_type\":\"Bearer\",\"expires_in\":32400}",
			);
		})
		.await;
	let list_mock = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/v1/notifications/webhooks")
				.header("authorization", "Bearer demo-access");
			then.status(200).header("content-type", "application/json").body(
				"{\"webhooks\":[{\"id\":\"40Y916089Y8324740\",\"url\":\"https://example.com/paypal\"}]}",
			);
		})
		.await;
	let missing_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/v1/notifications/webhooks/WH-MISSING");
			then.status(404).header("content-type", "application/json").body(
				"{\"name\":\"INVALID_RESOURCE_ID\",\"message\":\"Webhook not found.\"}",
			);
		})
		.await;
	let config = ClientConfig::builder("demo-client", "super-secret")
		.base_url(Url::parse(&server.base_url())?)
		.build()?;
	let http_client = ReqwestHttpClient::with_client(reqwest::Client::builder().build()?);
	let client = <Client<ReqwestHttpClient, ReqwestTransportErrorMapper>>::with_http_client(
		config,
		Arc::new(MemoryCache::default()),
		http_client,
		ReqwestTransportErrorMapper,
	);
	let webhooks = client
		.send(ApiRequest::new(Method::GET, "/notifications/webhooks").query("page_size", "10"))
		.await?
		.value()?;

	println!("Registered webhooks: {webhooks}.");

	match client.get("/notifications/webhooks/WH-MISSING").await {
		Err(Error::Api(err)) => println!("Lookup failed as expected: {}.", err.details()),
		other => println!("Unexpected outcome: {other:?}."),
	}

	token_mock.assert_async().await;
	list_mock.assert_async().await;
	missing_mock.assert_async().await;

	Ok(())
}
