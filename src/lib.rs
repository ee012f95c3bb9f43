//! Async PayPal REST client: cached client-credentials tokens, JSON request building, and typed
//! API errors keyed by HTTP status.
//!
//! ```no_run
//! use paypal_client::{cache::MemoryCache, client::Client, config::ClientConfig};
//! use std::sync::Arc;
//!
//! # async fn run() -> paypal_client::error::Result<()> {
//! let config = ClientConfig::builder("client_id", "client_secret").sandbox(true).build()?;
//! let client = Client::new(config, Arc::new(MemoryCache::default()));
//! let webhooks = client.get("/notifications/webhooks").await?.value()?;
//!
//! println!("{webhooks}");
//! # Ok(())
//! # }
//! ```

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod oauth;
pub mod obs;
#[cfg(feature = "reqwest")]
#[doc(hidden)]
pub mod _preludet {
	//! Convenience re-exports and helpers shared by unit and integration tests.

	pub use crate::_prelude::*;

	// self
	use crate::{
		cache::{MemoryCache, TokenCache},
		client::{Client, ReqwestApiClient},
		config::ClientConfig,
		http::ReqwestHttpClient,
		oauth::ReqwestTransportErrorMapper,
	};

	/// Client id used by test fixtures.
	pub const TEST_CLIENT_ID: &str = "client_id";
	/// Client secret used by test fixtures.
	pub const TEST_CLIENT_SECRET: &str = "client_secret";
	/// `Authorization` header the token endpoint receives for the fixture credentials.
	pub const TEST_BASIC_AUTH: &str = "Basic Y2xpZW50X2lkOmNsaWVudF9zZWNyZXQ=";

	/// Builds a reqwest HTTP client that accepts the self-signed certificates produced by
	/// `httpmock` during tests.
	pub fn test_reqwest_http_client() -> ReqwestHttpClient {
		let client = ReqwestClient::builder()
			.danger_accept_invalid_certs(true)
			.danger_accept_invalid_hostnames(true)
			.build()
			.expect("Failed to build insecure Reqwest client for tests.");

		ReqwestHttpClient::with_client(client)
	}

	/// Configuration for the fixture credentials pointed at `base_url`.
	pub fn test_config(base_url: &str) -> ClientConfig {
		ClientConfig::builder(TEST_CLIENT_ID, TEST_CLIENT_SECRET)
			.base_url(Url::parse(base_url).expect("Mock server URL should parse."))
			.build()
			.expect("Test configuration should build.")
	}

	/// Constructs a reqwest-backed [`Client`] with an in-memory cache for `config`.
	pub fn build_reqwest_test_client_with(
		config: ClientConfig,
	) -> (ReqwestApiClient, Arc<MemoryCache>) {
		let cache_backend = Arc::new(MemoryCache::default());
		let cache: Arc<dyn TokenCache> = cache_backend.clone();
		let client = Client::with_http_client(
			config,
			cache,
			test_reqwest_http_client(),
			ReqwestTransportErrorMapper,
		);

		(client, cache_backend)
	}

	/// Constructs a reqwest-backed [`Client`] with an in-memory cache, pointed at `base_url`.
	pub fn build_reqwest_test_client(base_url: &str) -> (ReqwestApiClient, Arc<MemoryCache>) {
		build_reqwest_test_client_with(test_config(base_url))
	}
}

mod _prelude {
	pub use std::{
		collections::HashMap,
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		sync::Arc,
	};

	pub use async_lock::Mutex as AsyncMutex;
	pub use parking_lot::{Mutex, RwLock};
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use serde_json;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _, tokio as _};
