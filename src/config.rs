//! Client configuration: credentials, target environment, API version, and token cache policy.
//!
//! [`ClientConfig`] is validated once by [`ClientConfigBuilder::build`] and then shared by
//! every request. [`ClientConfig::from_env`] covers the usual `PAYPAL_*` variables.

/// Builder API for assembling client configurations.
pub mod builder;
/// PayPal environments and their base URLs.
pub mod environment;

pub use builder::*;
pub use environment::*;

// self
use crate::{_prelude::*, auth::Secret, error::ConfigError};

/// Immutable client configuration consumed by [`Client`](crate::client::Client).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
	/// OAuth 2.0 client identifier.
	pub client_id: String,
	/// OAuth 2.0 client secret.
	pub client_secret: Secret,
	/// Environment the configuration was built for.
	pub environment: Environment,
	/// Base URL every request path is joined onto; always ends with `/`.
	pub base_url: Url,
	/// Version segment prefixed to every path (`v1` by default).
	pub api_version: Option<String>,
	/// Amount subtracted from `expires_in` when caching tokens.
	pub token_expiry_margin: Duration,
	/// Cache key the bearer token is stored under.
	pub token_cache_key: String,
}
impl ClientConfig {
	/// Variable holding the client identifier.
	pub const ENV_CLIENT_ID: &'static str = "PAYPAL_CLIENT_ID";
	/// Variable holding the client secret.
	pub const ENV_CLIENT_SECRET: &'static str = "PAYPAL_CLIENT_SECRET";
	/// Variable selecting the sandbox (`true`, the default) or live environment.
	pub const ENV_SANDBOX: &'static str = "PAYPAL_SANDBOX";
	/// Variable overriding the API version.
	pub const ENV_API_VERSION: &'static str = "PAYPAL_API_VERSION";

	/// Creates a new builder for the provided credentials.
	pub fn builder(
		client_id: impl Into<String>,
		client_secret: impl Into<String>,
	) -> ClientConfigBuilder {
		ClientConfigBuilder::new(client_id, client_secret)
	}

	/// Loads the configuration from the process environment.
	pub fn from_env() -> Result<Self> {
		Self::from_env_with(|name| std::env::var(name).ok())
	}

	/// Loads the configuration through an arbitrary variable lookup.
	pub fn from_env_with<F>(lookup: F) -> Result<Self>
	where
		F: Fn(&str) -> Option<String>,
	{
		let required = |name: &'static str| {
			lookup(name)
				.filter(|value| !value.trim().is_empty())
				.ok_or(ConfigError::MissingEnv { name })
		};
		let client_id = required(Self::ENV_CLIENT_ID)?;
		let client_secret = required(Self::ENV_CLIENT_SECRET)?;
		let sandbox = match lookup(Self::ENV_SANDBOX) {
			Some(value) => parse_flag(&value)
				.ok_or(ConfigError::InvalidEnv { name: Self::ENV_SANDBOX, value })?,
			None => true,
		};
		let mut builder = Self::builder(client_id, client_secret).sandbox(sandbox);

		if let Some(version) = lookup(Self::ENV_API_VERSION) {
			builder = builder.api_version(version);
		}

		builder.build().map_err(|e| ConfigError::from(e).into())
	}

	/// Resolves an API path against the base URL and version prefix.
	///
	/// Leading, trailing, and repeated slashes in `path` are ignored; a query string is kept.
	pub fn api_url(&self, path: &str) -> Result<Url> {
		let (path_part, query) = match path.split_once('?') {
			Some((p, q)) => (p, Some(q)),
			None => (path, None),
		};
		let mut joined = self
			.api_version
			.iter()
			.map(String::as_str)
			.chain(path_part.split('/'))
			.filter(|segment| !segment.is_empty())
			.collect::<Vec<_>>()
			.join("/");

		if let Some(query) = query {
			joined.push('?');
			joined.push_str(query);
		}

		self.base_url
			.join(&format!("./{joined}"))
			.map_err(|source| ConfigError::InvalidPath { path: path.to_owned(), source }.into())
	}

	/// Returns the client-credentials token endpoint.
	pub fn token_url(&self) -> Result<Url> {
		self.api_url("oauth2/token")
	}
}

fn parse_flag(value: &str) -> Option<bool> {
	match value.trim().to_ascii_lowercase().as_str() {
		"true" | "1" | "yes" => Some(true),
		"false" | "0" | "no" => Some(false),
		_ => None,
	}
}
