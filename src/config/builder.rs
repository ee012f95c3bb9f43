// self
use crate::{
	_prelude::*,
	auth::Secret,
	config::{ClientConfig, Environment},
};

/// Errors raised while constructing or validating a [`ClientConfig`].
#[derive(Debug, PartialEq, Eq, ThisError)]
pub enum ClientConfigError {
	/// Client id or secret is empty.
	#[error("The {field} must not be empty.")]
	MissingCredential {
		/// Which credential was empty.
		field: &'static str,
	},
	/// Base URL must use HTTPS unless it points at a loopback host.
	#[error("The base URL must use HTTPS: {url}.")]
	InsecureBaseUrl {
		/// URL that failed validation.
		url: String,
	},
	/// Base URL cannot have paths joined onto it or carries a query/fragment.
	#[error("The base URL cannot be used as an API root: {url}.")]
	InvalidBaseUrl {
		/// URL that failed validation.
		url: String,
	},
	/// API version is empty or contains a slash.
	#[error("The API version `{version}` is invalid.")]
	InvalidApiVersion {
		/// Rejected version string.
		version: String,
	},
	/// Expiry margin is negative.
	#[error("The token expiry margin must not be negative.")]
	NegativeExpiryMargin,
	/// Cache key is empty.
	#[error("The token cache key must not be empty.")]
	EmptyCacheKey,
}

/// Builder for [`ClientConfig`] values.
#[derive(Debug)]
pub struct ClientConfigBuilder {
	/// OAuth 2.0 client identifier.
	pub client_id: String,
	/// OAuth 2.0 client secret.
	pub client_secret: Secret,
	/// Target environment.
	pub environment: Environment,
	/// Explicit base URL overriding the environment's.
	pub base_url: Option<Url>,
	/// Version prefix; `None` sends paths as given.
	pub api_version: Option<String>,
	/// Amount subtracted from `expires_in` when caching tokens.
	pub token_expiry_margin: Duration,
	/// Cache key the bearer token is stored under.
	pub token_cache_key: String,
}
impl ClientConfigBuilder {
	/// Version prefix applied unless overridden.
	pub const DEFAULT_API_VERSION: &'static str = "v1";
	/// Tokens are cached for `expires_in` minus this margin.
	pub const DEFAULT_TOKEN_EXPIRY_MARGIN: Duration = Duration::seconds(60 * 60);
	/// Default key for the cached bearer token.
	pub const DEFAULT_TOKEN_CACHE_KEY: &'static str = "paypal_oauth_token";

	/// Creates a new builder seeded with the provided credentials.
	pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
		Self {
			client_id: client_id.into(),
			client_secret: Secret::new(client_secret),
			environment: Environment::default(),
			base_url: None,
			api_version: Some(Self::DEFAULT_API_VERSION.into()),
			token_expiry_margin: Self::DEFAULT_TOKEN_EXPIRY_MARGIN,
			token_cache_key: Self::DEFAULT_TOKEN_CACHE_KEY.into(),
		}
	}

	/// Selects the environment.
	pub fn environment(mut self, environment: Environment) -> Self {
		self.environment = environment;

		self
	}

	/// Selects sandbox (`true`) or live (`false`).
	pub fn sandbox(self, sandbox: bool) -> Self {
		self.environment(Environment::from_sandbox(sandbox))
	}

	/// Overrides the base URL derived from the environment.
	pub fn base_url(mut self, url: Url) -> Self {
		self.base_url = Some(url);

		self
	}

	/// Overrides the version prefix.
	pub fn api_version(mut self, version: impl Into<String>) -> Self {
		self.api_version = Some(version.into());

		self
	}

	/// Sends paths without a version prefix.
	pub fn without_api_version(mut self) -> Self {
		self.api_version = None;

		self
	}

	/// Overrides the expiry margin (defaults to one hour).
	pub fn token_expiry_margin(mut self, margin: Duration) -> Self {
		self.token_expiry_margin = margin;

		self
	}

	/// Overrides the cache key, e.g. when several clients share one cache.
	pub fn token_cache_key(mut self, key: impl Into<String>) -> Self {
		self.token_cache_key = key.into();

		self
	}

	/// Consumes the builder and validates the resulting configuration.
	pub fn build(self) -> Result<ClientConfig, ClientConfigError> {
		if self.client_id.trim().is_empty() {
			return Err(ClientConfigError::MissingCredential { field: "client id" });
		}
		if self.client_secret.is_blank() {
			return Err(ClientConfigError::MissingCredential { field: "client secret" });
		}
		if self.token_expiry_margin.is_negative() {
			return Err(ClientConfigError::NegativeExpiryMargin);
		}
		if self.token_cache_key.is_empty() {
			return Err(ClientConfigError::EmptyCacheKey);
		}
		if let Some(version) = self.api_version.as_deref() {
			validate_api_version(version)?;
		}

		let base_url = match self.base_url {
			Some(url) => url,
			None => Url::parse(self.environment.base_url()).map_err(|_| {
				ClientConfigError::InvalidBaseUrl { url: self.environment.base_url().into() }
			})?,
		};

		Ok(ClientConfig {
			client_id: self.client_id,
			client_secret: self.client_secret,
			environment: self.environment,
			base_url: normalize_base_url(base_url)?,
			api_version: self.api_version,
			token_expiry_margin: self.token_expiry_margin,
			token_cache_key: self.token_cache_key,
		})
	}
}

fn validate_api_version(version: &str) -> Result<(), ClientConfigError> {
	if version.trim().is_empty() || version.contains('/') {
		Err(ClientConfigError::InvalidApiVersion { version: version.to_owned() })
	} else {
		Ok(())
	}
}

fn normalize_base_url(mut url: Url) -> Result<Url, ClientConfigError> {
	if url.cannot_be_a_base() || url.query().is_some() || url.fragment().is_some() {
		return Err(ClientConfigError::InvalidBaseUrl { url: url.to_string() });
	}
	if url.scheme() != "https" && !(url.scheme() == "http" && is_loopback(&url)) {
		return Err(ClientConfigError::InsecureBaseUrl { url: url.to_string() });
	}
	if !url.path().ends_with('/') {
		let path = format!("{}/", url.path());

		url.set_path(&path);
	}

	Ok(url)
}

fn is_loopback(url: &Url) -> bool {
	match url.host() {
		Some(url::Host::Domain(domain)) => domain.eq_ignore_ascii_case("localhost"),
		Some(url::Host::Ipv4(addr)) => addr.is_loopback(),
		Some(url::Host::Ipv6(addr)) => addr.is_loopback(),
		None => false,
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn url(value: &str) -> Url {
		Url::parse(value).expect("Failed to parse test URL.")
	}

	#[test]
	fn defaults_target_sandbox_v1() {
		let config =
			ClientConfig::builder("id", "secret").build().expect("Default configuration should build.");

		assert_eq!(config.environment, Environment::Sandbox);
		assert_eq!(config.base_url.as_str(), "https://api.sandbox.paypal.com/");
		assert_eq!(config.api_version.as_deref(), Some("v1"));
		assert_eq!(config.token_expiry_margin, Duration::hours(1));
		assert_eq!(config.token_cache_key, "paypal_oauth_token");
	}

	#[test]
	fn live_environment_uses_production_url() {
		let config = ClientConfig::builder("id", "secret")
			.sandbox(false)
			.build()
			.expect("Live configuration should build.");

		assert_eq!(config.environment, Environment::Live);
		assert_eq!(config.base_url.as_str(), "https://api.paypal.com/");
	}

	#[test]
	fn rejects_empty_credentials() {
		let err = ClientConfig::builder(" ", "secret")
			.build()
			.expect_err("Blank client id should be rejected.");

		assert_eq!(err, ClientConfigError::MissingCredential { field: "client id" });

		let err = ClientConfig::builder("id", "")
			.build()
			.expect_err("Blank client secret should be rejected.");

		assert_eq!(err, ClientConfigError::MissingCredential { field: "client secret" });
	}

	#[test]
	fn rejects_insecure_remote_base_url_but_allows_loopback() {
		let err = ClientConfig::builder("id", "secret")
			.base_url(url("http://api.example.com"))
			.build()
			.expect_err("Plain HTTP to a remote host should be rejected.");

		assert!(matches!(err, ClientConfigError::InsecureBaseUrl { .. }));

		for local in ["http://127.0.0.1:8080", "http://localhost:9000/", "http://[::1]:7000"] {
			ClientConfig::builder("id", "secret")
				.base_url(url(local))
				.build()
				.expect("Loopback HTTP base URLs should be accepted.");
		}
	}

	#[test]
	fn rejects_base_url_with_query() {
		let err = ClientConfig::builder("id", "secret")
			.base_url(url("https://api.example.com/?x=1"))
			.build()
			.expect_err("Base URLs with queries should be rejected.");

		assert!(matches!(err, ClientConfigError::InvalidBaseUrl { .. }));
	}

	#[test]
	fn rejects_invalid_version_margin_and_key() {
		assert!(matches!(
			ClientConfig::builder("id", "secret").api_version("v1/extra").build(),
			Err(ClientConfigError::InvalidApiVersion { .. })
		));
		assert_eq!(
			ClientConfig::builder("id", "secret")
				.token_expiry_margin(Duration::seconds(-1))
				.build()
				.expect_err("Negative margins should be rejected."),
			ClientConfigError::NegativeExpiryMargin
		);
		assert_eq!(
			ClientConfig::builder("id", "secret")
				.token_cache_key("")
				.build()
				.expect_err("Empty cache keys should be rejected."),
			ClientConfigError::EmptyCacheKey
		);
	}

	#[test]
	fn debug_output_redacts_secret() {
		let config = ClientConfig::builder("id", "very-secret")
			.build()
			.expect("Configuration should build.");

		assert!(!format!("{config:?}").contains("very-secret"));
	}
}
