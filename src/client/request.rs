//! Request builder and the header/URL merging applied before dispatch.

// crates.io
use oauth2::{
	HttpRequest,
	http::{
		HeaderMap, HeaderName, HeaderValue, Method, Request,
		header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
	},
};
// self
use crate::{_prelude::*, auth::AccessToken, config::ClientConfig, error::ConfigError};

const JSON: &str = "application/json";

/// Describes one API call before authentication is applied.
#[derive(Clone, Debug, PartialEq)]
pub struct ApiRequest {
	/// HTTP method.
	pub method: Method,
	/// Path relative to the versioned API root, e.g. `/notifications/webhooks`.
	pub path: String,
	/// Caller headers in insertion order; a later duplicate replaces an earlier one.
	pub headers: Vec<(String, String)>,
	/// Query pairs appended after any query already present on `path`.
	pub query: Vec<(String, String)>,
	/// JSON body, if any.
	pub body: Option<serde_json::Value>,
}
impl ApiRequest {
	/// Creates a request without headers, query, or body.
	pub fn new(method: Method, path: impl Into<String>) -> Self {
		Self { method, path: path.into(), headers: Vec::new(), query: Vec::new(), body: None }
	}

	/// Adds a header. `Authorization`, `Accept`, and `Content-Type` are overwritten at send time.
	pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.headers.push((name.into(), value.into()));

		self
	}

	/// Appends a query parameter.
	pub fn query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.query.push((name.into(), value.into()));

		self
	}

	/// Serializes `body` as the JSON payload.
	pub fn json<T>(mut self, body: &T) -> Result<Self>
	where
		T: ?Sized + Serialize,
	{
		self.body = Some(serde_json::to_value(body).map_err(ConfigError::SerializeBody)?);

		Ok(self)
	}

	/// Uses an already-built JSON value as the payload.
	pub fn json_value(mut self, body: serde_json::Value) -> Self {
		self.body = Some(body);

		self
	}

	/// Resolves the final URL: versioned path plus query pairs.
	pub fn url(&self, config: &ClientConfig) -> Result<Url> {
		let mut url = config.api_url(&self.path)?;

		if !self.query.is_empty() {
			url.query_pairs_mut().extend_pairs(self.query.iter());
		}

		Ok(url)
	}

	/// Merges caller headers with the bearer token and the JSON defaults.
	///
	/// Caller headers go in first, then `Authorization`, then `Accept` and `Content-Type`, so
	/// the latter always win.
	pub fn merged_headers(&self, token: &AccessToken) -> Result<HeaderMap> {
		let mut headers = HeaderMap::new();

		for (name, value) in &self.headers {
			let invalid = || ConfigError::InvalidHeader { name: name.clone() };
			let header_name = HeaderName::from_bytes(name.as_bytes()).map_err(|_| invalid())?;
			let header_value = HeaderValue::from_str(value).map_err(|_| invalid())?;

			headers.insert(header_name, header_value);
		}

		let mut bearer = HeaderValue::from_str(&token.bearer())
			.map_err(|_| ConfigError::InvalidHeader { name: AUTHORIZATION.as_str().into() })?;

		bearer.set_sensitive(true);
		headers.insert(AUTHORIZATION, bearer);
		headers.insert(ACCEPT, HeaderValue::from_static(JSON));
		headers.insert(CONTENT_TYPE, HeaderValue::from_static(JSON));

		Ok(headers)
	}

	pub(crate) fn into_http(self, config: &ClientConfig, token: &AccessToken) -> Result<HttpRequest> {
		let url = self.url(config)?;
		let headers = self.merged_headers(token)?;
		let body = match &self.body {
			Some(value) => serde_json::to_vec(value).map_err(ConfigError::SerializeBody)?,
			None => Vec::new(),
		};
		let mut request = Request::builder()
			.method(self.method)
			.uri(url.as_str())
			.body(body)
			.map_err(ConfigError::from)?;

		*request.headers_mut() = headers;

		Ok(request)
	}
}
