//! Client-level error types shared by the token fetcher, the request façade, and caches.

// self
use crate::{_prelude::*, config::ClientConfigError, http::ResponseMetadata};

/// Client-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical client error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// PayPal answered with an HTTP status of 400 or above.
	#[error(transparent)]
	Api(#[from] ApiError),
	/// Token cache failure.
	#[error("{0}")]
	Cache(
		#[from]
		#[source]
		crate::cache::CacheError,
	),
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Response body could not be decoded.
	#[error(transparent)]
	Decode(#[from] DecodeError),
	/// Transport failure (DNS, TCP, TLS, timeouts).
	#[error(transparent)]
	Transport(#[from] TransportError),
}
impl Error {
	/// Returns the mapped API error kind when the failure came from an HTTP error status.
	pub fn api_kind(&self) -> Option<ApiErrorKind> {
		match self {
			Self::Api(e) => Some(e.kind),
			_ => None,
		}
	}

	/// Returns `true` when repeating the same call later may succeed.
	pub fn is_retryable(&self) -> bool {
		match self {
			Self::Api(e) => matches!(
				e.kind,
				ApiErrorKind::RateLimitReached
					| ApiErrorKind::InternalServerError
					| ApiErrorKind::ServiceUnavailable
			),
			Self::Transport(TransportError::Timeout | TransportError::Network { .. }) => true,
			_ => false,
		}
	}
}

impl From<ClientConfigError> for Error {
	fn from(e: ClientConfigError) -> Self {
		Self::Config(e.into())
	}
}

/// Error categories keyed by the HTTP status PayPal returned.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ApiErrorKind {
	/// 400: the request is malformed or failed validation.
	InvalidRequest,
	/// 401: credentials or bearer token were rejected.
	AuthenticationFailure,
	/// 403: the caller lacks permission for the resource.
	NotAuthorized,
	/// 404: the resource does not exist.
	ResourceNotFound,
	/// 405: the method is not supported on the resource.
	MethodNotSupported,
	/// 406: the requested media type is not available.
	MediaTypeNotAcceptable,
	/// 415: the request body media type is not supported.
	UnsupportedMediaType,
	/// 422: the request is well formed but semantically invalid.
	UnprocessableEntity,
	/// 429: too many requests.
	RateLimitReached,
	/// 500: PayPal failed internally.
	InternalServerError,
	/// 503: PayPal is temporarily unavailable.
	ServiceUnavailable,
	/// Any other status of 400 or above.
	Other,
}
impl ApiErrorKind {
	/// Looks up the kind associated with an HTTP status code.
	pub const fn from_status(status: u16) -> Self {
		match status {
			400 => Self::InvalidRequest,
			401 => Self::AuthenticationFailure,
			403 => Self::NotAuthorized,
			404 => Self::ResourceNotFound,
			405 => Self::MethodNotSupported,
			406 => Self::MediaTypeNotAcceptable,
			415 => Self::UnsupportedMediaType,
			422 => Self::UnprocessableEntity,
			429 => Self::RateLimitReached,
			500 => Self::InternalServerError,
			503 => Self::ServiceUnavailable,
			_ => Self::Other,
		}
	}

	/// Returns a stable label suitable for logs or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::InvalidRequest => "invalid_request",
			Self::AuthenticationFailure => "authentication_failure",
			Self::NotAuthorized => "not_authorized",
			Self::ResourceNotFound => "resource_not_found",
			Self::MethodNotSupported => "method_not_supported",
			Self::MediaTypeNotAcceptable => "media_type_not_acceptable",
			Self::UnsupportedMediaType => "unsupported_media_type",
			Self::UnprocessableEntity => "unprocessable_entity",
			Self::RateLimitReached => "rate_limit_reached",
			Self::InternalServerError => "internal_server_error",
			Self::ServiceUnavailable => "service_unavailable",
			Self::Other => "other",
		}
	}
}
impl Display for ApiErrorKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// HTTP error response returned by PayPal, with the code and message pulled from its JSON body.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
#[error("{code}: {message} ({status})")]
pub struct ApiError {
	/// Kind looked up from the status code.
	pub kind: ApiErrorKind,
	/// HTTP status code.
	pub status: u16,
	/// Provider error code (`name` or `error`), or the status when the body has neither.
	pub code: String,
	/// Provider message (`message` or `error_description`), or a generic fallback.
	pub message: String,
	/// Raw response body decoded lossily as UTF-8.
	pub body: String,
	/// Value of the `PayPal-Debug-Id` header, if present.
	pub debug_id: Option<String>,
	/// `Retry-After` hint, if present.
	pub retry_after: Option<Duration>,
}
impl ApiError {
	/// Message used when the body carries no usable description.
	pub const DEFAULT_MESSAGE: &'static str = "Something went wrong";

	/// Builds an error from a status code and the raw response body.
	pub fn from_response(status: u16, body: &[u8]) -> Self {
		let parsed = serde_json::from_slice::<serde_json::Value>(body).ok();
		let object = parsed.as_ref().and_then(serde_json::Value::as_object);
		let field = |name: &str| object.and_then(|map| map.get(name)).and_then(field_text);
		let code = field("name").or_else(|| field("error")).unwrap_or_else(|| status.to_string());
		let message = field("message")
			.or_else(|| field("error_description"))
			.unwrap_or_else(|| Self::DEFAULT_MESSAGE.to_owned());

		Self {
			kind: ApiErrorKind::from_status(status),
			status,
			code,
			message,
			body: String::from_utf8_lossy(body).into_owned(),
			debug_id: None,
			retry_after: None,
		}
	}

	/// Copies the debug id and retry hint captured by the transport.
	pub fn with_metadata(mut self, meta: &ResponseMetadata) -> Self {
		self.debug_id = meta.debug_id.clone();
		self.retry_after = meta.retry_after;

		self
	}

	/// Verbose rendering that appends the status and raw body to the display message.
	pub fn details(&self) -> String {
		let mut out = format!("{self} status_code: {}", self.status);

		if !self.body.is_empty() {
			out.push_str(" body: ");
			out.push_str(&self.body);
		}

		out
	}
}

fn field_text(value: &serde_json::Value) -> Option<String> {
	match value {
		serde_json::Value::Null => None,
		serde_json::Value::String(s) => Some(s.clone()),
		other => Some(other.to_string()),
	}
}

/// Configuration and request-construction failures.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// Client configuration failed validation.
	#[error(transparent)]
	InvalidConfig(#[from] ClientConfigError),
	/// A required environment variable is not set.
	#[error("Environment variable `{name}` is not set.")]
	MissingEnv {
		/// Variable name.
		name: &'static str,
	},
	/// An environment variable holds an unusable value.
	#[error("Environment variable `{name}` has an invalid value: {value}.")]
	InvalidEnv {
		/// Variable name.
		name: &'static str,
		/// Offending value.
		value: String,
	},
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// HTTP request construction failed.
	#[error(transparent)]
	HttpRequest(#[from] oauth2::http::Error),
	/// Request path could not be joined onto the base URL.
	#[error("Request path `{path}` does not form a valid URL.")]
	InvalidPath {
		/// Path supplied by the caller.
		path: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// A caller-supplied header name or value is not valid HTTP.
	#[error("Header `{name}` is invalid.")]
	InvalidHeader {
		/// Header name as supplied.
		name: String,
	},
	/// Request body could not be serialized to JSON.
	#[error("Request body could not be serialized to JSON.")]
	SerializeBody(#[source] serde_json::Error),
	/// Token endpoint response omitted `expires_in`.
	#[error("Token endpoint response is missing expires_in.")]
	MissingExpiresIn,
	/// Token endpoint returned an excessively large `expires_in`.
	#[error("The expires_in value exceeds the supported range.")]
	ExpiresInOutOfRange,
	/// Token endpoint returned a non-positive duration.
	#[error("The expires_in value must be positive.")]
	NonPositiveExpiresIn,
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Response bodies that could not be turned into the expected shape.
#[derive(Debug, ThisError)]
pub enum DecodeError {
	/// Body is not valid JSON for the requested type.
	#[error("Response body could not be decoded as JSON.")]
	Json {
		/// Structured parsing failure including the JSON path.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
		/// HTTP status code, when available.
		status: Option<u16>,
	},
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling PayPal.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// The request timed out.
	#[error("Request to PayPal timed out.")]
	Timeout,
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling PayPal.")]
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
