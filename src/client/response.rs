//! Successful API responses.

// crates.io
use oauth2::{HttpResponse, http::HeaderMap};
use serde::de::DeserializeOwned;
// self
use crate::{_prelude::*, error::DecodeError, http::DEBUG_ID_HEADER};

/// Response with a status below 400.
#[derive(Clone, Debug)]
pub struct ApiResponse {
	/// HTTP status code.
	pub status: u16,
	/// Response headers.
	pub headers: HeaderMap,
	/// Raw body bytes.
	pub body: Vec<u8>,
}
impl ApiResponse {
	pub(crate) fn from_http(response: HttpResponse) -> Self {
		let (parts, body) = response.into_parts();

		Self { status: parts.status.as_u16(), headers: parts.headers, body }
	}

	/// Decodes the body into `T`, reporting the JSON path of any mismatch.
	pub fn json<T>(&self) -> Result<T>
	where
		T: DeserializeOwned,
	{
		let mut de = serde_json::Deserializer::from_slice(&self.body);

		serde_path_to_error::deserialize(&mut de)
			.map_err(|source| DecodeError::Json { source, status: Some(self.status) }.into())
	}

	/// Decodes the body as untyped JSON; an empty body yields `Value::Null`.
	pub fn value(&self) -> Result<serde_json::Value> {
		if self.is_empty() { Ok(serde_json::Value::Null) } else { self.json() }
	}

	/// Returns `true` when the body is empty or whitespace only (e.g. `204 No Content`).
	pub fn is_empty(&self) -> bool {
		self.body.iter().all(u8::is_ascii_whitespace)
	}

	/// `PayPal-Debug-Id` header value, if present.
	pub fn debug_id(&self) -> Option<&str> {
		self.headers.get(DEBUG_ID_HEADER).and_then(|value| value.to_str().ok())
	}
}
