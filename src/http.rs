//! Transport primitives shared by the token exchange and API requests.
//!
//! [`HttpTransport`] is the client's only dependency on an HTTP stack. It hands out
//! [`AsyncHttpClient`] handles that carry a [`ResponseMetadataSlot`], so the status,
//! `Retry-After`, and `PayPal-Debug-Id` of the last response stay available to error
//! mapping even when the `oauth2` crate swallows the response itself.

// std
#[cfg(feature = "reqwest")] use std::ops::Deref;
// crates.io
#[cfg(feature = "reqwest")] use oauth2::{HttpRequest, HttpResponse};
use oauth2::{
	AsyncHttpClient, HttpClientError,
	http::{HeaderMap, header::RETRY_AFTER},
};
use time::format_description::well_known::Rfc2822;
// self
use crate::_prelude::*;

/// Response header PayPal uses to correlate a call with its support logs.
pub const DEBUG_ID_HEADER: &str = "paypal-debug-id";

/// Abstraction over HTTP transports able to execute PayPal calls while publishing
/// response metadata.
///
/// Implementations must be `Send + Sync + 'static` so one transport can back many
/// clients, and the handles they return must own whatever they need so request
/// futures stay `Send` for the whole call.
pub trait HttpTransport
where
	Self: 'static + Send + Sync,
{
	/// Concrete error emitted by the underlying transport.
	type TransportError: 'static + Send + Sync + StdError;

	/// [`AsyncHttpClient`] handle tied to a [`ResponseMetadataSlot`].
	type Handle: for<'c> AsyncHttpClient<
			'c,
			Error = HttpClientError<Self::TransportError>,
			Future: 'c + Send,
		>
		+ 'static
		+ Send
		+ Sync;

	/// Builds a handle that records outcomes in `slot`.
	///
	/// # Metadata Contract
	///
	/// - Call [`ResponseMetadataSlot::take`] before submitting the request so stale values never
	///   leak across calls.
	/// - Once a response (successful or not) arrives, save its metadata with
	///   [`ResponseMetadataSlot::store`].
	fn with_metadata(&self, slot: ResponseMetadataSlot) -> Self::Handle;
}

/// Metadata captured from the most recent HTTP response.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ResponseMetadata {
	/// HTTP status code, if a response arrived.
	pub status: Option<u16>,
	/// `Retry-After` hint expressed as a relative duration.
	pub retry_after: Option<Duration>,
	/// `PayPal-Debug-Id` header value.
	pub debug_id: Option<String>,
}
impl ResponseMetadata {
	/// Extracts metadata from a status code and response headers.
	pub fn from_headers(status: u16, headers: &HeaderMap) -> Self {
		Self {
			status: Some(status),
			retry_after: parse_retry_after(headers),
			debug_id: parse_debug_id(headers),
		}
	}
}

/// Thread-safe slot for sharing [`ResponseMetadata`] between transport and error layers.
#[derive(Clone, Debug, Default)]
pub struct ResponseMetadataSlot(Arc<Mutex<Option<ResponseMetadata>>>);
impl ResponseMetadataSlot {
	/// Stores new metadata for the current request.
	pub fn store(&self, meta: ResponseMetadata) {
		*self.0.lock() = Some(meta);
	}

	/// Returns the captured metadata, if any, consuming it from the slot.
	pub fn take(&self) -> Option<ResponseMetadata> {
		self.0.lock().take()
	}
}

/// Thin wrapper around [`ReqwestClient`] used by default.
///
/// Custom clients passed through [`ReqwestHttpClient::with_client`] should keep redirect
/// following disabled for the token endpoint.
#[cfg(feature = "reqwest")]
#[derive(Clone, Default)]
pub struct ReqwestHttpClient(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestHttpClient {
	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestHttpClient {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl Deref for ReqwestHttpClient {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl HttpTransport for ReqwestHttpClient {
	type Handle = ReqwestHandle;
	type TransportError = ReqwestError;

	fn with_metadata(&self, slot: ResponseMetadataSlot) -> Self::Handle {
		ReqwestHandle { client: self.0.clone(), slot }
	}
}

/// Handle returned by [`ReqwestHttpClient`]; records metadata for each response.
#[cfg(feature = "reqwest")]
#[derive(Clone)]
pub struct ReqwestHandle {
	client: ReqwestClient,
	slot: ResponseMetadataSlot,
}
#[cfg(feature = "reqwest")]
impl<'c> AsyncHttpClient<'c> for ReqwestHandle {
	type Error = HttpClientError<ReqwestError>;
	type Future =
		Pin<Box<dyn Future<Output = Result<HttpResponse, Self::Error>> + 'c + Send + Sync>>;

	fn call(&'c self, request: HttpRequest) -> Self::Future {
		let client = self.client.clone();
		let slot = self.slot.clone();

		Box::pin(async move {
			slot.take();

			let response =
				client.execute(request.try_into().map_err(Box::new)?).await.map_err(Box::new)?;
			let status = response.status();
			let headers = response.headers().to_owned();

			slot.store(ResponseMetadata::from_headers(status.as_u16(), &headers));

			let mut out = HttpResponse::new(response.bytes().await.map_err(Box::new)?.to_vec());

			*out.status_mut() = status;
			*out.headers_mut() = headers;

			Ok(out)
		})
	}
}

/// Parses `Retry-After` as delta-seconds or an RFC 2822 date in the future.
pub fn parse_retry_after(headers: &HeaderMap) -> Option<Duration> {
	let raw = headers.get(RETRY_AFTER)?.to_str().ok()?.trim();

	if let Ok(secs) = raw.parse::<u32>() {
		return Some(Duration::seconds(i64::from(secs)));
	}
	if let Ok(moment) = OffsetDateTime::parse(raw, &Rfc2822) {
		let delta = moment - OffsetDateTime::now_utc();

		if delta.is_positive() {
			return Some(delta);
		}
	}

	None
}

fn parse_debug_id(headers: &HeaderMap) -> Option<String> {
	headers
		.get(DEBUG_ID_HEADER)
		.and_then(|value| value.to_str().ok())
		.map(|value| value.trim().to_owned())
		.filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
	// crates.io
	use oauth2::http::HeaderValue;
	// self
	use super::*;

	#[test]
	fn retry_after_accepts_seconds_and_dates() {
		let mut headers = HeaderMap::new();

		headers.insert(RETRY_AFTER, HeaderValue::from_static("12"));

		assert_eq!(parse_retry_after(&headers), Some(Duration::seconds(12)));

		let future = (OffsetDateTime::now_utc() + Duration::minutes(10))
			.format(&Rfc2822)
			.expect("Future instant should format as RFC 2822.");

		headers.insert(
			RETRY_AFTER,
			HeaderValue::from_str(&future).expect("Formatted date should be a valid header."),
		);

		let delta = parse_retry_after(&headers).expect("Future date should yield a delay.");

		assert!(delta > Duration::minutes(9) && delta <= Duration::minutes(10));

		headers.insert(RETRY_AFTER, HeaderValue::from_static("Mon, 01 Jan 2001 00:00:00 +0000"));

		assert_eq!(parse_retry_after(&headers), None);

		headers.insert(RETRY_AFTER, HeaderValue::from_static("soon"));

		assert_eq!(parse_retry_after(&headers), None);
	}

	#[test]
	fn metadata_reads_debug_id() {
		let mut headers = HeaderMap::new();

		headers.insert(DEBUG_ID_HEADER, HeaderValue::from_static("8a2f6b3c1d"));

		let meta = ResponseMetadata::from_headers(404, &headers);

		assert_eq!(meta.status, Some(404));
		assert_eq!(meta.debug_id.as_deref(), Some("8a2f6b3c1d"));
		assert_eq!(meta.retry_after, None);
	}

	#[test]
	fn slot_take_consumes_metadata() {
		let slot = ResponseMetadataSlot::default();

		slot.store(ResponseMetadata { status: Some(200), ..Default::default() });

		assert_eq!(slot.take().and_then(|meta| meta.status), Some(200));
		assert!(slot.take().is_none());
	}
}
