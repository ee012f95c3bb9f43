//! Authenticated PayPal REST client.
//!
//! [`Client`] owns the configuration, the transport, and the token cache. Every call
//! first resolves a bearer token through [`Client::auth_token`], which reads the cache
//! and only performs the client-credentials grant on a miss (or when forced). A single
//! async guard makes concurrent misses share one token request instead of stampeding
//! the token endpoint.

pub mod request;
pub mod response;

pub use request::*;
pub use response::*;

pub use oauth2::http::Method;

// crates.io
use oauth2::AsyncHttpClient;
// self
use crate::{
	_prelude::*,
	auth::AccessToken,
	cache::TokenCache,
	config::ClientConfig,
	error::{ApiError, ApiErrorKind},
	http::{HttpTransport, ResponseMetadata, ResponseMetadataSlot},
	oauth::{TokenExchange, TransportErrorMapper},
	obs::{self, OperationKind, OperationOutcome, OperationSpan, debug_event},
};
#[cfg(feature = "reqwest")]
use crate::{cache::MemoryCache, http::ReqwestHttpClient, oauth::ReqwestTransportErrorMapper};

#[cfg(feature = "reqwest")]
/// Client specialized for the crate's default reqwest transport stack.
pub type ReqwestApiClient = Client<ReqwestHttpClient, ReqwestTransportErrorMapper>;

/// PayPal REST client bound to one set of credentials.
pub struct Client<C, M>
where
	C: ?Sized + HttpTransport,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Validated configuration shared by every request.
	pub config: ClientConfig,
	/// Transport used for the token exchange and API calls.
	pub http_client: Arc<C>,
	/// Mapper applied to transport-layer errors before surfacing them to callers.
	pub transport_mapper: Arc<M>,
	/// Cache holding the bearer token under [`ClientConfig::token_cache_key`].
	pub cache: Arc<dyn TokenCache>,
	token_guard: Arc<AsyncMutex<()>>,
}
impl<C, M> Client<C, M>
where
	C: ?Sized + HttpTransport,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Creates a client that reuses the caller-provided transport + mapper pair.
	pub fn with_http_client(
		config: ClientConfig,
		cache: Arc<dyn TokenCache>,
		http_client: impl Into<Arc<C>>,
		mapper: impl Into<Arc<M>>,
	) -> Self {
		Self {
			config,
			http_client: http_client.into(),
			transport_mapper: mapper.into(),
			cache,
			token_guard: Default::default(),
		}
	}

	/// Returns a bearer token, fetching a new one on cache miss or when `force` is set.
	///
	/// Fresh tokens are cached for `expires_in` minus the configured margin. Tokens that
	/// would not outlive the margin are returned without being cached, and a forced call
	/// always replaces whatever the cache held.
	pub async fn auth_token(&self, force: bool) -> Result<AccessToken> {
		const KIND: OperationKind = OperationKind::Authenticate;

		let span = OperationSpan::new(KIND, "auth_token");

		obs::record_operation_outcome(KIND, OperationOutcome::Attempt);

		let result = span.instrument(self.resolve_token(force)).await;

		obs::record_operation_result(KIND, &result);

		result
	}

	/// Sends an authenticated request and returns the response for statuses below 400.
	pub async fn send(&self, request: ApiRequest) -> Result<ApiResponse> {
		const KIND: OperationKind = OperationKind::Request;

		let span = OperationSpan::new(KIND, "send");

		obs::record_operation_outcome(KIND, OperationOutcome::Attempt);

		let result = span.instrument(self.dispatch(request)).await;

		obs::record_operation_result(KIND, &result);

		result
	}

	/// Issues a `GET` request.
	pub async fn get(&self, path: impl Into<String>) -> Result<ApiResponse> {
		self.send(ApiRequest::new(Method::GET, path)).await
	}

	/// Issues a `DELETE` request.
	pub async fn delete(&self, path: impl Into<String>) -> Result<ApiResponse> {
		self.send(ApiRequest::new(Method::DELETE, path)).await
	}

	/// Issues a `POST` request with a JSON body.
	pub async fn post<T>(&self, path: impl Into<String>, body: &T) -> Result<ApiResponse>
	where
		T: ?Sized + Serialize,
	{
		self.send(ApiRequest::new(Method::POST, path).json(body)?).await
	}

	/// Issues a `PUT` request with a JSON body.
	pub async fn put<T>(&self, path: impl Into<String>, body: &T) -> Result<ApiResponse>
	where
		T: ?Sized + Serialize,
	{
		self.send(ApiRequest::new(Method::PUT, path).json(body)?).await
	}

	/// Issues a `PATCH` request with a JSON body.
	pub async fn patch<T>(&self, path: impl Into<String>, body: &T) -> Result<ApiResponse>
	where
		T: ?Sized + Serialize,
	{
		self.send(ApiRequest::new(Method::PATCH, path).json(body)?).await
	}

	async fn resolve_token(&self, force: bool) -> Result<AccessToken> {
		let key = self.config.token_cache_key.as_str();

		if let Some(token) = self.cached_token(key, force).await? {
			return Ok(token);
		}

		let _singleflight = self.token_guard.lock().await;

		// Another caller may have refreshed the token while this one waited.
		if let Some(token) = self.cached_token(key, force).await? {
			return Ok(token);
		}

		let token = TokenExchange::from_config(
			&self.config,
			self.http_client.clone(),
			self.transport_mapper.clone(),
		)?
		.client_credentials()
		.await?;
		let ttl = token.cache_ttl(self.config.token_expiry_margin);

		if ttl.is_positive() {
			self.cache.write(key, token.clone(), ttl).await?;

			debug_event!(key, ttl_secs = ttl.whole_seconds(), "stored fresh token");
		} else {
			self.cache.delete(key).await?;

			debug_event!(key, "token lifetime is within the expiry margin, not caching");
		}

		Ok(token)
	}

	async fn cached_token(&self, key: &str, force: bool) -> Result<Option<AccessToken>> {
		if force {
			return Ok(None);
		}

		let cached = self.cache.read(key).await?;

		if cached.is_some() {
			debug_event!(key, "token cache hit");
		}

		Ok(cached)
	}

	async fn dispatch(&self, request: ApiRequest) -> Result<ApiResponse> {
		let token = self.auth_token(false).await?;
		let http_request = request.into_http(&self.config, &token)?;
		let meta = ResponseMetadataSlot::default();
		let handle = self.http_client.with_metadata(meta.clone());
		let response = handle.call(http_request).await.map_err(|err| {
			self.transport_mapper.map_transport_error(
				OperationKind::Request,
				meta.take().as_ref(),
				err,
			)
		})?;
		let status = response.status().as_u16();

		if status < 400 {
			return Ok(ApiResponse::from_http(response));
		}

		let meta = meta
			.take()
			.unwrap_or_else(|| ResponseMetadata::from_headers(status, response.headers()));
		let error = ApiError::from_response(status, response.body()).with_metadata(&meta);

		if error.kind == ApiErrorKind::AuthenticationFailure {
			let key = self.config.token_cache_key.as_str();

			if self.cache.delete(key).await? {
				debug_event!(key, "bearer token rejected, evicted cached token");
			}
		}

		debug_event!(status, code = %error.code, debug_id = ?error.debug_id, "request failed");

		Err(error.into())
	}
}
#[cfg(feature = "reqwest")]
impl Client<ReqwestHttpClient, ReqwestTransportErrorMapper> {
	/// Creates a client backed by a default reqwest transport and the provided cache.
	pub fn new(config: ClientConfig, cache: Arc<dyn TokenCache>) -> Self {
		Self::with_http_client(
			config,
			cache,
			ReqwestHttpClient::default(),
			ReqwestTransportErrorMapper,
		)
	}

	/// Loads [`ClientConfig::from_env`] and pairs it with a fresh [`MemoryCache`].
	pub fn from_env() -> Result<Self> {
		Ok(Self::new(ClientConfig::from_env()?, Arc::new(MemoryCache::default())))
	}
}
impl<C, M> Clone for Client<C, M>
where
	C: ?Sized + HttpTransport,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	fn clone(&self) -> Self {
		Self {
			config: self.config.clone(),
			http_client: self.http_client.clone(),
			transport_mapper: self.transport_mapper.clone(),
			cache: self.cache.clone(),
			token_guard: self.token_guard.clone(),
		}
	}
}
impl<C, M> Debug for Client<C, M>
where
	C: ?Sized + HttpTransport,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Client")
			.field("config", &self.config)
			.finish_non_exhaustive()
	}
}
