// self
use paypal_client::{
	_preludet::*,
	cache::{MemoryCache, TokenCache},
	client::Client,
	config::ClientConfig,
	error::TransportError,
	http::{HttpTransport, ResponseMetadata, ResponseMetadataSlot},
	oauth::{
		TransportErrorMapper,
		oauth2::{
			AsyncHttpClient, HttpClientError, HttpRequest, HttpResponse,
			http::{HeaderValue, StatusCode, header::CONTENT_TYPE},
		},
	},
	obs::OperationKind,
};

#[derive(Debug)]
enum FakeTransportError {
	Throttled,
	ConnectionReset,
}
impl Display for FakeTransportError {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		match self {
			Self::Throttled => write!(f, "Transport throttled."),
			Self::ConnectionReset => write!(f, "Connection reset by peer."),
		}
	}
}
impl StdError for FakeTransportError {}

/// Either throttles the token endpoint or issues tokens and drops every API call.
#[derive(Clone, Copy)]
enum FakeHttpClient {
	ThrottledTokens { retry_after: Duration },
	DroppedRequests,
}
impl HttpTransport for FakeHttpClient {
	type Handle = FakeHttpHandle;
	type TransportError = FakeTransportError;

	fn with_metadata(&self, slot: ResponseMetadataSlot) -> Self::Handle {
		FakeHttpHandle { slot, mode: *self }
	}
}

struct FakeHttpHandle {
	slot: ResponseMetadataSlot,
	mode: FakeHttpClient,
}
impl<'a> AsyncHttpClient<'a> for FakeHttpHandle {
	type Error = HttpClientError<FakeTransportError>;
	type Future =
		Pin<Box<dyn Future<Output = Result<HttpResponse, Self::Error>> + 'a + Send + Sync>>;

	fn call(&'a self, request: HttpRequest) -> Self::Future {
		let slot = self.slot.clone();
		let mode = self.mode;
		let is_token_call = request.uri().path().ends_with("/oauth2/token");

		Box::pin(async move {
			assert!(
				slot.take().is_none(),
				"ResponseMetadataSlot must be clear before dispatching a request."
			);

			match (mode, is_token_call) {
				(FakeHttpClient::ThrottledTokens { retry_after }, _) => {
					slot.store(ResponseMetadata {
						status: Some(429),
						retry_after: Some(retry_after),
						debug_id: Some("throttle-debug".into()),
					});

					Err(HttpClientError::Reqwest(Box::new(FakeTransportError::Throttled)))
				},
				(FakeHttpClient::DroppedRequests, true) => {
					let mut response = HttpResponse::new(
						b"{\"access_token\":\"fake-token\",\"token_type\":\"Bearer\",\"expires_in\":32400}"
							.to_vec(),
					);

					*response.status_mut() = StatusCode::OK;
					response
						.headers_mut()
						.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
					slot.store(ResponseMetadata { status: Some(200), ..Default::default() });

					Ok(response)
				},
				(FakeHttpClient::DroppedRequests, false) =>
					Err(HttpClientError::Reqwest(Box::new(FakeTransportError::ConnectionReset))),
			}
		})
	}
}

#[derive(Clone, Default)]
struct RecordingTransportErrorMapper {
	calls: Arc<Mutex<Vec<(OperationKind, Option<ResponseMetadata>)>>>,
}
impl RecordingTransportErrorMapper {
	fn recorded(&self) -> Vec<(OperationKind, Option<ResponseMetadata>)> {
		self.calls.lock().clone()
	}
}
impl TransportErrorMapper<FakeTransportError> for RecordingTransportErrorMapper {
	fn map_transport_error(
		&self,
		operation: OperationKind,
		meta: Option<&ResponseMetadata>,
		err: HttpClientError<FakeTransportError>,
	) -> Error {
		self.calls.lock().push((operation, meta.cloned()));

		match err {
			HttpClientError::Reqwest(inner) => TransportError::network(*inner).into(),
			HttpClientError::Io(inner) => TransportError::Io(inner).into(),
			_ => TransportError::Timeout.into(),
		}
	}
}

fn build_client(
	http_client: FakeHttpClient,
	mapper: Arc<RecordingTransportErrorMapper>,
) -> (Client<FakeHttpClient, RecordingTransportErrorMapper>, Arc<MemoryCache>) {
	let config = ClientConfig::builder(TEST_CLIENT_ID, TEST_CLIENT_SECRET)
		.build()
		.expect("Configuration should build.");
	let cache_backend = Arc::new(MemoryCache::default());
	let cache: Arc<dyn TokenCache> = cache_backend.clone();

	(Client::with_http_client(config, cache, http_client, mapper), cache_backend)
}

#[tokio::test]
async fn token_transport_failures_reach_mapper_with_metadata() {
	let mapper = Arc::new(RecordingTransportErrorMapper::default());
	let (client, cache) = build_client(
		FakeHttpClient::ThrottledTokens { retry_after: Duration::seconds(5) },
		mapper.clone(),
	);
	let err = client.auth_token(false).await.expect_err("Throttled token call should fail.");

	assert!(matches!(err, Error::Transport(TransportError::Network { .. })));
	assert!(err.is_retryable());
	assert!(cache.is_empty());

	let recorded = mapper.recorded();

	assert_eq!(recorded.len(), 1);

	let (operation, meta) = &recorded[0];
	let meta = meta.as_ref().expect("Token failures should carry metadata.");

	assert_eq!(*operation, OperationKind::Authenticate);
	assert_eq!(meta.status, Some(429));
	assert_eq!(meta.retry_after, Some(Duration::seconds(5)));
	assert_eq!(meta.debug_id.as_deref(), Some("throttle-debug"));
}

#[tokio::test]
async fn request_transport_failures_are_tagged_as_requests() {
	let mapper = Arc::new(RecordingTransportErrorMapper::default());
	let (client, cache) = build_client(FakeHttpClient::DroppedRequests, mapper.clone());
	let err = client.get("/notifications/webhooks").await.expect_err("Dropped call should fail.");

	match &err {
		Error::Transport(TransportError::Network { source }) => {
			assert_eq!(source.to_string(), "Connection reset by peer.");
		},
		other => panic!("Unexpected error variant: {other:?}."),
	}

	assert!(!cache.is_empty(), "Token should stay cached after a transport failure.");
	assert_eq!(mapper.recorded(), vec![(OperationKind::Request, None)]);
}
