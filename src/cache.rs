//! Token cache contract and the built-in in-memory implementation.
//!
//! The client stores a single bearer token under [`ClientConfig::token_cache_key`]
//! and reads it back until the entry's TTL elapses. Any key/value store with expiring
//! entries can back the contract; [`MemoryCache`] keeps entries in-process.
//!
//! [`ClientConfig::token_cache_key`]: crate::config::ClientConfig::token_cache_key

pub mod memory;

pub use memory::MemoryCache;

// self
use crate::{_prelude::*, auth::AccessToken};

/// Boxed future returned by [`TokenCache`] operations.
pub type CacheFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, CacheError>> + 'a + Send>>;

/// Key/value TTL cache holding bearer tokens.
pub trait TokenCache
where
	Self: Send + Sync,
{
	/// Returns the token stored under `key` unless its TTL has elapsed.
	fn read<'a>(&'a self, key: &'a str) -> CacheFuture<'a, Option<AccessToken>>;

	/// Stores `token` under `key` for `ttl`, replacing any previous entry.
	fn write<'a>(
		&'a self,
		key: &'a str,
		token: AccessToken,
		ttl: Duration,
	) -> CacheFuture<'a, ()>;

	/// Returns `true` when a live entry exists for `key`.
	fn exists<'a>(&'a self, key: &'a str) -> CacheFuture<'a, bool>;

	/// Removes the entry for `key`, returning whether one was present.
	fn delete<'a>(&'a self, key: &'a str) -> CacheFuture<'a, bool>;
}

/// Error type produced by [`TokenCache`] implementations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum CacheError {
	/// Backend-level failure for the cache engine.
	#[error("Backend failure: {message}.")]
	Backend {
		/// Human-readable error payload.
		message: String,
	},
}

#[cfg(test)]
mod tests {
	// std
	use std::error::Error as StdError;
	// self
	use super::*;
	use crate::error::Error;

	#[test]
	fn cache_error_converts_into_client_error_with_source() {
		let cache_error = CacheError::Backend { message: "redis unreachable".into() };
		let client_error: Error = cache_error.clone().into();

		assert!(matches!(client_error, Error::Cache(_)));
		assert!(client_error.to_string().contains("redis unreachable"));

		let source = StdError::source(&client_error)
			.expect("Client error should expose the underlying cache error as its source.");

		assert_eq!(source.to_string(), cache_error.to_string());
	}
}
