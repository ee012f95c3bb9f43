//! Thread-safe in-memory [`TokenCache`] implementation.

// self
use crate::{
	_prelude::*,
	auth::AccessToken,
	cache::{CacheError, CacheFuture, TokenCache},
};

type EntryMap = Arc<RwLock<HashMap<String, Entry>>>;

#[derive(Clone, Debug)]
struct Entry {
	token: AccessToken,
	expires_at: OffsetDateTime,
}
impl Entry {
	fn is_live(&self, now: OffsetDateTime) -> bool {
		now < self.expires_at
	}
}

/// Process-local cache; expired entries are dropped lazily on access.
#[derive(Clone, Debug, Default)]
pub struct MemoryCache(EntryMap);
impl MemoryCache {
	/// Removes every entry.
	pub fn clear(&self) {
		self.0.write().clear();
	}

	/// Number of live entries.
	pub fn len(&self) -> usize {
		let now = OffsetDateTime::now_utc();

		self.0.read().values().filter(|entry| entry.is_live(now)).count()
	}

	/// Returns `true` when no live entry remains.
	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	fn read_now(map: &EntryMap, key: &str, now: OffsetDateTime) -> Option<AccessToken> {
		let expired = match map.read().get(key) {
			Some(entry) if entry.is_live(now) => return Some(entry.token.clone()),
			Some(_) => true,
			None => false,
		};

		if expired {
			Self::evict_if_expired(map, key, now);
		}

		None
	}

	fn write_now(map: &EntryMap, key: &str, token: AccessToken, ttl: Duration) {
		let mut guard = map.write();

		if ttl.is_positive() {
			let expires_at = OffsetDateTime::now_utc() + ttl;

			guard.insert(key.to_owned(), Entry { token, expires_at });
		} else {
			guard.remove(key);
		}
	}

	fn evict_if_expired(map: &EntryMap, key: &str, now: OffsetDateTime) {
		let mut guard = map.write();

		if guard.get(key).is_some_and(|entry| !entry.is_live(now)) {
			guard.remove(key);
		}
	}
}
impl TokenCache for MemoryCache {
	fn read<'a>(&'a self, key: &'a str) -> CacheFuture<'a, Option<AccessToken>> {
		Box::pin(async move { Ok(Self::read_now(&self.0, key, OffsetDateTime::now_utc())) })
	}

	fn write<'a>(
		&'a self,
		key: &'a str,
		token: AccessToken,
		ttl: Duration,
	) -> CacheFuture<'a, ()> {
		Box::pin(async move {
			Self::write_now(&self.0, key, token, ttl);

			Ok::<_, CacheError>(())
		})
	}

	fn exists<'a>(&'a self, key: &'a str) -> CacheFuture<'a, bool> {
		Box::pin(async move {
			Ok(Self::read_now(&self.0, key, OffsetDateTime::now_utc()).is_some())
		})
	}

	fn delete<'a>(&'a self, key: &'a str) -> CacheFuture<'a, bool> {
		Box::pin(async move { Ok(self.0.write().remove(key).is_some()) })
	}
}
