//! Bearer token issued by the client-credentials grant.

// self
use crate::{_prelude::*, auth::Secret};

/// Access token plus the lifetime the provider granted it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessToken {
	/// Bearer value; callers must avoid logging it.
	pub token: Secret,
	/// Scopes reported by the token endpoint.
	pub scopes: Vec<String>,
	/// Instant the token response was received.
	pub issued_at: OffsetDateTime,
	/// `issued_at` plus `expires_in`.
	pub expires_at: OffsetDateTime,
}
impl AccessToken {
	/// Creates a token that expires `expires_in` after `issued_at`.
	pub fn new(token: impl Into<String>, issued_at: OffsetDateTime, expires_in: Duration) -> Self {
		Self {
			token: Secret::new(token),
			scopes: Vec::new(),
			issued_at,
			expires_at: issued_at + expires_in,
		}
	}

	/// Attaches the scopes granted with the token.
	pub fn with_scopes<I, S>(mut self, scopes: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.scopes = scopes.into_iter().map(Into::into).collect();

		self
	}

	/// Returns the raw token value.
	pub fn secret(&self) -> &str {
		self.token.expose()
	}

	/// Formats the `Authorization` header value.
	pub fn bearer(&self) -> String {
		format!("Bearer {}", self.token.expose())
	}

	/// Lifetime granted by the provider.
	pub fn lifetime(&self) -> Duration {
		self.expires_at - self.issued_at
	}

	/// Returns `true` once `instant` reaches the expiry.
	pub fn is_expired_at(&self, instant: OffsetDateTime) -> bool {
		instant >= self.expires_at
	}

	/// How long the token may be cached once `margin` is held back.
	///
	/// A zero or negative result means the token should not be cached at all.
	pub fn cache_ttl(&self, margin: Duration) -> Duration {
		self.lifetime() - margin
	}
}
