//! Redacting wrapper shared by the client secret and issued bearer tokens.

// self
use crate::_prelude::*;

/// PayPal credential material: the app's client secret or an issued access token.
///
/// `Debug` and `Display` print `<redacted>`, so a [`ClientConfig`] or [`AccessToken`] can be
/// logged whole. Serialization is transparent, which lets custom [`TokenCache`] backends
/// persist tokens as plain strings.
///
/// [`ClientConfig`]: crate::config::ClientConfig
/// [`AccessToken`]: crate::auth::AccessToken
/// [`TokenCache`]: crate::cache::TokenCache
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Secret(String);
impl Secret {
	/// Wraps a client secret or access token.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Returns the raw value for the `Authorization` header. Never log it.
	pub fn expose(&self) -> &str {
		&self.0
	}

	/// Returns `true` when the value is empty or only whitespace.
	pub fn is_blank(&self) -> bool {
		self.0.trim().is_empty()
	}
}
impl AsRef<str> for Secret {
	fn as_ref(&self) -> &str {
		self.expose()
	}
}
impl Debug for Secret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("Secret").field(&"<redacted>").finish()
	}
}
impl Display for Secret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}
