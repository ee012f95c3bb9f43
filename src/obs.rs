//! Optional observability for token resolution and REST calls.
//!
//! [`Client::auth_token`] runs as [`OperationKind::Authenticate`] and [`Client::send`] (with every
//! verb built on it) runs as [`OperationKind::Request`].
//!
//! # Feature Flags
//!
//! - Enable `tracing` to run each operation inside a `paypal_client.operation` span carrying
//!   `operation` and `stage` fields. Debug events report token cache hits, 401 evictions, and
//!   error statuses with their `PayPal-Debug-Id`.
//! - Enable `metrics` to count attempts and terminal outcomes in `paypal_client_operation_total`
//!   (labels `operation`, `outcome`). Failures are also counted in `paypal_client_failure_total`
//!   under a `class` label from [`failure_class`].
//!
//! [`Client::auth_token`]: crate::client::Client::auth_token
//! [`Client::send`]: crate::client::Client::send

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Operations observed by the client.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OperationKind {
	/// Bearer token lookup or client-credentials exchange.
	Authenticate,
	/// Authenticated REST call.
	Request,
}
impl OperationKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			OperationKind::Authenticate => "authenticate",
			OperationKind::Request => "request",
		}
	}
}
impl Display for OperationKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OperationOutcome {
	/// Entry to a client operation.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure propagated back to the caller.
	Failure,
}
impl OperationOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			OperationOutcome::Attempt => "attempt",
			OperationOutcome::Success => "success",
			OperationOutcome::Failure => "failure",
		}
	}

	/// Maps a result onto its terminal outcome.
	pub fn of<T, E>(result: &Result<T, E>) -> Self {
		if result.is_ok() { Self::Success } else { Self::Failure }
	}
}
impl Display for OperationOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Label describing why an operation failed.
///
/// HTTP errors use their [`ApiErrorKind`](crate::error::ApiErrorKind) label, so a rejected
/// credential shows up as `authentication_failure` and throttling as `rate_limit_reached`.
pub fn failure_class(err: &Error) -> &'static str {
	match err {
		Error::Api(e) => e.kind.as_str(),
		Error::Cache(_) => "cache",
		Error::Config(_) => "config",
		Error::Decode(_) => "decode",
		Error::Transport(_) => "transport",
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::error::{ApiError, ConfigError, TransportError};

	#[test]
	fn failure_class_uses_api_kind_for_http_errors() {
		let rejected: Error = ApiError::from_response(401, b"{}").into();
		let throttled: Error = ApiError::from_response(429, b"").into();

		assert_eq!(failure_class(&rejected), "authentication_failure");
		assert_eq!(failure_class(&throttled), "rate_limit_reached");
		assert_eq!(failure_class(&TransportError::Timeout.into()), "transport");
		assert_eq!(failure_class(&ConfigError::MissingExpiresIn.into()), "config");
	}

	#[test]
	fn outcome_of_result() {
		assert_eq!(OperationOutcome::of(&Ok::<_, ()>(1)), OperationOutcome::Success);
		assert_eq!(OperationOutcome::of(&Err::<(), _>(())), OperationOutcome::Failure);
	}
}
