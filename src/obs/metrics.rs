// self
use crate::{
	_prelude::*,
	obs::{OperationKind, OperationOutcome},
};

/// Records an operation outcome via the global metrics recorder (when enabled).
pub fn record_operation_outcome(kind: OperationKind, outcome: OperationOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"paypal_client_operation_total",
			"operation" => kind.as_str(),
			"outcome" => outcome.as_str()
		)
		.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (kind, outcome);
	}
}

/// Records the terminal outcome of `result` and, for failures, its [`failure_class`].
///
/// [`failure_class`]: crate::obs::failure_class
pub fn record_operation_result<T>(kind: OperationKind, result: &Result<T>) {
	record_operation_outcome(kind, OperationOutcome::of(result));

	#[cfg(feature = "metrics")]
	{
		if let Err(e) = result {
			metrics::counter!(
				"paypal_client_failure_total",
				"operation" => kind.as_str(),
				"class" => crate::obs::failure_class(e)
			)
			.increment(1);
		}
	}
}
