// self
use crate::_prelude::*;

/// PayPal deployment a client talks to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Environment {
	#[default]
	/// Sandbox environment for development and testing.
	Sandbox,
	/// Production environment.
	Live,
}
impl Environment {
	/// Sandbox API root.
	pub const SANDBOX_URL: &'static str = "https://api.sandbox.paypal.com";
	/// Production API root.
	pub const LIVE_URL: &'static str = "https://api.paypal.com";

	/// Returns the API root for the environment.
	pub const fn base_url(self) -> &'static str {
		match self {
			Self::Sandbox => Self::SANDBOX_URL,
			Self::Live => Self::LIVE_URL,
		}
	}

	/// Maps a sandbox flag onto an environment.
	pub const fn from_sandbox(sandbox: bool) -> Self {
		if sandbox { Self::Sandbox } else { Self::Live }
	}

	/// Returns a stable label.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Sandbox => "sandbox",
			Self::Live => "live",
		}
	}
}
impl Display for Environment {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
