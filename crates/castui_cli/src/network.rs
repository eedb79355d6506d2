use std::fmt;

use serde::Deserialize;
use serde::Serialize;

/// Cluster the generated UI talks to.
#[derive(
	Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Network {
	#[default]
	Devnet,
	Testnet,
	Mainnet,
}

impl Network {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Devnet => "devnet",
			Self::Testnet => "testnet",
			Self::Mainnet => "mainnet",
		}
	}

	/// Public RPC endpoint substituted into rendered pages.
	pub fn rpc_endpoint(self) -> &'static str {
		match self {
			Self::Devnet => "https://api.devnet.solana.com",
			Self::Testnet => "https://api.testnet.solana.com",
			Self::Mainnet => "https://api.mainnet-beta.solana.com",
		}
	}
}

impl fmt::Display for Network {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}
