/// Chain Access - Ethereum JSON-RPC
///
/// Everything that talks to the chain lives here:
/// - `provider`: the `ChainProvider` trait and its HTTP JSON-RPC
///   implementation
/// - `erc20`: calldata encoding for the two ERC-20 transfer entry points
///
/// Transaction signing is delegated to the node account (`eth_sendTransaction`),
/// the engine never holds key material.

pub mod erc20;
pub mod provider;

pub use provider::{
    ChainError, ChainProvider, HttpChainProvider, Transaction, TransactionRequest,
};
