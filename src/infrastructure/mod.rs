/// Infrastructure Layer - Technical Implementations
///
/// This layer contains all technical implementations that interact with
/// external systems: network I/O, chain RPC, persistence, telemetry.
///
/// The infrastructure layer depends on the domain layer but the domain
/// layer does not depend on infrastructure (dependency inversion).
///
/// ## Modules
/// - `chain`: Ethereum JSON-RPC provider and ERC-20 calldata encoding
/// - `network`: TCP server and wire codec for the call protocol
/// - `storage`: Subscription state persistence
/// - `observability`: Metrics and health check HTTP endpoints

pub mod chain;
pub mod network;
pub mod observability;
pub mod storage;

// Re-export key types
pub use chain::{ChainError, ChainProvider, HttpChainProvider, Transaction, TransactionRequest};
pub use storage::{PersistedState, StateStore};
