/// Use Cases - High-level business operations
///
/// Each use case represents a specific business operation that the
/// application can perform. Use cases orchestrate domain entities and
/// services to achieve application goals.
///
/// ## Available Use Cases
/// - `ExecuteTransferUseCase`: performs one on-chain USDC transfer
/// - `PeriodicTransferUseCase`: interval gate around the transfer

pub mod execute_transfer;
pub mod periodic_transfer;

// Re-export key types
pub use execute_transfer::{ExecuteTransferUseCase, TransferConfig};
pub use periodic_transfer::PeriodicTransferUseCase;
