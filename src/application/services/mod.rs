/// Application Services
///
/// Services coordinate domain logic to implement application workflows.
///
/// ## Available Services
/// - `TransferService`: the engine event loop; receives commands over an
///   mpsc channel and answers each one through a oneshot reply channel

pub mod transfer_service;

pub use transfer_service::{EngineCommand, TransferService};
