/// Domain Layer - Core Business Logic
///
/// This is the heart of the transfer engine, containing pure business logic
/// with zero external dependencies. The domain layer is framework-agnostic
/// and can be tested in isolation.
///
/// ## Modules
/// - `subscription`: Interval gating for the recurring transfer
/// - `nonce`: Transaction nonce tracking
/// - `validation`: Remote call validation (known method, empty argument list)
///
/// ## Principles
/// 1. **Pure Business Logic**: No I/O, no frameworks, no infrastructure
/// 2. **Framework Independent**: Can be used with any I/O or framework
/// 3. **Testable**: Easy to unit test without mocks

pub mod nonce;
pub mod subscription;
pub mod validation;

// Re-export key types
pub use nonce::NonceTracker;
pub use subscription::SubscriptionState;
pub use validation::{CallValidationError, CallValidator};
