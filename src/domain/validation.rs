/// Call Validator - Remote Call Validation
///
/// This module provides validation logic for incoming remote calls to ensure
/// they match the published interface before being dispatched to the engine.
///
/// ## Validation Rules
/// - The method name must be one of the published methods
/// - The argument list must be empty (every published method takes zero
///   arguments; anything else is rejected at this layer, before any chain
///   or state access)
///
/// ## Usage
/// ```rust
/// use transfer_engine::domain::validation::CallValidator;
/// use transfer_engine::shared::protocol::{CallRequest, Method};
///
/// let validator = CallValidator::new();
/// let request = CallRequest::new(Method::TransferUsdcPeriodically);
/// match validator.validate(&request) {
///     Ok(method) => println!("Dispatching {}", method.name()),
///     Err(e) => println!("Validation error: {}", e),
/// }
/// ```

use crate::shared::protocol::{CallRequest, Method};

/// Validation errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallValidationError {
    /// Method name is not part of the published interface
    UnknownMethod(String),

    /// The method takes no arguments but some were supplied
    UnexpectedArguments { method: String, count: usize },
}

impl std::fmt::Display for CallValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CallValidationError::UnknownMethod(name) => {
                write!(f, "Unknown method: {}", name)
            }
            CallValidationError::UnexpectedArguments { method, count } => {
                write!(
                    f,
                    "Method '{}' takes no arguments, got {}",
                    method, count
                )
            }
        }
    }
}

impl std::error::Error for CallValidationError {}

/// Call validator
///
/// Validates call requests against the published zero-argument interface.
#[derive(Debug, Clone, Copy, Default)]
pub struct CallValidator;

impl CallValidator {
    /// Creates a new validator
    pub fn new() -> Self {
        Self
    }

    /// Validates a call request
    ///
    /// # Returns
    /// * `Ok(Method)` with the resolved method if the call is valid
    /// * `Err(CallValidationError)` if validation fails
    pub fn validate(&self, request: &CallRequest) -> Result<Method, CallValidationError> {
        let method = Method::from_name(&request.method)
            .ok_or_else(|| CallValidationError::UnknownMethod(request.method.clone()))?;

        if !request.args.is_empty() {
            return Err(CallValidationError::UnexpectedArguments {
                method: request.method.clone(),
                count: request.args.len(),
            });
        }

        Ok(method)
    }
}
