//! Payment Error Types

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, PaymentError>;

/// Payment-related errors
#[derive(Error, Debug)]
pub enum PaymentError {
    /// Stripe API error
    #[error("Stripe error: {0}")]
    Stripe(String),
    
    /// Stripe returned an object we could not project
    #[error("Unexpected Stripe payload: {0}")]
    Payload(String),
    
    /// Malformed Stripe id (price, customer)
    #[error("Invalid id: {0}")]
    InvalidId(String),
    
    /// Organization not found
    #[error("Organization not found: {0}")]
    OrganizationNotFound(String),
    
    /// Organization has no Stripe customer yet
    #[error("Organization {0} has no billing customer")]
    NoCustomer(String),
    
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
    
    /// Storage error
    #[error("Storage error: {0}")]
    Storage(String),
}

impl PaymentError {
    /// Get user-friendly message
    pub fn user_message(&self) -> &str {
        match self {
            PaymentError::Stripe(_) => "Payment processing failed. Please try again.",
            PaymentError::InvalidId(_) => "The selected plan is not available.",
            PaymentError::OrganizationNotFound(_) => "Organization not found.",
            PaymentError::NoCustomer(_) => "Your organization has no billing account yet.",
            PaymentError::Config(_) => "Service configuration error.",
            _ => "An error occurred processing your request.",
        }
    }
}

impl From<stripe::StripeError> for PaymentError {
    fn from(err: stripe::StripeError) -> Self {
        PaymentError::Stripe(err.to_string())
    }
}

impl From<serde_json::Error> for PaymentError {
    fn from(err: serde_json::Error) -> Self {
        PaymentError::Payload(err.to_string())
    }
}
