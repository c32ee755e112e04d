//! Error Types

use thiserror::Error;

/// Result type alias for billing client operations
pub type Result<T> = std::result::Result<T, BillingError>;

/// Billing client error types
#[derive(Error, Debug)]
pub enum BillingError {
    /// Request never reached the billing backend
    #[error("Network error: {0}")]
    Network(String),
    
    /// Backend answered with a non-success status
    #[error("Billing backend returned {status}: {message}")]
    Status { status: u16, message: String },
    
    /// Response body did not match the expected shape
    #[error("Decode error: {0}")]
    Decode(String),
    
    /// No organization is loaded to scope the request
    #[error("No organization available")]
    MissingOrganization,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_message() {
        let err = BillingError::Status { status: 503, message: "Payments not configured".into() };
        assert_eq!(err.to_string(), "Billing backend returned 503: Payments not configured");
    }
}
