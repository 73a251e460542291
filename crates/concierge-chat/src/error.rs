//! Error types for the conversational interface.
//!
//! The assistant itself degrades instead of failing; these errors cover
//! input validation at the boundary where callers hand messages in.

/// Errors from validating chat input.
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("message exceeds maximum length of {0} characters")]
    MessageTooLong(usize),
    #[error("invalid sender: {0}")]
    InvalidSender(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_error_display() {
        let err = ChatError::MessageTooLong(2000);
        assert_eq!(
            err.to_string(),
            "message exceeds maximum length of 2000 characters"
        );

        let err = ChatError::InvalidSender("assistant".to_string());
        assert_eq!(err.to_string(), "invalid sender: assistant");
    }

    #[test]
    fn test_message_too_long_boundary_zero() {
        let err = ChatError::MessageTooLong(0);
        assert_eq!(
            err.to_string(),
            "message exceeds maximum length of 0 characters"
        );
    }

    #[test]
    fn test_errors_implement_debug() {
        let dbg = format!("{:?}", ChatError::MessageTooLong(1));
        assert!(dbg.contains("MessageTooLong"));
        let dbg = format!("{:?}", ChatError::InvalidSender(String::new()));
        assert!(dbg.contains("InvalidSender"));
    }
}
