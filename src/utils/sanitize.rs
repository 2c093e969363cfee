//! Utilities for sanitizing error messages.
//!
//! Failure log entries keep the text of the last error seen for an item.
//! Control characters are stripped and very long messages (e.g. an HTML
//! error page echoed into an error) are truncated.

use crate::config::MAX_ERROR_MESSAGE_LENGTH;

/// Removes control characters other than newline, tab and carriage return.
pub fn sanitize_error_message(message: &str) -> String {
    message
        .chars()
        .filter(|c| !c.is_control() || matches!(c, '\n' | '\t' | '\r'))
        .collect()
}

/// Sanitizes a message and truncates it to `MAX_ERROR_MESSAGE_LENGTH` characters.
pub fn sanitize_and_truncate_error_message(message: &str) -> String {
    let sanitized = sanitize_error_message(message);
    let length = sanitized.chars().count();

    if length > MAX_ERROR_MESSAGE_LENGTH {
        let keep = MAX_ERROR_MESSAGE_LENGTH.saturating_sub(50);
        let head: String = sanitized.chars().take(keep).collect();
        format!("{}... (truncated, original length: {} chars)", head, length)
    } else {
        sanitized
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_error_message_removes_control_chars() {
        let input = "Error\x00message\x01with\x02control\x03chars";
        assert_eq!(sanitize_error_message(input), "Errormessagewithcontrolchars");
    }

    #[test]
    fn test_sanitize_error_message_preserves_whitespace_and_unicode() {
        let input = "HTTP 503\tfrom\nserver: 测试";
        assert_eq!(sanitize_error_message(input), input);
    }

    #[test]
    fn test_truncate_long_message() {
        let input = "é".repeat(MAX_ERROR_MESSAGE_LENGTH + 10);
        let output = sanitize_and_truncate_error_message(&input);
        assert!(output.contains("truncated"));
        assert!(output.contains(&format!("{}", MAX_ERROR_MESSAGE_LENGTH + 10)));
        assert!(output.chars().count() < MAX_ERROR_MESSAGE_LENGTH + 10);
    }

    #[test]
    fn test_short_message_unchanged() {
        assert_eq!(sanitize_and_truncate_error_message("boom"), "boom");
    }
}
