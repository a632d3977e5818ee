//! Validation for outbound messages and configuration values.

/// Generous cap on a single outbound message; the endpoint is a chat
/// bot, not a file channel.
pub const MAX_MESSAGE_LEN: usize = 8000;

/// Validate a message about to be sent. An empty text is allowed when
/// files are attached (a files-only send).
pub fn validate_outbound(text: &str, has_files: bool) -> Result<(), String> {
    if text.trim().is_empty() && !has_files {
        return Err("Message cannot be empty".to_string());
    }
    if text.len() > MAX_MESSAGE_LEN {
        return Err(format!("Message too long (max {} characters)", MAX_MESSAGE_LEN));
    }
    if text.contains('\0') {
        return Err("Message contains invalid characters".to_string());
    }
    Ok(())
}

/// Validate a chat endpoint base URL.
pub fn validate_api_base(url: &str) -> Result<(), String> {
    let url = url.trim();
    if url.is_empty() {
        return Err("API base URL cannot be empty".to_string());
    }
    let host = url
        .strip_prefix("http://")
        .or_else(|| url.strip_prefix("https://"))
        .ok_or_else(|| "API base URL must start with http:// or https://".to_string())?;
    if host.trim_matches('/').is_empty() {
        return Err("API base URL is missing a host".to_string());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_outbound() {
        assert!(validate_outbound("Hello, world!", false).is_ok());
        assert!(validate_outbound("多行\nメッセージ", false).is_ok());

        assert!(validate_outbound("", false).is_err());
        assert!(validate_outbound("   ", false).is_err());
        assert!(validate_outbound("", true).is_ok()); // files-only send
        assert!(validate_outbound("bad\0byte", false).is_err());
        assert!(validate_outbound(&"x".repeat(MAX_MESSAGE_LEN + 1), false).is_err());
    }

    #[test]
    fn test_validate_api_base() {
        assert!(validate_api_base("http://localhost:8000").is_ok());
        assert!(validate_api_base("https://bot.example.com/").is_ok());

        assert!(validate_api_base("").is_err());
        assert!(validate_api_base("localhost:8000").is_err());
        assert!(validate_api_base("ftp://example.com").is_err());
        assert!(validate_api_base("https://").is_err());
    }
}
