use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("Invalid workspace id: {0}")]
    InvalidWorkspaceId(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),
}

pub type Result<T> = std::result::Result<T, DbError>;

/// Validate a Clockify workspace id before it is used as a key
pub fn validate_workspace_id(workspace_id: &str) -> Result<()> {
    if workspace_id.is_empty() {
        return Err(DbError::InvalidWorkspaceId(
            "workspace id cannot be empty".to_string(),
        ));
    }

    if workspace_id.len() > 255 {
        return Err(DbError::InvalidWorkspaceId(
            "workspace id cannot exceed 255 characters".to_string(),
        ));
    }

    if workspace_id
        .chars()
        .any(|c| c.is_whitespace() || c.is_control())
    {
        return Err(DbError::InvalidWorkspaceId(
            "workspace id cannot contain whitespace or control characters".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_workspace_id() {
        // Valid ids
        assert!(validate_workspace_id("5f1a2b3c4d5e6f7a8b9c0d1e").is_ok());
        assert!(validate_workspace_id("ws-1").is_ok());
        assert!(validate_workspace_id("a").is_ok());

        // Invalid ids
        assert!(validate_workspace_id("").is_err());
        assert!(validate_workspace_id("my ws").is_err());
        assert!(validate_workspace_id("ws\n").is_err());
        assert!(validate_workspace_id("ws\u{0}").is_err());
        assert!(validate_workspace_id(&"a".repeat(256)).is_err());
    }
}
