use thiserror::Error;

/// Top-level error type for the SheetBot bridge.
#[derive(Debug, Error)]
pub enum BotError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("sheets API error ({status}): {message}")]
    Sheets { status: u16, message: String },

    #[error("sheets authentication failed: {0}")]
    SheetsAuth(String),

    #[error("WhatsApp API error ({status}): {message}")]
    WhatsApp { status: u16, message: String },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("malformed data: {0}")]
    Malformed(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type BotResult<T> = Result<T, BotError>;

impl BotError {
    /// True when the failure came from a remote API rejecting the call
    /// rather than from our side of the wire.
    pub fn is_upstream(&self) -> bool {
        matches!(self, BotError::Sheets { .. } | BotError::WhatsApp { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_status() {
        let err = BotError::Sheets {
            status: 404,
            message: "Requested entity was not found.".into(),
        };
        assert_eq!(
            err.to_string(),
            "sheets API error (404): Requested entity was not found."
        );
        assert!(err.is_upstream());
        assert!(!BotError::Transport("reset".into()).is_upstream());
    }
}
