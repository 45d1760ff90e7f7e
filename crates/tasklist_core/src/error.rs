use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AppError {
    #[error("invalid_input - {0}")]
    InvalidInput(String),
    #[error("invalid_data - {0}")]
    InvalidData(String),
    #[error("connectivity - {0}")]
    Connectivity(String),
    #[error("operation_failed - {0}")]
    OperationFailed(String),
    #[error("io_error - {0}")]
    Io(String),
}

impl AppError {
    pub fn invalid_input<M: Into<String>>(message: M) -> Self {
        Self::InvalidInput(message.into())
    }

    pub fn invalid_data<M: Into<String>>(message: M) -> Self {
        Self::InvalidData(message.into())
    }

    pub fn connectivity<M: Into<String>>(message: M) -> Self {
        Self::Connectivity(message.into())
    }

    pub fn operation_failed<M: Into<String>>(message: M) -> Self {
        Self::OperationFailed(message.into())
    }

    pub fn io<M: Into<String>>(message: M) -> Self {
        Self::Io(message.into())
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "invalid_input",
            Self::InvalidData(_) => "invalid_data",
            Self::Connectivity(_) => "connectivity",
            Self::OperationFailed(_) => "operation_failed",
            Self::Io(_) => "io_error",
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::InvalidInput(message)
            | Self::InvalidData(message)
            | Self::Connectivity(message)
            | Self::OperationFailed(message)
            | Self::Io(message) => message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::AppError;

    #[test]
    fn display_renders_code_and_message() {
        let err = AppError::operation_failed("server returned 500");
        assert_eq!(err.to_string(), "operation_failed - server returned 500");
    }

    #[test]
    fn message_excludes_code() {
        let err = AppError::connectivity("connection refused");
        assert_eq!(err.code(), "connectivity");
        assert_eq!(err.message(), "connection refused");
    }
}
