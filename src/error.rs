pub type GazeResult<T> = Result<T, GazeError>;

#[derive(thiserror::Error, Debug)]
pub enum GazeError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("no eligible trials found in the experiment log")]
    NoTrials,

    #[error("gaze payload error: {0}")]
    Payload(String),

    #[error("encode error: {0}")]
    Encode(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl GazeError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn payload(msg: impl Into<String>) -> Self {
        Self::Payload(msg.into())
    }

    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_prefixes_are_stable() {
        assert!(
            GazeError::validation("x")
                .to_string()
                .contains("validation error:")
        );
        assert!(
            GazeError::payload("x")
                .to_string()
                .contains("gaze payload error:")
        );
        assert!(GazeError::encode("x").to_string().contains("encode error:"));
        assert!(GazeError::NoTrials.to_string().contains("no eligible trials"));
    }

    #[test]
    fn other_preserves_source() {
        let base = std::io::Error::other("boom");
        let err = GazeError::Other(anyhow::Error::new(base));
        assert!(err.to_string().contains("boom"));
    }
}
