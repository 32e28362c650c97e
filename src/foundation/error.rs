/// Convenience result type used across blitline.
pub type BlitResult<T> = Result<T, BlitError>;

/// Error taxonomy for the fallible edges of the engine.
///
/// Blit and fill operations never return errors: invalid or degenerate input makes them no-ops.
/// Errors only surface from buffer allocation, image IO and job loading.
#[derive(thiserror::Error, Debug)]
pub enum BlitError {
    /// Invalid user-provided job or parameter data.
    #[error("validation error: {0}")]
    Validation(String),

    /// A bitmap buffer could not be (re)allocated for the requested extent.
    #[error("allocation error: cannot allocate {width}x{height} bitmap")]
    Allocation {
        /// Requested width in pixels.
        width: u32,
        /// Requested height in pixels.
        height: u32,
    },

    /// Reading or writing an image file failed.
    #[error("io error: {0}")]
    Io(String),

    /// Wrapped lower-level error from dependencies.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl BlitError {
    /// Build a [`BlitError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`BlitError::Allocation`] value.
    pub fn allocation(width: u32, height: u32) -> Self {
        Self::Allocation { width, height }
    }

    /// Build a [`BlitError::Io`] value.
    pub fn io(msg: impl Into<String>) -> Self {
        Self::Io(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
