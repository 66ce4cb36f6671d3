//! Error types for rendering.
//!
//! Two layers of failure exist:
//!
//! - [`Error`]: failures at the API boundary (a null root handed to
//!   [`to_string_checked`](crate::to_string_checked), a writer that fails,
//!   a `Serialize` impl that reports an error). These are returned to the
//!   caller.
//! - [`FieldError`]: failures while reading one property or one sequence
//!   item. These never leave the renderer; they are rendered inline as
//!   `<Error: message>`.
//!
//! ## Examples
//!
//! ```rust
//! use propstring::{to_string_checked, Error, RenderOptions};
//!
//! let missing: Option<u32> = None;
//! let result = to_string_checked(&missing, RenderOptions::default());
//! assert!(matches!(result, Err(Error::InvalidArgument { .. })));
//! ```

use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use thiserror::Error;

/// Failures surfaced to the caller of the rendering API.
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// An argument was rejected before rendering started
    #[error("Invalid argument `{name}`: {reason}")]
    InvalidArgument { name: &'static str, reason: String },

    /// IO error while writing rendered output
    #[error("IO error: {0}")]
    Io(String),

    /// Custom error
    #[error("Error: {0}")]
    Custom(String),
}

impl Error {
    /// Creates an invalid-argument error for the named parameter.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use propstring::Error;
    ///
    /// let err = Error::invalid_argument("value", "root value is null");
    /// assert!(err.to_string().contains("`value`"));
    /// ```
    pub fn invalid_argument(name: &'static str, reason: &str) -> Self {
        Error::InvalidArgument {
            name,
            reason: reason.to_string(),
        }
    }

    /// Creates a custom error with a display message.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use propstring::Error;
    ///
    /// let err = Error::custom("something went wrong");
    /// assert!(err.to_string().contains("something went wrong"));
    /// ```
    pub fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }

    /// Creates an I/O error for writer failures.
    pub fn io(msg: &str) -> Self {
        Error::Io(msg.to_string())
    }
}

impl serde::ser::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// A failure confined to one property or one sequence item.
///
/// The renderer turns every `FieldError` into an inline `<Error: message>`
/// marker and carries on with the sibling values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    /// The getter reported an error
    #[error("{0}")]
    Failed(String),

    /// User code panicked while producing the value
    #[error("panicked: {0}")]
    Panicked(String),

    /// The underlying sequence cannot be iterated any further
    #[error("{0}")]
    SequenceBroken(String),
}

impl FieldError {
    /// Creates an error for a getter that failed.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use propstring::FieldError;
    ///
    /// let err = FieldError::failed("disk offline");
    /// assert_eq!(err.to_string(), "disk offline");
    /// ```
    pub fn failed<T: fmt::Display>(msg: T) -> Self {
        FieldError::Failed(msg.to_string())
    }

    /// Creates an error that also stops iteration of the enclosing sequence.
    pub fn broken<T: fmt::Display>(msg: T) -> Self {
        FieldError::SequenceBroken(msg.to_string())
    }

    /// Returns `true` if no further items can be read after this error.
    #[inline]
    #[must_use]
    pub const fn ends_sequence(&self) -> bool {
        matches!(self, FieldError::SequenceBroken(_))
    }

    pub(crate) fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "unknown panic payload".to_string()
        };
        FieldError::Panicked(message)
    }
}

/// Runs user code, turning a panic into a [`FieldError::Panicked`].
pub(crate) fn guarded<R>(f: impl FnOnce() -> R) -> std::result::Result<R, FieldError> {
    panic::catch_unwind(AssertUnwindSafe(f)).map_err(FieldError::from_panic)
}
