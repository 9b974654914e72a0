//! Errors raised by the linear-algebra routines.

use std::error::Error;
use std::fmt;

use pricer_pool::AllocError;

/// Errors from building or solving a linear system.
///
/// Numeric faults such as a zero pivot are not errors: they surface as
/// `inf` or `NaN` in the result.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LinalgError {
    /// A band or right-hand side does not match the system length.
    LengthMismatch {
        /// Which input was the wrong length.
        input: &'static str,
        /// Length taken from the main diagonal.
        expected: usize,
        /// Length of the offending input.
        actual: usize,
    },
    /// The system has no unknowns.
    EmptySystem,
    /// Working or result storage could not be allocated.
    Allocation(AllocError),
}

impl fmt::Display for LinalgError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LengthMismatch {
                input,
                expected,
                actual,
            } => write!(
                f,
                "{input} has length {actual}, expected {expected} to match the diagonal"
            ),
            Self::EmptySystem => write!(f, "system has no unknowns"),
            Self::Allocation(err) => write!(f, "allocation failed: {err}"),
        }
    }
}

impl Error for LinalgError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Allocation(err) => Some(err),
            _ => None,
        }
    }
}

impl From<AllocError> for LinalgError {
    fn from(err: AllocError) -> Self {
        Self::Allocation(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_input() {
        let e = LinalgError::LengthMismatch {
            input: "upper",
            expected: 4,
            actual: 3,
        };
        assert_eq!(
            e.to_string(),
            "upper has length 3, expected 4 to match the diagonal"
        );
    }

    #[test]
    fn allocation_errors_chain() {
        let inner = AllocError::Exhausted {
            requested_blocks: 2,
            free_blocks: 1,
        };
        let e = LinalgError::from(inner.clone());
        assert_eq!(e, LinalgError::Allocation(inner));
        assert!(e.source().is_some());
        assert!(LinalgError::EmptySystem.source().is_none());
    }
}
