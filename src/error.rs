use std::{
    error::Error,
    fmt::{self, Display},
};

/// The result type used in the entire crate.
pub type Result<T> = std::result::Result<T, RbmErr>;

/// The crate's error type.
#[derive(Debug)]
pub enum RbmErr {
    /// A vector's length disagrees with the layer it is meant for.
    SizeMismatch {
        a: &'static str,
        b: &'static str,
        got: usize,
        expected: usize,
    },
    /// The standard deviation for the weight initialization is negative or not finite.
    InvalidStdDev(f64),
    /// The estimator configuration could not be parsed.
    InvalidConfig(String),
}

impl RbmErr {
    /// Checks that `got` equals `expected`, returning a `SizeMismatch` otherwise.
    ///
    /// # Arguments
    /// * `a` - What is being checked.
    /// * `b` - What it is being checked against.
    /// * `got` - The observed length.
    /// * `expected` - The required length.
    pub(crate) fn check_size(
        a: &'static str,
        b: &'static str,
        got: usize,
        expected: usize,
    ) -> Result<()> {
        if got != expected {
            return Err(RbmErr::SizeMismatch {
                a,
                b,
                got,
                expected,
            });
        }

        Ok(())
    }
}

impl Display for RbmErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RbmErr::SizeMismatch {
                a,
                b,
                got,
                expected,
            } => write!(
                f,
                "There's a size mismatch between {a} and {b}, got {got} and expected {expected}"
            ),
            RbmErr::InvalidStdDev(std_dev) => write!(
                f,
                "The standard deviation must be finite and non negative, got {std_dev}"
            ),
            RbmErr::InvalidConfig(msg) => write!(f, "invalid config: {msg}"),
        }
    }
}

impl Error for RbmErr {}

impl From<serde_json::Error> for RbmErr {
    fn from(value: serde_json::Error) -> Self {
        Self::InvalidConfig(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_size_accepts_equal_lengths() {
        assert!(RbmErr::check_size("batch example", "visible layer", 3, 3).is_ok());
    }

    #[test]
    fn check_size_reports_both_lengths() {
        let err = RbmErr::check_size("batch example", "visible layer", 2, 3).unwrap_err();

        assert!(matches!(
            err,
            RbmErr::SizeMismatch {
                got: 2,
                expected: 3,
                ..
            }
        ));
        assert_eq!(
            err.to_string(),
            "There's a size mismatch between batch example and visible layer, got 2 and expected 3"
        );
    }
}
