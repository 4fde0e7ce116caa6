//! Precision configuration of the Jacobi family.
//!
//! The configuration is passed explicitly to every Jacobi basis. The
//! extended path is only available with the `xprec` feature; without it,
//! [`Precision::resolve`] falls back to standard precision.
use log::{debug, warn};

/// Whether the crate was built with an extended precision backend
pub const EXTENDED_PRECISION_AVAILABLE: bool = cfg!(feature = "xprec");

/// Significant decimal digits of `f64`
pub const STANDARD_DIGITS: u32 = 15;

/// Significant decimal digits of the double-double backend
pub const EXTENDED_DIGITS: u32 = 31;

/// Environment variable read by [`JacobiConfig::from_env`]
pub const PRECISION_ENV: &str = "FUNSPACE_JACOBI_MODE";

/// Arithmetic used to compute quadrature and basis values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Precision {
    /// Plain `f64`
    Standard,
    /// Double-double arithmetic, truncated to `f64` for storage
    Extended,
}

impl Precision {
    /// Precision which is actually used
    pub fn resolve(self) -> Self {
        match self {
            Precision::Extended if !EXTENDED_PRECISION_AVAILABLE => {
                debug!("extended precision unavailable, using standard precision");
                Precision::Standard
            }
            p => p,
        }
    }

    /// Parse a mode name, `numpy`/`standard` or `mpmath`/`extended`
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "numpy" | "standard" => Some(Precision::Standard),
            "mpmath" | "extended" => Some(Precision::Extended),
            _ => None,
        }
    }
}

impl Default for Precision {
    fn default() -> Self {
        Precision::Standard
    }
}

/// Configuration of the Jacobi family evaluator
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JacobiConfig {
    /// Requested arithmetic
    pub precision: Precision,
    /// Requested significant digits
    pub significant_digits: u32,
}

impl Default for JacobiConfig {
    fn default() -> Self {
        Self {
            precision: Precision::Standard,
            significant_digits: STANDARD_DIGITS,
        }
    }
}

impl JacobiConfig {
    /// Standard precision configuration
    pub fn standard() -> Self {
        Self::default()
    }

    /// Configuration from a number of significant digits.
    ///
    /// More than 15 digits selects extended precision. The double-double
    /// backend carries about 31 digits, larger requests are capped.
    pub fn with_digits(significant_digits: u32) -> Self {
        let precision = if significant_digits > STANDARD_DIGITS {
            Precision::Extended
        } else {
            Precision::Standard
        };
        if significant_digits > EXTENDED_DIGITS {
            warn!(
                "{} significant digits requested, extended precision provides {}",
                significant_digits, EXTENDED_DIGITS
            );
        }
        Self {
            precision,
            significant_digits: significant_digits.min(EXTENDED_DIGITS),
        }
    }

    /// Read the mode from `FUNSPACE_JACOBI_MODE`, default is standard
    pub fn from_env() -> Self {
        match std::env::var(PRECISION_ENV) {
            Ok(name) => match Precision::from_name(&name) {
                Some(Precision::Extended) => Self::with_digits(30),
                Some(Precision::Standard) => Self::standard(),
                None => {
                    warn!("unknown {} value {:?}, using standard", PRECISION_ENV, name);
                    Self::standard()
                }
            },
            Err(_) => Self::standard(),
        }
    }

    /// Precision that will be used after the capability check
    pub fn effective_precision(&self) -> Precision {
        self.precision.resolve()
    }

    /// True if the extended precision path is active
    pub fn is_extended(&self) -> bool {
        self.effective_precision() == Precision::Extended
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_precision_from_digits() {
        assert_eq!(JacobiConfig::with_digits(15).precision, Precision::Standard);
        assert_eq!(JacobiConfig::with_digits(30).precision, Precision::Extended);
        assert_eq!(JacobiConfig::with_digits(50).significant_digits, EXTENDED_DIGITS);
    }

    #[test]
    fn test_precision_names() {
        assert_eq!(Precision::from_name("numpy"), Some(Precision::Standard));
        assert_eq!(Precision::from_name(" MPMATH "), Some(Precision::Extended));
        assert_eq!(Precision::from_name("sympy"), None);
    }

    #[test]
    fn test_resolve_matches_capability() {
        let p = Precision::Extended.resolve();
        if EXTENDED_PRECISION_AVAILABLE {
            assert_eq!(p, Precision::Extended);
        } else {
            assert_eq!(p, Precision::Standard);
        }
        assert_eq!(Precision::Standard.resolve(), Precision::Standard);
    }
}
