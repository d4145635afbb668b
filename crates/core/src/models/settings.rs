use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

/// Display currency for valuations. All stored prices are USD; MXN is a
/// presentation-time conversion through the live exchange rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Currency {
    Usd,
    Mxn,
}

impl Currency {
    pub fn code(&self) -> &'static str {
        match self {
            Currency::Usd => "USD",
            Currency::Mxn => "MXN",
        }
    }

    /// Parse a currency code, case-insensitively.
    pub fn parse(code: &str) -> Result<Self, CoreError> {
        match code.trim().to_uppercase().as_str() {
            "USD" => Ok(Currency::Usd),
            "MXN" => Ok(Currency::Mxn),
            other => Err(CoreError::Validation(format!(
                "Unsupported currency '{other}': expected USD or MXN"
            ))),
        }
    }

    /// Currency prefix for display ("US$" vs "$").
    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::Usd => "US$",
            Currency::Mxn => "$",
        }
    }
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

impl Default for Currency {
    fn default() -> Self {
        Currency::Mxn
    }
}
