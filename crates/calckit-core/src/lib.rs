pub mod error;
pub mod locale;
pub mod time_value;
pub mod types;

#[cfg(feature = "loan")]
pub mod loan;

#[cfg(feature = "savings")]
pub mod savings;

#[cfg(feature = "housing")]
pub mod housing;

#[cfg(feature = "payroll")]
pub mod payroll;

#[cfg(feature = "percent")]
pub mod percent;

#[cfg(feature = "units")]
pub mod units;

#[cfg(feature = "dates")]
pub mod dates;

#[cfg(feature = "health")]
pub mod health;

pub use error::{CalcError, ErrorKind, ErrorReport};
pub use locale::{Jurisdiction, Locale};
pub use types::*;

/// Standard result type for all calculator operations
pub type CalcResult<T> = Result<T, CalcError>;
