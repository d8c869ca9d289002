//! Layout engine: gap padding and bar-row alignment.
//!
//! Both passes are single linear walks that allocate a fresh output and
//! never touch their inputs. Padding trusts the caller's field order;
//! `check_fields` is the opt-in validator for callers that cannot.

pub mod bars;
pub mod error;
pub mod pad;

pub use bars::{bar_rows, normalize_bars, padded_bars};
pub use error::LayoutError;
pub use pad::{check_fields, pad, pad_subfields};
