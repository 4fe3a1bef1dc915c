//! Command handlers module.
//!
//! - `convert.rs`: `isatab2json` and `json2isatab`
//! - `validate.rs`: `validate`

mod convert;
mod validate;

pub use convert::{cmd_isatab2json, cmd_json2isatab};
pub use validate::{ReportFormat, cmd_validate};
