//! Readers and writers for both ISA serializations.
//!
//! # Architecture
//!
//! - **ISA-Tab** ([`isatab`]): two interchangeable readers behind the
//!   [`TabReader`] trait, selected with [`ParserVariant`], and a staging
//!   writer
//! - **ISA JSON** ([`json`]): one document mapped onto the same model
//!
//! # Formats
//!
//! | Format | Read | Write | Notes |
//! |--------|------|-------|-------|
//! | ISA-Tab | ✓ | ✓ | Legacy or fast parser |
//! | ISA JSON | ✓ | ✓ | Keys sorted, pretty or compact |
//!
//! # Examples
//!
//! ```rust,ignore
//! use isaconv::io::{ParserVariant, TabularBundle};
//!
//! let bundle = TabularBundle::open("tests/fixtures/canonical".as_ref())?;
//! let investigation = ParserVariant::Fast.reader().read(&bundle)?;
//! println!("{} studies", investigation.studies.len());
//! ```

pub mod isatab;
pub mod json;
pub mod traits;

// Re-exports for convenience
pub use isatab::TabularBundle;
pub use json::StructuredDocument;
pub use traits::{ParserVariant, TabReader};
