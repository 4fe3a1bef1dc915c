//! ISA-Tab: the tabular, directory-based serialization.
//!
//! # Layout
//!
//! | File | Content |
//! |------|---------|
//! | `i_*.txt` | Investigation file: labelled rows grouped in sections |
//! | `s_*.txt` | Study table: sources, samples and the processes between them |
//! | `a_*.txt` | Assay table: study samples through extracts to data files |
//!
//! Both readers ([`LegacyReader`] and [`FastReader`]) share the header
//! grammar in [`columns`] and the row semantics in [`assembler`]; they differ
//! only in how files are loaded and headers classified.

pub mod assembler;
pub mod bundle;
pub mod columns;
pub mod fast;
pub mod investigation;
pub mod labels;
pub mod layout;
pub mod legacy;
pub mod records;
pub mod writer;

pub use bundle::TabularBundle;
pub use fast::FastReader;
pub use legacy::LegacyReader;
pub use writer::{render_bundle, write_bundle};
