//! # xrb-core
//!
//! Core library for handling data produced by Kepler X-ray burst models.
//!
//! This crate provides the foundational components for text-file-backed
//! data management: a schema-fixed key/value container and a bidirectional
//! template engine that renders structured data into text and can read a
//! rendered file back to recover the data.
//!
//! ## Features
//!
//! - Schema-fixed containers with per-field descriptions ([`DefinedMap`])
//! - Bidirectional templates: render data to text and parse it back
//! - Line-scoped substitution descriptors with regex patterns
//! - File-backed reading and writing ([`TemplateFile`])
//!
//! ## Example
//!
//! ```
//! use xrb_core::Template;
//!
//! let mut template = Template::new("{name:[A-Za-z]+} = {val:[0-9]+}")?;
//! template.set_field("name", "x")?;
//! template.set_field("val", "5")?;
//! assert_eq!(template.render()?, "x = 5");
//!
//! let mut recovered = Template::new("{name:[A-Za-z]+} = {val:[0-9]+}")?;
//! recovered.parse_reader("x = 5".as_bytes())?;
//! assert_eq!(recovered.get_field("val")?, Some("5"));
//! # Ok::<(), xrb_core::XrbError>(())
//! ```

pub mod descriptor;
pub mod error;
pub mod file;
pub mod schema;
pub mod template;

pub use descriptor::{Descriptor, DEFAULT_LINE_PATTERN};
pub use error::{Result, XrbError};
pub use file::TemplateFile;
pub use schema::DefinedMap;
pub use template::Template;

/// Re-export commonly used types.
pub mod prelude {
    pub use crate::{DefinedMap, Descriptor, Result, Template, TemplateFile, XrbError};
}
