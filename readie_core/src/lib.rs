//! `readie_core` is the core library for [readie](https://github.com/readie/readie), a README generator driven by declarative JSON configuration. It loads a project's `readie.json`, layers it over the nearest `readie.global.json`, substitutes placeholders and renders consistent markdown for a single project or for every project in a workspace.
//!
//! ## Processing Pipeline
//!
//! ```text
//! readie.json (+ nearest readie.global.json, + sibling package.json name)
//!   → Config (parse JSON, validate shape)
//!   → Merge (project wins on presence, explicit null means absent)
//!   → Interpolate ({{title}}, {{packageName}}, {{packageNameEncoded}})
//!   → Template (section composition, table of contents, numbered usage)
//!   → Generate (compare with the existing README, write atomically)
//! ```
//!
//! ## Modules
//!
//! - [`config`]: Project and global config documents, validation and global config discovery.
//! - [`workspace`]: Generation across the immediate subdirectories of a workspace root.
//!
//! ## Key Types
//!
//! - [`ProjectConfig`]: A validated `readie.json`.
//! - [`GlobalConfig`]: A validated `readie.global.json` with every key optional.
//! - [`Field`]: An optional key that keeps "absent" and "`null`" apart.
//! - [`MergedConfig`]: The interpolated result consumed by [`render_readme`].
//! - [`GenerateOutcome`]: Result of generating a single README.
//! - [`WorkspaceSummary`]: Updated, unchanged, failed and filtered projects of a workspace run.
//!
//! ## Placeholders
//!
//! Flat string fields and custom section bodies may reference:
//!
//! - `{{ title }}`: the project title.
//! - `{{ packageName }}`: the `name` from a sibling `package.json`, falling back to the title.
//! - `{{ packageNameEncoded }}`: `packageName` percent encoded for URLs.
//!
//! Unknown placeholders are left untouched.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use readie_core::GenerateOptions;
//! use readie_core::generate_readme;
//!
//! let outcome = generate_readme(&GenerateOptions::new("readie.json").dry_run(true)).unwrap();
//! if outcome.updated {
//!     println!("would update {}", outcome.output_path.display());
//! }
//! ```

pub use config::*;
pub use error::*;
pub use generate::*;
pub use merge::*;
pub use starter::*;
pub use template::*;
pub use workspace::*;

pub mod config;
#[allow(unused_assignments)]
mod error;
mod generate;
mod merge;
mod starter;
mod template;
pub mod workspace;

#[cfg(test)]
mod __fixtures;
