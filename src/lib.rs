//! # Luxfile Core
//!
//! Readers, writers and validators for photometric data files.
//!
//! This library provides:
//! - IESNA LM-63 (1991, 1995, 2002) parsing, validation and export
//! - EULUMDAT parsing, validation and export
//! - Symmetry-driven reshaping of EULUMDAT intensity runs
//! - Derived photometric queries (maximum intensity, FWHM, FWTM)
//! - Conversion from EULUMDAT to IES
//!
//! ## Architecture
//!
//! - [`reader`] - Line reader and number extraction shared by both formats
//! - [`writer`] - CRLF line sink and numeric line packing
//! - [`ies`] - LM-63 model, keyword rules, parser, serializer and upgrade
//! - [`eulumdat`] - EULUMDAT model, symmetry table, parser, serializer
//! - [`convert`] - Cross-format mapping
//!
//! ## Usage
//!
//! ### Native CLI
//!
//! ```bash
//! luxfile info fixture.ldt --json
//! luxfile convert fixture.ldt fixture.ies
//! luxfile validate fixture.ies --strict
//! ```
//!
//! ### Library
//!
//! ```no_run
//! use std::path::Path;
//! use luxfile_core::{convert, eulumdat, ies, ParseOptions};
//!
//! let ldt = eulumdat::parse_file(Path::new("fixture.ldt"), &ParseOptions::new())?;
//! let doc = convert::eulumdat_to_ies(&ldt)?;
//! ies::export_file(&doc, Path::new("fixture.ies"))?;
//! # Ok::<(), luxfile_core::LuxError>(())
//! ```
//!
//! ## Strictness
//!
//! Both formats limit the length of their lines. With
//! [`ParseOptions::strict`] an oversized line is an error; otherwise a
//! warning is logged through `tracing` and parsing continues.

pub mod convert;
pub mod error;
pub mod eulumdat;
pub mod ies;
pub mod reader;
pub mod writer;

// Re-export main types for convenience
pub use error::{LuxError, Result};
pub use eulumdat::{Eulumdat, Symmetry};
pub use ies::{IesDocument, IesFormat};
pub use reader::ParseOptions;

// WASM bindings
#[cfg(feature = "wasm")]
mod wasm;
