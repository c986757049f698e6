//! # ldmode
//!
//! Editing support for GNU ld linker scripts: highlight classification and brace-driven
//! indentation.
//!
//! The indentation engine lives in [ldscript::indentation]. It consumes the block comment
//! primitive from [ldscript::comments] and reads its settings from [config].
//!
//! ## Testing
//!
//! For testing guidelines, see the [testing module](ldscript::testing). Larger scripts used
//! by tests live under `samples/` and are read through
//! [LdSources](ldscript::processor::ld_sources::LdSources).

pub mod config;
pub mod ldscript;
