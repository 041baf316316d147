//! strider-core: structural source-to-frame converter.
//!
//! Turns Java-like program source into a tree of frame-editor code
//! elements. A scanner reports grammar productions as events through
//! [`ScanHooks`]; the [`Converter`] rebuilds the nested structure from
//! those events with a few cooperating stacks.
//!
//! # Public API
//!
//! - [`convert()`] / [`convert_with()`] -- scan and convert source text
//! - [`convert_file()`] -- the same, reading through a [`SourceProvider`]
//! - [`Converter`] -- drive the converter from any event producer
//! - [`CodeElement`] and friends -- the output tree
//! - [`ConvertError`] -- everything that can go wrong

pub mod convert;
pub mod element;
pub mod error;
pub mod hooks;
pub mod lexer;
pub mod options;
pub mod scanner;
pub mod source;

use std::path::Path;

use tracing::debug;

// ── Convenience re-exports ───────────────────────────────────────────

pub use convert::{
    normalize_comment, normalize_operators, split_assignment, Conversion, Converter,
};
pub use element::{AccessLevel, Block, CodeElement, DelegateCall, DelegateKind, Fragment, Param};
pub use error::ConvertError;
pub use hooks::{HookResult, ScanHooks};
pub use options::ConvertOptions;
pub use source::{FileSystemProvider, InMemoryProvider, SourceProvider};

/// Convert source text with default options.
pub fn convert(source: &str) -> Result<Conversion, ConvertError> {
    convert_with(source, &ConvertOptions::default())
}

/// Convert source text.
pub fn convert_with(source: &str, options: &ConvertOptions) -> Result<Conversion, ConvertError> {
    let mut converter = Converter::new(source, options.clone());
    scanner::scan(source, &mut converter)?;
    let conversion = converter.finish()?;
    debug!(
        elements = conversion.elements.len(),
        warnings = conversion.warnings.len(),
        "conversion finished"
    );
    Ok(conversion)
}

/// Read `path` through `provider` and convert it.
pub fn convert_file(
    path: &Path,
    provider: &dyn SourceProvider,
    options: &ConvertOptions,
) -> Result<Conversion, ConvertError> {
    debug!(path = %path.display(), "reading source");
    let text = source::read_with(provider, path)?;
    convert_with(&text, options)
}
