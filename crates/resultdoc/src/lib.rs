//! Result documents over packed row metadata.
//!
//! This crate contains:
//! - `SourceDocument`: a parsed JSON buffer described by simple rows
//! - `Composer` and `CompositeDocument`: one result tree stitched from local
//!   values, source buffers and reference rows, with null bubbling
//! - `Element`: copyable handles for navigation, value access and
//!   serialization (streaming writer or `serde`)
//! - Composition tracing (`Tracer`, `PrintTracer`)

mod composer;
mod composite;
mod element;
mod error;
mod ser;
mod source;
mod trace;
mod value;
mod view;

#[cfg(test)]
mod element_tests;
#[cfg(test)]
mod ser_tests;
#[cfg(test)]
mod test_utils;
#[cfg(test)]
mod value_tests;

pub use composer::{
    Composer, ComposerOptions, DEFAULT_ESTIMATED_ROWS, DEFAULT_MAX_SOURCES, Origin, Slot,
};
pub use composite::{CompositeDocument, MAX_REFERENCE_HOPS};
pub use element::{ArrayIter, Element, ObjectIter, Property, ValueKind};
pub use error::{BuildError, ComposeError, Error, Result, ValueError};
pub use source::{SourceDocument, SourceDocumentBuilder};
pub use trace::{NoopTracer, PrintTracer, Tracer};
pub use value::unescape;
pub use view::DocumentView;

pub use resultdoc_json as json;
pub use resultdoc_meta as meta;
