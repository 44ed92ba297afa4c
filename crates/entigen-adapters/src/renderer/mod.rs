//! Artifact renderers.

mod builtin;

pub use builtin::BuiltinRenderer;
