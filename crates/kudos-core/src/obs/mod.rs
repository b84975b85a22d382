//! Observability: synthesis events and sink abstractions.
//!
//! Synthesizers never call a logger directly. Everything they report flows
//! through [`SynthesisEvent`] and a [`SynthesisSink`].

pub(crate) mod sink;

// re-exports
pub use sink::{LogSink, RecordingSink, SynthesisEvent, SynthesisSink};
