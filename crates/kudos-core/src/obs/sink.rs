//! Synthesis sink boundary.
//!
//! Synthesizers record events against the sink held by the synthesis
//! context. [`LogSink`] is the default and forwards to the `log` facade.
use crate::model::ClassId;
use derive_more::Display;
use std::cell::RefCell;

///
/// SynthesisEvent
///

#[derive(Clone, Debug, Display, Eq, PartialEq)]
pub enum SynthesisEvent {
    #[display("{class}: supertype {supertype} injected")]
    SupertypeInjected { class: ClassId, supertype: String },

    #[display("{class}: member '{member}' declared")]
    MemberDeclared { class: ClassId, member: &'static str },

    #[display("{class}: json reader type unresolved, deserializer not declared")]
    ReaderUnavailable { class: ClassId },

    #[display("{class}: no-arg constructor synthesized, delegating to {delegate} ({defaults} defaults)")]
    ConstructorSynthesized {
        class: ClassId,
        delegate: ClassId,
        defaults: usize,
    },

    #[display("{class}: no-arg constructor reused from memo")]
    ConstructorMemoHit { class: ClassId },

    #[display("{class}: validator synthesized with {checks} checks")]
    ValidatorSynthesized {
        class: ClassId,
        checks: usize,
        replaced_placeholder: bool,
    },

    #[display("{class}: user validator kept")]
    ValidatorReused { class: ClassId },

    #[display("{class}: nothing to validate")]
    ValidatorSkipped { class: ClassId },

    #[display("{class}: presence map field added")]
    PresenceFieldAdded { class: ClassId },

    #[display("{class}: deserializer filled for {fields} fields")]
    DeserializerFilled { class: ClassId, fields: usize },

    #[display("{class}: reflective adapter annotation attached")]
    AdapterAttached { class: ClassId },

    #[display("{class}: json key '{key}' of field '{shadowed}' is already taken by '{kept}'")]
    JsonNameCollision {
        class: ClassId,
        key: String,
        kept: String,
        shadowed: String,
    },
}

impl SynthesisEvent {
    #[must_use]
    pub const fn class(&self) -> &ClassId {
        match self {
            Self::SupertypeInjected { class, .. }
            | Self::MemberDeclared { class, .. }
            | Self::ReaderUnavailable { class }
            | Self::ConstructorSynthesized { class, .. }
            | Self::ConstructorMemoHit { class }
            | Self::ValidatorSynthesized { class, .. }
            | Self::ValidatorReused { class }
            | Self::ValidatorSkipped { class }
            | Self::PresenceFieldAdded { class }
            | Self::DeserializerFilled { class, .. }
            | Self::AdapterAttached { class }
            | Self::JsonNameCollision { class, .. } => class,
        }
    }

    #[must_use]
    pub const fn is_warning(&self) -> bool {
        matches!(self, Self::JsonNameCollision { .. })
    }
}

///
/// SynthesisSink
///

pub trait SynthesisSink {
    fn record(&self, event: SynthesisEvent);
}

///
/// LogSink
///

#[derive(Clone, Copy, Debug, Default)]
pub struct LogSink;

impl SynthesisSink for LogSink {
    fn record(&self, event: SynthesisEvent) {
        if event.is_warning() {
            log::warn!(target: "kudos", "{event}");
        } else {
            log::debug!(target: "kudos", "{event}");
        }
    }
}

///
/// RecordingSink
/// keeps every event, in order
///

#[derive(Debug, Default)]
pub struct RecordingSink {
    events: RefCell<Vec<SynthesisEvent>>,
}

impl RecordingSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn events(&self) -> Vec<SynthesisEvent> {
        self.events.borrow().clone()
    }

    #[must_use]
    pub fn count(&self, pred: impl Fn(&SynthesisEvent) -> bool) -> usize {
        self.events.borrow().iter().filter(|e| pred(e)).count()
    }
}

impl SynthesisSink for RecordingSink {
    fn record(&self, event: SynthesisEvent) {
        self.events.borrow_mut().push(event);
    }
}

///
/// TESTS
///
