use crate::{
    Options,
    ir::SyntheticConstructor,
    model::ClassId,
    obs::{SynthesisEvent, SynthesisSink},
};
use std::collections::{BTreeMap, BTreeSet};

///
/// ConstructorMemo
///
/// Constructors synthesized during one run, by class. Classes whose
/// synthesis is underway are tracked so a cyclic hierarchy fails instead of
/// recursing forever.
///

#[derive(Debug, Default)]
pub struct ConstructorMemo {
    constructors: BTreeMap<ClassId, SyntheticConstructor>,
    in_progress: BTreeSet<ClassId>,
}

impl ConstructorMemo {
    #[must_use]
    pub fn get(&self, class: &ClassId) -> Option<&SyntheticConstructor> {
        self.constructors.get(class)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.constructors.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.constructors.is_empty()
    }

    /// Marks `class` as in progress; false if it already was.
    pub(crate) fn begin(&mut self, class: &ClassId) -> bool {
        self.in_progress.insert(class.clone())
    }

    pub(crate) fn finish(&mut self, ctor: SyntheticConstructor) {
        self.in_progress.remove(&ctor.class);
        self.constructors.insert(ctor.class.clone(), ctor);
    }

    pub(crate) fn abandon(&mut self, class: &ClassId) {
        self.in_progress.remove(class);
    }
}

///
/// SynthesisContext
/// state owned by one synthesis run
///

pub struct SynthesisContext<'a> {
    pub options: Options,
    pub memo: ConstructorMemo,
    sink: &'a dyn SynthesisSink,
}

impl<'a> SynthesisContext<'a> {
    #[must_use]
    pub fn new(options: Options, sink: &'a dyn SynthesisSink) -> Self {
        Self {
            options,
            memo: ConstructorMemo::default(),
            sink,
        }
    }

    pub fn record(&self, event: SynthesisEvent) {
        self.sink.record(event);
    }
}
