//! Phase ordering over a whole class table.
//!
//! Phase 1 injects capability supertypes, phase 2 declares synthetic member
//! names, phase 3 generates bodies. Every phase visits marked classes
//! ancestors first, then by name.

use crate::{
    Options,
    context::SynthesisContext,
    error::SynthesisError,
    model::{ClassId, ClassModel, ClassTable},
    obs::SynthesisSink,
    synth::{ClassSynthesis, ClassTransformer, declare_deserializer, inject_supertypes},
};
use std::{collections::BTreeSet, fmt};

///
/// Pipeline
///

pub struct Pipeline<'a> {
    options: Options,
    sink: &'a dyn SynthesisSink,
}

impl<'a> Pipeline<'a> {
    #[must_use]
    pub fn new(options: Options, sink: &'a dyn SynthesisSink) -> Self {
        Self { options, sink }
    }

    /// Runs every phase. The first error stops the run; classes already
    /// committed keep their output, the failing class gets none.
    pub fn run(&self, table: &mut ClassTable) -> Result<SynthesisReport, SynthesisError> {
        let order = synthesis_order(table)?;
        let mut ctx = SynthesisContext::new(self.options, self.sink);

        // phase 1
        for id in &order {
            let injected = {
                let model: &ClassTable = table;
                inject_supertypes(&ctx, model, model.require(id)?)?
            };
            if !injected.is_empty() {
                table.add_supertypes(id, injected)?;
            }
        }

        // phase 2
        for id in &order {
            let declared = {
                let model: &ClassTable = table;
                declare_deserializer(&ctx, model, model.require(id)?)?
            };
            if let Some(member) = declared {
                table.add_member(id, member)?;
            }
        }

        // phase 3
        let mut report = SynthesisReport::default();
        for id in &order {
            let synthesis = {
                let model: &ClassTable = table;
                ClassTransformer::new(&mut ctx, model).transform(model.require(id)?)?
            };
            if synthesis.is_empty() {
                continue;
            }

            table.apply(&synthesis)?;
            report.classes.push(synthesis);
        }

        Ok(report)
    }
}

// synthesis_order
// marked classes sorted by hierarchy depth, then by id
fn synthesis_order(table: &ClassTable) -> Result<Vec<ClassId>, SynthesisError> {
    let mut ordered = Vec::new();

    for decl in table.iter().filter(|d| d.is_class() && d.has_marker()) {
        ordered.push((depth(table, &decl.id)?, decl.id.clone()));
    }
    ordered.sort();

    Ok(ordered.into_iter().map(|(_, id)| id).collect())
}

fn depth(table: &ClassTable, id: &ClassId) -> Result<usize, SynthesisError> {
    let mut seen = BTreeSet::new();
    let mut current = id.clone();

    while let Some(parent) = table.superclass(&current) {
        if !seen.insert(current.clone()) {
            return Err(SynthesisError::CyclicHierarchy { class: id.clone() });
        }
        current = parent;
    }

    Ok(seen.len())
}

///
/// SynthesisReport
///

#[derive(Clone, Debug, Default)]
pub struct SynthesisReport {
    pub classes: Vec<ClassSynthesis>,
}

impl SynthesisReport {
    #[must_use]
    pub fn class(&self, id: &str) -> Option<&ClassSynthesis> {
        self.classes.iter().find(|c| c.class == id)
    }

    #[must_use]
    pub fn member_count(&self) -> usize {
        self.classes.iter().map(|c| c.members.len()).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

impl fmt::Display for SynthesisReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, class) in self.classes.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{class}")?;
        }

        Ok(())
    }
}

///
/// TESTS
///
