//! Shared fixtures for the synthesizer tests.

use crate::model::{ClassBuilder, ClassTable};

/// Builtins plus the given classes.
pub(crate) fn table_with(builders: impl IntoIterator<Item = ClassBuilder>) -> ClassTable {
    let mut table = ClassTable::with_builtins();
    for builder in builders {
        let decl = builder.build().expect("fixture class should build");
        table.insert(decl).expect("fixture class should insert");
    }

    table
}

/// `demo.Root` with a declared no-arg constructor, then `depth` marked
/// classes `demo.C0 .. demo.C{depth-1}`, each extending the previous one
/// and taking one required parameter.
pub(crate) fn chain_table(depth: usize) -> ClassTable {
    let mut builders = vec![ClassBuilder::new("demo.Root")];
    for level in 0..depth {
        let parent = if level == 0 {
            "demo.Root".to_string()
        } else {
            format!("demo.C{}", level - 1)
        };
        builders.push(
            ClassBuilder::new(format!("demo.C{level}"))
                .kudos(&[])
                .extends(&parent)
                .param(&format!("f{level}"), "String"),
        );
    }

    table_with(builders)
}

/// The user class from the reader walkthrough: a required name and an
/// optional age, streaming reader on.
pub(crate) fn user_table() -> ClassTable {
    table_with([ClassBuilder::new("demo.User")
        .kudos(&[2])
        .param("name", "String")
        .param("age", "Int?")])
}
