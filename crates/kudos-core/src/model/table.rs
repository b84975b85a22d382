use crate::{
    error::{ModelError, SynthesisError},
    ir::SyntheticMember,
    model::{
        BodyState, ClassDecl, ClassId, ClassKind, Constructor, Member, Parameter, TypeRef,
    },
    names,
    synth::ClassSynthesis,
};
use std::collections::{BTreeMap, BTreeSet, VecDeque};

///
/// ClassModel
///
/// Read-only view of the host's resolved declarations. Frontends either
/// implement this directly or fill a [`ClassTable`].
///

pub trait ClassModel {
    fn class(&self, id: &ClassId) -> Option<&ClassDecl>;

    /// Every class reachable through the given supertypes, the supertypes
    /// themselves included. Classes unknown to the model end the walk.
    fn supertype_closure(&self, supertypes: &[TypeRef]) -> BTreeSet<ClassId> {
        let mut seen = BTreeSet::new();
        let mut queue = supertypes
            .iter()
            .map(|ty| ty.class.clone())
            .collect::<VecDeque<_>>();

        while let Some(id) = queue.pop_front() {
            if !seen.insert(id.clone()) {
                continue;
            }
            if let Some(decl) = self.class(&id) {
                queue.extend(decl.supertypes.iter().map(|ty| ty.class.clone()));
            }
        }

        seen
    }

    fn is_subclass_of(&self, id: &ClassId, ancestor: &str) -> bool {
        if *id == ancestor {
            return true;
        }

        self.class(id).is_some_and(|decl| {
            self.supertype_closure(&decl.supertypes)
                .iter()
                .any(|c| *c == ancestor)
        })
    }

    /// Nearest class-kind ancestor. Interfaces are skipped and the root
    /// object type is the fallback; the root itself has none. A supertype
    /// missing from the model is returned as is, so lookups on it fail.
    fn superclass(&self, id: &ClassId) -> Option<ClassId> {
        if *id == names::ANY {
            return None;
        }

        let decl = self.class(id)?;
        if let Some(missing) = decl
            .supertypes
            .iter()
            .find(|ty| self.class(&ty.class).is_none())
        {
            return Some(missing.class.clone());
        }

        let mut classes = decl.supertypes.iter().filter(|ty| {
            self.class(&ty.class)
                .is_some_and(|s| s.kind == ClassKind::Class)
        });

        match (classes.next(), classes.next()) {
            (Some(ty), None) => Some(ty.class.clone()),
            _ => Some(ClassId::from(names::ANY)),
        }
    }
}

///
/// ClassTable
///

#[derive(Clone, Debug, Default)]
pub struct ClassTable {
    classes: BTreeMap<ClassId, ClassDecl>,
}

impl ClassTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Host builtins and the kudos runtime library.
    #[must_use]
    pub fn with_builtins() -> Self {
        let mut table = Self::new();

        let mut any = ClassDecl::new(names::ANY, ClassKind::Class);
        any.constructors.push(Constructor::primary(Vec::new()));
        table.put(any);

        for name in [
            names::CHAR_SEQUENCE,
            names::COMPARABLE,
            names::FUNCTION,
            names::ITERABLE,
        ] {
            table.put(ClassDecl::new(name, ClassKind::Interface));
        }

        table.put(builtin(names::NUMBER, ClassKind::Class, &[names::ANY]));
        table.put(builtin(
            names::STRING,
            ClassKind::Class,
            &[names::COMPARABLE, names::CHAR_SEQUENCE],
        ));
        for name in [names::INT, names::LONG, names::DOUBLE, names::FLOAT] {
            table.put(builtin(
                name,
                ClassKind::Class,
                &[names::NUMBER, names::COMPARABLE],
            ));
        }
        table.put(builtin(names::BOOLEAN, ClassKind::Class, &[names::COMPARABLE]));
        table.put(ClassDecl::new(names::UNIT, ClassKind::Object));
        table.put(builtin(names::ARRAY, ClassKind::Class, &[names::ANY]));

        // collection hierarchy
        let collections: [(&str, ClassKind, &[&str]); 12] = [
            (names::COLLECTION, ClassKind::Interface, &[names::ITERABLE]),
            (names::LIST, ClassKind::Interface, &[names::COLLECTION]),
            (names::SET, ClassKind::Interface, &[names::COLLECTION]),
            (names::MAP, ClassKind::Interface, &[]),
            (names::MUTABLE_LIST, ClassKind::Interface, &[names::LIST]),
            (names::MUTABLE_SET, ClassKind::Interface, &[names::SET]),
            (names::MUTABLE_MAP, ClassKind::Interface, &[names::MAP]),
            (names::ARRAY_LIST, ClassKind::Class, &[names::MUTABLE_LIST]),
            (names::HASH_SET, ClassKind::Class, &[names::MUTABLE_SET]),
            (names::LINKED_HASH_SET, ClassKind::Class, &[names::HASH_SET]),
            (names::HASH_MAP, ClassKind::Class, &[names::MUTABLE_MAP]),
            (names::LINKED_HASH_MAP, ClassKind::Class, &[names::HASH_MAP]),
        ];
        for (name, kind, supers) in collections {
            table.put(builtin(name, kind, supers));
        }

        // kudos runtime
        for name in [names::KUDOS, names::KUDOS_JSON_NAME] {
            table.put(ClassDecl::new(name, ClassKind::Annotation));
        }

        let mut validator = ClassDecl::new(names::KUDOS_VALIDATOR, ClassKind::Interface);
        validator.members.push(Member::new(
            names::VALIDATE,
            vec![Parameter::new(names::STATUS_PARAM, TypeRef::presence_map())],
            TypeRef::new(names::UNIT),
        ));
        table.put(validator);

        table.put(ClassDecl::new(names::KUDOS_JSON_ADAPTER, ClassKind::Interface));
        table.put(builtin(names::JSON_READER, ClassKind::Class, &[names::ANY]));
        table.put(ClassDecl::new(names::JSON_TOKEN, ClassKind::Enum));

        table
    }

    /// Adds the reflective JSON framework annotation and the kudos adapter
    /// factory for it.
    #[must_use]
    pub fn with_gson_library(mut self) -> Self {
        self.put(ClassDecl::new(
            names::JSON_ADAPTER_ANNOTATION,
            ClassKind::Annotation,
        ));
        self.put(builtin(names::ADAPTER_FACTORY, ClassKind::Class, &[names::ANY]));

        self
    }

    // put
    // builtins are inserted once, later inserts replace them
    fn put(&mut self, decl: ClassDecl) {
        self.classes.insert(decl.id.clone(), decl);
    }

    pub fn insert(&mut self, decl: ClassDecl) -> Result<(), ModelError> {
        if self.classes.contains_key(&decl.id) {
            return Err(ModelError::DuplicateClass(decl.id));
        }
        self.put(decl);

        Ok(())
    }

    pub fn extend(&mut self, decls: impl IntoIterator<Item = ClassDecl>) -> Result<(), ModelError> {
        for decl in decls {
            self.insert(decl)?;
        }

        Ok(())
    }

    pub fn require(&self, id: &ClassId) -> Result<&ClassDecl, SynthesisError> {
        self.class(id)
            .ok_or_else(|| SynthesisError::unknown_class(id))
    }

    pub fn get_mut(&mut self, id: &ClassId) -> Option<&mut ClassDecl> {
        self.classes.get_mut(id)
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.classes.contains_key(&ClassId::from(id))
    }

    pub fn iter(&self) -> impl Iterator<Item = &ClassDecl> {
        self.classes.values()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    pub fn add_supertypes(
        &mut self,
        id: &ClassId,
        supertypes: impl IntoIterator<Item = TypeRef>,
    ) -> Result<(), SynthesisError> {
        let decl = self
            .get_mut(id)
            .ok_or_else(|| SynthesisError::unknown_class(id))?;
        decl.supertypes.extend(supertypes);

        Ok(())
    }

    pub fn add_member(&mut self, id: &ClassId, member: Member) -> Result<(), SynthesisError> {
        let decl = self
            .get_mut(id)
            .ok_or_else(|| SynthesisError::unknown_class(id))?;
        decl.members.push(member);

        Ok(())
    }

    /// Commits a class synthesis. Nothing is removed except a placeholder
    /// validator that the synthesis replaces.
    pub fn apply(&mut self, synthesis: &ClassSynthesis) -> Result<(), SynthesisError> {
        let decl = self
            .get_mut(&synthesis.class)
            .ok_or_else(|| SynthesisError::unknown_class(&synthesis.class))?;

        decl.annotations.extend(synthesis.annotations.iter().cloned());
        decl.fields.extend(synthesis.fields.iter().cloned());

        for member in &synthesis.members {
            match member {
                SyntheticMember::Constructor(ctor) => {
                    let mut constructor = Constructor::secondary(Vec::new());
                    constructor.body = Some(ctor.body.clone());
                    decl.constructors.push(constructor);
                }
                SyntheticMember::Validator(validator) => {
                    let body = BodyState::Synthesized(validator.body.clone());
                    let signature = [TypeRef::presence_map()];

                    if let Some(existing) = decl
                        .members
                        .iter_mut()
                        .find(|m| m.has_signature(names::VALIDATE, &signature))
                    {
                        existing.body = body;
                    } else {
                        decl.members.push(
                            Member::new(
                                names::VALIDATE,
                                vec![Parameter::new(
                                    names::STATUS_PARAM,
                                    TypeRef::presence_map(),
                                )],
                                TypeRef::new(names::UNIT),
                            )
                            .with_body(body),
                        );
                    }
                }
                SyntheticMember::Deserializer(deserializer) => {
                    let body = BodyState::Synthesized(deserializer.body.clone());
                    let signature = [TypeRef::json_reader()];

                    if let Some(existing) = decl
                        .members
                        .iter_mut()
                        .find(|m| m.has_signature(names::DESERIALIZE, &signature))
                    {
                        existing.body = body;
                    } else {
                        let self_type = decl.self_type();
                        decl.members.push(
                            Member::new(
                                names::DESERIALIZE,
                                vec![Parameter::new(names::READER_PARAM, TypeRef::json_reader())],
                                self_type,
                            )
                            .with_body(body),
                        );
                    }
                }
            }
        }

        Ok(())
    }
}

impl ClassModel for ClassTable {
    fn class(&self, id: &ClassId) -> Option<&ClassDecl> {
        self.classes.get(id)
    }
}

fn builtin(name: &str, kind: ClassKind, supertypes: &[&str]) -> ClassDecl {
    let mut decl = ClassDecl::new(name, kind);
    decl.supertypes = supertypes.iter().map(|s| TypeRef::new(*s)).collect();
    if kind == ClassKind::Class {
        decl.constructors.push(Constructor::primary(Vec::new()));
    }

    decl
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_collections_are_collections() {
        let table = ClassTable::with_builtins();

        for name in [names::LIST, names::SET, names::ARRAY_LIST, names::LINKED_HASH_SET] {
            assert!(
                table.is_subclass_of(&ClassId::from(name), names::COLLECTION),
                "{name} should be a collection"
            );
        }
        assert!(!table.is_subclass_of(&ClassId::from(names::MAP), names::COLLECTION));
    }

    #[test]
    fn superclass_skips_interfaces_and_falls_back_to_any() {
        let mut table = ClassTable::with_builtins();

        let mut base = ClassDecl::new("demo.Base", ClassKind::Class);
        base.supertypes.push(TypeRef::new(names::COMPARABLE));
        let mut child = ClassDecl::new("demo.Child", ClassKind::Class);
        child.supertypes = vec![TypeRef::new(names::COMPARABLE), TypeRef::new("demo.Base")];

        table.extend([base, child]).expect("classes should insert");

        assert_eq!(
            table.superclass(&ClassId::from("demo.Child")),
            Some(ClassId::from("demo.Base"))
        );
        assert_eq!(
            table.superclass(&ClassId::from("demo.Base")),
            Some(ClassId::from(names::ANY))
        );
        assert_eq!(table.superclass(&ClassId::from(names::ANY)), None);
    }

    #[test]
    fn unresolved_supertype_is_reported_as_the_superclass() {
        let mut table = ClassTable::with_builtins();

        let mut child = ClassDecl::new("demo.Child", ClassKind::Class);
        child.supertypes = vec![TypeRef::new(names::COMPARABLE), TypeRef::new("demo.Missing")];
        table.extend([child]).expect("class should insert");

        assert_eq!(
            table.superclass(&ClassId::from("demo.Child")),
            Some(ClassId::from("demo.Missing"))
        );
    }

    #[test]
    fn supertype_closure_survives_cycles() {
        let mut table = ClassTable::new();

        let mut a = ClassDecl::new("demo.A", ClassKind::Interface);
        a.supertypes.push(TypeRef::new("demo.B"));
        let mut b = ClassDecl::new("demo.B", ClassKind::Interface);
        b.supertypes.push(TypeRef::new("demo.A"));
        table.extend([a, b]).expect("classes should insert");

        let closure = table.supertype_closure(&[TypeRef::new("demo.A")]);
        assert_eq!(closure.len(), 2);
    }

    #[test]
    fn duplicate_insert_is_rejected() {
        let mut table = ClassTable::with_builtins();

        let err = table
            .insert(ClassDecl::new(names::STRING, ClassKind::Class))
            .expect_err("duplicate should fail");
        assert!(matches!(err, ModelError::DuplicateClass(id) if id == names::STRING));
    }

    #[test]
    fn gson_library_is_opt_in() {
        assert!(!ClassTable::with_builtins().contains(names::ADAPTER_FACTORY));
        assert!(
            ClassTable::with_builtins()
                .with_gson_library()
                .contains(names::ADAPTER_FACTORY)
        );
    }
}
