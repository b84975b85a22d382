//! Marker flags and per-class feature resolution.

use crate::{
    error::SynthesisError,
    model::ClassDecl,
    names, Options,
};
use std::collections::BTreeSet;

///
/// Flag
/// integer values accepted by the marker annotation
///

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[repr(i32)]
pub enum Flag {
    ReflectiveAdapter = 1,
    StreamingReader = 2,
}

impl TryFrom<i32> for Flag {
    type Error = i32;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::ReflectiveAdapter),
            2 => Ok(Self::StreamingReader),
            other => Err(other),
        }
    }
}

// decode_flags
// an unknown value aborts with the offending integer
pub fn decode_flags(decl: &ClassDecl) -> Result<BTreeSet<Flag>, SynthesisError> {
    let Some(marker) = decl.annotation(names::KUDOS) else {
        return Ok(BTreeSet::new());
    };

    marker
        .int_values()
        .into_iter()
        .map(|value| {
            Flag::try_from(value).map_err(|value| SynthesisError::UnknownFlag {
                class: decl.id.clone(),
                value,
            })
        })
        .collect()
}

///
/// Features
///
/// Features in effect for one class: a global toggle or a class flag turns
/// a feature on. The validator is on unless disabled globally.
///

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Features {
    pub validator: bool,
    pub reflective_adapter: bool,
    pub streaming_reader: bool,
}

impl Features {
    pub fn resolve(decl: &ClassDecl, options: Options) -> Result<Self, SynthesisError> {
        let flags = decode_flags(decl)?;

        Ok(Self {
            validator: options.validator_enabled(),
            reflective_adapter: options.reflective_adapter
                || flags.contains(&Flag::ReflectiveAdapter),
            streaming_reader: options.streaming_reader || flags.contains(&Flag::StreamingReader),
        })
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ClassBuilder;

    #[test]
    fn class_flags_enable_features() {
        let decl = ClassBuilder::new("demo.User")
            .kudos(&[2])
            .build()
            .expect("class should build");

        let features = Features::resolve(&decl, Options::default()).expect("features resolve");
        assert!(features.validator);
        assert!(features.streaming_reader);
        assert!(!features.reflective_adapter);
    }

    #[test]
    fn global_toggles_apply_without_flags() {
        let decl = ClassBuilder::new("demo.User")
            .kudos(&[])
            .build()
            .expect("class should build");
        let options = Options::default()
            .with_reflective_adapter(true)
            .with_validator_disabled(true);

        let features = Features::resolve(&decl, options).expect("features resolve");
        assert!(!features.validator);
        assert!(features.reflective_adapter);
        assert!(!features.streaming_reader);
    }

    #[test]
    fn unknown_flag_names_the_value() {
        let decl = ClassBuilder::new("demo.User")
            .kudos(&[1, 7])
            .build()
            .expect("class should build");

        let err = Features::resolve(&decl, Options::default()).expect_err("flag 7 is unknown");
        assert!(matches!(err, SynthesisError::UnknownFlag { value: 7, .. }));
        assert!(err.to_string().contains('7'));
    }
}
