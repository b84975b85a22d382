//! Executes synthesized member bodies against the class model.
//!
//! The interpreter is the runtime counterpart of the synthesizers: it
//! constructs instances through their no-arg constructors, runs generated
//! deserializers over a [`JsonReader`] and dispatches `validate` calls to
//! the most derived generated validator.

use crate::{
    error::RuntimeError,
    nested::{NestedObjects, parse_float, parse_nested_value},
    reader::{JsonReader, TokenReader},
    validator::{PresenceMap, validate_array, validate_collection, validate_field},
    value::{Instance, TypeDescriptor, Value, mismatch},
};
use kudos_core::{
    ir::{Expr, ReaderOp, Stmt, ValidatorCall},
    model::{BodyState, ClassDecl, ClassId, ClassModel, PropertyOrigin, TypeRef},
    names,
};
use std::collections::BTreeMap;

///
/// Flow
/// how a statement left its block
///

enum Flow<'s> {
    Next,
    Continue,
    Return(&'s Expr),
}

///
/// Frame
///

struct Frame<'f> {
    this: &'f mut Instance,
    reader: Option<&'f mut dyn JsonReader>,
    params: BTreeMap<&'static str, Value>,
    locals: BTreeMap<String, Value>,
}

impl<'f> Frame<'f> {
    fn new(this: &'f mut Instance) -> Self {
        Self {
            this,
            reader: None,
            params: BTreeMap::new(),
            locals: BTreeMap::new(),
        }
    }

    fn with_reader(this: &'f mut Instance, reader: &'f mut dyn JsonReader) -> Self {
        Self {
            reader: Some(reader),
            ..Self::new(this)
        }
    }

    fn reader(&mut self) -> Result<&mut (dyn JsonReader + 'f), RuntimeError> {
        match self.reader.as_deref_mut() {
            Some(reader) => Ok(reader),
            None => Err(unbound(names::READER_PARAM)),
        }
    }

    fn status(&self) -> Result<&PresenceMap, RuntimeError> {
        match self.params.get(names::STATUS_PARAM) {
            Some(Value::Presence(status)) => Ok(status),
            Some(other) => Err(mismatch("presence map", other)),
            None => Err(unbound(names::STATUS_PARAM)),
        }
    }
}

///
/// Interpreter
///

#[derive(Clone, Copy)]
pub struct Interpreter<'m> {
    model: &'m dyn ClassModel,
}

impl<'m> Interpreter<'m> {
    #[must_use]
    pub const fn new(model: &'m dyn ClassModel) -> Self {
        Self { model }
    }

    /// Runs the class's constructor that takes no arguments.
    pub fn instantiate(&self, class: &ClassId) -> Result<Instance, RuntimeError> {
        let mut instance = Instance::new(class.clone());
        self.construct(class, &mut instance)?;

        Ok(instance)
    }

    /// Instantiates `class` and fills it from the reader through its
    /// generated `deserialize` member.
    pub fn deserialize(
        &self,
        class: &ClassId,
        reader: &mut dyn JsonReader,
    ) -> Result<Instance, RuntimeError> {
        let decl = self.decl(class)?;
        let body = decl
            .member(names::DESERIALIZE, &[TypeRef::json_reader()])
            .and_then(|member| match &member.body {
                BodyState::Synthesized(body) => Some(body),
                _ => None,
            })
            .ok_or_else(|| RuntimeError::NoDeserializer {
                class: class.clone(),
            })?;

        log::debug!(target: "kudos", "deserializing {class}");

        let mut instance = self.instantiate(class)?;
        let returned = {
            let mut frame = Frame::with_reader(&mut instance, reader);
            match self.exec_block(&mut frame, body)? {
                Flow::Return(Expr::This) | Flow::Next | Flow::Continue => None,
                Flow::Return(expr) => Some(self.eval(&mut frame, expr)?),
            }
        };

        match returned {
            None => Ok(instance),
            Some(Value::Object(other)) => Ok(other),
            Some(other) => Err(mismatch("object", &other)),
        }
    }

    pub fn deserialize_json(&self, class: &ClassId, json: &str) -> Result<Instance, RuntimeError> {
        let mut reader = TokenReader::from_json(json)?;

        self.deserialize(class, &mut reader)
    }

    /// Calls `validate(status)` on the instance, dispatched on its class.
    pub fn validate(&self, this: &mut Instance, status: &PresenceMap) -> Result<(), RuntimeError> {
        let class = this.class.clone();

        self.dispatch_validate(&class, this, status.clone())
    }

    // dispatch_validate
    // nearest class from `start` upwards with a real validate body
    fn dispatch_validate(
        &self,
        start: &ClassId,
        this: &mut Instance,
        status: PresenceMap,
    ) -> Result<(), RuntimeError> {
        let signature = [TypeRef::presence_map()];
        let mut current = Some(start.clone());

        while let Some(class) = current {
            let decl = self.decl(&class)?;

            match decl.member(names::VALIDATE, &signature).map(|m| &m.body) {
                Some(BodyState::Synthesized(body)) => {
                    let mut frame = Frame::new(this);
                    frame.params.insert(names::STATUS_PARAM, Value::Presence(status));
                    self.exec_block(&mut frame, body)?;

                    return Ok(());
                }
                // user-written bodies are opaque here
                Some(BodyState::Authored) => return Ok(()),
                _ => current = self.model.superclass(&class),
            }
        }

        Ok(())
    }

    fn decl(&self, class: &ClassId) -> Result<&'m ClassDecl, RuntimeError> {
        self.model
            .class(class)
            .ok_or_else(|| RuntimeError::UnknownClass {
                class: class.clone(),
            })
    }

    // construct
    // runs `class`'s no-arg constructor on an instance of it or a subclass
    fn construct(&self, class: &ClassId, this: &mut Instance) -> Result<(), RuntimeError> {
        let decl = self.decl(class)?;

        if let Some(body) = decl
            .constructors
            .iter()
            .find_map(|ctor| ctor.body.as_ref().filter(|_| ctor.params.is_empty()))
        {
            let mut frame = Frame::new(this);
            self.exec_block(&mut frame, body)?;

            return Ok(());
        }

        let ctor = decl
            .constructors
            .iter()
            .find(|ctor| ctor.is_zero_parameter())
            .ok_or_else(|| RuntimeError::NoConstructor {
                class: class.clone(),
            })?;

        if let Some(superclass) = self.model.superclass(class) {
            self.construct(&superclass, this)?;
        }

        let mut frame = Frame::new(this);
        self.init_instance(&mut frame, decl)?;
        for param in &ctor.params {
            if let Some(default) = &param.default
                && decl
                    .property(&param.name)
                    .is_some_and(|p| p.origin == PropertyOrigin::ConstructorParameter)
            {
                frame.this.set(param.name.clone(), Value::from(default));
            }
        }

        Ok(())
    }

    // init_instance
    // body initializers first, then fields added by synthesis
    fn init_instance(&self, frame: &mut Frame<'_>, decl: &ClassDecl) -> Result<(), RuntimeError> {
        for property in &decl.properties {
            if property.origin == PropertyOrigin::Body
                && property.backing_field
                && let Some(initializer) = &property.initializer
            {
                frame.this.set(property.name.clone(), Value::from(initializer));
            }
        }

        for field in &decl.fields {
            let value = self.eval(frame, &field.initializer)?;
            frame.this.set(field.name.clone(), value);
        }

        Ok(())
    }

    fn exec_block<'s>(
        &self,
        frame: &mut Frame<'_>,
        stmts: &'s [Stmt],
    ) -> Result<Flow<'s>, RuntimeError> {
        for stmt in stmts {
            match self.exec(frame, stmt)? {
                Flow::Next => {}
                flow => return Ok(flow),
            }
        }

        Ok(Flow::Next)
    }

    fn exec<'s>(&self, frame: &mut Frame<'_>, stmt: &'s Stmt) -> Result<Flow<'s>, RuntimeError> {
        match stmt {
            Stmt::Expr(expr) => {
                self.eval(frame, expr)?;
            }
            Stmt::SetField { field, value } => {
                let value = self.eval(frame, value)?;
                frame.this.set(field.clone(), value);
            }
            Stmt::Let { name, value } => {
                let value = self.eval(frame, value)?;
                frame.locals.insert(name.clone(), value);
            }
            Stmt::DelegateCtor { class, .. } => self.construct(class, frame.this)?,
            Stmt::InstanceInit { class } => {
                let decl = self.decl(class)?;
                self.init_instance(frame, decl)?;
            }
            Stmt::While { cond, body } => {
                while self.eval(frame, cond)?.as_bool()? {
                    if let Flow::Return(expr) = self.exec_block(frame, body)? {
                        return Ok(Flow::Return(expr));
                    }
                }
            }
            Stmt::IfThen { cond, then } => {
                if self.eval(frame, cond)?.as_bool()? {
                    return self.exec_block(frame, then);
                }
            }
            Stmt::When {
                subject,
                branches,
                default,
            } => {
                let value = self.eval(frame, subject)?;
                let key = value.as_str()?;
                let body = branches
                    .iter()
                    .find(|branch| branch.key == key)
                    .map_or(default.as_slice(), |branch| branch.body.as_slice());

                return self.exec_block(frame, body);
            }
            Stmt::Continue => return Ok(Flow::Continue),
            Stmt::Return(expr) => return Ok(Flow::Return(expr)),
        }

        Ok(Flow::Next)
    }

    fn eval(&self, frame: &mut Frame<'_>, expr: &Expr) -> Result<Value, RuntimeError> {
        let value = match expr {
            Expr::This => Value::Object(frame.this.clone()),
            Expr::Param(name) => frame
                .params
                .get(name.as_str())
                .cloned()
                .ok_or_else(|| unbound(name))?,
            Expr::Local(name) => frame
                .locals
                .get(name)
                .cloned()
                .ok_or_else(|| unbound(name))?,
            Expr::Literal(literal) => Value::from(literal),
            Expr::GetField(name) => frame.this.get(name).clone(),
            Expr::Read(op) => read(frame.reader()?, *op)?,
            Expr::PeekIs(token) => Value::Bool(frame.reader()?.peek()? == *token),
            Expr::ParseFloat(inner) => {
                let text = self.eval(frame, inner)?;
                Value::Float(parse_float(text.as_str()?)?)
            }
            Expr::NotNull(inner) => Value::Bool(!self.eval(frame, inner)?.is_null()),
            Expr::ParseNested { descriptor } => {
                let descriptor = self.eval(frame, descriptor)?.into_type()?;
                parse_nested_value(frame.reader()?, &descriptor, self)?
            }
            Expr::ClassToken(class) => Value::Type(TypeDescriptor::Class(class.clone())),
            Expr::Parameterized { raw, args } => {
                let args = args
                    .iter()
                    .map(|arg| self.eval(frame, arg)?.into_type())
                    .collect::<Result<Vec<_>, _>>()?;

                Value::Type(TypeDescriptor::Parameterized {
                    raw: raw.clone(),
                    args,
                })
            }
            Expr::PresencePut { field, key, value } => {
                let present = self.eval(frame, value)?.as_bool()?;
                match frame.this.get_mut(field) {
                    Some(Value::Presence(status)) => {
                        status.insert(key.clone(), present);
                    }
                    Some(other) => return Err(mismatch("presence map", other)),
                    None => return Err(unbound(field)),
                }

                Value::Null
            }
            Expr::Validate(call) => {
                check(frame, call)?;
                Value::Null
            }
            Expr::CallValidator { status } => {
                let status = self.eval(frame, status)?.into_presence()?;
                let class = frame.this.class.clone();
                self.dispatch_validate(&class, frame.this, status)?;

                Value::Null
            }
            Expr::CallSuperValidator { class, status } => {
                let status = self.eval(frame, status)?.into_presence()?;
                self.dispatch_validate(class, frame.this, status)?;

                Value::Null
            }
            Expr::NewPresenceMap => Value::Presence(PresenceMap::new()),
        };

        Ok(value)
    }
}

impl NestedObjects for Interpreter<'_> {
    fn model(&self) -> &dyn ClassModel {
        self.model
    }

    fn deserialize_object(
        &self,
        class: &ClassId,
        reader: &mut dyn JsonReader,
    ) -> Result<Instance, RuntimeError> {
        self.deserialize(class, reader)
    }
}

fn read(reader: &mut dyn JsonReader, op: ReaderOp) -> Result<Value, RuntimeError> {
    let value = match op {
        ReaderOp::BeginObject => {
            reader.begin_object()?;
            Value::Null
        }
        ReaderOp::EndObject => {
            reader.end_object()?;
            Value::Null
        }
        ReaderOp::BeginArray => {
            reader.begin_array()?;
            Value::Null
        }
        ReaderOp::EndArray => {
            reader.end_array()?;
            Value::Null
        }
        ReaderOp::SkipValue => {
            reader.skip_value()?;
            Value::Null
        }
        ReaderOp::HasNext => Value::Bool(reader.has_next()?),
        ReaderOp::NextName => Value::Str(reader.next_name()?),
        ReaderOp::Peek => Value::Str(reader.peek()?.to_string()),
        ReaderOp::NextString => Value::Str(reader.next_string()?),
        ReaderOp::NextLong => Value::Long(reader.next_long()?),
        ReaderOp::NextInt => Value::Int(reader.next_int()?),
        ReaderOp::NextDouble => Value::Double(reader.next_double()?),
        ReaderOp::NextBoolean => Value::Bool(reader.next_boolean()?),
    };

    Ok(value)
}

fn check(frame: &Frame<'_>, call: &ValidatorCall) -> Result<(), RuntimeError> {
    match call {
        ValidatorCall::Field { name } => validate_field(name, frame.status()?),
        ValidatorCall::Collection { name, element_type } => {
            validate_collection(name, frame.this.get(name), element_type)
        }
        ValidatorCall::Array { name } => validate_array(name, frame.this.get(name)),
    }
}

fn unbound(name: &str) -> RuntimeError {
    RuntimeError::Unbound {
        name: name.to_string(),
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use kudos_core::{
        Options,
        model::{ClassBuilder, ClassTable, Literal},
        obs::RecordingSink,
        pipeline::Pipeline,
    };

    fn synthesized(builders: impl IntoIterator<Item = ClassBuilder>) -> ClassTable {
        let mut table = ClassTable::with_builtins();
        for builder in builders {
            table
                .insert(builder.build().expect("class should build"))
                .expect("class should insert");
        }

        let sink = RecordingSink::new();
        Pipeline::new(Options::default(), &sink)
            .run(&mut table)
            .expect("pipeline should run");

        table
    }

    fn user() -> ClassBuilder {
        ClassBuilder::new("demo.User")
            .kudos(&[2])
            .param("name", "String")
            .param("age", "Int?")
    }

    #[test]
    fn reads_known_keys_and_skips_the_rest() {
        let table = synthesized([user()]);
        let interp = Interpreter::new(&table);

        let user = interp
            .deserialize_json(
                &ClassId::from("demo.User"),
                r#"{"name":"Alice","age":null,"extra":123}"#,
            )
            .expect("document is valid");

        assert_eq!(user.get("name"), &Value::from("Alice"));
        assert!(user.get("age").is_null());

        let Value::Presence(status) = user.get(names::STATUS_FIELD) else {
            panic!("presence map field initialized");
        };
        assert_eq!(status, &PresenceMap::from_iter([("name", true)]));
    }

    #[test]
    fn missing_required_field_fails_validation() {
        let table = synthesized([user()]);
        let interp = Interpreter::new(&table);

        let err = interp
            .deserialize_json(&ClassId::from("demo.User"), r#"{"age": 3}"#)
            .expect_err("name is required");
        assert_eq!(err.to_string(), "field 'name' required but missing");
    }

    #[test]
    fn instantiate_applies_declared_defaults() {
        let table = synthesized([ClassBuilder::new("demo.Settings")
            .kudos(&[])
            .param_default("retries", "Int", Literal::Int(3))
            .param("label", "String")
            .property_init("mode", "String", Literal::Str("fast".to_string()))]);
        let interp = Interpreter::new(&table);

        let settings = interp
            .instantiate(&ClassId::from("demo.Settings"))
            .expect("no-arg constructor exists");
        assert_eq!(settings.get("retries"), &Value::Int(3));
        assert_eq!(settings.get("mode"), &Value::from("fast"));
        assert!(settings.get("label").is_null());
    }

    #[test]
    fn unmarked_class_has_no_deserializer() {
        let table = synthesized([ClassBuilder::new("demo.Plain").param("id", "Long")]);
        let interp = Interpreter::new(&table);

        assert!(matches!(
            interp.deserialize_json(&ClassId::from("demo.Plain"), "{}"),
            Err(RuntimeError::NoDeserializer { .. })
        ));
        assert!(matches!(
            interp.instantiate(&ClassId::from("demo.Plain")),
            Err(RuntimeError::NoConstructor { .. })
        ));
    }

    #[test]
    fn validate_dispatches_on_the_instance_class() {
        let table = synthesized([ClassBuilder::new("demo.Base")
            .kudos(&[])
            .param("id", "Long")]);
        let interp = Interpreter::new(&table);

        let mut base = interp
            .instantiate(&ClassId::from("demo.Base"))
            .expect("constructor synthesized");
        interp
            .validate(&mut base, &PresenceMap::from_iter([("id", true)]))
            .expect("id present");
        assert!(interp.validate(&mut base, &PresenceMap::new()).is_err());
    }
}
