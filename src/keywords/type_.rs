//! The `type` dispatcher: the node built for every non-boolean,
//! non-reference schema.
//!
//! It holds one kind-specific sub-validator per JSON kind, plus the
//! keywords that apply to any kind (`enum`, `const`, the combinators and
//! `if`/`then`/`else`). Dispatch is a table lookup on the instance kind.
use super::array::ArrayValidator;
use super::const_::ConstValidator;
use super::enum_::EnumValidator;
use super::if_::IfThenElseValidator;
use super::number::NumericValidator;
use super::object::ObjectValidator;
use super::string::StringValidator;
use super::{all_of::AllOfValidator, any_of::AnyOfValidator, not::NotValidator, one_of::OneOfValidator};
use super::{keyword_location, SchemaHandle, Validate};
use crate::compiler::Compiler;
use crate::error::SchemaError;
use crate::output::{ErrorReporter, Patch, ValidationOutput};
use crate::paths::JsonPointer;
use crate::primitive_type::{InstanceKind, KIND_COUNT};
use crate::uri::UriWrapper;
use serde_json::{Map, Value};
use std::sync::Arc;

pub(crate) struct TypeValidator {
    location: String,
    default_value: Option<Value>,
    type_mapping: [Option<SchemaHandle>; KIND_COUNT],
    enum_: Option<EnumValidator>,
    const_: Option<ConstValidator>,
    combined: Vec<SchemaHandle>,
    conditional: Option<IfThenElseValidator>,
    expected_types: Vec<String>,
}

impl TypeValidator {
    pub(crate) fn compile(
        compiler: &mut Compiler<'_>,
        schema: &Map<String, Value>,
        uris: &[UriWrapper],
    ) -> Result<SchemaHandle, SchemaError> {
        let mut validator = TypeValidator {
            location: keyword_location(uris),
            default_value: schema.get("default").cloned(),
            type_mapping: Default::default(),
            enum_: None,
            const_: None,
            combined: Vec::new(),
            conditional: None,
            expected_types: Vec::new(),
        };

        match schema.get("type") {
            None => validator.initialize_type_mapping(compiler, "", schema, uris)?,
            Some(Value::String(name)) => {
                validator.initialize_type_mapping(compiler, name, schema, uris)?;
                validator.expected_types.push(name.clone());
            }
            Some(Value::Array(names)) => {
                for name in names {
                    let Some(name) = name.as_str() else {
                        return Err(SchemaError::Schema(
                            "\"type\" must be a string or an array of strings".to_string(),
                        ));
                    };
                    validator.initialize_type_mapping(compiler, name, schema, uris)?;
                    validator.expected_types.push(name.to_string());
                }
            }
            Some(_) => {
                return Err(SchemaError::Schema(
                    "\"type\" must be a string or an array of strings".to_string(),
                ))
            }
        }

        if let Some(value) = schema.get("enum") {
            validator.enum_ = Some(EnumValidator::compile(value, uris)?);
        }
        if let Some(value) = schema.get("const") {
            validator.const_ = Some(ConstValidator::compile(value, uris));
        }
        if let Some(value) = schema.get("not") {
            validator.combined.push(NotValidator::compile(compiler, value, uris)?);
        }
        if let Some(value) = schema.get("allOf") {
            validator.combined.push(AllOfValidator::compile(compiler, value, uris)?);
        }
        if let Some(value) = schema.get("anyOf") {
            validator.combined.push(AnyOfValidator::compile(compiler, value, uris)?);
        }
        if let Some(value) = schema.get("oneOf") {
            validator.combined.push(OneOfValidator::compile(compiler, value, uris)?);
        }
        if let Some(condition) = schema.get("if") {
            validator.conditional = IfThenElseValidator::compile(compiler, condition, schema, uris)?;
        }

        Ok(Arc::new(validator))
    }

    fn initialize_type_mapping(
        &mut self,
        compiler: &mut Compiler<'_>,
        type_name: &str,
        schema: &Map<String, Value>,
        uris: &[UriWrapper],
    ) -> Result<(), SchemaError> {
        let every = type_name.is_empty();
        match type_name {
            "" | "null" | "object" | "array" | "string" | "boolean" | "integer" | "number" => {}
            other => {
                return Err(SchemaError::Schema(format!(
                    "\"{}\" is not a valid type name",
                    other
                )))
            }
        }
        if every || type_name == "null" {
            self.set(InstanceKind::Null, Arc::new(NullValidator::new(uris)));
        }
        if every || type_name == "object" {
            self.set(InstanceKind::Object, ObjectValidator::compile(compiler, schema, uris)?);
        }
        if every || type_name == "array" {
            self.set(InstanceKind::Array, ArrayValidator::compile(compiler, schema, uris)?);
        }
        if every || type_name == "string" {
            self.set(
                InstanceKind::String,
                StringValidator::compile(schema, uris, compiler.options())?,
            );
        }
        if every || type_name == "boolean" {
            self.set(InstanceKind::Boolean, Arc::new(BooleanValidator::new(uris)));
        }
        if type_name == "integer" {
            let integer: SchemaHandle = NumericValidator::<i64>::compile(schema, uris)?;
            // Doubles reach the integer validator and must round-trip.
            self.set(InstanceKind::Int64, integer.clone());
            self.set(InstanceKind::Uint64, integer.clone());
            self.set(InstanceKind::Double, integer);
        }
        if every || type_name == "number" {
            let number: SchemaHandle = NumericValidator::<f64>::compile(schema, uris)?;
            self.set(InstanceKind::Double, number.clone());
            self.set(InstanceKind::Int64, number.clone());
            self.set(InstanceKind::Uint64, number);
        }
        Ok(())
    }

    fn set(&mut self, kind: InstanceKind, handle: SchemaHandle) {
        self.type_mapping[kind.index()] = Some(handle);
    }

    fn expected_types_message(&self, found: InstanceKind) -> String {
        let mut message = String::from("Expected ");
        for (index, name) in self.expected_types.iter().enumerate() {
            if index > 0 {
                message.push_str(", ");
                if index + 1 == self.expected_types.len() {
                    message.push_str("or ");
                }
            }
            message.push_str(name);
        }
        message.push_str(", found ");
        message.push_str(&found.to_string());
        message
    }
}

impl Validate for TypeValidator {
    fn absolute_keyword_location(&self) -> &str {
        &self.location
    }

    fn validate(
        &self,
        instance: &Value,
        location: &JsonPointer,
        reporter: &mut dyn ErrorReporter,
        patch: &mut Patch,
    ) {
        let kind = InstanceKind::of(instance);
        match &self.type_mapping[kind.index()] {
            Some(validator) => validator.validate(instance, location, reporter, patch),
            None => reporter.report(ValidationOutput::new(
                location,
                self.expected_types_message(kind),
                "type",
                &self.location,
            )),
        }

        if let Some(enum_) = &self.enum_ {
            enum_.validate(instance, location, reporter, patch);
        }
        if let Some(const_) = &self.const_ {
            const_.validate(instance, location, reporter, patch);
        }
        for combined in &self.combined {
            combined.validate(instance, location, reporter, patch);
        }
        if let Some(conditional) = &self.conditional {
            conditional.validate(instance, location, reporter, patch);
        }
    }

    fn default_value(
        &self,
        _: &JsonPointer,
        _: &Value,
        _: &mut dyn ErrorReporter,
    ) -> Option<Value> {
        self.default_value.clone()
    }
}

/// Kind check for `"type": "null"`.
pub(crate) struct NullValidator {
    location: String,
}

impl NullValidator {
    pub(crate) fn new(uris: &[UriWrapper]) -> NullValidator {
        NullValidator {
            location: keyword_location(uris),
        }
    }
}

impl Validate for NullValidator {
    fn absolute_keyword_location(&self) -> &str {
        &self.location
    }

    fn validate(
        &self,
        instance: &Value,
        location: &JsonPointer,
        reporter: &mut dyn ErrorReporter,
        _: &mut Patch,
    ) {
        if !instance.is_null() {
            reporter.report(ValidationOutput::new(
                location,
                "Expected to be null",
                "null",
                &self.location,
            ));
        }
    }
}

/// Kind check for `"type": "boolean"`; the dispatch table already proved
/// the kind, so there is nothing left to verify.
pub(crate) struct BooleanValidator {
    location: String,
}

impl BooleanValidator {
    pub(crate) fn new(uris: &[UriWrapper]) -> BooleanValidator {
        BooleanValidator {
            location: keyword_location(uris),
        }
    }
}

impl Validate for BooleanValidator {
    fn absolute_keyword_location(&self) -> &str {
        &self.location
    }

    fn validate(&self, _: &Value, _: &JsonPointer, _: &mut dyn ErrorReporter, _: &mut Patch) {}
}
