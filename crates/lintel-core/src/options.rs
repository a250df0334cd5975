//! Positional rule option schemas
//!
//! Rule options arrive as a JSON array (`["warn", "always", {"max": 3}]`
//! minus the severity). Each position is checked against one
//! [`OptionSchema`]; a failure names the offending path such as `[0]` or
//! `[1].max`.

use indexmap::IndexMap;
use serde_json::Value;
use std::fmt;

/// Shape accepted at one option position
#[derive(Debug, Clone, PartialEq)]
pub enum OptionSchema {
    /// Accept any JSON value
    Any,
    Boolean,
    Integer {
        minimum: Option<i64>,
        maximum: Option<i64>,
    },
    Number {
        minimum: Option<f64>,
        maximum: Option<f64>,
    },
    String,
    /// One of a fixed set of values
    Enum(Vec<Value>),
    Array {
        items: Box<OptionSchema>,
        min_items: Option<usize>,
        max_items: Option<usize>,
    },
    Object {
        properties: IndexMap<String, OptionSchema>,
        required: Vec<String>,
        additional_properties: bool,
    },
    /// Valid if at least one alternative accepts the value
    AnyOf(Vec<OptionSchema>),
}

/// A schema violation at a given path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionError {
    pub path: String,
    pub message: String,
}

impl OptionError {
    fn new(path: &str, message: impl Into<String>) -> Self {
        Self {
            path: path.to_string(),
            message: message.into(),
        }
    }
}

impl fmt::Display for OptionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

impl OptionSchema {
    pub fn integer() -> Self {
        Self::Integer {
            minimum: None,
            maximum: None,
        }
    }

    pub fn integer_in(minimum: Option<i64>, maximum: Option<i64>) -> Self {
        Self::Integer { minimum, maximum }
    }

    pub fn number() -> Self {
        Self::Number {
            minimum: None,
            maximum: None,
        }
    }

    /// Enum of string literals
    pub fn one_of<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Enum(values.into_iter().map(|v| Value::String(v.into())).collect())
    }

    pub fn array_of(items: OptionSchema) -> Self {
        Self::Array {
            items: Box::new(items),
            min_items: None,
            max_items: None,
        }
    }

    /// Empty object schema rejecting unknown properties
    pub fn object() -> Self {
        Self::Object {
            properties: IndexMap::new(),
            required: Vec::new(),
            additional_properties: false,
        }
    }

    /// Add a property to an object schema; no-op for other schemas
    pub fn property(mut self, name: impl Into<String>, schema: OptionSchema) -> Self {
        if let Self::Object { properties, .. } = &mut self {
            properties.insert(name.into(), schema);
        }
        self
    }

    /// Mark a property as required on an object schema
    pub fn require(mut self, name: impl Into<String>) -> Self {
        if let Self::Object { required, .. } = &mut self {
            required.push(name.into());
        }
        self
    }

    pub fn allow_additional(mut self) -> Self {
        if let Self::Object {
            additional_properties,
            ..
        } = &mut self
        {
            *additional_properties = true;
        }
        self
    }

    /// Short human description used in error messages
    pub fn describe(&self) -> String {
        match self {
            Self::Any => "any value".to_string(),
            Self::Boolean => "a boolean".to_string(),
            Self::Integer { .. } => "an integer".to_string(),
            Self::Number { .. } => "a number".to_string(),
            Self::String => "a string".to_string(),
            Self::Enum(values) => {
                let values: Vec<String> = values.iter().map(Value::to_string).collect();
                format!("one of {}", values.join(", "))
            }
            Self::Array { .. } => "an array".to_string(),
            Self::Object { .. } => "an object".to_string(),
            Self::AnyOf(alternatives) => {
                let alternatives: Vec<String> = alternatives.iter().map(Self::describe).collect();
                alternatives.join(" or ")
            }
        }
    }

    /// Validate `value` found at `path`
    pub fn validate(&self, value: &Value, path: &str) -> Result<(), OptionError> {
        match self {
            Self::Any => Ok(()),
            Self::Boolean => expect(value.is_boolean(), self, value, path),
            Self::String => expect(value.is_string(), self, value, path),
            Self::Integer { minimum, maximum } => {
                let Some(n) = value.as_i64() else {
                    return expect(false, self, value, path);
                };
                if let Some(min) = minimum
                    && n < *min
                {
                    return Err(OptionError::new(path, format!("must be >= {min}, got {n}")));
                }
                if let Some(max) = maximum
                    && n > *max
                {
                    return Err(OptionError::new(path, format!("must be <= {max}, got {n}")));
                }
                Ok(())
            }
            Self::Number { minimum, maximum } => {
                let Some(n) = value.as_f64() else {
                    return expect(false, self, value, path);
                };
                if let Some(min) = minimum
                    && n < *min
                {
                    return Err(OptionError::new(path, format!("must be >= {min}, got {n}")));
                }
                if let Some(max) = maximum
                    && n > *max
                {
                    return Err(OptionError::new(path, format!("must be <= {max}, got {n}")));
                }
                Ok(())
            }
            Self::Enum(values) => expect(values.contains(value), self, value, path),
            Self::Array {
                items,
                min_items,
                max_items,
            } => {
                let Some(array) = value.as_array() else {
                    return expect(false, self, value, path);
                };
                if let Some(min) = min_items
                    && array.len() < *min
                {
                    return Err(OptionError::new(path, format!("must have at least {min} items")));
                }
                if let Some(max) = max_items
                    && array.len() > *max
                {
                    return Err(OptionError::new(path, format!("must have at most {max} items")));
                }
                for (i, item) in array.iter().enumerate() {
                    items.validate(item, &format!("{path}[{i}]"))?;
                }
                Ok(())
            }
            Self::Object {
                properties,
                required,
                additional_properties,
            } => {
                let Some(object) = value.as_object() else {
                    return expect(false, self, value, path);
                };
                for name in required {
                    if !object.contains_key(name) {
                        return Err(OptionError::new(
                            &format!("{path}.{name}"),
                            "is required",
                        ));
                    }
                }
                for (key, item) in object {
                    let item_path = format!("{path}.{key}");
                    match properties.get(key) {
                        Some(schema) => schema.validate(item, &item_path)?,
                        None if *additional_properties => {}
                        None => {
                            return Err(OptionError::new(&item_path, "unknown property"));
                        }
                    }
                }
                Ok(())
            }
            Self::AnyOf(alternatives) => {
                if alternatives.iter().any(|s| s.validate(value, path).is_ok()) {
                    Ok(())
                } else {
                    expect(false, self, value, path)
                }
            }
        }
    }
}

fn expect(ok: bool, schema: &OptionSchema, value: &Value, path: &str) -> Result<(), OptionError> {
    if ok {
        Ok(())
    } else {
        Err(OptionError::new(
            path,
            format!("expected {}, got {value}", schema.describe()),
        ))
    }
}

/// Validate positional options against a positional schema.
///
/// Missing trailing options are allowed; extra options are not.
pub fn validate_options(schema: &[OptionSchema], options: &[Value]) -> Result<(), OptionError> {
    if options.len() > schema.len() {
        return Err(OptionError::new(
            &format!("[{}]", schema.len()),
            format!(
                "expected at most {} option{}, got {}",
                schema.len(),
                if schema.len() == 1 { "" } else { "s" },
                options.len()
            ),
        ));
    }
    for (i, (schema, value)) in schema.iter().zip(options).enumerate() {
        schema.validate(value, &format!("[{i}]"))?;
    }
    Ok(())
}
