//! Response schema: a provider-neutral structural description of `RoadmapResult`.
//!
//! The same description is used twice: rendered into the provider's schema dialect
//! to constrain generation, and walked against the parsed reply to reject anything
//! that does not conform before it is deserialized.

use std::sync::OnceLock;

use serde_json::{json, Map, Value};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq)]
pub enum SchemaType {
    String {
        enum_values: Option<&'static [&'static str]>,
    },
    Integer {
        minimum: Option<i64>,
        maximum: Option<i64>,
    },
    Array(Box<Schema>),
    Object(Vec<Field>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    pub ty: SchemaType,
    pub description: Option<&'static str>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: &'static str,
    pub schema: Schema,
    pub required: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("at {path}: {reason}")]
pub struct SchemaViolation {
    /// JSON path of the offending value, e.g. `$.atsAnalysis.score`.
    pub path: String,
    pub reason: String,
}

impl Schema {
    fn new(ty: SchemaType) -> Self {
        Self {
            ty,
            description: None,
        }
    }

    pub fn string() -> Self {
        Self::new(SchemaType::String { enum_values: None })
    }

    pub fn enumeration(values: &'static [&'static str]) -> Self {
        Self::new(SchemaType::String {
            enum_values: Some(values),
        })
    }

    pub fn integer_range(minimum: i64, maximum: i64) -> Self {
        Self::new(SchemaType::Integer {
            minimum: Some(minimum),
            maximum: Some(maximum),
        })
    }

    pub fn array(items: Schema) -> Self {
        Self::new(SchemaType::Array(Box::new(items)))
    }

    pub fn object(fields: Vec<Field>) -> Self {
        Self::new(SchemaType::Object(fields))
    }

    pub fn describe(mut self, description: &'static str) -> Self {
        self.description = Some(description);
        self
    }

    /// Checks `value` against this schema. Extra object keys are allowed.
    pub fn validate(&self, value: &Value) -> Result<(), SchemaViolation> {
        self.validate_at(value, "$")
    }

    fn validate_at(&self, value: &Value, path: &str) -> Result<(), SchemaViolation> {
        let violation = |reason: String| SchemaViolation {
            path: path.to_string(),
            reason,
        };

        match &self.ty {
            SchemaType::String { enum_values } => {
                let s = value
                    .as_str()
                    .ok_or_else(|| violation(format!("expected string, found {}", kind_of(value))))?;
                if let Some(allowed) = enum_values {
                    if !allowed.contains(&s) {
                        return Err(violation(format!(
                            "\"{s}\" is not one of [{}]",
                            allowed.join(", ")
                        )));
                    }
                }
            }
            SchemaType::Integer { minimum, maximum } => {
                let n = value.as_i64().ok_or_else(|| {
                    violation(format!("expected integer, found {}", kind_of(value)))
                })?;
                if minimum.is_some_and(|min| n < min) || maximum.is_some_and(|max| n > max) {
                    return Err(violation(format!(
                        "{n} is outside [{}, {}]",
                        minimum.map_or("-inf".to_string(), |m| m.to_string()),
                        maximum.map_or("inf".to_string(), |m| m.to_string()),
                    )));
                }
            }
            SchemaType::Array(items) => {
                let elements = value
                    .as_array()
                    .ok_or_else(|| violation(format!("expected array, found {}", kind_of(value))))?;
                for (i, element) in elements.iter().enumerate() {
                    items.validate_at(element, &format!("{path}[{i}]"))?;
                }
            }
            SchemaType::Object(fields) => {
                let object = value
                    .as_object()
                    .ok_or_else(|| violation(format!("expected object, found {}", kind_of(value))))?;
                for field in fields {
                    let child_path = format!("{path}.{}", field.name);
                    match object.get(field.name) {
                        // Optional fields may be sent as explicit nulls.
                        None | Some(Value::Null) if !field.required => {}
                        None => {
                            return Err(SchemaViolation {
                                path: child_path,
                                reason: "required field is missing".to_string(),
                            })
                        }
                        Some(child) => field.schema.validate_at(child, &child_path)?,
                    }
                }
            }
        }
        Ok(())
    }

    /// Renders this schema in the Gemini `responseSchema` dialect (OpenAPI subset).
    pub fn to_gemini(&self) -> Value {
        let mut out = Map::new();
        match &self.ty {
            SchemaType::String { enum_values } => {
                out.insert("type".into(), json!("STRING"));
                if let Some(values) = enum_values {
                    out.insert("enum".into(), json!(values));
                }
            }
            SchemaType::Integer { minimum, maximum } => {
                out.insert("type".into(), json!("INTEGER"));
                if let Some(min) = minimum {
                    out.insert("minimum".into(), json!(min));
                }
                if let Some(max) = maximum {
                    out.insert("maximum".into(), json!(max));
                }
            }
            SchemaType::Array(items) => {
                out.insert("type".into(), json!("ARRAY"));
                out.insert("items".into(), items.to_gemini());
            }
            SchemaType::Object(fields) => {
                out.insert("type".into(), json!("OBJECT"));
                let properties: Map<String, Value> = fields
                    .iter()
                    .map(|f| (f.name.to_string(), f.schema.to_gemini()))
                    .collect();
                out.insert("properties".into(), Value::Object(properties));
                out.insert(
                    "propertyOrdering".into(),
                    json!(fields.iter().map(|f| f.name).collect::<Vec<_>>()),
                );
                let required: Vec<&str> = fields
                    .iter()
                    .filter(|f| f.required)
                    .map(|f| f.name)
                    .collect();
                if !required.is_empty() {
                    out.insert("required".into(), json!(required));
                }
            }
        }
        if let Some(description) = self.description {
            out.insert("description".into(), json!(description));
        }
        Value::Object(out)
    }
}

impl Field {
    pub fn required(name: &'static str, schema: Schema) -> Self {
        Self {
            name,
            schema,
            required: true,
        }
    }

    pub fn optional(name: &'static str, schema: Schema) -> Self {
        Self {
            name,
            schema,
            required: false,
        }
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_i64() || n.is_u64() => "integer",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Roadmap schema
// ────────────────────────────────────────────────────────────────────────────

pub const MATCH_LEVELS: &[&str] = &["Low", "Medium", "High"];
pub const RESOURCE_TYPES: &[&str] = &["Course", "Book", "Article", "Tool"];

/// The reply contract for roadmap generation.
pub fn roadmap_schema() -> &'static Schema {
    static SCHEMA: OnceLock<Schema> = OnceLock::new();
    SCHEMA.get_or_init(build_roadmap_schema)
}

fn string_list(description: &'static str) -> Schema {
    Schema::array(Schema::string()).describe(description)
}

fn build_roadmap_schema() -> Schema {
    let resource = Schema::object(vec![
        Field::required("title", Schema::string()),
        Field::required("type", Schema::enumeration(RESOURCE_TYPES)),
        Field::optional("provider", Schema::string()),
        Field::optional("url", Schema::string()),
        Field::optional("duration", Schema::string()),
    ]);

    let milestone = Schema::object(vec![
        Field::required(
            "title",
            Schema::string().describe("Milestone title (e.g., 'Foundational Learning')"),
        ),
        Field::required(
            "duration",
            Schema::string().describe("Duration (e.g., 'Weeks 1-4')"),
        ),
        Field::required(
            "description",
            Schema::string().describe("Goal of this phase."),
        ),
        Field::required(
            "keyActions",
            string_list("3-4 specific actionable bullet points."),
        ),
        Field::required("resources", Schema::array(resource)),
    ]);

    let ats = Schema::object(vec![
        Field::required(
            "score",
            Schema::integer_range(0, 100).describe(
                "ATS compatibility score from 0-100 based on keyword matching and formatting.",
            ),
        ),
        Field::required("matchLevel", Schema::enumeration(MATCH_LEVELS)),
        Field::required(
            "missingKeywords",
            string_list(
                "Crucial hard skills and keywords for the target role that are missing from the resume.",
            ),
        ),
        Field::required(
            "formattingIssues",
            string_list(
                "Potential formatting problems that might confuse an ATS (e.g. columns, graphics, complex headers).",
            ),
        ),
        Field::required(
            "tips",
            string_list(
                "Specific, actionable tips to improve the resume for this specific target role.",
            ),
        ),
    ]);

    Schema::object(vec![
        Field::required(
            "summary",
            Schema::string()
                .describe("A motivating executive summary of the career pivot strategy."),
        ),
        Field::required(
            "currentAnalysis",
            Schema::string().describe("Brief analysis of current transferable skills."),
        ),
        Field::required(
            "gapAnalysis",
            string_list("List of specific skill or experience gaps to bridge."),
        ),
        Field::required("timeline", Schema::array(milestone)),
        Field::required(
            "estimatedTotalTime",
            Schema::string().describe("Estimated time to be job-ready (e.g., '3-6 months')."),
        ),
        Field::required("atsAnalysis", ats),
    ])
}
