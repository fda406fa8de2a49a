use serde_json::{Map, Value};

/// A todo field whose values are restricted to a fixed set.
#[derive(Debug)]
pub struct EnumField {
    pub name: &'static str,
    pub label: &'static str,
    pub allowed: &'static [&'static str],
}

impl EnumField {
    /// Exact, case-sensitive membership.
    pub fn accepts(&self, value: &str) -> bool {
        self.allowed.contains(&value)
    }
}

pub static STATUS: EnumField = EnumField {
    name: "status",
    label: "Status",
    allowed: &["TO DO", "IN PROGRESS", "DONE"],
};

pub static PRIORITY: EnumField = EnumField {
    name: "priority",
    label: "Priority",
    allowed: &["HIGH", "MEDIUM", "LOW"],
};

pub static CATEGORY: EnumField = EnumField {
    name: "category",
    label: "Category",
    allowed: &["WORK", "HOME", "LEARNING"],
};

/// Checked in this order; the first failing field is reported.
pub static ENUM_FIELDS: [&EnumField; 3] = [&STATUS, &PRIORITY, &CATEGORY];

pub fn enum_field(name: &str) -> Option<&'static EnumField> {
    ENUM_FIELDS.iter().copied().find(|field| field.name == name)
}

/// The table as `{field: [allowed...]}`, served by `GET /schema/`.
pub fn describe() -> Value {
    let fields: Map<String, Value> = ENUM_FIELDS
        .iter()
        .map(|field| (field.name.to_string(), Value::from(field.allowed.to_vec())))
        .collect();
    Value::Object(fields)
}
