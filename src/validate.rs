//! Field rules shared by the request validator and the handlers.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde_json::Value;

use crate::error::AppError;
use crate::models::{CreateTodo, NewTodo, UpdateTodo};
use crate::schema::{EnumField, CATEGORY, ENUM_FIELDS, PRIORITY, STATUS};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Four-digit year, one- or two-digit month and day, ASCII digits only.
/// chrono alone would also take signs, padding spaces and short years.
fn has_date_shape(raw: &str) -> bool {
    let mut parts = raw.split('-');
    let shaped = [4..=4, 1..=2, 1..=2].into_iter().all(|width| {
        parts.next().is_some_and(|part| {
            width.contains(&part.len()) && part.bytes().all(|b| b.is_ascii_digit())
        })
    });
    shaped && parts.next().is_none()
}

/// Parses a `yyyy-MM-dd` calendar date and returns its canonical form.
pub fn normalize_date(raw: &str) -> Result<String, AppError> {
    if !has_date_shape(raw) {
        return Err(AppError::InvalidDate);
    }
    NaiveDate::parse_from_str(raw, DATE_FORMAT)
        .map(|date| date.format(DATE_FORMAT).to_string())
        .map_err(|_| AppError::InvalidDate)
}

pub fn check_enum(field: &'static EnumField, value: &str) -> Result<(), AppError> {
    if field.accepts(value) {
        Ok(())
    } else {
        Err(AppError::InvalidEnumValue(field))
    }
}

/// Query-string and body fields of one request, body taking precedence.
#[derive(Debug, Default)]
pub struct RequestFields(HashMap<String, String>);

impl RequestFields {
    pub fn merge(query: HashMap<String, String>, body: Option<&Value>) -> Self {
        let mut fields = query;
        if let Some(Value::Object(map)) = body {
            for (key, value) in map {
                match value {
                    Value::Null => {
                        fields.remove(key);
                    }
                    Value::String(s) => {
                        fields.insert(key.clone(), s.clone());
                    }
                    other => {
                        fields.insert(key.clone(), other.to_string());
                    }
                }
            }
        }
        RequestFields(fields)
    }

    /// Empty values count as absent.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .get(name)
            .map(String::as_str)
            .filter(|value| !value.is_empty())
    }

    /// Checks present fields only: status, priority, category, then dueDate.
    pub fn validate(&self) -> Result<(), AppError> {
        for field in ENUM_FIELDS {
            if let Some(value) = self.get(field.name) {
                check_enum(field, value)?;
            }
        }
        if let Some(date) = self.get("dueDate") {
            normalize_date(date)?;
        }
        Ok(())
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

fn require_enum(field: &'static EnumField, value: &Option<String>) -> Result<String, AppError> {
    let value = present(value).ok_or(AppError::InvalidEnumValue(field))?;
    check_enum(field, value)?;
    Ok(value.to_string())
}

impl TryFrom<CreateTodo> for NewTodo {
    type Error = AppError;

    fn try_from(req: CreateTodo) -> Result<Self, Self::Error> {
        let status = require_enum(&STATUS, &req.status)?;
        let priority = require_enum(&PRIORITY, &req.priority)?;
        let category = require_enum(&CATEGORY, &req.category)?;
        let due_date = present(&req.due_date).ok_or(AppError::InvalidDate)?;

        Ok(NewTodo {
            todo: req.todo.unwrap_or_default(),
            priority,
            status,
            category,
            due_date: normalize_date(due_date)?,
        })
    }
}

/// The single column a PUT request changes.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldUpdate {
    Status(String),
    Priority(String),
    Category(String),
    Todo(String),
    DueDate(String),
}

impl FieldUpdate {
    pub fn column(&self) -> &'static str {
        match self {
            FieldUpdate::Status(_) => "status",
            FieldUpdate::Priority(_) => "priority",
            FieldUpdate::Category(_) => "category",
            FieldUpdate::Todo(_) => "todo",
            FieldUpdate::DueDate(_) => "due_date",
        }
    }

    pub fn value(&self) -> &str {
        match self {
            FieldUpdate::Status(v)
            | FieldUpdate::Priority(v)
            | FieldUpdate::Category(v)
            | FieldUpdate::Todo(v)
            | FieldUpdate::DueDate(v) => v,
        }
    }

    pub fn acknowledgement(&self) -> &'static str {
        match self {
            FieldUpdate::Status(_) => "Status Updated",
            FieldUpdate::Priority(_) => "Priority Updated",
            FieldUpdate::Category(_) => "Category Updated",
            FieldUpdate::Todo(_) => "Todo Updated",
            FieldUpdate::DueDate(_) => "Due Date Updated",
        }
    }

    /// Re-checks the chosen value and canonicalizes dates.
    fn checked(self) -> Result<Self, AppError> {
        match &self {
            FieldUpdate::Status(v) => check_enum(&STATUS, v)?,
            FieldUpdate::Priority(v) => check_enum(&PRIORITY, v)?,
            FieldUpdate::Category(v) => check_enum(&CATEGORY, v)?,
            FieldUpdate::DueDate(v) => return normalize_date(v).map(FieldUpdate::DueDate),
            FieldUpdate::Todo(_) => {}
        }
        Ok(self)
    }
}

pub struct UpdateRule {
    pub field: &'static str,
    pick: fn(&UpdateTodo) -> Option<FieldUpdate>,
}

fn pick_status(req: &UpdateTodo) -> Option<FieldUpdate> {
    present(&req.status).map(|v| FieldUpdate::Status(v.to_string()))
}

fn pick_priority(req: &UpdateTodo) -> Option<FieldUpdate> {
    present(&req.priority).map(|v| FieldUpdate::Priority(v.to_string()))
}

fn pick_category(req: &UpdateTodo) -> Option<FieldUpdate> {
    present(&req.category).map(|v| FieldUpdate::Category(v.to_string()))
}

fn pick_todo(req: &UpdateTodo) -> Option<FieldUpdate> {
    present(&req.todo).map(|v| FieldUpdate::Todo(v.to_string()))
}

fn pick_due_date(req: &UpdateTodo) -> Option<FieldUpdate> {
    present(&req.due_date).map(|v| FieldUpdate::DueDate(v.to_string()))
}

/// One field changes per request; the first present field in this list wins.
pub static UPDATE_PRECEDENCE: [UpdateRule; 5] = [
    UpdateRule { field: "status", pick: pick_status },
    UpdateRule { field: "priority", pick: pick_priority },
    UpdateRule { field: "category", pick: pick_category },
    UpdateRule { field: "todo", pick: pick_todo },
    UpdateRule { field: "dueDate", pick: pick_due_date },
];

pub fn select_update(req: &UpdateTodo) -> Result<FieldUpdate, AppError> {
    UPDATE_PRECEDENCE
        .iter()
        .find_map(|rule| (rule.pick)(req))
        .ok_or(AppError::NoUpdateField)?
        .checked()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields(body: Value) -> RequestFields {
        RequestFields::merge(HashMap::new(), Some(&body))
    }

    #[test]
    fn normalizes_valid_dates() {
        assert_eq!(normalize_date("2024-03-05").unwrap(), "2024-03-05");
        assert_eq!(normalize_date("2024-3-5").unwrap(), "2024-03-05");
        assert_eq!(normalize_date("2024-02-29").unwrap(), "2024-02-29");
    }

    #[test]
    fn rejects_malformed_dates() {
        for raw in [
            "2024-13-01",
            "2024-02-30",
            "2023-02-29",
            "not-a-date",
            "2024/03/05",
            "2024-03-05x",
            "",
            " 2024-03-05",
            "2024-03-05 ",
            "2024- 3- 5",
            "+2024-03-05",
            "-2024-03-05",
            "24-3-5",
            "02024-03-05",
            "2024-003-05",
            "2024-03-05-01",
            "２０２４-03-05",
        ] {
            assert!(
                matches!(normalize_date(raw), Err(AppError::InvalidDate)),
                "{raw} should be rejected"
            );
        }
    }

    #[test]
    fn absent_fields_pass() {
        assert!(RequestFields::default().validate().is_ok());
        assert!(fields(json!({"todo": "anything", "status": null, "priority": ""}))
            .validate()
            .is_ok());
    }

    #[test]
    fn enum_values_are_case_sensitive() {
        let err = fields(json!({"priority": "high"})).validate().unwrap_err();
        assert!(matches!(err, AppError::InvalidEnumValue(f) if f.name == "priority"));
        assert!(fields(json!({"status": "IN PROGRESS"})).validate().is_ok());
    }

    #[test]
    fn non_string_values_fail() {
        let err = fields(json!({"category": 3})).validate().unwrap_err();
        assert!(matches!(err, AppError::InvalidEnumValue(f) if f.name == "category"));
        assert!(matches!(
            fields(json!({"dueDate": 20240305})).validate(),
            Err(AppError::InvalidDate)
        ));
    }

    #[test]
    fn first_failure_in_fixed_order() {
        let req = fields(json!({
            "dueDate": "bad",
            "category": "bad",
            "priority": "bad",
            "status": "bad",
        }));
        let err = req.validate().unwrap_err();
        assert!(matches!(err, AppError::InvalidEnumValue(f) if f.name == "status"));

        let req = fields(json!({"dueDate": "bad", "category": "bad"}));
        let err = req.validate().unwrap_err();
        assert!(matches!(err, AppError::InvalidEnumValue(f) if f.name == "category"));
    }

    #[test]
    fn body_overrides_query() {
        let query = HashMap::from([("status".to_string(), "bogus".to_string())]);
        let body = json!({"status": "DONE"});
        let merged = RequestFields::merge(query, Some(&body));
        assert_eq!(merged.get("status"), Some("DONE"));
        assert!(merged.validate().is_ok());
    }

    #[test]
    fn creation_requires_enums_and_date() {
        let req = CreateTodo {
            todo: Some("Buy milk".into()),
            priority: Some("HIGH".into()),
            status: Some("TO DO".into()),
            category: Some("HOME".into()),
            due_date: Some("2024-3-5".into()),
        };
        let new = NewTodo::try_from(req.clone()).unwrap();
        assert_eq!(new.due_date, "2024-03-05");
        assert_eq!(new.todo, "Buy milk");

        let missing_date = CreateTodo { due_date: None, ..req.clone() };
        assert!(matches!(NewTodo::try_from(missing_date), Err(AppError::InvalidDate)));

        let missing_category = CreateTodo { category: None, ..req };
        assert!(matches!(
            NewTodo::try_from(missing_category),
            Err(AppError::InvalidEnumValue(f)) if f.name == "category"
        ));
    }

    #[test]
    fn update_precedence_status_first() {
        let req = UpdateTodo {
            status: Some("DONE".into()),
            priority: Some("HIGH".into()),
            todo: Some("ignored".into()),
            ..Default::default()
        };
        let update = select_update(&req).unwrap();
        assert_eq!(update, FieldUpdate::Status("DONE".into()));
        assert_eq!(update.acknowledgement(), "Status Updated");
    }

    #[test]
    fn update_skips_empty_fields() {
        let req = UpdateTodo {
            status: Some(String::new()),
            todo: Some("Buy milk and bread".into()),
            due_date: Some("2024-04-01".into()),
            ..Default::default()
        };
        let update = select_update(&req).unwrap();
        assert_eq!(update.column(), "todo");
        assert_eq!(update.acknowledgement(), "Todo Updated");
    }

    #[test]
    fn update_normalizes_due_date() {
        let req = UpdateTodo {
            due_date: Some("2024-4-1".into()),
            ..Default::default()
        };
        let update = select_update(&req).unwrap();
        assert_eq!(update.column(), "due_date");
        assert_eq!(update.value(), "2024-04-01");

        let bad = UpdateTodo {
            due_date: Some("2024-04-31".into()),
            ..Default::default()
        };
        assert!(matches!(select_update(&bad), Err(AppError::InvalidDate)));
    }

    #[test]
    fn empty_update_rejected() {
        assert!(matches!(
            select_update(&UpdateTodo::default()),
            Err(AppError::NoUpdateField)
        ));
    }

    #[test]
    fn precedence_order_is_fixed() {
        let order: Vec<_> = UPDATE_PRECEDENCE.iter().map(|rule| rule.field).collect();
        assert_eq!(order, ["status", "priority", "category", "todo", "dueDate"]);
    }
}
