//! Schema check for incoming book payloads.
//!
//! Every failing field is reported, not just the first one.

use serde_json::{Map, Value};
use thiserror::Error;

use super::models::BookData;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text { allow_empty: bool },
    Integer,
}

/// One schema entry. An absent optional field passes; a present one is
/// still type-checked.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
    pub required: bool,
}

const fn text(name: &'static str) -> FieldSpec {
    FieldSpec {
        name,
        kind: FieldKind::Text { allow_empty: false },
        required: true,
    }
}

const fn integer(name: &'static str) -> FieldSpec {
    FieldSpec {
        name,
        kind: FieldKind::Integer,
        required: true,
    }
}

pub const BOOK_SCHEMA: &[FieldSpec] = &[
    text("isbn"),
    FieldSpec {
        name: "amazon_url",
        kind: FieldKind::Text { allow_empty: true },
        required: true,
    },
    text("author"),
    text("title"),
    text("publisher"),
    integer("year"),
    integer("pages"),
    text("language"),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("book payload failed validation on {} field(s)", .0.len())]
pub struct ValidationErrors(pub Vec<FieldError>);

impl ValidationErrors {
    pub fn fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.0.iter().map(|e| e.field)
    }
}

/// Check `body` against [`BOOK_SCHEMA`] and extract the typed payload.
pub fn validate_book(body: &Value) -> Result<BookData, ValidationErrors> {
    let Some(object) = body.as_object() else {
        return Err(ValidationErrors(vec![FieldError {
            field: "body",
            message: "must be a JSON object",
        }]));
    };

    let errors: Vec<FieldError> = BOOK_SCHEMA
        .iter()
        .filter_map(|spec| check_field(object, spec).err())
        .collect();

    if !errors.is_empty() {
        return Err(ValidationErrors(errors));
    }

    // Every field passed, so the lookups below are infallible.
    let text = |name: &str| object[name].as_str().unwrap_or_default().to_string();
    let integer = |name: &str| object[name].as_i64().unwrap_or_default();

    Ok(BookData {
        isbn: text("isbn"),
        amazon_url: text("amazon_url"),
        author: text("author"),
        title: text("title"),
        publisher: text("publisher"),
        year: integer("year"),
        pages: integer("pages"),
        language: text("language"),
    })
}

fn check_field(object: &Map<String, Value>, spec: &FieldSpec) -> Result<(), FieldError> {
    let fail = |message| FieldError {
        field: spec.name,
        message,
    };

    let value = match object.get(spec.name) {
        Some(value) => value,
        None if spec.required => return Err(fail("is required")),
        None => return Ok(()),
    };

    match spec.kind {
        FieldKind::Text { allow_empty } => match value.as_str() {
            None => Err(fail("must be a string")),
            Some(s) if !allow_empty && s.trim().is_empty() => Err(fail("must not be empty")),
            Some(_) => Ok(()),
        },
        FieldKind::Integer => match value.as_i64() {
            Some(_) => Ok(()),
            None => Err(fail("must be an integer")),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn power_up() -> Value {
        json!({
            "isbn": "0691161518",
            "amazon_url": "http://a.co/eobPtX2",
            "author": "Matthew Lane",
            "language": "english",
            "pages": 264,
            "publisher": "Princeton University Press",
            "title": "Power-Up: Unlocking the Hidden Mathematics in Video Games",
            "year": 2017
        })
    }

    #[test]
    fn accepts_complete_payload() {
        let data = validate_book(&power_up()).unwrap();
        assert_eq!(data.isbn, "0691161518");
        assert_eq!(data.year, 2017);
        assert_eq!(data.pages, 264);
        assert_eq!(data.publisher, "Princeton University Press");
    }

    #[test]
    fn reports_every_failing_field() {
        let mut body = power_up();
        let object = body.as_object_mut().unwrap();
        object.remove("author");
        object.insert("year".into(), json!("2017"));
        object.insert("title".into(), json!("   "));
        object.insert("language".into(), Value::Null);

        let errors = validate_book(&body).unwrap_err();

        assert_eq!(
            errors.0,
            vec![
                FieldError { field: "author", message: "is required" },
                FieldError { field: "title", message: "must not be empty" },
                FieldError { field: "year", message: "must be an integer" },
                FieldError { field: "language", message: "must be a string" },
            ]
        );
    }

    #[test]
    fn empty_object_lists_all_fields() {
        let errors = validate_book(&json!({})).unwrap_err();
        let fields: Vec<_> = errors.fields().collect();
        assert_eq!(
            fields,
            vec!["isbn", "amazon_url", "author", "title", "publisher", "year", "pages", "language"]
        );
    }

    #[test]
    fn fractional_numbers_are_not_integers() {
        let mut body = power_up();
        body["pages"] = json!(264.5);
        let errors = validate_book(&body).unwrap_err();
        assert_eq!(errors.fields().collect::<Vec<_>>(), vec!["pages"]);
    }

    #[test]
    fn amazon_url_may_be_empty() {
        let mut body = power_up();
        body["amazon_url"] = json!("");
        assert_eq!(validate_book(&body).unwrap().amazon_url, "");
    }

    #[test]
    fn non_object_body_is_rejected() {
        let errors = validate_book(&json!(["isbn"])).unwrap_err();
        assert_eq!(errors.fields().collect::<Vec<_>>(), vec!["body"]);
    }

    #[test]
    fn optional_field_may_be_absent_but_not_mistyped() {
        let subtitle = FieldSpec {
            name: "subtitle",
            kind: FieldKind::Text { allow_empty: false },
            required: false,
        };
        let body = json!({ "subtitle": 7 });

        assert_eq!(check_field(&Map::new(), &subtitle), Ok(()));
        assert_eq!(
            check_field(body.as_object().unwrap(), &subtitle),
            Err(FieldError { field: "subtitle", message: "must be a string" })
        );
        assert_eq!(
            check_field(&Map::new(), &text("subtitle")),
            Err(FieldError { field: "subtitle", message: "is required" })
        );
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let mut body = power_up();
        body["edition"] = json!("second");
        assert!(validate_book(&body).is_ok());
    }
}
