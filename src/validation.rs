//! Field validation for book submissions.
//!
//! The rules live in a static table and are evaluated by [`validate`], a pure
//! function. Every field is checked; all failure messages are returned
//! together in table order. A field that fails its presence check skips the
//! rest of its rules.

use chrono::{Datelike, NaiveDate};
use validator::{ValidateLength, ValidateRange};

use crate::models::book::{BookForm, NewBook};

/// A single value rule: predicate over the trimmed, non-empty input
pub struct Rule {
    pub check: fn(&str) -> bool,
    pub message: &'static str,
}

/// All rules for one submitted field
pub struct FieldRules {
    /// Form field name (`releaseDate`, not `release_date`)
    pub field: &'static str,
    pub required_message: &'static str,
    pub rules: &'static [Rule],
}

pub const TITLE_MAX_LEN: u64 = 255;
pub const AUTHOR_MAX_LEN: u64 = 100;
pub const PUBLISHER_MAX_LEN: u64 = 100;

pub static BOOK_RULES: &[FieldRules] = &[
    FieldRules {
        field: "title",
        required_message: "Please provide a value for Title",
        rules: &[Rule {
            check: |v| v.validate_length(None, Some(TITLE_MAX_LEN), None),
            message: "Title must not be more than 255 characters long",
        }],
    },
    FieldRules {
        field: "author",
        required_message: "Please provide a value for Author",
        rules: &[Rule {
            check: |v| v.validate_length(None, Some(AUTHOR_MAX_LEN), None),
            message: "Author must not be more than 100 characters long",
        }],
    },
    FieldRules {
        field: "releaseDate",
        required_message: "Please provide a value for Release Date",
        rules: &[Rule {
            check: |v| parse_date(v).is_some(),
            message: "Please provide a valid date for Release Date",
        }],
    },
    FieldRules {
        field: "pageCount",
        required_message: "Please provide a value for Page Count",
        rules: &[Rule {
            check: |v| parse_page_count(v).is_some(),
            message: "Please provide a valid integer (0 or greater) for Page Count",
        }],
    },
    FieldRules {
        field: "publisher",
        required_message: "Please provide a value for Publisher",
        rules: &[Rule {
            check: |v| v.validate_length(None, Some(PUBLISHER_MAX_LEN), None),
            message: "Publisher must not be more than 100 characters long",
        }],
    },
];

/// One failed rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: &'static str,
}

/// Every failed rule of one submission, in rule-table order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.0
    }

    pub fn messages(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.0.iter().map(|e| e.message)
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let messages: Vec<&str> = self.messages().collect();
        f.write_str(&messages.join("; "))
    }
}

impl BookForm {
    /// Submitted value for a form field name
    pub fn field(&self, name: &str) -> Option<&str> {
        let value = match name {
            "title" => &self.title,
            "author" => &self.author,
            "releaseDate" => &self.release_date,
            "pageCount" => &self.page_count,
            "publisher" => &self.publisher,
            _ => return None,
        };
        value.as_deref()
    }
}

/// Evaluate the whole rule table against a submission.
pub fn validate(form: &BookForm) -> Result<NewBook, ValidationErrors> {
    let mut errors = Vec::new();

    for group in BOOK_RULES {
        let value = form.field(group.field).map(str::trim).unwrap_or_default();
        if value.is_empty() {
            errors.push(FieldError {
                field: group.field,
                message: group.required_message,
            });
            continue;
        }
        for rule in group.rules {
            if !(rule.check)(value) {
                errors.push(FieldError {
                    field: group.field,
                    message: rule.message,
                });
            }
        }
    }

    if !errors.is_empty() {
        return Err(ValidationErrors(errors));
    }

    let text = |v: &Option<String>| v.as_deref().map(str::trim).unwrap_or_default().to_string();
    let release_date = form.release_date.as_deref().and_then(parse_date);
    let page_count = form.page_count.as_deref().and_then(parse_page_count);

    match (release_date, page_count) {
        (Some(release_date), Some(page_count)) => Ok(NewBook {
            title: text(&form.title),
            author: text(&form.author),
            release_date,
            page_count,
            publisher: text(&form.publisher),
        }),
        // the table already accepted both fields
        _ => Err(ValidationErrors(vec![FieldError {
            field: "releaseDate",
            message: "Please provide a valid date for Release Date",
        }])),
    }
}

/// Calendar date in ISO-8601 extended (`1965-08-01`) or basic (`19650801`) form.
/// Fields must be zero padded and the year falls in 1..=9999.
fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    let bytes = value.as_bytes();
    let digits = |range: std::ops::Range<usize>| bytes[range].iter().all(u8::is_ascii_digit);

    let format = match bytes.len() {
        10 if digits(0..4) && bytes[4] == b'-' && digits(5..7) && bytes[7] == b'-' && digits(8..10) => {
            "%Y-%m-%d"
        }
        8 if digits(0..8) => "%Y%m%d",
        _ => return None,
    };
    NaiveDate::parse_from_str(value, format)
        .ok()
        .filter(|date| (1..=9999).contains(&date.year()))
}

fn parse_page_count(value: &str) -> Option<i32> {
    let count: i32 = value.trim().parse().ok()?;
    count.validate_range(Some(0), None, None, None).then_some(count)
}
