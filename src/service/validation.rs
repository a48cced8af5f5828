//! Declarative request validation. Every rule is checked and all violations are reported together.

use crate::error::{AppError, FieldError};
use crate::extractors::PointForm;
use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Email,
    Number,
    /// Comma-separated integer ids, e.g. `1,2,3`.
    IdList,
}

#[derive(Clone, Copy, Debug)]
pub struct FieldRule {
    pub name: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    pub max_length: Option<usize>,
}

impl FieldRule {
    const fn required(name: &'static str, kind: FieldKind) -> Self {
        FieldRule {
            name,
            kind,
            required: true,
            max_length: None,
        }
    }

    const fn max(mut self, n: usize) -> Self {
        self.max_length = Some(n);
        self
    }
}

/// Text fields of `POST /points`. The image part is checked separately.
pub const POINT_RULES: &[FieldRule] = &[
    FieldRule::required("name", FieldKind::Text),
    FieldRule::required("email", FieldKind::Email),
    FieldRule::required("whatsapp", FieldKind::Text),
    FieldRule::required("latitude", FieldKind::Number),
    FieldRule::required("longitude", FieldKind::Number),
    FieldRule::required("city", FieldKind::Text),
    FieldRule::required("uf", FieldKind::Text).max(2),
    FieldRule::required("itens", FieldKind::IdList),
];

const EMAIL_PATTERN: &str = r"^[^\s@]+@[^\s@]+\.[^\s@]+$";
const ID_LIST_PATTERN: &str = r"^\s*\d+\s*(,\s*\d+\s*)*$";

static EMAIL_RE: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(EMAIL_PATTERN).ok());
static ID_LIST_RE: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(ID_LIST_PATTERN).ok());

fn matches(re: &LazyLock<Option<Regex>>, v: &str) -> bool {
    re.as_ref().is_some_and(|re| re.is_match(v))
}

pub struct RequestValidator;

impl RequestValidator {
    /// Check body against rules, plus unknown keys. Err carries every violation, in rule order.
    pub fn validate(body: &HashMap<String, String>, rules: &[FieldRule]) -> Result<(), AppError> {
        let errors = Self::collect(body, rules);
        if errors.is_empty() {
            Ok(())
        } else {
            Err(AppError::Validation(errors))
        }
    }

    pub fn collect(body: &HashMap<String, String>, rules: &[FieldRule]) -> Vec<FieldError> {
        let mut errors = Vec::new();
        for rule in rules {
            match body.get(rule.name) {
                None if rule.required => {
                    errors.push(FieldError::new(rule.name, format!("\"{}\" is required", rule.name)))
                }
                None => {}
                Some(v) => {
                    if let Some(e) = validate_field(rule, v) {
                        errors.push(e);
                    }
                }
            }
        }
        let mut unknown: Vec<&String> = body
            .keys()
            .filter(|k| !rules.iter().any(|r| r.name == k.as_str()))
            .collect();
        unknown.sort();
        for key in unknown {
            errors.push(FieldError::new(key, format!("\"{}\" is not allowed", key)));
        }
        errors
    }
}

fn validate_field(rule: &FieldRule, v: &str) -> Option<FieldError> {
    let name = rule.name;
    if v.is_empty() {
        return Some(FieldError::new(name, format!("\"{}\" is not allowed to be empty", name)));
    }
    match rule.kind {
        FieldKind::Text => {}
        FieldKind::Email => {
            if !matches(&EMAIL_RE, v) {
                return Some(FieldError::new(name, format!("\"{}\" must be a valid email", name)));
            }
        }
        FieldKind::Number => {
            if !v.trim().parse::<f64>().map(f64::is_finite).unwrap_or(false) {
                return Some(FieldError::new(name, format!("\"{}\" must be a number", name)));
            }
        }
        FieldKind::IdList => {
            let fits = matches(&ID_LIST_RE, v)
                && v.split(',').all(|p| p.trim().parse::<i32>().is_ok());
            if !fits {
                return Some(FieldError::new(
                    name,
                    format!("\"{}\" must be a comma-separated list of item ids", name),
                ));
            }
        }
    }
    if let Some(max) = rule.max_length {
        if v.chars().count() > max {
            return Some(FieldError::new(
                name,
                format!("\"{}\" length must be less than or equal to {} characters long", name, max),
            ));
        }
    }
    None
}

/// Validate a whole `POST /points` form: text fields and the image part, reported together.
pub fn validate_point_form(form: &PointForm) -> Result<(), AppError> {
    let mut errors = RequestValidator::collect(&form.fields, POINT_RULES);
    match &form.image {
        None => errors.push(FieldError::new("image", "\"image\" is required")),
        Some(file) if !file.is_image() => {
            errors.push(FieldError::new("image", "\"image\" must be an image file"))
        }
        Some(_) => {}
    }
    if errors.is_empty() {
        Ok(())
    } else {
        Err(AppError::Validation(errors))
    }
}
