// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Field validators compiled from `validate` annotations.
//!
//! # Tag language
//!
//! | Tag | Validator |
//! |-----|-----------|
//! | `re/<pattern>/` | Literal regular expression |
//! | `rep/<preset>/` | Named preset (`email`) |
//! | anything else | Accepts any string |
//!
//! Tags are compiled once at registration. An unknown preset or an invalid
//! pattern is a configuration error, never a runtime one.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::error::{ValidationError, ValidatorError};

static RAW_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"re/.*/").expect("static pattern"));

static PRESET_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"rep/.*/").expect("static pattern"));

static PRESET_EMAIL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r#"^(([^<>()\[\]\\.,;:\s@"]+(\.[^<>()\[\]\\.,;:\s@"]+)*)|(".+"))@"#,
        r"((\[[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}\])|(([a-zA-Z\-0-9]+\.)+[a-zA-Z]{2,}))$"
    ))
    .expect("static pattern")
});

/// Verifies the current value of an entity field.
pub trait Validator: Send + Sync {
    /// Check `value`, reporting failures against `field`.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] describing why the value was rejected.
    fn validate(&self, field: &str, value: &Value) -> Result<(), ValidationError>;
}

#[derive(Debug, Clone)]
enum Rule {
    Any,
    Pattern(Regex),
    Preset(&'static Regex)
}

/// Regular-expression validator for string fields.
#[derive(Debug, Clone)]
pub struct StrValidator {
    tag:  String,
    rule: Rule
}

impl StrValidator {
    /// Compile a validator from its tag.
    ///
    /// # Errors
    ///
    /// [`ValidatorError::UnknownPreset`] for `rep/<name>/` with an unknown
    /// name, [`ValidatorError::InvalidPattern`] when the raw pattern does not
    /// compile.
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// let email = StrValidator::from_tag("rep/email/")?;
    /// assert!(email.is_match("email@example.com"));
    /// ```
    pub fn from_tag(tag: &str) -> Result<Self, ValidatorError> {
        let rule = if let Some(found) = RAW_TAG.find(tag) {
            let pattern = &found.as_str()[3..found.as_str().len() - 1];
            let compiled = Regex::new(pattern).map_err(|source| ValidatorError::InvalidPattern {
                pattern: pattern.to_owned(),
                source
            })?;
            Rule::Pattern(compiled)
        } else if let Some(found) = PRESET_TAG.find(tag) {
            let name = &found.as_str()[4..found.as_str().len() - 1];
            Rule::Preset(preset(name)?)
        } else {
            Rule::Any
        };
        Ok(Self {
            tag: tag.to_owned(),
            rule
        })
    }

    /// Tag the validator was compiled from.
    #[must_use]
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Check a string against the compiled rule.
    #[must_use]
    pub fn is_match(&self, input: &str) -> bool {
        match &self.rule {
            Rule::Any => true,
            Rule::Pattern(re) => re.is_match(input),
            Rule::Preset(re) => re.is_match(input)
        }
    }
}

fn preset(name: &str) -> Result<&'static Regex, ValidatorError> {
    match name {
        "email" => Ok(Lazy::force(&PRESET_EMAIL)),
        other => Err(ValidatorError::UnknownPreset(other.to_owned()))
    }
}

impl Validator for StrValidator {
    fn validate(&self, field: &str, value: &Value) -> Result<(), ValidationError> {
        let Value::String(input) = value else {
            return Err(ValidationError::InputTypeInvalid {
                field: field.to_owned()
            });
        };
        if self.is_match(input) {
            Ok(())
        } else {
            Err(ValidationError::InputInvalid {
                field: field.to_owned()
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    const VALID_EMAILS: &[&str] = &[
        "email@example.com",
        "firstname.lastname@example.com",
        "email@subdomain.example.com",
        "email@subsubdomain.subdomain.example.com",
        "firstname+lastname@example.com"
    ];

    const INVALID_EMAILS: &[&str] = &[
        "email.example.com",
        "email@example@example.com",
        ".email@example.com",
        "email.@example.com",
        "email..email@example.com",
        ""
    ];

    #[test]
    fn email_preset() {
        let validator = StrValidator::from_tag("rep/email/").unwrap();
        for email in VALID_EMAILS {
            assert!(validator.is_match(email), "{email} rejected");
        }
        for email in INVALID_EMAILS {
            assert!(!validator.is_match(email), "{email} accepted");
        }
    }

    #[test]
    fn raw_pattern() {
        let validator = StrValidator::from_tag("re/^[a-z]+$/").unwrap();
        assert!(validator.is_match("abc"));
        assert!(!validator.is_match("ABC"));
        assert_eq!(validator.tag(), "re/^[a-z]+$/");
    }

    #[test]
    fn untagged_accepts_any_string() {
        let validator = StrValidator::from_tag("whatever").unwrap();
        assert!(validator.is_match(""));
        assert!(validator.validate("name", &json!("x")).is_ok());
    }

    #[test]
    fn unknown_preset_is_rejected() {
        let err = StrValidator::from_tag("rep/phone/").unwrap_err();
        assert!(matches!(err, ValidatorError::UnknownPreset(name) if name == "phone"));
    }

    #[test]
    fn invalid_pattern_is_rejected() {
        let err = StrValidator::from_tag("re/([a-z/").unwrap_err();
        assert!(matches!(err, ValidatorError::InvalidPattern { pattern, .. } if pattern == "([a-z"));
    }

    #[test]
    fn validate_reports_field() {
        let validator = StrValidator::from_tag("rep/email/").unwrap();
        assert_eq!(
            validator.validate("email", &json!(42)),
            Err(ValidationError::InputTypeInvalid {
                field: "email".into()
            })
        );
        assert_eq!(
            validator.validate("email", &json!("nope")),
            Err(ValidationError::InputInvalid {
                field: "email".into()
            })
        );
        assert!(validator.validate("email", &json!("a@b.io")).is_ok());
    }
}
