//! Boundary validation for the wizard stages.
//!
//! Each stage is checked on its own; errors are reported per field and
//! surfaced inline, they never abort the flow.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::intake::{ContactInfo, FeaturesData, IntakeDraft, PaymentData, ProjectData};
use crate::wizard::WizardStep;

pub const PROJECT_NAME_MIN_LEN: usize = 2;
pub const PROJECT_NAME_MAX_LEN: usize = 100;
pub const DESCRIPTION_MIN_LEN: usize = 50;
pub const FULL_NAME_MIN_LEN: usize = 2;
pub const PASSWORD_MIN_LEN: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    Email,
    ProjectName,
    ProjectType,
    Description,
    Timeline,
    Budget,
    Features,
    Priority,
    Files,
    TermsAccepted,
    FullName,
    Password,
    ConfirmPassword,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldErrorKind {
    Required,
    TooShort { min_len: usize },
    TooLong { max_len: usize },
    InvalidEmail,
    Mismatch,
    UploadInProgress,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: Field,
    #[serde(flatten)]
    pub kind: FieldErrorKind,
}

impl FieldError {
    pub fn new(field: Field, kind: FieldErrorKind) -> Self {
        Self { field, kind }
    }

    pub fn required(field: Field) -> Self {
        Self::new(field, FieldErrorKind::Required)
    }
}

fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| {
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid")
    })
}

pub fn is_valid_email(email: &str) -> bool {
    email_regex().is_match(email.trim())
}

fn required(field: Field, value: &str, errors: &mut Vec<FieldError>) -> bool {
    if value.trim().is_empty() {
        errors.push(FieldError::required(field));
        return false;
    }
    true
}

pub fn validate_contact(contact: &ContactInfo) -> Vec<FieldError> {
    let mut errors = Vec::new();
    if required(Field::Email, &contact.email, &mut errors) && !is_valid_email(&contact.email) {
        errors.push(FieldError::new(Field::Email, FieldErrorKind::InvalidEmail));
    }
    errors
}

pub fn validate_project(project: &ProjectData) -> Vec<FieldError> {
    let mut errors = Vec::new();

    if required(Field::ProjectName, &project.project_name, &mut errors) {
        let len = project.project_name.trim().chars().count();
        if len < PROJECT_NAME_MIN_LEN {
            errors.push(FieldError::new(
                Field::ProjectName,
                FieldErrorKind::TooShort {
                    min_len: PROJECT_NAME_MIN_LEN,
                },
            ));
        } else if len > PROJECT_NAME_MAX_LEN {
            errors.push(FieldError::new(
                Field::ProjectName,
                FieldErrorKind::TooLong {
                    max_len: PROJECT_NAME_MAX_LEN,
                },
            ));
        }
    }

    required(Field::ProjectType, &project.project_type, &mut errors);

    if required(Field::Description, &project.description, &mut errors)
        && project.description.trim().chars().count() < DESCRIPTION_MIN_LEN
    {
        errors.push(FieldError::new(
            Field::Description,
            FieldErrorKind::TooShort {
                min_len: DESCRIPTION_MIN_LEN,
            },
        ));
    }

    required(Field::Timeline, &project.timeline, &mut errors);
    required(Field::Budget, &project.budget, &mut errors);
    errors
}

pub fn validate_features(features: &FeaturesData) -> Vec<FieldError> {
    let mut errors = Vec::new();
    if features.features.iter().all(|f| f.trim().is_empty()) {
        errors.push(FieldError::required(Field::Features));
    }
    required(Field::Priority, &features.priority, &mut errors);
    errors
}

pub fn validate_payment(payment: &PaymentData) -> Vec<FieldError> {
    if payment.terms_accepted {
        Vec::new()
    } else {
        vec![FieldError::required(Field::TermsAccepted)]
    }
}

/// Validate only the fields owned by `step`.
///
/// The contact email belongs to step 1 and is only required when nobody is
/// signed in.
pub fn validate_step(step: WizardStep, draft: &IntakeDraft, authenticated: bool) -> Vec<FieldError> {
    match step {
        WizardStep::Description => {
            let mut errors = validate_project(&draft.project);
            if !authenticated {
                errors.extend(validate_contact(&draft.contact));
            }
            errors
        }
        WizardStep::Features => validate_features(&draft.features),
        WizardStep::Files => Vec::new(),
        WizardStep::Review => {
            let mut errors = validate_project(&draft.project);
            errors.extend(validate_features(&draft.features));
            errors
        }
        WizardStep::Payment => validate_payment(&draft.payment),
    }
}

pub fn validate_full_name(name: &str) -> Option<FieldError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Some(FieldError::required(Field::FullName));
    }
    if trimmed.chars().count() < FULL_NAME_MIN_LEN {
        return Some(FieldError::new(
            Field::FullName,
            FieldErrorKind::TooShort {
                min_len: FULL_NAME_MIN_LEN,
            },
        ));
    }
    None
}

pub fn validate_password(password: &str) -> Option<FieldError> {
    if password.is_empty() {
        return Some(FieldError::required(Field::Password));
    }
    if password.chars().count() < PASSWORD_MIN_LEN {
        return Some(FieldError::new(
            Field::Password,
            FieldErrorKind::TooShort {
                min_len: PASSWORD_MIN_LEN,
            },
        ));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    pub(crate) fn shop_project() -> ProjectData {
        ProjectData {
            project_name: "Shop".into(),
            project_type: "web-app".into(),
            description: "An online shop for handmade ceramics with a small admin panel.".into(),
            timeline: "1-month".into(),
            budget: "5k-15k".into(),
        }
    }

    #[test]
    fn shop_project_passes_step_one() {
        let draft = IntakeDraft {
            project: shop_project(),
            ..Default::default()
        };
        assert!(validate_step(WizardStep::Description, &draft, true).is_empty());
    }

    #[test]
    fn unauthenticated_step_one_requires_email() {
        let draft = IntakeDraft {
            project: shop_project(),
            ..Default::default()
        };
        let errors = validate_step(WizardStep::Description, &draft, false);
        assert_eq!(errors, vec![FieldError::required(Field::Email)]);
    }

    #[test]
    fn short_description_is_rejected() {
        let mut project = shop_project();
        project.description = "too short".into();
        let errors = validate_project(&project);
        assert_eq!(
            errors,
            vec![FieldError::new(
                Field::Description,
                FieldErrorKind::TooShort { min_len: 50 }
            )]
        );
    }

    #[test]
    fn malformed_email_is_rejected() {
        assert!(is_valid_email("new@x.com"));
        assert!(!is_valid_email("new@x"));
        assert!(!is_valid_email("not an email"));
        let errors = validate_contact(&ContactInfo {
            email: "broken@".into(),
        });
        assert_eq!(errors[0].kind, FieldErrorKind::InvalidEmail);
    }

    #[test]
    fn features_need_one_entry_and_priority() {
        let errors = validate_features(&FeaturesData::default());
        assert_eq!(
            errors,
            vec![
                FieldError::required(Field::Features),
                FieldError::required(Field::Priority)
            ]
        );
    }

    #[test]
    fn files_step_has_nothing_to_validate() {
        assert!(validate_step(WizardStep::Files, &IntakeDraft::default(), false).is_empty());
    }

    #[test]
    fn password_rules() {
        assert!(validate_password("").is_some());
        assert!(validate_password("short").is_some());
        assert!(validate_password("long-enough").is_none());
    }
}
