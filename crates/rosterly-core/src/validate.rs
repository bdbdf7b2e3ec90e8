//! Field-level validation for the student form.
//!
//! Pure and synchronous: a candidate record arrives with every field as
//! text (including `year`) and leaves as a map of per-field error
//! messages. An empty map means the record is well-formed. Every rule is
//! evaluated independently — a failure in one field never short-circuits
//! the others. Email uniqueness is NOT checked here; only the remote
//! collection can enforce it, and it surfaces as a mutation conflict.

use std::collections::BTreeMap;
use std::fmt;

use rosterly_api::{Student, StudentDraft};

/// The six editable fields of a student record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    FirstName,
    LastName,
    Email,
    Phone,
    Course,
    Year,
}

impl Field {
    /// All fields in form order.
    pub const ALL: [Field; 6] = [
        Self::FirstName,
        Self::LastName,
        Self::Email,
        Self::Phone,
        Self::Course,
        Self::Year,
    ];

    /// Human-readable label, as shown next to the input.
    pub fn label(self) -> &'static str {
        match self {
            Self::FirstName => "First Name",
            Self::LastName => "Last Name",
            Self::Email => "Email",
            Self::Phone => "Phone Number",
            Self::Course => "Course",
            Self::Year => "Year",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Per-field validation errors. Empty ⇔ the record is valid.
pub type FieldErrors = BTreeMap<Field, String>;

/// A record-in-progress: every field as text for uniform editing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StudentForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub course: String,
    pub year: String,
}

impl StudentForm {
    /// Prefill from an existing record (edit mode).
    pub fn from_student(student: &Student) -> Self {
        Self {
            first_name: student.first_name.clone(),
            last_name: student.last_name.clone(),
            email: student.email.clone(),
            phone: student.phone.clone(),
            course: student.course.clone(),
            year: student.year.to_string(),
        }
    }

    /// Read one field's current text.
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::FirstName => &self.first_name,
            Field::LastName => &self.last_name,
            Field::Email => &self.email,
            Field::Phone => &self.phone,
            Field::Course => &self.course,
            Field::Year => &self.year,
        }
    }

    /// Overwrite one field's text.
    pub fn set(&mut self, field: Field, value: String) {
        match field {
            Field::FirstName => self.first_name = value,
            Field::LastName => self.last_name = value,
            Field::Email => self.email = value,
            Field::Phone => self.phone = value,
            Field::Course => self.course = value,
            Field::Year => self.year = value,
        }
    }

    /// Build the submission payload. Returns `None` unless `year`
    /// parses — callers validate first, so `None` here means a logic bug
    /// upstream rather than user error.
    pub fn into_draft(self) -> Option<StudentDraft> {
        let year = self.year.trim().parse().ok()?;
        Some(StudentDraft {
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            phone: self.phone,
            course: self.course,
            year,
        })
    }
}

/// Check all six rules and collect the failures.
pub fn validate(form: &StudentForm) -> FieldErrors {
    let mut errors = FieldErrors::new();

    check_name(&mut errors, Field::FirstName, &form.first_name, "First name");
    check_name(&mut errors, Field::LastName, &form.last_name, "Last name");

    let email = form.email.trim();
    if email.is_empty() {
        errors.insert(Field::Email, "Email is required".into());
    } else if !is_valid_email(&form.email) {
        errors.insert(Field::Email, "Please enter a valid email address".into());
    }

    if form.phone.trim().is_empty() {
        errors.insert(Field::Phone, "Phone number is required".into());
    } else if !is_valid_phone(&form.phone) {
        errors.insert(
            Field::Phone,
            "Please enter a valid phone number (10-15 digits)".into(),
        );
    }

    check_name(&mut errors, Field::Course, &form.course, "Course");

    if form.year.trim().is_empty() {
        errors.insert(Field::Year, "Year is required".into());
    } else {
        match form.year.trim().parse::<i32>() {
            Ok(y) if (1..=6).contains(&y) => {}
            _ => {
                errors.insert(Field::Year, "Year must be between 1 and 6".into());
            }
        }
    }

    errors
}

/// Required + trimmed length ≥ 2, shared by name and course fields.
fn check_name(errors: &mut FieldErrors, field: Field, value: &str, noun: &str) {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        errors.insert(field, format!("{noun} is required"));
    } else if trimmed.chars().count() < 2 {
        errors.insert(field, format!("{noun} must be at least 2 characters"));
    }
}

/// `local@domain.tld` shape: no whitespace, exactly one `@`, non-empty
/// local part, and a dot inside the domain with at least one character
/// on each side. No further RFC compliance attempted.
fn is_valid_email(s: &str) -> bool {
    if s.chars().any(char::is_whitespace) {
        return false;
    }
    let mut parts = s.split('@');
    let (Some(local), Some(domain), None) = (parts.next(), parts.next(), parts.next()) else {
        return false;
    };
    if local.is_empty() {
        return false;
    }
    domain
        .char_indices()
        .any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len())
}

/// After removing internal whitespace: optional leading `+`, then
/// 10–15 digits.
fn is_valid_phone(s: &str) -> bool {
    let stripped: String = s.chars().filter(|c| !c.is_whitespace()).collect();
    let digits = stripped.strip_prefix('+').unwrap_or(&stripped);
    (10..=15).contains(&digits.len()) && digits.chars().all(|c| c.is_ascii_digit())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn valid_form() -> StudentForm {
        StudentForm {
            first_name: "Jo".into(),
            last_name: "Doe".into(),
            email: "jo@x.com".into(),
            phone: "1234567890".into(),
            course: "CS".into(),
            year: "3".into(),
        }
    }

    #[test]
    fn valid_record_has_no_errors() {
        assert!(validate(&valid_form()).is_empty());
    }

    #[test]
    fn short_first_name_flags_only_that_field() {
        let mut form = valid_form();
        form.first_name = "J".into();

        let errors = validate(&form);
        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors.get(&Field::FirstName).unwrap(),
            "First name must be at least 2 characters"
        );
    }

    #[test]
    fn missing_last_name_flags_only_that_field() {
        let mut form = valid_form();
        form.last_name = "   ".into();

        let errors = validate(&form);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.get(&Field::LastName).unwrap(), "Last name is required");
    }

    #[test]
    fn names_are_trimmed_before_length_check() {
        let mut form = valid_form();
        form.first_name = "  Jo  ".into();
        assert!(validate(&form).is_empty());
    }

    #[test]
    fn email_shape_is_enforced() {
        for bad in ["plainaddress", "no@dot", "two@@x.com", "spa ce@x.com", "@x.com"] {
            let mut form = valid_form();
            form.email = bad.into();
            let errors = validate(&form);
            assert_eq!(
                errors.get(&Field::Email).map(String::as_str),
                Some("Please enter a valid email address"),
                "expected rejection for {bad:?}"
            );
        }
    }

    #[test]
    fn email_accepts_simple_shapes() {
        for good in ["jo@x.com", "a.b@c.d.e", "x@sub.domain.io"] {
            let mut form = valid_form();
            form.email = good.into();
            assert!(validate(&form).is_empty(), "expected {good:?} to pass");
        }
    }

    #[test]
    fn phone_allows_plus_prefix_and_internal_whitespace() {
        let mut form = valid_form();
        form.phone = "+44 1234 567 890".into();
        assert!(validate(&form).is_empty());
    }

    #[test]
    fn phone_length_bounds() {
        for bad in ["123456789", "1234567890123456", "12345abcde"] {
            let mut form = valid_form();
            form.phone = bad.into();
            let errors = validate(&form);
            assert_eq!(errors.len(), 1, "expected rejection for {bad:?}");
            assert!(errors.contains_key(&Field::Phone));
        }
    }

    #[test]
    fn year_out_of_range_flags_only_year() {
        let mut form = valid_form();
        form.year = "7".into();

        let errors = validate(&form);
        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors.get(&Field::Year).unwrap(),
            "Year must be between 1 and 6"
        );
    }

    #[test]
    fn non_numeric_year_is_rejected() {
        let mut form = valid_form();
        form.year = "abc".into();
        assert_eq!(
            validate(&form).get(&Field::Year).unwrap(),
            "Year must be between 1 and 6"
        );
    }

    #[test]
    fn empty_year_is_reported_as_required() {
        let mut form = valid_form();
        form.year = String::new();
        assert_eq!(validate(&form).get(&Field::Year).unwrap(), "Year is required");
    }

    #[test]
    fn every_broken_field_is_reported() {
        let form = StudentForm::default();
        let errors = validate(&form);
        assert_eq!(errors.len(), 6);
        for field in Field::ALL {
            assert!(errors.contains_key(&field), "missing error for {field:?}");
        }
    }

    #[test]
    fn draft_parses_year() {
        let draft = valid_form().into_draft().unwrap();
        assert_eq!(draft.year, 3);
        assert_eq!(draft.first_name, "Jo");
    }

    #[test]
    fn draft_fails_on_unparsable_year() {
        let mut form = valid_form();
        form.year = "three".into();
        assert!(form.into_draft().is_none());
    }

    #[test]
    fn form_roundtrips_through_student() {
        let student = Student {
            id: 7,
            first_name: "Ann".into(),
            last_name: "Lee".into(),
            email: "ann@uni.edu".into(),
            phone: "1234567890".into(),
            course: "Math".into(),
            year: 2,
        };
        let form = StudentForm::from_student(&student);
        assert_eq!(form.year, "2");
        assert_eq!(form.get(Field::Email), "ann@uni.edu");
        assert!(validate(&form).is_empty());
    }
}
