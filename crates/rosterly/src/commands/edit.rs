//! `add` and `edit` command handlers.
//!
//! Both funnel through the shared validation engine: a record that
//! fails validation is reported with every field error at once and
//! never reaches the server.

use rosterly_api::{StudentDraft, StudentsClient};
use rosterly_core::{Field, StudentForm, validate};
use url::Url;

use crate::cli::{GlobalOpts, StudentFields};
use crate::error::CliError;
use crate::output;

pub async fn handle_add(
    client: &StudentsClient,
    url: &Url,
    fields: StudentFields,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let form = apply_fields(StudentForm::default(), fields);
    let draft = validated_draft(form)?;

    let created = client
        .create(&draft)
        .await
        .map_err(|e| CliError::from_api(e, url, None))?;

    print_saved(&created, global, "Student added successfully!");
    Ok(())
}

pub async fn handle_edit(
    client: &StudentsClient,
    url: &Url,
    id: i64,
    fields: StudentFields,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    // Fetch first: unset flags keep the stored values.
    let current = client
        .get_by_id(id)
        .await
        .map_err(|e| CliError::from_api(e, url, Some(id)))?;

    let form = apply_fields(StudentForm::from_student(&current), fields);
    let draft = validated_draft(form)?;

    let updated = client
        .update(id, &draft)
        .await
        .map_err(|e| CliError::from_api(e, url, Some(id)))?;

    print_saved(&updated, global, "Student updated successfully!");
    Ok(())
}

/// Overlay the set flags onto a form.
fn apply_fields(mut form: StudentForm, fields: StudentFields) -> StudentForm {
    let overrides = [
        (Field::FirstName, fields.first_name),
        (Field::LastName, fields.last_name),
        (Field::Email, fields.email),
        (Field::Phone, fields.phone),
        (Field::Course, fields.course),
        (Field::Year, fields.year),
    ];
    for (field, value) in overrides {
        if let Some(value) = value {
            form.set(field, value);
        }
    }
    form
}

/// Validate the form and convert it to a draft, reporting all field
/// errors together on failure.
fn validated_draft(form: StudentForm) -> Result<StudentDraft, CliError> {
    let errors = validate(&form);
    if !errors.is_empty() {
        return Err(CliError::InvalidRecord { errors });
    }
    form.into_draft().ok_or_else(|| CliError::Validation {
        field: "year".into(),
        reason: "not a number".into(),
    })
}

fn print_saved(student: &rosterly_api::Student, global: &GlobalOpts, message: &str) {
    let color = output::should_color(&global.color);
    let out = output::render_single(
        &global.output,
        student,
        |s| output::student_detail(s, color),
        |s| s.id.to_string(),
    );
    output::print_output(&out, global.quiet);
    if !global.quiet {
        eprintln!("{message}");
    }
}
