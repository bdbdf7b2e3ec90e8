//! Server-side query command handlers: `search`, `by-course`,
//! `by-year`, `by-email`.

use rosterly_api::StudentsClient;
use url::Url;

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

pub async fn handle_search(
    client: &StudentsClient,
    url: &Url,
    name: &str,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let students = client
        .search_by_name(name)
        .await
        .map_err(|e| CliError::from_api(e, url, None))?;
    let out = output::render_students(&global.output, &students);
    output::print_output(&out, global.quiet);
    Ok(())
}

pub async fn handle_by_course(
    client: &StudentsClient,
    url: &Url,
    course: &str,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let students = client
        .by_course(course)
        .await
        .map_err(|e| CliError::from_api(e, url, None))?;
    let out = output::render_students(&global.output, &students);
    output::print_output(&out, global.quiet);
    Ok(())
}

pub async fn handle_by_year(
    client: &StudentsClient,
    url: &Url,
    year: i32,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    if !(1..=6).contains(&year) {
        return Err(CliError::Validation {
            field: "year".into(),
            reason: "must be between 1 and 6".into(),
        });
    }
    let students = client
        .by_year(year)
        .await
        .map_err(|e| CliError::from_api(e, url, None))?;
    let out = output::render_students(&global.output, &students);
    output::print_output(&out, global.quiet);
    Ok(())
}

pub async fn handle_by_email(
    client: &StudentsClient,
    url: &Url,
    email: &str,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let student = client.by_email(email).await.map_err(|e| match e {
        rosterly_api::Error::NotFound => CliError::EmailNotFound {
            email: email.to_string(),
        },
        other => CliError::from_api(other, url, None),
    })?;

    let color = output::should_color(&global.color);
    let out = output::render_single(
        &global.output,
        &student,
        |s| output::student_detail(s, color),
        |s| s.id.to_string(),
    );
    output::print_output(&out, global.quiet);
    Ok(())
}
