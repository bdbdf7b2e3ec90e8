//! `get` command handler.

use rosterly_api::StudentsClient;
use url::Url;

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

pub async fn handle(
    client: &StudentsClient,
    url: &Url,
    id: i64,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let student = client
        .get_by_id(id)
        .await
        .map_err(|e| CliError::from_api(e, url, Some(id)))?;

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
