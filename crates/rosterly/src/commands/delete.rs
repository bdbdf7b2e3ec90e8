//! `delete` command handler.

use rosterly_api::StudentsClient;
use url::Url;

use crate::cli::GlobalOpts;
use crate::error::CliError;

use super::util;

pub async fn handle(
    client: &StudentsClient,
    url: &Url,
    id: i64,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    // Fetch first so the prompt can name the record, and so a bad id
    // fails before any confirmation.
    let student = client
        .get_by_id(id)
        .await
        .map_err(|e| CliError::from_api(e, url, Some(id)))?;

    if !util::confirm(
        &format!("Delete student '{}' (id {id})?", student.full_name()),
        global.yes,
    )? {
        return Ok(());
    }

    client
        .delete(id)
        .await
        .map_err(|e| CliError::from_api(e, url, Some(id)))?;

    if !global.quiet {
        eprintln!("Student deleted successfully!");
    }
    Ok(())
}
