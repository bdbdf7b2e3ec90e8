//! `list` command handler.

use rosterly_api::StudentsClient;
use rosterly_core::matches_search;
use url::Url;

use crate::cli::{GlobalOpts, ListArgs};
use crate::error::CliError;
use crate::output;

pub async fn handle(
    client: &StudentsClient,
    url: &Url,
    args: ListArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let mut students = client
        .list_all()
        .await
        .map_err(|e| CliError::from_api(e, url, None))?;

    // --search filters locally, same semantics as the TUI list view
    if let Some(ref term) = args.search {
        let needle = term.to_lowercase();
        students.retain(|s| matches_search(s, &needle));
    }

    let out = output::render_students(&global.output, &students);
    output::print_output(&out, global.quiet);

    if students.is_empty() && !global.quiet && matches!(global.output, crate::cli::OutputFormat::Table) {
        if args.search.is_some() {
            eprintln!("No students found matching your search.");
        } else {
            eprintln!("No students available. Add some students to get started!");
        }
    }
    Ok(())
}
