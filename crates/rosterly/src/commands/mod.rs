//! Command dispatch: bridges CLI args -> roster operations -> output formatting.

pub mod config_cmd;
pub mod delete;
pub mod edit;
pub mod list;
pub mod queries;
pub mod show;
pub mod util;

use rosterly_api::StudentsClient;
use url::Url;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a server-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    client: &StudentsClient,
    url: &Url,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::List(args) => list::handle(client, url, args, global).await,
        Command::Get { id } => show::handle(client, url, id, global).await,
        Command::Add(fields) => edit::handle_add(client, url, fields, global).await,
        Command::Edit { id, fields } => edit::handle_edit(client, url, id, fields, global).await,
        Command::Delete { id } => delete::handle(client, url, id, global).await,
        Command::Search { name } => queries::handle_search(client, url, &name, global).await,
        Command::ByCourse { course } => queries::handle_by_course(client, url, &course, global).await,
        Command::ByYear { year } => queries::handle_by_year(client, url, year, global).await,
        Command::ByEmail { email } => queries::handle_by_email(client, url, &email, global).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions { .. } => unreachable!(),
    }
}
