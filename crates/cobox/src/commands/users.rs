//! User lookup handlers.

use tabled::Tabled;

use cobox_core::Dashboard;
use cobox_core::models::User;

use crate::cli::{UsersArgs, UsersCommand};
use crate::error::CliError;
use crate::output::{self, Printer};

use super::util;

#[derive(Tabled)]
struct UserRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Email")]
    email: String,
    #[tabled(rename = "Name")]
    name: String,
}

impl From<&User> for UserRow {
    fn from(u: &User) -> Self {
        Self {
            id: u.id.to_string(),
            email: u.email.clone(),
            name: util::or_dash(u.name.as_deref()),
        }
    }
}

pub async fn handle(
    dashboard: &Dashboard,
    args: UsersArgs,
    printer: &Printer,
) -> Result<(), CliError> {
    match args.command {
        UsersCommand::Search { term } => {
            let Some(users) = dashboard.search_users(&term).await?.into_data() else {
                return Err(CliError::Validation {
                    field: "term".into(),
                    reason: "enter at least 2 characters".into(),
                });
            };
            let out = output::render_list(
                printer.format,
                users.as_slice(),
                |u| UserRow::from(u),
                |u| u.id.to_string(),
            )?;
            printer.print(&out);
            Ok(())
        }
    }
}
