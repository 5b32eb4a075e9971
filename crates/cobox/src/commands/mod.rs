//! Command dispatch: bridges CLI args -> dashboard operations -> output formatting.

pub mod auth;
pub mod config_cmd;
pub mod drivers;
pub mod incidents;
pub mod orders;
pub mod routes;
pub mod users;
pub mod util;
pub mod vehicles;

use cobox_core::{Dashboard, View};

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;
use crate::output::Printer;

/// Dispatch a backend-bound command to the appropriate handler.
///
/// Protected commands pass the navigation guard for their dashboard
/// view before any request is made.
pub async fn dispatch(
    cmd: Command,
    dashboard: &Dashboard,
    printer: &Printer,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Login(args) => auth::login(dashboard, args, printer).await,
        Command::Register(args) => auth::register(dashboard, args, printer).await,
        Command::Logout => {
            auth::logout(dashboard, printer);
            Ok(())
        }
        Command::Whoami => {
            util::require_view(dashboard, View::Home)?;
            auth::whoami(dashboard, printer)
        }
        Command::Nav(args) => auth::nav(dashboard, args, printer),
        Command::Vehicles(args) => {
            util::require_view(dashboard, View::Vehicles)?;
            vehicles::handle(dashboard, args, printer).await
        }
        Command::Drivers(args) => {
            util::require_view(dashboard, View::Drivers)?;
            drivers::handle(dashboard, args, printer).await
        }
        Command::Orders(args) => {
            util::require_view(dashboard, View::Orders)?;
            orders::handle(dashboard, args, printer).await
        }
        Command::Routes(args) => {
            util::require_view(dashboard, View::Routes)?;
            routes::handle(dashboard, args, printer).await
        }
        Command::Incidents(args) => {
            util::require_view(dashboard, View::Incidents)?;
            incidents::handle(dashboard, args, printer, global).await
        }
        Command::Users(args) => {
            util::require_view(dashboard, View::Incidents)?;
            users::handle(dashboard, args, printer).await
        }
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => Err(CliError::Internal(
            "command does not need a backend".into(),
        )),
    }
}
