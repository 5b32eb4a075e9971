//! Session command handlers: login, register, logout, whoami, nav.

use dialoguer::Input;
use serde::Serialize;
use tabled::Tabled;

use cobox_core::models::SignUpRequest;
use cobox_core::{Dashboard, Navigation, View};

use crate::cli::{LoginArgs, NavArgs, RegisterArgs};
use crate::error::CliError;
use crate::output::{self, Printer};

use super::util;

pub async fn login(
    dashboard: &Dashboard,
    args: LoginArgs,
    printer: &Printer,
) -> Result<(), CliError> {
    let email = match args.email {
        Some(email) => email,
        None => Input::<String>::new()
            .with_prompt("Email")
            .interact_text()
            .map_err(|e| CliError::Io(std::io::Error::other(e)))?,
    };
    let password = util::password_or_prompt(args.password)?;

    let session = dashboard.login(&email, password).await?;
    printer.success(&format!("Signed in as {}", session.user.email));
    Ok(())
}

pub async fn register(
    dashboard: &Dashboard,
    args: RegisterArgs,
    printer: &Printer,
) -> Result<(), CliError> {
    let password = util::password_or_prompt(args.password)?;
    let req = SignUpRequest {
        email: args.email,
        password,
        first_name: args.first_name,
        last_name: args.last_name,
        phone: args.phone,
        roles: (!args.roles.is_empty()).then_some(args.roles),
    };

    let created = dashboard.register(&req).await?;
    printer.success(&format!(
        "Account {} created. Sign in with `cobox login`.",
        created.email
    ));
    Ok(())
}

pub fn logout(dashboard: &Dashboard, printer: &Printer) {
    dashboard.logout();
    printer.success("Signed out");
}

// ── whoami ──────────────────────────────────────────────────────────

#[derive(Serialize)]
struct WhoAmI<'a> {
    id: i64,
    email: &'a str,
    roles: &'a [String],
    manager: bool,
}

pub fn whoami(dashboard: &Dashboard, printer: &Printer) -> Result<(), CliError> {
    let Some(session) = dashboard.session().current() else {
        return Err(CliError::NotAuthenticated {
            view: View::Home.to_string(),
        });
    };
    let me = WhoAmI {
        id: session.user.id,
        email: &session.user.email,
        roles: &session.user.roles,
        manager: session.is_manager(),
    };
    let out = output::render_single(
        printer.format,
        &me,
        |m| {
            output::detail_lines(&[
                ("ID", m.id.to_string()),
                ("Email", m.email.to_owned()),
                ("Roles", m.roles.join(", ")),
                ("Manager", m.manager.to_string()),
            ])
        },
        |m| m.email.to_owned(),
    )?;
    printer.print(&out);
    Ok(())
}

// ── nav ─────────────────────────────────────────────────────────────

#[derive(Clone, Serialize, Tabled)]
struct NavRow {
    #[tabled(rename = "View")]
    view: String,
    #[tabled(rename = "Path")]
    path: &'static str,
    #[tabled(rename = "Title")]
    title: String,
}

impl From<View> for NavRow {
    fn from(v: View) -> Self {
        Self {
            view: v.to_string(),
            path: v.path(),
            title: v.page_title(),
        }
    }
}

/// Without a path: list the sidebar. With a path: show where the guard
/// sends the current session.
pub fn nav(dashboard: &Dashboard, args: NavArgs, printer: &Printer) -> Result<(), CliError> {
    let Some(path) = args.path else {
        let rows: Vec<NavRow> = dashboard.sidebar().into_iter().map(NavRow::from).collect();
        let out = output::render_list(
            printer.format,
            rows.as_slice(),
            NavRow::clone,
            |r| r.path.to_owned(),
        )?;
        printer.print(&out);
        return Ok(());
    };

    let view = View::from_path(&path).ok_or_else(|| CliError::Validation {
        field: "path".into(),
        reason: format!("no dashboard view at '{path}'"),
    })?;
    let row = match dashboard.navigate(view) {
        Navigation::Render(v) => NavRow::from(v),
        Navigation::Redirect(v) => {
            printer.failure(&format!("{view} requires a session; redirecting"));
            NavRow::from(v)
        }
    };
    let out = output::render_single(
        printer.format,
        &row,
        |r| {
            output::detail_lines(&[
                ("View", r.view.clone()),
                ("Path", r.path.to_owned()),
                ("Title", r.title.clone()),
            ])
        },
        |r| r.path.to_owned(),
    )?;
    printer.print(&out);
    Ok(())
}
