//! Shared helpers for command handlers.

use std::io::IsTerminal;
use std::path::Path;

use secrecy::SecretString;

use cobox_core::{CoreError, Dashboard, Mutation, MutationResult, Navigation, View};

use crate::error::CliError;
use crate::output::Printer;

/// Run the navigation guard for `view`; a redirect to login is an error.
pub fn require_view(dashboard: &Dashboard, view: View) -> Result<(), CliError> {
    match dashboard.navigate(view) {
        Navigation::Render(_) => Ok(()),
        Navigation::Redirect(_) => Err(CliError::NotAuthenticated {
            view: view.to_string(),
        }),
    }
}

/// Execute `mutation`, printing its success or failure notice.
pub async fn run_mutation(
    dashboard: &Dashboard,
    mutation: Mutation,
    printer: &Printer,
) -> Result<MutationResult, CliError> {
    let success = mutation.success_message();
    let failure = mutation.failure_message();
    match dashboard.execute(mutation).await {
        Ok(result) => {
            printer.success(success);
            Ok(result)
        }
        Err(e) => {
            printer.failure(failure);
            Err(e.into())
        }
    }
}

/// Unwrap a result of the expected kind.
pub fn expect_result<T>(
    result: MutationResult,
    pick: impl FnOnce(MutationResult) -> Option<T>,
) -> Result<T, CliError> {
    pick(result).ok_or_else(|| CliError::Internal("mutation returned an unexpected result".into()))
}

/// Map a core failure on a single-resource read.
pub fn lookup_error(kind: &'static str, id: String) -> impl FnOnce(CoreError) -> CliError {
    move |e| CliError::from(e).for_resource(kind, id)
}

/// Prompt for confirmation, auto-approving if `--yes` was passed.
pub fn confirm(message: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    if !std::io::stdin().is_terminal() {
        return Err(CliError::NonInteractiveRequiresYes {
            action: message.into(),
        });
    }
    let confirmed = dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))?;
    Ok(confirmed)
}

/// Use the given password or prompt for one without echo.
pub fn password_or_prompt(given: Option<String>) -> Result<SecretString, CliError> {
    let password = match given {
        Some(p) => p,
        None => rpassword::prompt_password("Password: ")?,
    };
    Ok(SecretString::from(password))
}

/// Read and parse a JSON file for `--from-file` flags.
pub fn read_json_file<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, CliError> {
    let contents = std::fs::read_to_string(path)?;
    serde_json::from_str(&contents).map_err(|e| CliError::Validation {
        field: "from-file".into(),
        reason: format!("invalid JSON: {e}"),
    })
}

/// Optional value column.
pub fn or_dash<T: ToString>(value: Option<T>) -> String {
    value.map_or_else(|| "-".into(), |v| v.to_string())
}
