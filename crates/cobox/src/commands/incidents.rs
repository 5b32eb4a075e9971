//! Incident command handlers, including responsible reassignment.

use chrono::{DateTime, Utc};
use tabled::Tabled;

use cobox_core::incident::precheck;
use cobox_core::models::{IncidentDetail, IncidentSummary};
use cobox_core::{Dashboard, FlexId, Mutation, ReassignRequest, reassignment_message};

use crate::cli::{GlobalOpts, IncidentsArgs, IncidentsCommand};
use crate::error::CliError;
use crate::output::{self, Printer};

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct IncidentRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Responsible")]
    responsible: String,
}

impl From<&IncidentSummary> for IncidentRow {
    fn from(i: &IncidentSummary) -> Self {
        Self {
            id: i.id.to_string(),
            title: i.title.clone(),
            status: i.status.clone(),
            responsible: util::or_dash(i.responsible()),
        }
    }
}

/// RFC 3339 timestamps in UTC; anything else as received.
fn timestamp(raw: Option<&str>) -> String {
    match raw {
        None => "-".into(),
        Some(s) => DateTime::parse_from_rfc3339(s).map_or_else(
            |_| s.to_owned(),
            |d| d.with_timezone(&Utc).format("%Y-%m-%d %H:%M UTC").to_string(),
        ),
    }
}

fn detail(i: &IncidentDetail) -> String {
    let mut pairs = vec![
        ("ID", i.id.to_string()),
        ("Title", i.title.clone()),
        ("Status", i.status.clone()),
        ("Responsible", util::or_dash(i.responsible())),
        ("Description", util::or_dash(i.description.as_deref())),
        ("Created", timestamp(i.created_at.as_deref())),
        ("Updated", timestamp(i.updated_at.as_deref())),
    ];
    if let Some(ref metadata) = i.metadata {
        for (key, value) in metadata {
            pairs.push((key.as_str(), value.to_string()));
        }
    }
    output::detail_lines(&pairs)
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    dashboard: &Dashboard,
    args: IncidentsArgs,
    printer: &Printer,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        IncidentsCommand::List => {
            let incidents = dashboard.incidents().await?;
            let out = output::render_list(
                printer.format,
                incidents.as_slice(),
                |i| IncidentRow::from(i),
                |i| i.id.to_string(),
            )?;
            printer.print(&out);
            Ok(())
        }

        IncidentsCommand::Get { id } => {
            let incident = fetch(dashboard, &id).await?;
            let out =
                output::render_single(printer.format, &incident, detail, |i| i.id.to_string())?;
            printer.print(&out);
            Ok(())
        }

        IncidentsCommand::Assign { id, user, reason } => {
            let current = fetch(dashboard, &id).await?;
            let req = ReassignRequest {
                incident_id: current.id.clone(),
                current_responsible: current.responsible().cloned(),
                selected_user: user.map(FlexId::from),
                reason,
            };

            // Local rules refuse before any prompt or request.
            let selected = precheck(&req)?;
            let prompt = format!(
                "Make user {selected} responsible for incident {} ({})?",
                current.id, current.title
            );
            if !util::confirm(&prompt, global.yes)? {
                return Ok(());
            }

            let updated = match dashboard.reassign_responsible(&req).await {
                Ok(updated) => updated,
                Err(e) => {
                    return Err(CliError::Rejected {
                        message: reassignment_message(&e),
                        status: e.status(),
                    });
                }
            };
            let notice = Mutation::AssignIncidentResponsible {
                incident_id: updated.id.clone(),
                user_id: selected,
            };
            printer.success(notice.success_message());

            let out =
                output::render_single(printer.format, &updated, detail, |i| i.id.to_string())?;
            printer.print(&out);
            Ok(())
        }
    }
}

async fn fetch(dashboard: &Dashboard, id: &str) -> Result<IncidentDetail, CliError> {
    let incident = dashboard
        .incident(Some(FlexId::from(id)))
        .await
        .map_err(util::lookup_error("incident", id.to_string()))?
        .into_data()
        .ok_or_else(|| CliError::Internal("incident query was disabled".into()))?;
    Ok(IncidentDetail::clone(&incident))
}
