//! Route command handlers.

use tabled::Tabled;

use cobox_core::models::{CreateRouteRequest, OrderRef, Route};
use cobox_core::{Dashboard, Mutation, MutationResult};

use crate::cli::{RoutesArgs, RoutesCommand};
use crate::error::CliError;
use crate::output::{self, Printer};

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct RouteRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Vehicle")]
    vehicle: String,
    #[tabled(rename = "Driver")]
    driver: String,
    #[tabled(rename = "Orders")]
    orders: String,
    #[tabled(rename = "Done")]
    done: String,
    #[tabled(rename = "Status")]
    status: String,
}

impl From<&Route> for RouteRow {
    fn from(r: &Route) -> Self {
        Self {
            id: r.id,
            title: r.title.clone(),
            vehicle: util::or_dash(r.vehicle()),
            driver: util::or_dash(r.driver()),
            orders: order_ids(&r.orders_ids),
            done: order_ids(&r.finished_order_ids),
            status: r.route_status.clone(),
        }
    }
}

/// Comma-separated order ids, `-` when empty.
pub(super) fn order_ids(refs: &[OrderRef]) -> String {
    if refs.is_empty() {
        return "-".into();
    }
    refs.iter()
        .map(|r| r.order_id.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

fn detail(r: &Route) -> String {
    output::detail_lines(&[
        ("ID", r.id.to_string()),
        ("Title", r.title.clone()),
        ("Vehicle", util::or_dash(r.vehicle())),
        ("Driver", util::or_dash(r.driver())),
        ("Orders", order_ids(&r.orders_ids)),
        ("Finished", order_ids(&r.finished_order_ids)),
        ("Status", r.route_status.clone()),
    ])
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    dashboard: &Dashboard,
    args: RoutesArgs,
    printer: &Printer,
) -> Result<(), CliError> {
    let mutation = match args.command {
        RoutesCommand::List => {
            let routes = dashboard.routes().await?;
            let out = output::render_list(
                printer.format,
                routes.as_slice(),
                |r| RouteRow::from(r),
                |r| r.id.to_string(),
            )?;
            printer.print(&out);
            return Ok(());
        }

        RoutesCommand::Get { id } => {
            let Some(route) = dashboard
                .route(Some(id))
                .await
                .map_err(util::lookup_error("route", id.to_string()))?
                .into_data()
            else {
                return Ok(());
            };
            let out =
                output::render_single(printer.format, &*route, detail, |r| r.id.to_string())?;
            printer.print(&out);
            return Ok(());
        }

        RoutesCommand::Create { title } => Mutation::CreateRoute(CreateRouteRequest { title }),
        RoutesCommand::AddOrder { id, order } => Mutation::AddOrderToRoute {
            route_id: id,
            order_id: order,
        },
        RoutesCommand::AssignVehicle { id, vehicle } => Mutation::AssignVehicle {
            route_id: id,
            vehicle_id: vehicle,
        },
        RoutesCommand::AssignDriver { id, driver } => Mutation::AssignDriver {
            route_id: id,
            driver_id: driver,
        },
        RoutesCommand::Start { id } => Mutation::MarkRouteInProgress { route_id: id },
    };

    let route = util::expect_result(
        util::run_mutation(dashboard, mutation, printer).await?,
        |r| match r {
            MutationResult::Route(route) => Some(route),
            _ => None,
        },
    )?;
    let out = output::render_single(printer.format, &route, detail, |r| r.id.to_string())?;
    printer.print(&out);
    Ok(())
}
