//! Driver command handlers.

use tabled::Tabled;

use cobox_core::models::{CreateDriverRequest, Driver, DriverRoute};
use cobox_core::{Dashboard, Mutation, MutationResult};

use crate::cli::{DriversArgs, DriversCommand};
use crate::error::CliError;
use crate::output::{self, Printer};

use super::routes::order_ids;
use super::util;

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct DriverRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Licence")]
    licence: String,
    #[tabled(rename = "Status")]
    status: String,
}

impl From<&Driver> for DriverRow {
    fn from(d: &Driver) -> Self {
        Self {
            id: d.id,
            licence: d.licence_number.clone(),
            status: d.driver_status.clone(),
        }
    }
}

#[derive(Tabled)]
struct DriverRouteRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Vehicle")]
    vehicle: i64,
    #[tabled(rename = "Orders")]
    orders: String,
    #[tabled(rename = "Done")]
    done: String,
    #[tabled(rename = "Status")]
    status: String,
}

impl From<&DriverRoute> for DriverRouteRow {
    fn from(r: &DriverRoute) -> Self {
        Self {
            id: r.id,
            title: r.title.clone(),
            vehicle: r.vehicle_id,
            orders: order_ids(&r.orders_ids),
            done: order_ids(&r.finished_order_ids),
            status: r.route_status.clone(),
        }
    }
}

fn detail(d: &Driver) -> String {
    output::detail_lines(&[
        ("ID", d.id.to_string()),
        ("Licence", d.licence_number.clone()),
        ("Status", d.driver_status.clone()),
    ])
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    dashboard: &Dashboard,
    args: DriversArgs,
    printer: &Printer,
) -> Result<(), CliError> {
    match args.command {
        DriversCommand::List => {
            let drivers = dashboard.drivers().await?;
            let out = output::render_list(
                printer.format,
                drivers.as_slice(),
                |d| DriverRow::from(d),
                |d| d.id.to_string(),
            )?;
            printer.print(&out);
            Ok(())
        }

        DriversCommand::Get { id } => {
            let Some(driver) = dashboard
                .driver(Some(id))
                .await
                .map_err(util::lookup_error("driver", id.to_string()))?
                .into_data()
            else {
                return Ok(());
            };
            let out = output::render_single(printer.format, &*driver, detail, |d| d.id.to_string())?;
            printer.print(&out);
            Ok(())
        }

        DriversCommand::Create { licence } => {
            let mutation = Mutation::CreateDriver(CreateDriverRequest {
                licence_number: licence,
            });
            let created = util::expect_result(
                util::run_mutation(dashboard, mutation, printer).await?,
                |r| match r {
                    MutationResult::Driver(d) => Some(d),
                    _ => None,
                },
            )?;
            let out = output::render_single(printer.format, &created, detail, |d| d.id.to_string())?;
            printer.print(&out);
            Ok(())
        }

        DriversCommand::Routes { id } => {
            let Some(routes) = dashboard
                .driver_routes(Some(id))
                .await
                .map_err(util::lookup_error("driver", id.to_string()))?
                .into_data()
            else {
                return Ok(());
            };
            let out = output::render_list(
                printer.format,
                routes.as_slice(),
                |r| DriverRouteRow::from(r),
                |r| r.id.to_string(),
            )?;
            printer.print(&out);
            Ok(())
        }
    }
}
