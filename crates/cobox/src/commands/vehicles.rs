//! Vehicle command handlers.

use tabled::Tabled;

use cobox_core::models::{CreateVehicleRequest, Vehicle};
use cobox_core::{Dashboard, Mutation, MutationResult};

use crate::cli::{VehiclesArgs, VehiclesCommand};
use crate::error::CliError;
use crate::output::{self, Printer};

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct VehicleRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Plate")]
    plate: String,
    #[tabled(rename = "Capacity (kg)")]
    capacity: f64,
    #[tabled(rename = "Status")]
    status: String,
}

impl From<&Vehicle> for VehicleRow {
    fn from(v: &Vehicle) -> Self {
        Self {
            id: v.id,
            plate: v.plate_number.clone(),
            capacity: v.capacity_kg,
            status: v.vehicle_status.clone(),
        }
    }
}

fn detail(v: &Vehicle) -> String {
    output::detail_lines(&[
        ("ID", v.id.to_string()),
        ("Plate", v.plate_number.clone()),
        ("Capacity", format!("{} kg", v.capacity_kg)),
        ("Status", v.vehicle_status.clone()),
    ])
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    dashboard: &Dashboard,
    args: VehiclesArgs,
    printer: &Printer,
) -> Result<(), CliError> {
    match args.command {
        VehiclesCommand::List => {
            let vehicles = dashboard.vehicles().await?;
            let out = output::render_list(
                printer.format,
                vehicles.as_slice(),
                |v| VehicleRow::from(v),
                |v| v.id.to_string(),
            )?;
            printer.print(&out);
            Ok(())
        }

        VehiclesCommand::Get { id } => {
            let Some(vehicle) = dashboard
                .vehicle(Some(id))
                .await
                .map_err(util::lookup_error("vehicle", id.to_string()))?
                .into_data()
            else {
                return Ok(());
            };
            let out = output::render_single(printer.format, &*vehicle, detail, |v| v.id.to_string())?;
            printer.print(&out);
            Ok(())
        }

        VehiclesCommand::Create { plate, capacity_kg } => {
            let mutation = Mutation::CreateVehicle(CreateVehicleRequest {
                plate_number: plate,
                capacity_kg,
            });
            let created = util::expect_result(
                util::run_mutation(dashboard, mutation, printer).await?,
                |r| match r {
                    MutationResult::Vehicle(v) => Some(v),
                    _ => None,
                },
            )?;
            let out = output::render_single(printer.format, &created, detail, |v| v.id.to_string())?;
            printer.print(&out);
            Ok(())
        }
    }
}
