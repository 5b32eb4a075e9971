//! Order command handlers.

use tabled::Tabled;

use cobox_core::models::{CompleteOrderRequest, CreateOrderRequest, Order};
use cobox_core::{Dashboard, Mutation, MutationResult};

use crate::cli::{CompleteOrderArgs, CreateOrderArgs, OrdersArgs, OrdersCommand};
use crate::error::CliError;
use crate::output::{self, Printer};

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct OrderRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Client")]
    client: i64,
    #[tabled(rename = "Address")]
    address: String,
    #[tabled(rename = "Weight (kg)")]
    weight: f64,
    #[tabled(rename = "Status")]
    status: String,
}

impl From<&Order> for OrderRow {
    fn from(o: &Order) -> Self {
        Self {
            id: o.id,
            client: o.client_id,
            address: format!("{}, {} {}", o.address_line, o.postal_code, o.city),
            weight: o.weight_kg,
            status: o.order_status.clone(),
        }
    }
}

fn detail(o: &Order) -> String {
    output::detail_lines(&[
        ("ID", o.id.to_string()),
        ("Client", o.client_id.to_string()),
        ("Address", o.address_line.clone()),
        ("City", format!("{} {}", o.postal_code, o.city)),
        ("Country", o.country.clone()),
        (
            "Location",
            util::or_dash(o.location().map(|(lat, lon)| format!("{lat}, {lon}"))),
        ),
        ("Weight", format!("{} kg", o.weight_kg)),
        ("Notes", util::or_dash(o.notes())),
        ("Status", o.order_status.clone()),
    ])
}

fn create_request(args: CreateOrderArgs) -> Result<CreateOrderRequest, CliError> {
    if let Some(ref path) = args.from_file {
        return util::read_json_file(path);
    }
    let missing = |field: &str| CliError::Validation {
        field: field.into(),
        reason: "required unless --from-file is given".into(),
    };
    Ok(CreateOrderRequest {
        client_id: args.client_id.ok_or_else(|| missing("client-id"))?,
        address_line: args.address.ok_or_else(|| missing("address"))?,
        city: args.city.ok_or_else(|| missing("city"))?,
        country: args.country.ok_or_else(|| missing("country"))?,
        postal_code: args.postal_code.ok_or_else(|| missing("postal-code"))?,
        reference_latitude: args.lat,
        reference_longitude: args.lon,
        notes: args.notes,
        weight_kg: args.weight_kg.ok_or_else(|| missing("weight-kg"))?,
    })
}

fn complete_request(args: &CompleteOrderArgs) -> Result<CompleteOrderRequest, CliError> {
    let signature_data = match (&args.signature, &args.signature_file) {
        (Some(sig), _) => sig.clone(),
        (None, Some(path)) => std::fs::read_to_string(path)?.trim().to_owned(),
        (None, None) => {
            return Err(CliError::Validation {
                field: "signature".into(),
                reason: "provide --signature or --signature-file".into(),
            });
        }
    };
    Ok(CompleteOrderRequest {
        route_id: args.route,
        photo_url: args.photo_url.clone(),
        receiver_name: args.receiver.clone(),
        signature_data,
    })
}

fn as_order(result: MutationResult) -> Option<Order> {
    match result {
        MutationResult::Order(o) => Some(o),
        _ => None,
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    dashboard: &Dashboard,
    args: OrdersArgs,
    printer: &Printer,
) -> Result<(), CliError> {
    let mutation = match args.command {
        OrdersCommand::List => {
            let orders = dashboard.orders().await?;
            let out = output::render_list(
                printer.format,
                orders.as_slice(),
                |o| OrderRow::from(o),
                |o| o.id.to_string(),
            )?;
            printer.print(&out);
            return Ok(());
        }

        OrdersCommand::Get { id } => {
            let Some(order) = dashboard
                .order(Some(id))
                .await
                .map_err(util::lookup_error("order", id.to_string()))?
                .into_data()
            else {
                return Ok(());
            };
            let out = output::render_single(printer.format, &*order, detail, |o| o.id.to_string())?;
            printer.print(&out);
            return Ok(());
        }

        OrdersCommand::Batch { ids } => {
            let Some(orders) = dashboard.orders_by_ids(&ids).await?.into_data() else {
                return Ok(());
            };
            let out = output::render_list(
                printer.format,
                orders.as_slice(),
                |o| OrderRow::from(o),
                |o| o.id.to_string(),
            )?;
            printer.print(&out);
            return Ok(());
        }

        OrdersCommand::Create(create) => Mutation::CreateOrder(create_request(create)?),
        OrdersCommand::Ready { id } => Mutation::MarkOrderReady { order_id: id },
        OrdersCommand::Complete(complete) => Mutation::CompleteOrder {
            order_id: complete.id,
            proof: complete_request(&complete)?,
        },
    };

    let order = util::expect_result(
        util::run_mutation(dashboard, mutation, printer).await?,
        as_order,
    )?;
    let out = output::render_single(printer.format, &order, detail, |o| o.id.to_string())?;
    printer.print(&out);
    Ok(())
}
