use std::path::Path;

use anyhow::{Context, Result, bail};
use comfy_table::{Cell, ContentArrangement, Table};
use sporecart_app::{App, FlowSession, ImmediateRatesLoader, RatesState, ReturnsBoard, ShippingSlot};
use sporecart_core::api::RateRequest;
use sporecart_core::doctor::{CheckState, DoctorReport};
use sporecart_core::selection::DefaultPolicy;

use crate::cli::{Cli, Command, FlowArg, PolicyArg};
use crate::fixture::{Fixture, FixtureApi};

const FIXTURE_ORDER_ID: &str = "fixture-order";

pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Doctor => run_doctor_command(),
        Command::Rates {
            fixture,
            flow,
            policy,
        } => run_rates_command(&fixture, flow, policy),
        Command::Checkout { fixture, rate, note } => {
            run_checkout_command(&fixture, rate.as_deref(), &note)
        }
        Command::Returns { fixture } => run_returns_command(&fixture),
    }
}

fn run_doctor_command() -> Result<()> {
    let api = FixtureApi::new(Fixture::default());
    let app = App::new(&api);
    let report = app.doctor()?;
    print_doctor_report(&report);
    Ok(())
}

fn run_rates_command(fixture: &Path, flow: FlowArg, policy: Option<PolicyArg>) -> Result<()> {
    let api = FixtureApi::load(fixture)?;
    let app = App::new(&api);
    let policies = app.flow_policies()?;

    let (policy, request) = match flow {
        FlowArg::Checkout => (
            policy.map(DefaultPolicy::from).unwrap_or(policies.checkout),
            RateRequest::Cart {
                lines: api.cart().to_vec(),
            },
        ),
        FlowArg::Returns => (
            policy.map(DefaultPolicy::from).unwrap_or(policies.returns),
            RateRequest::Return {
                order_id: FIXTURE_ORDER_ID.to_string(),
                line_ids: Vec::new(),
            },
        ),
    };

    let loader = ImmediateRatesLoader::new(&api);
    let mut slot = ShippingSlot::new(policy);
    slot.request(&loader, request);
    slot.poll();

    print_warnings(slot.warnings());
    if let RatesState::Failed(message) = slot.state() {
        bail!("could not load shipping rates: {message}");
    }

    print_rates(&slot);
    match (slot.selected_rate(), slot.cost()) {
        (Some(rate), Some(cost)) => println!(
            "default ({}): {} {} at {cost:.2}",
            policy.label(),
            rate.object_id,
            rate.display_name()
        ),
        _ => println!("no shipping options available"),
    }

    Ok(())
}

fn run_checkout_command(fixture: &Path, rate: Option<&str>, note: &str) -> Result<()> {
    let api = FixtureApi::load(fixture)?;
    let app = App::new(&api);
    let policies = app.flow_policies()?;
    let loader = ImmediateRatesLoader::new(&api);
    let mut session = FlowSession::new(&loader, policies);

    let store = session.mount_checkout()?;
    for line in api.cart() {
        store.add_to_cart(line.clone());
    }
    if store.cart().is_empty() {
        bail!("fixture cart is empty; add a \"cart\" section to {}", fixture.display());
    }

    store.next();
    store.poll_rates();
    print_warnings(store.warnings());
    if let Some(rate_id) = rate {
        store
            .select_rate(rate_id)
            .with_context(|| format!("failed to select shipping rate '{rate_id}'"))?;
    }
    let shipping_label = store
        .selected_rate()
        .map(|selected| selected.display_name())
        .context("no shipping option available for this cart")?;

    store.next();
    store.set_order_note(note);
    store.next();
    store.set_agreed(true);

    let totals = store.totals().context("failed to compute order totals")?;
    let ack = app.place_order(store)?;

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Field", "Value"]);
    table.add_row(vec!["Order".to_string(), ack.id]);
    table.add_row(vec!["Items".to_string(), totals.item_count.to_string()]);
    table.add_row(vec!["Subtotal".to_string(), format!("{:.2}", totals.subtotal)]);
    table.add_row(vec![
        "Shipping".to_string(),
        format!("{:.2} ({shipping_label})", totals.shipping.unwrap_or(0.0)),
    ]);
    table.add_row(vec!["Total".to_string(), format!("{:.2}", totals.total)]);
    println!("{table}");

    Ok(())
}

fn run_returns_command(fixture: &Path) -> Result<()> {
    let api = FixtureApi::load(fixture)?;
    let app = App::new(&api);
    let board = app.load_returns();
    print_returns(&board);
    Ok(())
}

fn print_rates(slot: &ShippingSlot) {
    let selected = slot.selection().selected();
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["", "Rate", "Provider", "Service", "Amount"]);

    for rate in slot.rates() {
        let marker = if selected == Some(rate.object_id.as_str()) {
            "*"
        } else {
            ""
        };
        table.add_row(vec![
            Cell::new(marker),
            Cell::new(rate.object_id.as_str()),
            Cell::new(rate.provider.as_str()),
            Cell::new(rate.service.as_str()),
            Cell::new(rate.amount.as_str()),
        ]);
    }

    println!("{table}");
}

fn print_returns(board: &ReturnsBoard) {
    if let Some(warning) = board.warning() {
        eprintln!("warning: {warning}");
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Return", "Order", "Status", "Updated"]);

    for record in board.returns() {
        table.add_row(vec![
            Cell::new(record.id.as_str()),
            Cell::new(record.order_id.as_deref().unwrap_or("-")),
            Cell::new(record.status.to_string()),
            Cell::new(record.updated_at.as_str()),
        ]);
    }

    println!("{table}");
    println!("{} returns", board.returns().len());
}

fn print_warnings(warnings: &[String]) {
    for warning in warnings {
        eprintln!("warning: {warning}");
    }
}

fn print_doctor_report(report: &DoctorReport) {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Check", "Status", "Details"]);

    for check in &report.checks {
        let status = match check.state {
            CheckState::Pass => "PASS",
            CheckState::Fail => "FAIL",
        };

        table.add_row(vec![
            Cell::new(check.name.as_str()),
            Cell::new(status),
            Cell::new(check.details.as_str()),
        ]);
    }

    println!("{table}");
    println!("{}", report.summary());
}
