//! Demo walk-through of the inventory console against the configured store.
//!
//! Creates an item through the form, imports a small sheet, searches, adjusts a quantity,
//! deletes with confirmation and writes a report into the system temp directory.

use chrono::Local;
use inventory_console::collab::{BusyFlag, Confirmation, FixedAnswer};
use inventory_console::config::ConsoleConfig;
use inventory_console::dashboard::InventoryDashboard;
use inventory_console::export::ExportOutcome;
use inventory_console::form::{FieldSchema, ItemForm};
use inventory_console::lifecycle::tracing::setup_tracing;
use inventory_console::lifecycle::InventorySystem;
use inventory_console::model::FilterPatch;
use std::sync::Arc;
use tracing::{info, warn, Instrument};

const SAMPLE_SHEET: &str = "\
UNIQID,productName,category,quantity,price,color
SKU-100,Claw Hammer,Tools,12,19.99,red
SKU-101,Paint Roller,Paint,4,7.5,
SKU-102,Masking Tape,Paint,abc,2.25,blue
";

#[tokio::main]
async fn main() -> Result<(), String> {
    setup_tracing();

    let config = ConsoleConfig::from_env().map_err(|e| e.to_string())?;
    info!(backend = ?config.backend, "Starting inventory console");
    let system = InventorySystem::start(&config);

    let span = tracing::info_span!("item_creation");
    async {
        let schema = FieldSchema::inventory_default();
        let mut form = ItemForm::new(system.client(), &schema, None).map_err(|e| e.to_string())?;
        for (name, value) in [
            ("UNIQID", "SKU-001"),
            ("productName", "Cordless Drill"),
            ("category", "Tools"),
        ] {
            form.set_value(name, value).map_err(|e| e.to_string())?;
        }
        form.set_value("quantity", 3).map_err(|e| e.to_string())?;
        form.set_value("price", 89.0).map_err(|e| e.to_string())?;
        let record = form.submit().await.map_err(|e| e.to_string())?;
        info!(id = %record.id, "Created item");
        Ok::<_, String>(())
    }
    .instrument(span)
    .await?;

    let busy = Arc::new(BusyFlag::default());
    let mut dashboard = InventoryDashboard::new(system.client(), config.dashboard_settings())
        .with_busy_indicator(busy.clone());

    let span = tracing::info_span!("import");
    async {
        let report = dashboard
            .import_file(SAMPLE_SHEET.as_bytes())
            .await
            .map_err(|e| e.to_string())?;
        info!("{}", report.message());
        for warning in &report.errors {
            warn!(%warning, "Import warning");
        }
        Ok::<_, String>(())
    }
    .instrument(span)
    .await?;

    let snapshot = dashboard.snapshot();
    info!(
        total_items = snapshot.total_items,
        total_value = snapshot.total_value,
        categories = snapshot.category_count,
        low_stock = snapshot.low_stock_count,
        "Dashboard loaded"
    );

    dashboard.search_input("pa");
    dashboard.search_input("paint");
    dashboard.settle_search().await.map_err(|e| e.to_string())?;
    info!(term = %dashboard.query().search_term, rows = dashboard.items().len(), "Search settled");

    dashboard
        .apply_filters(FilterPatch::new().category("Paint").min_price(5.0))
        .await
        .map_err(|e| e.to_string())?;

    if let Some(id) = dashboard.items().first().map(|r| r.id.clone()) {
        let updated = dashboard.increment(&id).await.map_err(|e| e.to_string())?;
        info!(%id, quantity = updated.quantity, "Restocked");

        let deleted = dashboard
            .delete_with_confirmation(&id, &FixedAnswer(Confirmation::Confirmed))
            .await
            .map_err(|e| e.to_string())?;
        info!(%id, deleted, "Delete finished");
    }

    match dashboard
        .export_report(Local::now().date_naive())
        .await
        .map_err(|e| e.to_string())?
    {
        ExportOutcome::Exported(report) => {
            let path = report
                .save(&std::env::temp_dir())
                .await
                .map_err(|e| e.to_string())?;
            info!(path = %path.display(), pages = report.pages.len(), "Report written");
        }
        ExportOutcome::NothingToExport => info!("Nothing to export"),
    }

    info!(store_calls = busy.activations(), "Demo finished");
    drop(dashboard);
    system.shutdown().await
}
