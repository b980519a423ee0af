use inventory_console::dashboard::{DashboardSettings, InventoryDashboard};
use inventory_console::form::{FieldSchema, FormError, FormMode, ItemForm, INVALID_FORM};
use inventory_console::framework::mock::MockStore;
use inventory_console::import::{ImportError, ImportPipeline};
use inventory_console::lifecycle::InventorySystem;
use inventory_console::model::{FileUpload, Record};
use pretty_assertions::assert_eq;
use serde_json::json;

fn filled_form(form: &mut ItemForm, uniqid: &str, name: &str) {
    form.set_value("UNIQID", uniqid).unwrap();
    form.set_value("productName", name).unwrap();
    form.set_value("category", "Tools").unwrap();
    form.set_value("quantity", 4).unwrap();
    form.set_value("price", 12.5).unwrap();
}

#[tokio::test]
async fn test_create_then_edit_round_trip() {
    let system = InventorySystem::in_memory(Vec::new());
    let schema = FieldSchema::inventory_default();

    let mut form = ItemForm::new(system.client(), &schema, None).unwrap();
    assert_eq!(form.mode(), &FormMode::Create);
    filled_form(&mut form, "SKU-1", "Spirit Level");
    let created = form.submit().await.expect("create");
    assert_eq!(created.quantity, 4);
    assert!(created.date_added.is_some());

    let mut edit = ItemForm::new(system.client(), &schema, Some(created.id.clone())).unwrap();
    assert_eq!(edit.load_for_edit().await.unwrap(), 5);
    assert_eq!(edit.form().value("productName"), Some(&json!("Spirit Level")));

    edit.set_value("quantity", 9).unwrap();
    let updated = edit.submit().await.expect("update");
    assert_eq!(updated.id, created.id);
    assert_eq!(updated.quantity, 9);
    assert_eq!(updated.uniqid.as_deref(), Some("SKU-1"));
    assert_eq!(updated.date_added, created.date_added);
}

#[tokio::test]
async fn test_duplicate_uniqid_surfaces_store_message() {
    let existing = Record::new("a", "Saw", "Tools", 1, 20.0).with_uniqid("DUP");
    let system = InventorySystem::in_memory(vec![existing]);
    let schema = FieldSchema::inventory_default();

    let mut form = ItemForm::new(system.client(), &schema, None).unwrap();
    filled_form(&mut form, "DUP", "Another Saw");
    let err = form.submit().await.unwrap_err();

    let message = "An item with UNIQID 'DUP' already exists.";
    assert_eq!(err, FormError::Conflict(message.into()));
    assert_eq!(form.error_message(), Some(message));

    // editing clears the surfaced message
    form.set_value("UNIQID", "DUP-2").unwrap();
    assert_eq!(form.error_message(), None);
}

#[tokio::test]
async fn test_invalid_form_never_reaches_the_store() {
    let mock = MockStore::new();
    let schema = FieldSchema::inventory_default();
    let mut form = ItemForm::new(mock.client(), &schema, None).unwrap();
    form.set_value("productName", "Nameless").unwrap();
    form.set_value("quantity", -1).unwrap();

    let Err(FormError::Invalid { fields }) = form.submit().await else {
        panic!("expected an invalid form");
    };
    assert!(fields.contains(&"quantity".to_string()));
    assert!(fields.contains(&"UNIQID".to_string()));
    assert_eq!(form.error_message(), Some(INVALID_FORM));
    assert!(mock.requests().is_empty());
}

#[tokio::test]
async fn test_import_coerces_numbers_and_reports_row_errors() {
    let existing = Record::new("a", "Saw", "Tools", 1, 20.0).with_uniqid("SKU-1");
    let system = InventorySystem::in_memory(vec![existing]);
    let mut dashboard = InventoryDashboard::new(system.client(), DashboardSettings::default());

    let sheet = "\
UNIQID,productName,category,quantity,price,color
SKU-2,Chisel,Tools,abc,12.5,blue
SKU-1,Duplicate Saw,Tools,3,20,
SKU-3,Brush,Paint,7,,
";
    let report = dashboard.import_file(sheet.as_bytes()).await.unwrap();
    assert_eq!(report.submitted, 3);
    assert_eq!(report.inserted_count, 2);
    assert_eq!(report.message(), "2 items imported successfully!");
    assert_eq!(
        report.errors,
        vec!["Row 2: An item with UNIQID 'SKU-1' already exists.".to_string()]
    );

    // both views were refreshed
    assert_eq!(dashboard.items().len(), 3);
    assert_eq!(dashboard.snapshot().total_items, 3);

    let chisel = dashboard
        .items()
        .iter()
        .find(|r| r.product_name == "Chisel")
        .unwrap();
    assert_eq!(chisel.quantity, 0);
    assert_eq!(chisel.price, 12.5);
    assert_eq!(chisel.extra.get("color"), Some(&json!("blue")));
}

#[tokio::test]
async fn test_ingest_goes_through_the_store() {
    let system = InventorySystem::in_memory(Vec::new());
    let mut dashboard = InventoryDashboard::new(system.client(), DashboardSettings::default());

    let upload = FileUpload::new(
        "items.csv",
        "productName,category,quantity,price\nLadder,Tools,2,80\n",
    );
    let outcome = dashboard.ingest_file(upload).await.unwrap();
    assert_eq!(outcome.items_parsed, 1);
    assert_eq!(outcome.items_inserted, 1);
    assert_eq!(dashboard.snapshot().total_value, 160.0);

    let pipeline = ImportPipeline::new(system.client());
    let err = pipeline
        .ingest_file(FileUpload::new("empty.csv", ""))
        .await
        .unwrap_err();
    assert!(matches!(err, ImportError::Rejected(detail) if detail.starts_with("empty.csv")));
}
