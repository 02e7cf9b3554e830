// fieldforce-client/examples/offline_demo.rs
// Walkthrough of the offline-tolerant flow: refresh against the
// configured backend (unreachable is fine), then add records and hand
// out samples with everything landing in the local store.

use fieldforce_client::resources::{DoctorFilter, DoctorManager, StockManager};
use fieldforce_client::{ApiClient, ClientConfig, LocalStore};
use shared::models::{DoctorCreate, StockItemCreate};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt::init();

    let config = ClientConfig::from_env();
    tracing::info!(base_url = %config.base_url, data_dir = %config.data_dir.display(), "starting");

    let api = ApiClient::new(&config)?;
    let store = LocalStore::new(&config.data_dir)?;

    let mut doctors = DoctorManager::new(api.clone(), store.clone());
    let mut stock = StockManager::new(api, store);

    let (doctor_mode, stock_mode) = tokio::join!(doctors.refresh(), stock.refresh());
    tracing::info!(?doctor_mode, ?stock_mode, "initial sync done");

    doctors
        .add(DoctorCreate {
            name: "Dr. Mehta".to_string(),
            contact_type: None,
            specialty: "Cardiology".to_string(),
            phone: Some("+91 98200 00000".to_string()),
            email: None,
            clinic_name: Some("City Clinic".to_string()),
            address: None,
            city: Some("Pune".to_string()),
            assigned_mr: Some("priya@kavya.example".to_string()),
            notes: None,
        })
        .await?;

    let filter = DoctorFilter {
        search: "mehta".to_string(),
        specialty: String::new(),
    };
    let (rows, pagination) = doctors.page(&filter, 1);
    tracing::info!(
        rows = rows.len(),
        page = pagination.page,
        total = pagination.total,
        "doctor directory page"
    );

    stock
        .add_item(StockItemCreate {
            name: "Paracetamol 500mg".to_string(),
            batch_number: Some("B-2025-08".to_string()),
            total_stock: 100,
            unit_price: Some(2.4),
            expiry_date: Some("2026-12-31".to_string()),
            description: None,
        })
        .await?;
    let product_id = stock.items().last().expect("just added").id.clone();
    stock
        .distribute(&product_id, "Priya Sharma", 30, None, None)
        .await?;

    let item = stock.get(&product_id).expect("just added");
    tracing::info!(
        remaining = item.remaining(),
        distributed = item.distributed,
        "stock after distribution"
    );
    let summary = stock.summary();
    tracing::info!(?summary, "warehouse summary");

    Ok(())
}
