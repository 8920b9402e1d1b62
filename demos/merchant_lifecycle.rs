//! Smoke test: create a throwaway merchant, edit it through the page
//! controller, look at its transactions, then delete it.
//!
//! Talks to the backend at `MERCHANT_API_BASE_URL` (default
//! `http://localhost:8080/api/v1`).
//!
//! Run: `cargo run --example merchant_lifecycle --features cli`

use std::process::ExitCode;

use chrono::Utc;
use merchant_dashboard::client::MerchantApiClient;
use merchant_dashboard::config::Settings;
use merchant_dashboard::form::FormField;
use merchant_dashboard::models::MerchantStatus;
use merchant_dashboard::page::{FormSubmission, MerchantsPage};
use merchant_dashboard::service::MerchantService;

fn main() -> ExitCode {
    let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(err) => {
            eprintln!("error: {err}");
            return ExitCode::FAILURE;
        }
    };
    match runtime.block_on(run()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let _dotenv = dotenvy::dotenv();

    let settings = Settings::from_env()?;
    let client = MerchantApiClient::builder()
        .base_url(settings.api_base_url.as_str())
        .timeout(settings.request_timeout)
        .build()?;
    println!("Backend: {}", client.base_url());

    let mut page = MerchantsPage::new();
    let _fetched = page.sync_list(&client).await;
    println!(
        "{}",
        page.list()
            .summary_line()
            .unwrap_or_else(|| "No merchants found".to_owned())
    );

    // Unique email so repeated runs don't collide.
    let stamp = Utc::now().timestamp();
    page.open_create();
    let form = page.form_mut().ok_or("create form did not open")?;
    form.set_field(FormField::Name, "DUMMY TEST MERCHANT");
    form.set_field(FormField::Email, format!("dummy-{stamp}@example.com"));
    form.set_field(FormField::Phone, "+1 (555) 010-0000");
    match page.submit_form(&client).await {
        FormSubmission::Created => println!("Created merchant"),
        other => {
            let reason = page
                .notification()
                .map_or_else(|| format!("{other:?}"), |note| note.message.clone());
            return Err(format!("create failed: {reason}").into());
        }
    }

    let created = client
        .all_merchants()
        .await?
        .into_iter()
        .find(|merchant| merchant.email == format!("dummy-{stamp}@example.com"))
        .ok_or("created merchant not found")?;
    let id = created.require_id()?.clone();
    println!("Verified: {id} ({})", created.name);

    page.open_edit(created.clone());
    let form = page.form_mut().ok_or("edit form did not open")?;
    form.set_field(FormField::BusinessName, "Dummy Holdings");
    form.set_status(MerchantStatus::Inactive);
    if page.submit_form(&client).await != FormSubmission::AwaitingConfirmation {
        return Err("edit was not staged for confirmation".into());
    }
    if !page.confirm_update(&client).await {
        return Err("update failed".into());
    }
    let updated = client.fetch_merchant(&id).await?;
    println!(
        "Updated: status={} business={}",
        updated.status,
        updated.business_name.as_deref().unwrap_or("-")
    );

    page.view_and_load(updated.clone(), &client).await;
    if let Some(details) = page.details_mut() {
        let count = details.summary().map_or(0, |summary| summary.total_transactions);
        println!("Transactions on record: {count}");
        for event in details.activity_timeline() {
            println!("  {} {}", event.date.format("%Y-%m-%d %H:%M"), event.description);
        }
    }
    page.close_details();

    page.request_delete(updated);
    if !page.confirm_delete(&client).await {
        return Err("delete failed".into());
    }
    println!("Deleted {id}");

    Ok(())
}
