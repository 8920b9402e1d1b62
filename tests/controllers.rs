//! End-to-end controller flows against the in-memory backend.
#![cfg(feature = "async")]

use merchant_dashboard::details::CSV_HEADER;
use merchant_dashboard::form::FormField;
use merchant_dashboard::models::{
    DateTime, MerchantFormData, MerchantStatus, NaiveDate, Transaction, TransactionId,
    TransactionStatus, Utc,
};
use merchant_dashboard::page::{
    CREATED, DELETED, FormSubmission, MerchantsPage, NotificationKind, Overlay, UPDATED,
};
use merchant_dashboard::service::{InMemoryService, Operation};

fn draft(name: &str) -> MerchantFormData {
    MerchantFormData {
        name: name.to_owned(),
        email: format!("{}@shop.test", name.to_lowercase()),
        phone: "+1 (555) 010-0000".to_owned(),
        ..MerchantFormData::default()
    }
}

fn txn(id: i64, status: TransactionStatus, amount: f64, when: &str) -> Transaction {
    Transaction {
        txn_id: TransactionId::new(id),
        amount,
        currency: "USD".to_owned(),
        status,
        timestamp: when.parse::<DateTime<Utc>>().unwrap(),
        card_type: "Visa".to_owned(),
        card_last4: "4242".to_owned(),
        acquirer: "Chase".to_owned(),
        issuer: "Citi".to_owned(),
        details: Vec::new(),
    }
}

#[tokio::test]
async fn merchant_lifecycle_through_the_page() {
    let service = InMemoryService::with_merchants([draft("Beta"), draft("Alpha")]).unwrap();
    let mut page = MerchantsPage::new();

    assert!(page.sync_list(&service).await);
    let names: Vec<_> = page.list().merchants().iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names, ["Alpha", "Beta"]);
    assert_eq!(page.list().summary_line().as_deref(), Some("Showing 2 of 2 merchants"));
    assert!(!page.sync_list(&service).await);

    // Create.
    page.open_create();
    let form = page.form_mut().unwrap();
    form.set_field(FormField::Name, "Gamma");
    form.set_field(FormField::Email, "gamma@shop.test");
    form.set_field(FormField::Phone, "555 0199");
    form.set_field(FormField::City, "Lisbon");
    assert_eq!(page.submit_form(&service).await, FormSubmission::Created);
    assert!(matches!(page.overlay(), Overlay::Idle));
    let note = page.notification().unwrap();
    assert_eq!(note.kind, NotificationKind::Success);
    assert_eq!(note.message, CREATED);
    assert!(page.sync_list(&service).await);
    assert_eq!(page.list().total_count(), 3);

    // Edit needs an explicit confirmation before the backend is touched.
    let gamma = page
        .list()
        .merchants()
        .iter()
        .find(|m| m.name == "Gamma")
        .cloned()
        .unwrap();
    assert_eq!(gamma.city.as_deref(), Some("Lisbon"));
    page.open_edit(gamma.clone());
    let form = page.form_mut().unwrap();
    form.set_field(FormField::Name, "Gamma Foods");
    form.set_status(MerchantStatus::Inactive);
    assert_eq!(page.submit_form(&service).await, FormSubmission::AwaitingConfirmation);
    assert_eq!(service.call_count(Operation::UpdateMerchant).unwrap(), 0);
    assert_eq!(page.pending_update().map(|d| d.name.as_str()), Some("Gamma Foods"));
    assert!(page.confirm_update(&service).await);
    assert!(matches!(page.overlay(), Overlay::Idle));
    assert_eq!(page.notification().unwrap().message, UPDATED);
    assert!(page.sync_list(&service).await);
    let updated = page
        .list()
        .merchants()
        .iter()
        .find(|m| m.id == gamma.id)
        .cloned()
        .unwrap();
    assert_eq!(updated.name, "Gamma Foods");
    assert_eq!(updated.status, MerchantStatus::Inactive);

    // Delete.
    page.request_delete(updated);
    assert!(page.confirm_delete(&service).await);
    assert_eq!(page.notification().unwrap().message, DELETED);
    assert!(page.sync_list(&service).await);
    assert_eq!(page.list().total_count(), 2);
    assert_eq!(page.refresh_trigger(), 3);
}

#[tokio::test]
async fn failed_delete_keeps_list_and_reports_backend_message() {
    let service = InMemoryService::with_merchants([draft("Alpha")]).unwrap();
    let mut page = MerchantsPage::new();
    assert!(page.sync_list(&service).await);
    let alpha = page.list().merchants().first().cloned().unwrap();

    service
        .fail(Operation::DeleteMerchant, "Merchant has open settlements")
        .unwrap();
    page.request_delete(alpha);
    assert!(!page.confirm_delete(&service).await);
    assert!(matches!(page.overlay(), Overlay::Idle));
    let note = page.notification().unwrap();
    assert_eq!(note.kind, NotificationKind::Error);
    assert_eq!(note.message, "Merchant has open settlements");
    assert_eq!(page.refresh_trigger(), 0);
    assert!(!page.sync_list(&service).await);
    assert_eq!(service.merchants().unwrap().len(), 1);
}

#[tokio::test]
async fn details_export_writes_csv_file() {
    let service = InMemoryService::with_merchants([draft("Alpha")]).unwrap();
    let alpha = service.merchants().unwrap().into_iter().next().unwrap();
    let id = alpha.id.clone().unwrap();
    service
        .set_transactions(
            &id,
            vec![
                txn(7, TransactionStatus::Completed, 120.5, "2024-06-02T10:00:00Z"),
                txn(8, TransactionStatus::Failed, 9.99, "2024-06-01T08:30:00Z"),
            ],
        )
        .unwrap();

    let mut page = MerchantsPage::new();
    page.view_and_load(alpha, &service).await;
    let details = page.details_mut().unwrap();
    assert_eq!(details.transactions().len(), 2);
    assert_eq!(details.summary().unwrap().by_status.failed, 1);

    let dir = tempfile::tempdir().unwrap();
    let today = NaiveDate::from_ymd_opt(2024, 6, 3).unwrap();
    let path = details.export_to_dir(dir.path(), today).unwrap();
    assert_eq!(
        path.file_name().and_then(|name| name.to_str()),
        Some("merchant-MCH-00001-transactions-2024-06-03.csv")
    );

    let csv = std::fs::read_to_string(&path).unwrap();
    let mut lines = csv.lines();
    assert_eq!(lines.next(), Some(CSV_HEADER));
    assert_eq!(
        lines.next(),
        Some(r#""7","120.5","USD","completed","2024-06-02","Visa","4242""#)
    );
    assert_eq!(
        lines.next(),
        Some(r#""8","9.99","USD","failed","2024-06-01","Visa","4242""#)
    );
    assert_eq!(lines.next(), None);
    assert!(!csv.ends_with('\n'));

    page.close_details();
    assert!(matches!(page.overlay(), Overlay::Idle));
}
