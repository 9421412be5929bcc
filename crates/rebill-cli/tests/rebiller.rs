//! Interactive-operation tests over the in-memory provider.

mod common;

use serde_json::json;

use common::{customer, invoice, method, FakeProvider};
use rebill_cli::ops::Rebiller;

#[tokio::test]
async fn charge_customer_uses_automatic_payment_methods() {
    let provider = FakeProvider::default();
    let rebiller = Rebiller::new(&provider);

    let payment = rebiller
        .charge_customer("cus_1", 1000, "usd", "One-off")
        .await
        .unwrap();

    assert_eq!(payment.id, "pi_cus_1");
    assert_eq!(payment.amount, 1000);

    let payments = provider.payments.lock().unwrap();
    assert_eq!(payments.len(), 1);
    // No named method: the provider picks from automatic payment methods.
    assert!(payments[0].payment_method.is_none());
    assert_eq!(payments[0].description, "One-off");
}

#[tokio::test]
async fn create_subscription_returns_the_provider_record() {
    let provider = FakeProvider::default();
    let rebiller = Rebiller::new(&provider);

    let subscription = rebiller
        .create_subscription("cus_1", "price_basic")
        .await
        .unwrap();

    assert_eq!(subscription.id, "sub_new");
    assert_eq!(subscription.customer, "cus_1");
    assert_eq!(subscription.status, "incomplete");
    assert_eq!(subscription.unit_amount_cents(), 2999);
}

#[tokio::test]
async fn customers_overview_flags_card_methods_only() {
    let provider = FakeProvider::default()
        .with_customer(customer("cus_card", json!({"description": "vip"})))
        .with_method("cus_card", method(json!({"id": "pm_1", "type": "card"})))
        .with_customer(customer("cus_link", json!({})))
        .with_method("cus_link", method(json!({"id": "pm_2", "type": "link"})));

    let rebiller = Rebiller::new(&provider);
    let overview = rebiller.customers_overview().await.unwrap();

    assert_eq!(overview.len(), 2);
    assert!(overview[0].has_payment_method);
    assert_eq!(overview[0].description, "vip");
    assert!(!overview[1].has_payment_method);
}

#[tokio::test]
async fn failed_invoices_are_open_attempted_and_unpaid() {
    let provider = FakeProvider::default()
        .with_invoice(invoice(json!({
            "id": "in_failed",
            "customer": "cus_1",
            "status": "open",
            "amount_due": 2999,
            "attempted": true,
            "attempt_count": 2,
            "paid": false,
            "created": 1_700_000_000
        })))
        .with_invoice(invoice(json!({
            "id": "in_fresh",
            "customer": "cus_2",
            "status": "open",
            "amount_due": 500,
            "attempted": false,
            "paid": false
        })));

    let rebiller = Rebiller::new(&provider);
    let failed = rebiller.failed_invoices().await.unwrap();

    assert_eq!(failed.len(), 1);
    assert_eq!(failed[0].invoice_id, "in_failed");
    assert_eq!(failed[0].amount_cents, 2999);
    assert_eq!(failed[0].attempt_count, 2);
}

#[tokio::test]
async fn retry_all_failed_continues_past_a_declined_invoice() {
    let provider = FakeProvider::default()
        .with_invoice(invoice(json!({
            "id": "in_1",
            "customer": "cus_1",
            "status": "open",
            "amount_due": 1000,
            "attempted": true,
            "paid": false
        })))
        .with_invoice(invoice(json!({
            "id": "in_2",
            "customer": "cus_2",
            "status": "open",
            "amount_due": 2000,
            "attempted": true,
            "paid": false
        })))
        .with_invoice(invoice(json!({
            "id": "in_untouched",
            "customer": "cus_3",
            "status": "open",
            "amount_due": 3000,
            "attempted": false,
            "paid": false
        })))
        .failing_invoice("in_2");

    let rebiller = Rebiller::new(&provider);
    let outcome = rebiller.retry_all_failed().await.unwrap();

    assert_eq!(outcome.total, 2);
    assert_eq!(outcome.successful.len(), 1);
    assert_eq!(outcome.successful[0].invoice_id, "in_1");
    assert_eq!(outcome.failed.len(), 1);
    assert_eq!(outcome.failed[0].invoice_id, "in_2");
    assert!(outcome.failed[0].error.contains("declined"));

    // The unattempted invoice was never touched.
    let paid = provider.paid_invoices.lock().unwrap();
    assert_eq!(paid.as_slice(), ["in_1"]);
}

#[tokio::test]
async fn batch_rebill_continues_past_a_declined_row() {
    let provider = FakeProvider::default().failing_charge("cus_2");
    let rebiller = Rebiller::new(&provider);

    let ids: Vec<String> = ["cus_1", "cus_2", "cus_3"]
        .iter()
        .map(ToString::to_string)
        .collect();
    let outcome = rebiller.batch_rebill(&ids, 1500, "usd", "Rebill").await;

    assert_eq!(outcome.total, 3);
    assert_eq!(outcome.successful.len(), 2);
    assert_eq!(outcome.failed.len(), 1);
    assert_eq!(outcome.failed[0].customer_id, "cus_2");
    assert!(outcome.failed[0].error.contains("declined"));

    let charged: Vec<String> = outcome
        .successful
        .iter()
        .map(|s| s.customer_id.clone())
        .collect();
    assert_eq!(charged, ["cus_1", "cus_3"]);
    assert!(outcome.successful.iter().all(|s| s.amount_cents == 1500));
}

#[tokio::test]
async fn retry_single_invoice_reports_the_paid_state() {
    let provider = FakeProvider::default().with_invoice(invoice(json!({
        "id": "in_1",
        "customer": "cus_1",
        "status": "open",
        "amount_due": 2999,
        "attempted": true,
        "paid": false
    })));

    let rebiller = Rebiller::new(&provider);
    let paid = rebiller.retry_invoice("in_1").await.unwrap();

    assert!(paid.paid);
    assert_eq!(paid.amount_paid, 2999);
    assert_eq!(paid.status.as_deref(), Some("paid"));
}
