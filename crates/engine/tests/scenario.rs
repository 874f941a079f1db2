use std::time::{Duration, Instant};

use serde_json::json;
use uuid::Uuid;

use api_types::auth::{Token, UserView};
use api_types::record::{RawEarning, RawExpense};
use engine::{
    Collections, Destination, Session, TapOutcome, TransactionKind, aggregate, remove_record,
    resolve_destination, summarize,
};

fn driver_profile() -> UserView {
    UserView {
        id: Uuid::new_v4(),
        name: "Luca".to_string(),
        email: "luca@example.com".to_string(),
        role: "driver".to_string(),
        is_active: true,
    }
}

fn earning(amount: i64, date: &str) -> RawEarning {
    RawEarning {
        id: Uuid::new_v4(),
        amount: Some(json!(amount)),
        description: None,
        note: None,
        date: Some(date.to_string()),
        category: None,
        driver_id: None,
        vehicle_id: None,
    }
}

fn expense(amount: i64, date: &str) -> RawExpense {
    RawExpense {
        id: Uuid::new_v4(),
        amount: Some(json!(amount)),
        description: None,
        note: None,
        date: Some(date.to_string()),
        expense_type: None,
        driver_id: None,
        vehicle_id: None,
    }
}

// Full driver flow: login resolves to the driver dashboard, the fetched
// collections aggregate most-recent-first, a double-tapped record is deleted
// only after the remote call succeeds, and the totals are recomputed.
#[test]
fn driver_login_aggregate_and_delete() {
    let mut session = Session::new();
    session.begin_auth();
    session.complete(Token::new("tok"), driver_profile());
    assert_eq!(resolve_destination(&session), Destination::DriverDashboard);

    let collections = Collections {
        earnings: vec![earning(50, "2024-01-02"), earning(30, "2024-01-01")],
        expenses: vec![expense(20, "2024-01-03")],
        auto_expenses: vec![],
    };
    let mut records = aggregate(&collections);

    assert_eq!(records.len(), 3);
    assert_eq!(records[0].kind(), TransactionKind::Expense);
    assert_eq!(records[0].amount.cents(), -2000);
    assert_eq!(records[1].kind(), TransactionKind::Earning);
    assert_eq!(records[1].amount.cents(), 5000);

    let mut coordinator = engine::TapCoordinator::new();
    let target = records[0].key;
    let start = Instant::now();

    coordinator.on_item_tap(target, start);
    let outcome = coordinator.on_item_tap(target, start + Duration::from_millis(150));
    assert_eq!(outcome, TapOutcome::ConfirmRequested(target));

    // Remote delete rejected: nothing changes locally.
    let key = coordinator.begin_delete().unwrap();
    coordinator.finish_delete();
    let before = summarize(&records);
    assert_eq!(records.len(), 3);
    assert_eq!(summarize(&records), before);

    // Retry, this time the server acknowledges.
    coordinator.on_item_tap(key, start + Duration::from_secs(2));
    coordinator.on_item_tap(key, start + Duration::from_secs(2) + Duration::from_millis(100));
    let key = coordinator.begin_delete().unwrap();
    assert!(remove_record(&mut records, key));
    coordinator.finish_delete();

    let after = summarize(&records);
    assert_eq!(after.count, 2);
    assert_eq!(after.net.cents(), 8000);
}
