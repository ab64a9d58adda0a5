use rental_telemetry::{metrics, new_request_ids, record_conflict, record_rental_closed};

#[test]
fn request_ids_non_empty() {
    let ids = new_request_ids();
    assert!(!ids.request_id.is_empty());
    assert!(!ids.trace_id.is_empty());
    assert_ne!(ids.request_id, ids.trace_id);
}

#[test]
fn counters_accumulate() {
    // 全局计数器在同一进程内共享，只断言增量
    let before = metrics().snapshot();
    record_rental_closed(130.0);
    record_rental_closed(0.125);
    record_conflict();
    let after = metrics().snapshot();
    assert!(after.rentals_closed >= before.rentals_closed + 2);
    assert!(after.revenue_cents_total >= before.revenue_cents_total + 13_013);
    assert!(after.conflicts > before.conflicts);
}
