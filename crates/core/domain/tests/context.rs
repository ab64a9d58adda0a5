use domain::{ActorContext, AssetStatus, Operation, Role};

#[test]
fn actor_context_builds() {
    let ctx = ActorContext::new("actor-1", "manager", Role::Manager);

    assert_eq!(ctx.actor_id, "actor-1");
    assert_eq!(ctx.username, "manager");
    assert_eq!(ctx.role, Role::Manager);
    assert!(ctx.can(Operation::CreateActor));
}

#[test]
fn worker_context_cannot_override_status() {
    let ctx = ActorContext::worker("actor-2", "worker1");
    assert!(!ctx.can(Operation::OverrideStatus));
    assert!(ctx.can(Operation::OpenRental));
}

#[test]
fn enums_round_trip_through_strings() {
    for status in [
        AssetStatus::Available,
        AssetStatus::Rented,
        AssetStatus::Maintenance,
    ] {
        assert_eq!(status.as_str().parse::<AssetStatus>(), Ok(status));
    }
    assert_eq!("Worker".parse::<Role>(), Ok(Role::Worker));
    assert!("admin".parse::<Role>().is_err());
}
