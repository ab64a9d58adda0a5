use domain::{ActorContext, AssetStatus};
use rental_ledger::{NewAsset, OpenRental, RentalService};
use rental_storage::{AssetStore, Collection, InMemoryBackend, ManualClock};
use rental_sync::{AssetFilter, SyncClient, subscribe};
use std::sync::{Arc, Mutex};
use std::time::Duration;

const WAIT: Duration = Duration::from_secs(2);

fn manager() -> ActorContext {
    ActorContext::manager("m-1", "alice")
}

fn asset(name: &str) -> NewAsset {
    NewAsset {
        name: name.to_string(),
        hourly_rate: 10.0,
        daily_rate: 70.0,
    }
}

#[tokio::test]
async fn own_write_arrives_through_subscription() {
    let clock = Arc::new(ManualClock::new(1_000));
    let backend = InMemoryBackend::with_clock(clock.clone());
    let service = RentalService::new(&backend.stores());
    let client = SyncClient::connect(&backend.feed);

    let created = service.registry.create(&manager(), asset("Saw")).await.expect("create");
    clock.advance_ms(10);
    service.registry.create(&manager(), asset("Lift")).await.expect("create");

    assert!(client.wait_until(WAIT, |view| view.assets.len() == 2).await);
    let view = client.view();
    // 入役时间倒序
    assert_eq!(view.assets[0].name, "Lift");
    assert_eq!(view.assets[1].asset_id, created.asset_id);

    service
        .ledger
        .open_rental(
            &manager(),
            &created.asset_id,
            OpenRental {
                customer_phone: "555-0100".to_string(),
                guarantee_document: "id".to_string(),
            },
        )
        .await
        .expect("open");
    let asset_id = created.asset_id.clone();
    assert!(
        client
            .wait_until(WAIT, move |view| view.open_rental(&asset_id).is_some())
            .await
    );
    assert!(
        client
            .wait_until(WAIT, |view| view.activity.len() == 3)
            .await
    );

    let view = client.view();
    let stats = view.stats();
    assert_eq!(stats.active_rentals, 1);
    assert_eq!(stats.total_assets, 2);

    // 资产快照与租赁快照相互独立，这里等待资产状态单独到达
    let rented_id = created.asset_id.clone();
    assert!(
        client
            .wait_until(WAIT, move |view| {
                view.asset(&rented_id)
                    .map(|item| item.status == AssetStatus::Rented)
                    .unwrap_or(false)
            })
            .await
    );
    let rented = client.read(|view| {
        view.filter_assets(&AssetFilter {
            status: Some(AssetStatus::Rented),
            name_query: None,
        })
    });
    assert_eq!(rented.len(), 1);
}

#[tokio::test]
async fn wait_for_version_tracks_feed() {
    let backend = InMemoryBackend::new();
    let service = RentalService::new(&backend.stores());
    let client = SyncClient::connect(&backend.feed);

    service.registry.create(&manager(), asset("Saw")).await.expect("create");
    let version = backend.feed.version(Collection::Assets);
    assert!(client.wait_for_version(Collection::Assets, version, WAIT).await);
    assert!(client.view().versions.assets >= version);

    // 永远不会到达的版本在超时后返回 false
    let missing = client
        .wait_for_version(Collection::Assets, version + 100, Duration::from_millis(50))
        .await;
    assert!(!missing);
}

#[tokio::test]
async fn unsubscribe_stops_delivery() {
    let backend = InMemoryBackend::new();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    let handle = subscribe(backend.feed.subscribe_assets(), move |snapshot| {
        if let Ok(mut seen) = sink.lock() {
            seen.push(snapshot.version);
        }
    });

    backend
        .assets
        .create_asset(rental_storage::AssetRecord {
            asset_id: "a-1".to_string(),
            name: "Saw".to_string(),
            hourly_rate: 1.0,
            daily_rate: 5.0,
            status: AssetStatus::Available,
            service_entry_date_ms: 0,
            total_revenue: 0.0,
            retired_at_ms: None,
        })
        .await
        .expect("create");

    for _ in 0..100 {
        if seen.lock().map(|items| items.contains(&1)).unwrap_or(false) {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    handle.unsubscribe();
    let delivered = seen.lock().map(|items| items.clone()).unwrap_or_default();
    assert!(delivered.contains(&1));

    backend.assets.retire_asset("a-1", 1).await.expect("retire");
    tokio::time::sleep(Duration::from_millis(50)).await;
    let after = seen.lock().map(|items| items.len()).unwrap_or_default();
    assert_eq!(after, delivered.len());
}
