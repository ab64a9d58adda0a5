use domain::{ActorContext, AssetStatus, rental_cost};
use rental_ledger::{LedgerError, NewAsset, OpenRental, RentalService};
use rental_storage::{AssetStore, InMemoryBackend, ManualClock, RentalStore};
use std::collections::HashMap;
use std::sync::Arc;

/// 确定性伪随机序列（xorshift64）。
struct XorShift(u64);

impl XorShift {
    fn next(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_open_close_keeps_invariants() {
    let clock = Arc::new(ManualClock::new(0));
    let backend = InMemoryBackend::with_clock(clock.clone());
    let service = RentalService::new(&backend.stores());
    let manager = ActorContext::manager("m-1", "alice");

    let mut asset_ids = Vec::new();
    for index in 0..3 {
        let asset = service
            .registry
            .create(
                &manager,
                NewAsset {
                    name: format!("asset-{}", index),
                    hourly_rate: 7.0,
                    daily_rate: 40.0,
                },
            )
            .await
            .expect("create");
        asset_ids.push(asset.asset_id);
    }
    let asset_ids = Arc::new(asset_ids);

    let mut handles = Vec::new();
    for task in 0..8u64 {
        let service = service.clone();
        let clock = clock.clone();
        let asset_ids = asset_ids.clone();
        handles.push(tokio::spawn(async move {
            let mut rng = XorShift(0x9E37_79B9_7F4A_7C15 ^ (task + 1));
            let ctx = ActorContext::worker(format!("w-{}", task), format!("worker-{}", task));
            for _ in 0..60 {
                let asset_id = &asset_ids[(rng.next() % asset_ids.len() as u64) as usize];
                clock.advance_ms((rng.next() % 5_400_000) as i64);
                let result = if rng.next() % 2 == 0 {
                    service
                        .ledger
                        .open_rental(
                            &ctx,
                            asset_id,
                            OpenRental {
                                customer_phone: "555-0100".to_string(),
                                guarantee_document: "id".to_string(),
                            },
                        )
                        .await
                        .map(|_| ())
                } else {
                    service.ledger.close_rental(&ctx, asset_id).await.map(|_| ())
                };
                match result {
                    Ok(()) | Err(LedgerError::Conflict(_)) | Err(LedgerError::NotFound(_)) => {}
                    Err(other) => panic!("unexpected error: {}", other),
                }
                tokio::task::yield_now().await;
            }
        }));
    }
    for handle in handles {
        handle.await.expect("task");
    }

    let rentals = backend.rentals.list_rentals().await.expect("rentals");
    let mut open_per_asset: HashMap<&str, usize> = HashMap::new();
    let mut revenue_per_asset: HashMap<&str, f64> = HashMap::new();
    for rental in &rentals {
        match rental.end_time_ms {
            None => *open_per_asset.entry(rental.asset_id.as_str()).or_default() += 1,
            Some(end) => {
                let cost = rental.total_cost.expect("cost");
                assert!(cost >= 0.0);
                assert_eq!(cost, rental_cost(rental.start_time_ms, end, 7.0, 40.0));
                *revenue_per_asset.entry(rental.asset_id.as_str()).or_default() += cost;
            }
        }
    }

    for asset_id in asset_ids.iter() {
        let asset = backend
            .assets
            .find_asset(asset_id)
            .await
            .expect("find")
            .expect("asset");
        let open = open_per_asset.get(asset_id.as_str()).copied().unwrap_or(0);
        assert!(open <= 1, "asset {} has {} open rentals", asset_id, open);
        match asset.status {
            AssetStatus::Rented => assert_eq!(open, 1),
            AssetStatus::Available => assert_eq!(open, 0),
            AssetStatus::Maintenance => panic!("no task sets maintenance"),
        }
        let expected = revenue_per_asset.get(asset_id.as_str()).copied().unwrap_or(0.0);
        assert!((asset.total_revenue - expected).abs() < 1e-6);
    }
}
