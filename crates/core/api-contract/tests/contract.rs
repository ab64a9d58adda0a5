use api_contract::{
    AssetQuery, BillingDto, CloseRentalResponse, LoginResponse, OpenRentalRequest, RentalDto,
    StatsDto,
};
use serde_json::Value;

fn closed_rental() -> RentalDto {
    RentalDto {
        rental_id: "r-1".to_string(),
        asset_id: "a-1".to_string(),
        asset_name: "Generator".to_string(),
        customer_phone: "555-0100".to_string(),
        guarantee_document: "ID-1".to_string(),
        start_time_ms: 0,
        end_time_ms: Some(97_200_000),
        total_cost: Some(100.0),
        actor_id: "u-1".to_string(),
        actor_username: "alice".to_string(),
    }
}

#[test]
fn login_response_is_camel_case() {
    let response = LoginResponse {
        access_token: "access".to_string(),
        expires: 1_700_000_000_000,
        actor_id: "u-1".to_string(),
        username: "alice".to_string(),
        role: "manager".to_string(),
    };
    let value = serde_json::to_value(response).expect("serialize");
    assert!(value.get("accessToken").is_some());
    assert!(value.get("actorId").is_some());
    assert!(value.get("access_token").is_none());
    assert!(matches!(value.get("expires"), Some(Value::Number(_))));
}

#[test]
fn open_rental_request_accepts_camel_case() {
    let payload = r#"{"customerPhone":"555-0100","guaranteeDocument":"passport"}"#;
    let req: OpenRentalRequest = serde_json::from_str(payload).expect("parse");
    assert_eq!(req.customer_phone, "555-0100");
    assert_eq!(req.guarantee_document, "passport");
}

#[test]
fn asset_query_is_optional() {
    let query: AssetQuery = serde_json::from_str("{}").expect("parse");
    assert!(query.status.is_none());
    assert!(query.q.is_none());
}

#[test]
fn close_response_nests_rental_and_billing() {
    let response = CloseRentalResponse {
        rental: closed_rental(),
        billing: BillingDto {
            duration_hours: 27.0,
            full_days: 1.0,
            remainder_hours: 3.0,
            remainder_cost: 30.0,
            total_cost: 100.0,
        },
    };
    let value = serde_json::to_value(response).expect("serialize");
    assert_eq!(value["rental"]["endTimeMs"], 97_200_000);
    assert_eq!(value["billing"]["remainderCost"], 30.0);
    assert_eq!(value["billing"]["totalCost"], value["rental"]["totalCost"]);
}

#[test]
fn stats_counts_are_numbers() {
    let stats = StatsDto {
        total_revenue: 12.5,
        active_rentals: 2,
        available_assets: 3,
        total_assets: 6,
        maintenance_assets: 1,
    };
    let value = serde_json::to_value(stats).expect("serialize");
    assert_eq!(value["activeRentals"], 2);
    assert_eq!(value["totalAssets"], 6);
    assert_eq!(value["totalRevenue"], 12.5);
}
