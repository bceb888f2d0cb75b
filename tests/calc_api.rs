use actix_web::{App, test, web};
use serde_json::{Value, json};
use splitfair_backend::handlers;

macro_rules! app {
    () => {
        test::init_service(
            App::new().service(
                web::scope("/api/v1")
                    .configure(handlers::calc_config)
                    .configure(handlers::share_config),
            ),
        )
        .await
    };
}

fn amounts(body: &Value) -> Vec<i64> {
    body["data"]["results"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["amount"].as_i64().unwrap())
        .collect()
}

fn three_friends(total: i64, round_unit: u32, round_mode: &str) -> Value {
    json!({
        "total": total,
        "participants": [
            {"id": "a", "name": "Alice", "weight": 1.0},
            {"id": "b", "name": "Bob", "weight": 1.0},
            {"id": "c", "name": "Carol"}
        ],
        "round_unit": round_unit,
        "round_mode": round_mode,
        "remainder_mode": "largest_remainder"
    })
}

#[actix_web::test]
async fn test_allocate_even_split() {
    let app = app!();
    let req = test::TestRequest::post()
        .uri("/api/v1/calc/allocate")
        .set_json(three_friends(100, 1, "round"))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["success"], true);
    assert_eq!(amounts(&body), vec![34, 33, 33]);
    assert_eq!(body["data"]["results"][0]["participant_id"], "a");
    assert_eq!(body["data"]["validation"]["is_valid"], true);
    assert_eq!(body["data"]["validation"]["actual_total"], 100);
}

#[actix_web::test]
async fn test_allocate_ceil_overshoot_still_sums() {
    let app = app!();
    let req = test::TestRequest::post()
        .uri("/api/v1/calc/allocate")
        .set_json(three_friends(99, 10, "ceil"))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(amounts(&body), vec![30, 30, 39]);
    assert_eq!(body["data"]["validation"]["difference"], 0);
}

#[actix_web::test]
async fn test_allocate_defaults_config() {
    let app = app!();
    let req = test::TestRequest::post()
        .uri("/api/v1/calc/allocate")
        .set_json(json!({
            "total": 100,
            "participants": [
                {"id": "a", "name": "A", "weight": 2.0},
                {"id": "b", "name": "B", "weight": 1.0}
            ]
        }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(amounts(&body), vec![67, 33]);
}

#[actix_web::test]
async fn test_allocate_rejects_out_of_range_weight() {
    let app = app!();
    let req = test::TestRequest::post()
        .uri("/api/v1/calc/allocate")
        .set_json(json!({
            "total": 100,
            "participants": [{"id": "a", "name": "A", "weight": 11.0}]
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

#[actix_web::test]
async fn test_allocate_rejects_unknown_round_unit() {
    let app = app!();
    let req = test::TestRequest::post()
        .uri("/api/v1/calc/allocate")
        .set_json(three_friends(100, 5, "round"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_client_error());
}

#[actix_web::test]
async fn test_details_endpoint() {
    let app = app!();
    let req = test::TestRequest::post()
        .uri("/api/v1/calc/details")
        .set_json(three_friends(100, 10, "floor"))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    let details = body["data"]["details"].as_array().unwrap();
    assert_eq!(details.len(), 3);
    assert_eq!(details[0]["participant"]["id"], "a");
    assert_eq!(details[0]["base_amount"], 30.0);
    assert!((details[2]["weight_ratio"].as_f64().unwrap() - 1.0 / 3.0).abs() < 1e-9);
}

#[actix_web::test]
async fn test_validate_endpoint() {
    let app = app!();
    let req = test::TestRequest::post()
        .uri("/api/v1/calc/validate")
        .set_json(json!({
            "results": [
                {"participant_id": "a", "amount": 50},
                {"participant_id": "b", "amount": 40}
            ],
            "expected_total": 100
        }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["data"]["is_valid"], false);
    assert_eq!(body["data"]["actual_total"], 90);
    assert_eq!(body["data"]["difference"], 10);
}

#[actix_web::test]
async fn test_options_endpoint() {
    let app = app!();
    let req = test::TestRequest::get()
        .uri("/api/v1/calc/options")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["data"]["default_round_unit"], 1);
    assert_eq!(body["data"]["default_remainder_mode"], "largest_remainder");
    assert_eq!(body["data"]["weight_presets"].as_array().unwrap().len(), 5);
}

#[actix_web::test]
async fn test_share_validation_endpoints() {
    let app = app!();

    let req = test::TestRequest::post()
        .uri("/api/v1/share/validate")
        .set_json(json!({"share_data": "definitely-not-an-event"}))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["is_valid"], false);
    assert!(body["data"]["error"].is_string());

    let req = test::TestRequest::post()
        .uri("/api/v1/share/validate-link")
        .set_json(json!({"url": "https://split.example.com/import"}))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["is_valid"], false);
    assert_eq!(body["data"]["error"], "Share data not found in link");
}

#[actix_web::test]
async fn test_allocate_rejects_total_beyond_exact_float_range() {
    let app = app!();
    let req = test::TestRequest::post()
        .uri("/api/v1/calc/allocate")
        .set_json(three_friends(i64::MAX, 1, "round"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}
