mod helpers;

use axum_test::TestServer;
use helpers::{create_member, create_property, get_member, property_input};
use serde_json::{json, Value};

async fn search(server: &TestServer, inquiry: Value) -> Value {
    let response = server.post("/api/properties/list").json(&inquiry).await;
    response.assert_status_ok();
    response.json::<Value>()
}

test_with_server!(create_and_like_property, |server, ctx_state, config| {
    let agent = create_member(&server, "COMPANY").await;
    let buyer = create_member(&server, "USER").await;

    let response = server
        .post("/api/properties")
        .add_header("Authorization", buyer.bearer())
        .json(&property_input("Cozy studio", 300))
        .await;
    response.assert_status_forbidden();

    let property = create_property(&server, &agent, "Cozy studio", 300).await;
    assert_eq!(property["property_status"], "ACTIVE");
    assert_eq!(property["property_marks"], 0);
    let member = get_member(&server, &agent.id, None).await;
    assert_eq!(member["member_properties"], 1);

    let path = format!("/api/properties/{}/like", property["id"].as_str().unwrap());
    let response = server
        .post(&path)
        .add_header("Authorization", buyer.bearer())
        .await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["property_marks"], 1);

    let response = server
        .post("/api/properties/favorites")
        .add_header("Authorization", buyer.bearer())
        .json(&json!({ "page": 1, "limit": 10 }))
        .await;
    response.assert_status_ok();
    let body = response.json::<Value>();
    assert_eq!(body["list"][0]["id"], property["id"]);
    assert_eq!(body["list"][0]["me_marked"][0]["my_favorite"], true);

    let response = server
        .post(&path)
        .add_header("Authorization", buyer.bearer())
        .await;
    assert_eq!(response.json::<Value>()["property_marks"], 0);
});

test_with_server!(property_view_counted_once, |server, ctx_state, config| {
    let agent = create_member(&server, "COMPANY").await;
    let buyer = create_member(&server, "USER").await;
    let property = create_property(&server, &agent, "Garden villa", 900).await;
    let path = format!("/api/properties/{}", property["id"].as_str().unwrap());

    for _ in 0..2 {
        let response = server
            .get(&path)
            .add_header("Authorization", buyer.bearer())
            .await;
        response.assert_status_ok();
        assert_eq!(response.json::<Value>()["property_views"], 1);
    }
});

test_with_server!(search_properties_by_ranges, |server, ctx_state, config| {
    let agent = create_member(&server, "COMPANY").await;
    create_property(&server, &agent, "Cheap room", 100).await;
    create_property(&server, &agent, "Mid flat", 500).await;
    create_property(&server, &agent, "Penthouse", 2000).await;

    let body = search(
        &server,
        json!({ "page": 1, "limit": 10, "search": { "price_range": { "start": 100, "end": 500 } } }),
    )
    .await;
    assert_eq!(body["meta_counter"][0]["total"], 2);

    let body = search(
        &server,
        json!({ "page": 1, "limit": 10, "sort": "property_price", "direction": "ASC" }),
    )
    .await;
    let titles = body["list"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["property_title"].as_str().unwrap().to_string())
        .collect::<Vec<_>>();
    assert_eq!(titles, vec!["Cheap room", "Mid flat", "Penthouse"]);

    let body = search(
        &server,
        json!({ "page": 2, "limit": 2, "sort": "property_price", "direction": "ASC" }),
    )
    .await;
    assert_eq!(body["list"].as_array().unwrap().len(), 1);
    assert_eq!(body["list"][0]["property_title"], "Penthouse");
    assert_eq!(body["meta_counter"][0]["total"], 3);

    let body = search(
        &server,
        json!({ "page": 1, "limit": 10, "search": { "options": ["property_barter"] } }),
    )
    .await;
    assert!(body["list"].as_array().unwrap().is_empty());

    let body = search(
        &server,
        json!({ "page": 1, "limit": 10, "search": { "rooms_list": [3], "text": "FLAT" } }),
    )
    .await;
    assert_eq!(body["meta_counter"][0]["total"], 1);
});

test_with_server!(sold_property_leaves_listing, |server, ctx_state, config| {
    let agent = create_member(&server, "COMPANY").await;
    let property = create_property(&server, &agent, "Lake house", 1200).await;

    let response = server
        .patch("/api/properties")
        .add_header("Authorization", agent.bearer())
        .json(&json!({ "id": property["id"], "property_status": "SOLD" }))
        .await;
    response.assert_status_ok();
    let body = response.json::<Value>();
    assert_eq!(body["property_status"], "SOLD");
    assert!(body["sold_at"].is_string());

    let member = get_member(&server, &agent.id, None).await;
    assert_eq!(member["member_properties"], 0);

    let body = search(&server, json!({ "page": 1, "limit": 10 })).await;
    assert!(body["list"].as_array().unwrap().is_empty());

    let response = server
        .post("/api/properties/agent")
        .add_header("Authorization", agent.bearer())
        .json(&json!({ "page": 1, "limit": 10, "search": { "property_status": "SOLD" } }))
        .await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["list"][0]["id"], property["id"]);
});
