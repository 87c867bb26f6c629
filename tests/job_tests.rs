mod helpers;

use axum_test::{TestResponse, TestServer};
use helpers::{create_job, create_member, get_member, job_input, TestMember};
use serde_json::{json, Value};

async fn search(server: &TestServer, search: Value) -> Value {
    let response = server
        .post("/api/jobs/list")
        .json(&json!({ "page": 1, "limit": 10, "search": search }))
        .await;
    response.assert_status_ok();
    response.json::<Value>()
}

async fn agent_jobs(server: &TestServer, agent: &TestMember, search: Value) -> TestResponse {
    server
        .post("/api/jobs/agent")
        .add_header("Authorization", agent.bearer())
        .json(&json!({ "page": 1, "limit": 10, "search": search }))
        .await
}

test_with_server!(only_company_creates_jobs, |server, ctx_state, config| {
    let seeker = create_member(&server, "USER").await;

    let response = server
        .post("/api/jobs")
        .add_header("Authorization", seeker.bearer())
        .json(&job_input("Backend engineer"))
        .await;
    response.assert_status_forbidden();

    let agent = create_member(&server, "COMPANY").await;
    let job = create_job(&server, &agent, "Backend engineer").await;
    assert_eq!(job["job_status"], "HIRING");
    assert_eq!(job["member_id"], agent.id.as_str());
    assert_eq!(job["member_data"]["member_nick"], agent.nick.as_str());
    assert!(job["posted_at"].is_string());

    let member = get_member(&server, &agent.id, None).await;
    assert_eq!(member["member_jobs"], 1);
});

test_with_server!(create_job_validates_input, |server, ctx_state, config| {
    let agent = create_member(&server, "COMPANY").await;

    let mut input = job_input("  ");
    let response = server
        .post("/api/jobs")
        .add_header("Authorization", agent.bearer())
        .json(&input)
        .await;
    response.assert_status_bad_request();

    input["job_title"] = json!("Valid title");
    input["job_images"] = json!([]);
    let response = server
        .post("/api/jobs")
        .add_header("Authorization", agent.bearer())
        .json(&input)
        .await;
    response.assert_status_bad_request();
});

test_with_server!(job_view_counted_once, |server, ctx_state, config| {
    let agent = create_member(&server, "COMPANY").await;
    let seeker = create_member(&server, "USER").await;
    let job = create_job(&server, &agent, "Platform engineer").await;
    let path = format!("/api/jobs/{}", job["id"].as_str().unwrap());

    for _ in 0..3 {
        let response = server
            .get(&path)
            .add_header("Authorization", seeker.bearer())
            .await;
        response.assert_status_ok();
        assert_eq!(response.json::<Value>()["job_views"], 1);
    }

    let response = server.get(&path).await;
    assert_eq!(response.json::<Value>()["job_views"], 1);

    let response = server
        .post("/api/jobs/visited")
        .add_header("Authorization", seeker.bearer())
        .json(&json!({ "page": 1, "limit": 5 }))
        .await;
    response.assert_status_ok();
    let body = response.json::<Value>();
    assert_eq!(body["list"][0]["id"], job["id"]);
    assert_eq!(body["meta_counter"][0]["total"], 1);
});

test_with_server!(closing_job_hides_it_and_decrements_counter, |server, ctx_state, config| {
    let agent = create_member(&server, "COMPANY").await;
    let job = create_job(&server, &agent, "Security engineer").await;
    let job_id = job["id"].as_str().unwrap();

    let response = server
        .patch("/api/jobs")
        .add_header("Authorization", agent.bearer())
        .json(&json!({ "id": job_id, "job_status": "CLOSED" }))
        .await;
    response.assert_status_ok();
    let body = response.json::<Value>();
    assert_eq!(body["job_status"], "CLOSED");
    assert!(body["closed_at"].is_string());

    let member = get_member(&server, &agent.id, None).await;
    assert_eq!(member["member_jobs"], 0);

    server
        .get(&format!("/api/jobs/{job_id}"))
        .await
        .assert_status_not_found();

    let response = server
        .post("/api/jobs/list")
        .json(&json!({ "page": 1, "limit": 10 }))
        .await;
    response.assert_status_ok();
    assert!(response.json::<Value>()["list"].as_array().unwrap().is_empty());

    // closed jobs are no longer editable by the owner
    let response = server
        .patch("/api/jobs")
        .add_header("Authorization", agent.bearer())
        .json(&json!({ "id": job_id, "job_title": "Reopened" }))
        .await;
    response.assert_status_internal_server_error();
});

test_with_server!(owner_only_updates_job, |server, ctx_state, config| {
    let agent = create_member(&server, "COMPANY").await;
    let other = create_member(&server, "COMPANY").await;
    let job = create_job(&server, &agent, "Cloud architect").await;
    let job_id = job["id"].as_str().unwrap();

    let response = server
        .patch("/api/jobs")
        .add_header("Authorization", other.bearer())
        .json(&json!({ "id": job_id, "job_salary": 1 }))
        .await;
    response.assert_status_internal_server_error();

    let response = server
        .patch("/api/jobs")
        .add_header("Authorization", agent.bearer())
        .json(&json!({ "id": job_id, "job_salary": 5200 }))
        .await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["job_salary"], 5200);
});

test_with_server!(search_jobs_with_filters, |server, ctx_state, config| {
    let agent = create_member(&server, "COMPANY").await;
    let other = create_member(&server, "COMPANY").await;
    create_job(&server, &agent, "Junior rust developer").await;
    create_job(&server, &agent, "Senior go developer").await;
    create_job(&server, &other, "Rust compiler engineer").await;

    let mut remote = job_input("Remote designer");
    remote["workplace_type"] = json!("REMOTE");
    remote["job_category"] = json!("DESIGN");
    remote["job_salary"] = json!(9000);
    remote["job_visa"] = json!(false);
    server
        .post("/api/jobs")
        .add_header("Authorization", other.bearer())
        .json(&remote)
        .await
        .assert_status_ok();

    let body = search(&server, json!({})).await;
    assert_eq!(body["meta_counter"][0]["total"], 4);

    let body = search(&server, json!({ "text": "RUST" })).await;
    assert_eq!(body["meta_counter"][0]["total"], 2);

    let body = search(&server, json!({ "member_id": agent.id })).await;
    assert_eq!(body["meta_counter"][0]["total"], 2);

    let body = search(&server, json!({ "workplace_type": "REMOTE" })).await;
    assert_eq!(body["list"][0]["job_title"], "Remote designer");

    let body = search(&server, json!({ "salary_range": { "start": 5000, "end": 10000 } })).await;
    assert_eq!(body["meta_counter"][0]["total"], 1);

    let body = search(&server, json!({ "options": ["job_visa"] })).await;
    assert_eq!(body["meta_counter"][0]["total"], 3);

    let body = search(&server, json!({ "location_list": ["BUSAN"] })).await;
    assert!(body["list"].as_array().unwrap().is_empty());
    assert!(body["meta_counter"].as_array().unwrap().is_empty());
});

test_with_server!(search_jobs_rejects_bad_input, |server, ctx_state, config| {
    let response = server
        .post("/api/jobs/list")
        .json(&json!({ "page": 1, "limit": 10, "sort": "job_desc" }))
        .await;
    response.assert_status_bad_request();

    let response = server
        .post("/api/jobs/list")
        .json(&json!({ "page": 1, "limit": 10, "search": { "options": ["job_status"] } }))
        .await;
    response.assert_status_bad_request();

    let response = server
        .post("/api/jobs/list")
        .json(&json!({
            "page": 1,
            "limit": 10,
            "search": { "salary_range": { "start": 10, "end": 1 } }
        }))
        .await;
    response.assert_status_bad_request();

    let response = server
        .post("/api/jobs/list")
        .json(&json!({ "page": 0, "limit": 10 }))
        .await;
    response.assert_status_bad_request();
});

test_with_server!(agent_jobs_by_status, |server, ctx_state, config| {
    let agent = create_member(&server, "COMPANY").await;
    let first = create_job(&server, &agent, "Embedded engineer").await;
    create_job(&server, &agent, "Network engineer").await;

    server
        .patch("/api/jobs")
        .add_header("Authorization", agent.bearer())
        .json(&json!({ "id": first["id"], "job_status": "CLOSED" }))
        .await
        .assert_status_ok();

    let body = agent_jobs(&server, &agent, json!({})).await.json::<Value>();
    assert_eq!(body["meta_counter"][0]["total"], 2);

    let body = agent_jobs(&server, &agent, json!({ "job_status": "CLOSED" })).await.json::<Value>();
    assert_eq!(body["meta_counter"][0]["total"], 1);
    assert_eq!(body["list"][0]["id"], first["id"]);

    agent_jobs(&server, &agent, json!({ "job_status": "DELETE" }))
        .await
        .assert_status_bad_request();
});
