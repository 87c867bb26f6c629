mod helpers;

use helpers::{create_admin, create_article, create_job, create_member, create_property, get_member};
use serde_json::{json, Value};

test_with_server!(admin_routes_reject_other_members, |server, ctx_state, config| {
    let agent = create_member(&server, "COMPANY").await;

    let response = server
        .post("/api/admin/members/list")
        .add_header("Authorization", agent.bearer())
        .json(&json!({ "page": 1, "limit": 10 }))
        .await;
    response.assert_status_forbidden();

    let response = server
        .delete("/api/admin/jobs/job:any")
        .add_header("Authorization", agent.bearer())
        .await;
    response.assert_status_forbidden();
});

test_with_server!(admin_lists_members, |server, ctx_state, config| {
    let admin = create_admin(&server, &ctx_state).await;
    create_member(&server, "USER").await;
    create_member(&server, "COMPANY").await;

    let response = server
        .post("/api/admin/members/list")
        .add_header("Authorization", admin.bearer())
        .json(&json!({ "page": 1, "limit": 10 }))
        .await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["meta_counter"][0]["total"], 3);

    let response = server
        .post("/api/admin/members/list")
        .add_header("Authorization", admin.bearer())
        .json(&json!({ "page": 1, "limit": 10, "search": { "member_type": "COMPANY" } }))
        .await;
    let body = response.json::<Value>();
    assert_eq!(body["meta_counter"][0]["total"], 1);
    assert_eq!(body["list"][0]["member_type"], "COMPANY");
});

test_with_server!(default_admin_is_created_once, |server, ctx_state, config| {
    let admin = create_admin(&server, &ctx_state).await;
    let again = create_admin(&server, &ctx_state).await;
    assert_eq!(admin.id, again.id);

    let body = get_member(&server, &admin.id, None).await;
    assert_eq!(body["member_type"], "ADMIN");
});

test_with_server!(admin_removes_only_deleted_job, |server, ctx_state, config| {
    let admin = create_admin(&server, &ctx_state).await;
    let agent = create_member(&server, "COMPANY").await;
    let job = create_job(&server, &agent, "Site reliability").await;
    let job_id = job["id"].as_str().unwrap();

    let response = server
        .delete(&format!("/api/admin/jobs/{job_id}"))
        .add_header("Authorization", admin.bearer())
        .await;
    response.assert_status_internal_server_error();

    let response = server
        .patch("/api/admin/jobs")
        .add_header("Authorization", admin.bearer())
        .json(&json!({ "id": job_id, "job_status": "DELETE" }))
        .await;
    response.assert_status_ok();
    let body = response.json::<Value>();
    assert_eq!(body["job_status"], "DELETE");
    assert!(body["deleted_at"].is_string());
    assert_eq!(get_member(&server, &agent.id, None).await["member_jobs"], 0);

    // a second status change away from HIRING does not decrement again
    server
        .patch("/api/admin/jobs")
        .add_header("Authorization", admin.bearer())
        .json(&json!({ "id": job_id, "job_status": "CLOSED" }))
        .await
        .assert_status_ok();
    assert_eq!(get_member(&server, &agent.id, None).await["member_jobs"], 0);

    server
        .patch("/api/admin/jobs")
        .add_header("Authorization", admin.bearer())
        .json(&json!({ "id": job_id, "job_status": "DELETE" }))
        .await
        .assert_status_ok();

    let response = server
        .delete(&format!("/api/admin/jobs/{job_id}"))
        .add_header("Authorization", admin.bearer())
        .await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["id"], job_id);

    let response = server
        .post("/api/admin/jobs/list")
        .add_header("Authorization", admin.bearer())
        .json(&json!({ "page": 1, "limit": 10 }))
        .await;
    response.assert_status_ok();
    assert!(response.json::<Value>()["list"].as_array().unwrap().is_empty());
});

test_with_server!(admin_reopens_job, |server, ctx_state, config| {
    let admin = create_admin(&server, &ctx_state).await;
    let agent = create_member(&server, "COMPANY").await;
    let job = create_job(&server, &agent, "Tech lead").await;

    server
        .patch("/api/jobs")
        .add_header("Authorization", agent.bearer())
        .json(&json!({ "id": job["id"], "job_status": "CLOSED" }))
        .await
        .assert_status_ok();
    assert_eq!(get_member(&server, &agent.id, None).await["member_jobs"], 0);

    server
        .patch("/api/admin/jobs")
        .add_header("Authorization", admin.bearer())
        .json(&json!({ "id": job["id"], "job_status": "HIRING" }))
        .await
        .assert_status_ok();
    assert_eq!(get_member(&server, &agent.id, None).await["member_jobs"], 1);
});

test_with_server!(admin_manages_properties, |server, ctx_state, config| {
    let admin = create_admin(&server, &ctx_state).await;
    let agent = create_member(&server, "COMPANY").await;
    let property = create_property(&server, &agent, "Old office", 700).await;
    let property_id = property["id"].as_str().unwrap();

    let response = server
        .post("/api/admin/properties/list")
        .add_header("Authorization", admin.bearer())
        .json(&json!({ "page": 1, "limit": 10, "search": { "property_status": "ACTIVE" } }))
        .await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["meta_counter"][0]["total"], 1);

    server
        .patch("/api/admin/properties")
        .add_header("Authorization", admin.bearer())
        .json(&json!({ "id": property_id, "property_status": "DELETE" }))
        .await
        .assert_status_ok();
    assert_eq!(get_member(&server, &agent.id, None).await["member_properties"], 0);

    let response = server
        .delete(&format!("/api/admin/properties/{property_id}"))
        .add_header("Authorization", admin.bearer())
        .await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["id"], property_id);
});

test_with_server!(admin_removes_article_and_comment, |server, ctx_state, config| {
    let admin = create_admin(&server, &ctx_state).await;
    let author = create_member(&server, "USER").await;
    let article = create_article(&server, &author, "Spam post").await;
    let article_id = article["id"].as_str().unwrap();

    let response = server
        .post("/api/comments")
        .add_header("Authorization", author.bearer())
        .json(&json!({
            "comment_group": "ARTICLE",
            "comment_ref_id": article_id,
            "comment_content": "more spam",
        }))
        .await;
    response.assert_status_ok();
    let comment_id = response.json::<Value>()["id"].as_str().unwrap().to_string();

    let response = server
        .delete(&format!("/api/admin/comments/{comment_id}"))
        .add_header("Authorization", admin.bearer())
        .await;
    response.assert_status_ok();
    let response = server.get(&format!("/api/articles/{article_id}")).await;
    assert_eq!(response.json::<Value>()["article_comments"], 0);

    server
        .delete(&format!("/api/admin/articles/{article_id}"))
        .add_header("Authorization", admin.bearer())
        .await
        .assert_status_internal_server_error();

    server
        .patch("/api/admin/articles")
        .add_header("Authorization", admin.bearer())
        .json(&json!({ "id": article_id, "article_status": "DELETE" }))
        .await
        .assert_status_ok();
    assert_eq!(get_member(&server, &author.id, None).await["member_articles"], 0);

    server
        .delete(&format!("/api/admin/articles/{article_id}"))
        .add_header("Authorization", admin.bearer())
        .await
        .assert_status_ok();
});
