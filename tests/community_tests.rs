mod helpers;

use axum_test::TestServer;
use helpers::{create_article, create_job, create_member, get_member, TestMember};
use serde_json::{json, Value};

async fn add_comment(
    server: &TestServer,
    author: &TestMember,
    group: &str,
    ref_id: &str,
    content: &str,
) -> Value {
    let response = server
        .post("/api/comments")
        .add_header("Authorization", author.bearer())
        .json(&json!({
            "comment_group": group,
            "comment_ref_id": ref_id,
            "comment_content": content,
        }))
        .await;
    response.assert_status_ok();
    response.json::<Value>()
}

async fn get_article(server: &TestServer, id: &str) -> Value {
    let response = server.get(&format!("/api/articles/{id}")).await;
    response.assert_status_ok();
    response.json::<Value>()
}

test_with_server!(article_counts_on_author, |server, ctx_state, config| {
    let author = create_member(&server, "USER").await;
    let article = create_article(&server, &author, "First post").await;
    assert_eq!(article["article_status"], "ACTIVE");
    assert_eq!(article["member_data"]["member_nick"], author.nick.as_str());

    let member = get_member(&server, &author.id, None).await;
    assert_eq!(member["member_articles"], 1);

    let response = server
        .patch("/api/articles")
        .add_header("Authorization", author.bearer())
        .json(&json!({ "id": article["id"], "article_status": "DELETE" }))
        .await;
    response.assert_status_ok();

    let member = get_member(&server, &author.id, None).await;
    assert_eq!(member["member_articles"], 0);

    server
        .get(&format!("/api/articles/{}", article["id"].as_str().unwrap()))
        .await
        .assert_status_not_found();
});

test_with_server!(list_articles_by_category, |server, ctx_state, config| {
    let author = create_member(&server, "USER").await;
    create_article(&server, &author, "Free talk").await;
    let response = server
        .post("/api/articles")
        .add_header("Authorization", author.bearer())
        .json(&json!({
            "article_category": "NEWS",
            "article_title": "Market news",
            "article_content": "Prices went up",
        }))
        .await;
    response.assert_status_ok();

    let response = server
        .post("/api/articles/list")
        .json(&json!({ "page": 1, "limit": 10, "search": { "article_category": "NEWS" } }))
        .await;
    response.assert_status_ok();
    let body = response.json::<Value>();
    assert_eq!(body["meta_counter"][0]["total"], 1);
    assert_eq!(body["list"][0]["article_title"], "Market news");

    let response = server
        .post("/api/articles/list")
        .json(&json!({ "page": 1, "limit": 10, "search": { "member_id": author.id } }))
        .await;
    assert_eq!(response.json::<Value>()["meta_counter"][0]["total"], 2);
});

test_with_server!(comments_keep_counter_in_step, |server, ctx_state, config| {
    let author = create_member(&server, "USER").await;
    let reader = create_member(&server, "USER").await;
    let article = create_article(&server, &author, "Ask me anything").await;
    let article_id = article["id"].as_str().unwrap();

    let first = add_comment(&server, &reader, "ARTICLE", article_id, "Nice one").await;
    add_comment(&server, &author, "ARTICLE", article_id, "Thanks").await;
    assert_eq!(first["comment_ref_id"], article_id);
    assert_eq!(first["member_data"]["member_nick"], reader.nick.as_str());
    assert_eq!(get_article(&server, article_id).await["article_comments"], 2);

    let response = server
        .post("/api/comments/list")
        .json(&json!({ "page": 1, "limit": 10, "search": { "comment_ref_id": article_id } }))
        .await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["meta_counter"][0]["total"], 2);

    // only the author of a comment can edit it
    let response = server
        .patch("/api/comments")
        .add_header("Authorization", author.bearer())
        .json(&json!({ "id": first["id"], "comment_status": "DELETE" }))
        .await;
    response.assert_status_internal_server_error();

    let response = server
        .patch("/api/comments")
        .add_header("Authorization", reader.bearer())
        .json(&json!({ "id": first["id"], "comment_status": "DELETE" }))
        .await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["comment_status"], "DELETE");
    assert_eq!(get_article(&server, article_id).await["article_comments"], 1);

    let response = server
        .post("/api/comments/list")
        .json(&json!({ "page": 1, "limit": 10, "search": { "comment_ref_id": article_id } }))
        .await;
    assert_eq!(response.json::<Value>()["meta_counter"][0]["total"], 1);
});

test_with_server!(comment_on_job_and_member, |server, ctx_state, config| {
    let agent = create_member(&server, "COMPANY").await;
    let seeker = create_member(&server, "USER").await;
    let job = create_job(&server, &agent, "Support engineer").await;
    let job_id = job["id"].as_str().unwrap();

    add_comment(&server, &seeker, "JOB", job_id, "Is remote possible?").await;
    let response = server.get(&format!("/api/jobs/{job_id}")).await;
    assert_eq!(response.json::<Value>()["job_comments"], 1);

    add_comment(&server, &seeker, "MEMBER", &agent.id, "Great company").await;
    let member = get_member(&server, &agent.id, None).await;
    assert_eq!(member["member_comments"], 1);
});

test_with_server!(comment_requires_open_target, |server, ctx_state, config| {
    let agent = create_member(&server, "COMPANY").await;
    let seeker = create_member(&server, "USER").await;
    let job = create_job(&server, &agent, "Game developer").await;

    server
        .patch("/api/jobs")
        .add_header("Authorization", agent.bearer())
        .json(&json!({ "id": job["id"], "job_status": "CLOSED" }))
        .await
        .assert_status_ok();

    let response = server
        .post("/api/comments")
        .add_header("Authorization", seeker.bearer())
        .json(&json!({
            "comment_group": "JOB",
            "comment_ref_id": job["id"],
            "comment_content": "Too late?",
        }))
        .await;
    response.assert_status_not_found();

    let response = server
        .post("/api/comments")
        .add_header("Authorization", seeker.bearer())
        .json(&json!({
            "comment_group": "ARTICLE",
            "comment_ref_id": "board_article:missing",
            "comment_content": "Hello?",
        }))
        .await;
    response.assert_status_not_found();
});
