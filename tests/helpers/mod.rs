pub mod test_with_server;

use std::sync::Arc;

use axum_test::{TestResponse, TestServer};
use fake::{faker::lorem::en::Sentence, Fake};
use nestar_server::{
    middleware::{ctx::Ctx, mw_ctx::CtxState},
    services::auth_service::AuthService,
};
use serde_json::{json, Value};

pub const PASSWORD: &str = "some_pass1";

#[derive(Debug, Clone)]
pub struct TestMember {
    pub id: String,
    pub nick: String,
    pub token: String,
}

impl TestMember {
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.token)
    }
}

#[allow(dead_code)]
pub fn fake_nick() -> String {
    let n: u32 = (1000..9_999_999u32).fake();
    format!("user_{n}")
}

#[allow(dead_code)]
pub fn fake_title() -> String {
    Sentence(2..4).fake::<String>()
}

#[allow(dead_code)]
pub async fn signup(server: &TestServer, nick: &str, member_type: &str) -> TestResponse {
    server
        .post("/api/members/signup")
        .json(&json!({
            "member_nick": nick,
            "member_password": PASSWORD,
            "member_type": member_type,
        }))
        .await
}

#[allow(dead_code)]
pub async fn login(server: &TestServer, nick: &str, password: &str) -> TestResponse {
    server
        .post("/api/members/login")
        .json(&json!({ "member_nick": nick, "member_password": password }))
        .await
}

fn auth_to_member(nick: &str, body: Value) -> TestMember {
    TestMember {
        id: body["member"]["id"].as_str().unwrap().to_string(),
        nick: nick.to_string(),
        token: body["token"].as_str().unwrap().to_string(),
    }
}

#[allow(dead_code)]
pub async fn create_member(server: &TestServer, member_type: &str) -> TestMember {
    let nick = fake_nick();
    let response = signup(server, &nick, member_type).await;
    response.assert_status_ok();
    auth_to_member(&nick, response.json::<Value>())
}

#[allow(dead_code)]
pub async fn create_admin(server: &TestServer, ctx_state: &Arc<CtxState>) -> TestMember {
    let nick = "admin_01";
    let ctx = Ctx::new(Ok("tests".to_string()));
    AuthService::new(&ctx_state.db.client, &ctx, &ctx_state.jwt)
        .create_default_admin(nick, PASSWORD)
        .await
        .unwrap();

    let response = login(server, nick, PASSWORD).await;
    response.assert_status_ok();
    auth_to_member(nick, response.json::<Value>())
}

#[allow(dead_code)]
pub fn job_input(title: &str) -> Value {
    json!({
        "job_type": "FULLTIME",
        "job_location": "SEOUL",
        "job_address": "Gangnam-gu 12",
        "job_title": title,
        "job_salary": 4000,
        "korean_level": "BASIC",
        "workplace_type": "ONSITE",
        "job_category": "ENGINEERING",
        "job_images": ["uploads/job/1.png"],
        "job_desc": "Backend role",
        "job_visa": true,
        "job_tags": ["BACKEND", "C#"],
        "job_experience": "JUNIOR",
    })
}

#[allow(dead_code)]
pub async fn create_job(server: &TestServer, agent: &TestMember, title: &str) -> Value {
    let response = server
        .post("/api/jobs")
        .add_header("Authorization", agent.bearer())
        .json(&job_input(title))
        .await;
    response.assert_status_ok();
    response.json::<Value>()
}

#[allow(dead_code)]
pub fn property_input(title: &str, price: i64) -> Value {
    json!({
        "property_type": "APARTMENT",
        "property_location": "BUSAN",
        "property_address": "Haeundae 3",
        "property_title": title,
        "property_price": price,
        "property_square": 84,
        "property_rooms": 3,
        "property_beds": 2,
        "property_images": ["uploads/property/1.png"],
        "property_barter": false,
        "property_rent": true,
    })
}

#[allow(dead_code)]
pub async fn create_property(
    server: &TestServer,
    agent: &TestMember,
    title: &str,
    price: i64,
) -> Value {
    let response = server
        .post("/api/properties")
        .add_header("Authorization", agent.bearer())
        .json(&property_input(title, price))
        .await;
    response.assert_status_ok();
    response.json::<Value>()
}

#[allow(dead_code)]
pub async fn create_article(server: &TestServer, author: &TestMember, title: &str) -> Value {
    let response = server
        .post("/api/articles")
        .add_header("Authorization", author.bearer())
        .json(&json!({
            "article_category": "FREE",
            "article_title": title,
            "article_content": "Hello from the board",
        }))
        .await;
    response.assert_status_ok();
    response.json::<Value>()
}

#[allow(dead_code)]
pub async fn get_member(server: &TestServer, id: &str, viewer: Option<&TestMember>) -> Value {
    let request = server.get(&format!("/api/members/{id}"));
    let request = match viewer {
        Some(viewer) => request.add_header("Authorization", viewer.bearer()),
        None => request,
    };
    let response = request.await;
    response.assert_status_ok();
    response.json::<Value>()
}
