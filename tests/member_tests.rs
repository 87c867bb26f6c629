mod helpers;

use helpers::{create_admin, create_member, fake_nick, get_member, login, signup, PASSWORD};
use nestar_server::{
    middleware::{ctx::Ctx, utils::string_utils::get_str_thing},
    services::member_service::MemberService,
};
use serde_json::{json, Value};

test_with_server!(signup_and_login, |server, ctx_state, config| {
    let nick = fake_nick();
    let response = signup(&server, &nick, "COMPANY").await;
    response.assert_status_ok();
    let body = response.json::<Value>();
    assert_eq!(body["member"]["member_nick"], nick.as_str());
    assert_eq!(body["member"]["member_type"], "COMPANY");
    assert_eq!(body["member"]["member_status"], "ACTIVE");
    assert_eq!(body["member"]["member_jobs"], 0);
    assert!(body["member"].get("member_password").is_none());
    assert!(!body["token"].as_str().unwrap().is_empty());

    let response = login(&server, &nick.to_uppercase(), PASSWORD).await;
    response.assert_status_ok();
    let body = response.json::<Value>();
    assert_eq!(body["member"]["member_nick"], nick.as_str());
});

test_with_server!(login_sets_jwt_cookie, |server, ctx_state, config| {
    let member = create_member(&server, "USER").await;

    let response = login(&server, &member.nick, PASSWORD).await;
    response.assert_status_ok();
    let cookie = response.cookie("jwt");
    assert!(!cookie.value().is_empty());

    let response = server
        .patch("/api/members")
        .add_cookie(cookie)
        .json(&json!({ "member_full_name": "Kim Minsu" }))
        .await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["member_full_name"], "Kim Minsu");
});

test_with_server!(signup_rejects_taken_nick, |server, ctx_state, config| {
    let member = create_member(&server, "USER").await;

    let response = signup(&server, &member.nick.to_uppercase(), "USER").await;
    response.assert_status_bad_request();
});

test_with_server!(signup_rejects_admin_type, |server, ctx_state, config| {
    let response = signup(&server, &fake_nick(), "ADMIN").await;
    response.assert_status_bad_request();
});

test_with_server!(signup_rejects_invalid_nick, |server, ctx_state, config| {
    let response = signup(&server, "a!", "USER").await;
    response.assert_status_bad_request();

    let response = signup(&server, "nick_that_is_too_long", "USER").await;
    response.assert_status_bad_request();
});

test_with_server!(login_fails_with_wrong_password, |server, ctx_state, config| {
    let member = create_member(&server, "USER").await;

    let response = login(&server, &member.nick, "wrong_pass").await;
    response.assert_status_unauthorized();

    let response = login(&server, &fake_nick(), PASSWORD).await;
    response.assert_status_not_found();
});

test_with_server!(blocked_member_cannot_login, |server, ctx_state, config| {
    let admin = create_admin(&server, &ctx_state).await;
    let member = create_member(&server, "USER").await;

    let response = server
        .patch("/api/admin/members")
        .add_header("Authorization", admin.bearer())
        .json(&json!({ "id": member.id, "member_status": "BLOCK" }))
        .await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["member_status"], "BLOCK");

    let response = login(&server, &member.nick, PASSWORD).await;
    response.assert_status_forbidden();

    let response = server
        .patch("/api/members")
        .add_header("Authorization", member.bearer())
        .json(&json!({ "member_desc": "still here" }))
        .await;
    response.assert_status_forbidden();
});

test_with_server!(member_view_counted_once_per_viewer, |server, ctx_state, config| {
    let target = create_member(&server, "COMPANY").await;
    let viewer = create_member(&server, "USER").await;

    let body = get_member(&server, &target.id, Some(&viewer)).await;
    assert_eq!(body["member_views"], 1);

    let body = get_member(&server, &target.id, Some(&viewer)).await;
    assert_eq!(body["member_views"], 1);

    // own profile and anonymous reads are not counted
    let body = get_member(&server, &target.id, Some(&target)).await;
    assert_eq!(body["member_views"], 1);
    let body = get_member(&server, &target.id, None).await;
    assert_eq!(body["member_views"], 1);
});

test_with_server!(protected_routes_require_token, |server, ctx_state, config| {
    let response = server
        .patch("/api/members")
        .json(&json!({ "member_desc": "anonymous" }))
        .await;
    response.assert_status_unauthorized();

    let response = server
        .patch("/api/members")
        .add_header("Authorization", "Bearer not_a_token")
        .json(&json!({ "member_desc": "anonymous" }))
        .await;
    response.assert_status_unauthorized();
});

test_with_server!(mark_member_toggles, |server, ctx_state, config| {
    let target = create_member(&server, "COMPANY").await;
    let fan = create_member(&server, "USER").await;

    let response = server
        .post(&format!("/api/members/{}/mark", target.id))
        .add_header("Authorization", fan.bearer())
        .await;
    response.assert_status_ok();
    let body = response.json::<Value>();
    assert_eq!(body["member_marks"], 1);
    assert_eq!(body["me_marked"][0]["my_favorite"], true);

    let response = server
        .post(&format!("/api/members/{}/mark", target.id))
        .add_header("Authorization", fan.bearer())
        .await;
    response.assert_status_ok();
    let body = response.json::<Value>();
    assert_eq!(body["member_marks"], 0);
    assert_eq!(body["me_marked"].as_array().unwrap().len(), 0);
});

test_with_server!(member_stats_editor_moves_counter, |server, ctx_state, config| {
    let member = create_member(&server, "USER").await;
    let ctx = Ctx::new(Ok(member.id.clone()));
    let service = MemberService::new(
        &ctx_state.db.client,
        &ctx,
        &ctx_state.db.marks,
        &ctx_state.db.views,
    );
    let id = get_str_thing(&member.id).unwrap();

    let updated = service
        .member_stats_editor(&id, "member_comments", 2)
        .await
        .unwrap();
    assert_eq!(updated.member_comments, 2);

    let updated = service
        .member_stats_editor(&id, "member_comments", -1)
        .await
        .unwrap();
    assert_eq!(updated.member_comments, 1);

    let missing = get_str_thing("member:missing").unwrap();
    let res = service.member_stats_editor(&missing, "member_comments", 1).await;
    assert!(res.is_err());
});
