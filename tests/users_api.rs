//! User account lifecycle through the HTTP API
//!
//! Run with: cargo test --test users_api
//! Requires BASE_API_URL pointing at a running Notes instance.
//!
//! Each scenario draws its own scoping identifier, sets up preconditions
//! through the lifecycle helpers, performs the action under test directly,
//! asserts on the decoded envelope, then tears down in reverse.

mod common;

use notes_e2e::api::{ApiReply, CONTENT_FORMAT_HEADER, AUTH_HEADER};
use notes_e2e::{commands, data, random_scope_id};
use reqwest::Method;

const TOKEN_REJECTED: &str = "Access token is not valid or has expired, you will need to login";
const BAD_CONTENT_FORMAT: &str =
    "Invalid X-Content-Format header, Only application/json is supported.";

#[tokio::test]
async fn register_creates_a_new_user_account() {
    let Some(env) = common::api_env() else { return };
    let id = random_scope_id();

    let name = data::full_name();
    let email = data::email();
    let password = data::password(8);

    let reply = env
        .api
        .register(&name, &email, &password)
        .await
        .expect("register request");

    assert_eq!(reply.status.as_u16(), 201);
    assert!(reply.body.success);
    assert_eq!(reply.body.status, 201);
    assert_eq!(reply.body.message, "User account created successfully");
    let user = reply.body.data.expect("created identity");
    assert_eq!(user.email, email);
    assert_eq!(user.name, name);

    env.store
        .write(
            &id,
            &notes_e2e::FixtureRecord {
                user_email: Some(email),
                user_id: Some(user.id),
                user_name: Some(name),
                user_password: Some(password),
                ..Default::default()
            },
        )
        .expect("write fixture record");

    commands::log_in_user(&env.api, &env.store, &id).await.expect("login");
    commands::delete_user(&env.api, &env.store, &id).await.expect("teardown user");
    env.store.delete(&id).expect("teardown fixture");
}

#[tokio::test]
async fn register_rejects_an_invalid_email() {
    let Some(env) = common::api_env() else { return };

    let reply = env
        .api
        .register(&data::full_name(), &format!("@{}", data::email()), &data::password(8))
        .await
        .expect("register request");

    assert_eq!(reply.status.as_u16(), 400);
    assert!(!reply.body.success);
    assert_eq!(reply.body.message, "A valid email address is required");
}

#[tokio::test]
async fn login_succeeds_for_an_existing_user() {
    let Some(env) = common::api_env() else { return };
    let id = random_scope_id();
    commands::register_user(&env.api, &env.store, &id).await.expect("register");

    let record = env.store.read(&id).expect("fixture record");
    let email = record.user_email.as_deref().unwrap();
    let password = record.user_password.as_deref().unwrap();

    let reply = env.api.login(email, password).await.expect("login request");

    assert_eq!(reply.status.as_u16(), 200);
    assert!(reply.body.success);
    assert_eq!(reply.body.message, "Login successful");
    let login = reply.body.data.expect("login payload");
    assert_eq!(login.email, email);
    assert_eq!(login.name, record.user_name.as_deref().unwrap());
    assert_eq!(login.id, record.user_id.as_deref().unwrap());
    assert!(!login.token.is_empty());

    env.store
        .update(&id, |r| r.user_token = Some(login.token))
        .expect("merge token");

    commands::delete_user(&env.api, &env.store, &id).await.expect("teardown user");
    env.store.delete(&id).expect("teardown fixture");
}

#[tokio::test]
async fn login_rejects_an_invalid_email() {
    let Some(env) = common::api_env() else { return };
    let id = random_scope_id();
    commands::register_user(&env.api, &env.store, &id).await.expect("register");

    let record = env.store.read(&id).expect("fixture record");
    let reply = env
        .api
        .login(
            &format!("@{}", record.user_email.as_deref().unwrap()),
            record.user_password.as_deref().unwrap(),
        )
        .await
        .expect("login request");

    assert_eq!(reply.status.as_u16(), 400);
    assert!(!reply.body.success);
    assert_eq!(reply.body.message, "A valid email address is required");

    commands::log_in_user(&env.api, &env.store, &id).await.expect("login for teardown");
    commands::delete_user(&env.api, &env.store, &id).await.expect("teardown user");
    env.store.delete(&id).expect("teardown fixture");
}

#[tokio::test]
async fn login_rejects_a_wrong_password() {
    let Some(env) = common::api_env() else { return };
    let id = random_scope_id();
    commands::register_user(&env.api, &env.store, &id).await.expect("register");

    let record = env.store.read(&id).expect("fixture record");
    let reply = env
        .api
        .login(
            record.user_email.as_deref().unwrap(),
            &format!("@{}", record.user_password.as_deref().unwrap()),
        )
        .await
        .expect("login request");

    assert_eq!(reply.status.as_u16(), 401);
    assert!(!reply.body.success);
    assert_eq!(reply.body.message, "Incorrect email address or password");

    commands::log_in_user(&env.api, &env.store, &id).await.expect("login for teardown");
    commands::delete_user(&env.api, &env.store, &id).await.expect("teardown user");
    env.store.delete(&id).expect("teardown fixture");
}

#[tokio::test]
async fn profile_returns_the_logged_in_identity() {
    let Some(env) = common::api_env() else { return };
    let id = random_scope_id();
    commands::register_user(&env.api, &env.store, &id).await.expect("register");
    commands::log_in_user(&env.api, &env.store, &id).await.expect("login");

    let record = env.store.read(&id).expect("fixture record");
    let reply = env
        .api
        .profile(record.user_token.as_deref().unwrap())
        .await
        .expect("profile request");

    assert_eq!(reply.status.as_u16(), 200);
    assert!(reply.body.success);
    assert_eq!(reply.body.message, "Profile successful");
    let user = reply.body.data.expect("profile payload");
    assert_eq!(user.email, record.user_email.as_deref().unwrap());
    assert_eq!(user.name, record.user_name.as_deref().unwrap());
    assert_eq!(user.id, record.user_id.as_deref().unwrap());

    commands::delete_user(&env.api, &env.store, &id).await.expect("teardown user");
    env.store.delete(&id).expect("teardown fixture");
}

#[tokio::test]
async fn profile_rejects_a_bad_content_format_header() {
    let Some(env) = common::api_env() else { return };
    let id = random_scope_id();
    commands::register_user(&env.api, &env.store, &id).await.expect("register");
    commands::log_in_user(&env.api, &env.store, &id).await.expect("login");

    let record = env.store.read(&id).expect("fixture record");
    let reply: ApiReply<serde_json::Value> = env
        .api
        .send(
            env.api
                .request(Method::GET, "/users/profile")
                .header(AUTH_HEADER, record.user_token.as_deref().unwrap())
                .header(CONTENT_FORMAT_HEADER, "badRequest"),
        )
        .await
        .expect("profile request");

    assert_eq!(reply.status.as_u16(), 400);
    assert!(!reply.body.success);
    assert_eq!(reply.body.message, BAD_CONTENT_FORMAT);

    commands::delete_user(&env.api, &env.store, &id).await.expect("teardown user");
    env.store.delete(&id).expect("teardown fixture");
}

#[tokio::test]
async fn profile_rejects_a_tampered_token() {
    let Some(env) = common::api_env() else { return };
    let id = random_scope_id();
    commands::register_user(&env.api, &env.store, &id).await.expect("register");
    commands::log_in_user(&env.api, &env.store, &id).await.expect("login");

    let record = env.store.read(&id).expect("fixture record");
    let reply = env
        .api
        .profile(&format!("@{}", record.user_token.as_deref().unwrap()))
        .await
        .expect("profile request");

    assert_eq!(reply.status.as_u16(), 401);
    assert!(!reply.body.success);
    assert_eq!(reply.body.message, TOKEN_REJECTED);

    commands::delete_user(&env.api, &env.store, &id).await.expect("teardown user");
    env.store.delete(&id).expect("teardown fixture");
}

#[tokio::test]
async fn profile_update_changes_name_phone_and_company() {
    let Some(env) = common::api_env() else { return };
    let id = random_scope_id();
    commands::register_user(&env.api, &env.store, &id).await.expect("register");
    commands::log_in_user(&env.api, &env.store, &id).await.expect("login");

    let record = env.store.read(&id).expect("fixture record");
    let name = data::full_name();
    let phone = data::numeric(12);
    let company = data::company();

    let reply = env
        .api
        .update_profile(record.user_token.as_deref().unwrap(), &name, &phone, &company)
        .await
        .expect("profile update request");

    assert_eq!(reply.status.as_u16(), 200);
    assert!(reply.body.success);
    assert_eq!(reply.body.message, "Profile updated successful");
    let user = reply.body.data.expect("updated profile payload");
    assert_eq!(user.name, name);
    assert_eq!(user.phone.as_deref(), Some(phone.as_str()));
    assert_eq!(user.company.as_deref(), Some(company.as_str()));
    assert_eq!(user.email, record.user_email.as_deref().unwrap());
    assert_eq!(user.id, record.user_id.as_deref().unwrap());

    commands::delete_user(&env.api, &env.store, &id).await.expect("teardown user");
    env.store.delete(&id).expect("teardown fixture");
}

#[tokio::test]
async fn profile_update_rejects_a_too_short_name() {
    let Some(env) = common::api_env() else { return };
    let id = random_scope_id();
    commands::register_user(&env.api, &env.store, &id).await.expect("register");
    commands::log_in_user(&env.api, &env.store, &id).await.expect("login");

    let record = env.store.read(&id).expect("fixture record");
    let reply = env
        .api
        .update_profile(
            record.user_token.as_deref().unwrap(),
            "6@#",
            &data::numeric(12),
            &data::company(),
        )
        .await
        .expect("profile update request");

    assert_eq!(reply.status.as_u16(), 400);
    assert_eq!(reply.body.message, "User name must be between 4 and 30 characters");

    commands::delete_user(&env.api, &env.store, &id).await.expect("teardown user");
    env.store.delete(&id).expect("teardown fixture");
}

#[tokio::test]
async fn profile_update_rejects_a_tampered_token() {
    let Some(env) = common::api_env() else { return };
    let id = random_scope_id();
    commands::register_user(&env.api, &env.store, &id).await.expect("register");
    commands::log_in_user(&env.api, &env.store, &id).await.expect("login");

    let record = env.store.read(&id).expect("fixture record");
    let reply = env
        .api
        .update_profile(
            &format!("@{}", record.user_token.as_deref().unwrap()),
            &data::full_name(),
            &data::numeric(12),
            &data::company(),
        )
        .await
        .expect("profile update request");

    assert_eq!(reply.status.as_u16(), 401);
    assert_eq!(reply.body.message, TOKEN_REJECTED);

    commands::delete_user(&env.api, &env.store, &id).await.expect("teardown user");
    env.store.delete(&id).expect("teardown fixture");
}

#[tokio::test]
async fn password_change_accepts_a_new_password() {
    let Some(env) = common::api_env() else { return };
    let id = random_scope_id();
    commands::register_user(&env.api, &env.store, &id).await.expect("register");
    commands::log_in_user(&env.api, &env.store, &id).await.expect("login");

    let record = env.store.read(&id).expect("fixture record");
    let current = record.user_password.as_deref().unwrap();
    let new_password = data::password(8);
    assert_ne!(current, new_password);

    let reply = env
        .api
        .change_password(record.user_token.as_deref().unwrap(), current, &new_password)
        .await
        .expect("change-password request");

    assert_eq!(reply.status.as_u16(), 200);
    assert_eq!(reply.body.message, "The password was successfully updated");

    commands::delete_user(&env.api, &env.store, &id).await.expect("teardown user");
    env.store.delete(&id).expect("teardown fixture");
}

#[tokio::test]
async fn password_change_rejects_a_too_short_password() {
    let Some(env) = common::api_env() else { return };
    let id = random_scope_id();
    commands::register_user(&env.api, &env.store, &id).await.expect("register");
    commands::log_in_user(&env.api, &env.store, &id).await.expect("login");

    let record = env.store.read(&id).expect("fixture record");
    let reply = env
        .api
        .change_password(
            record.user_token.as_deref().unwrap(),
            record.user_password.as_deref().unwrap(),
            "123",
        )
        .await
        .expect("change-password request");

    assert_eq!(reply.status.as_u16(), 400);
    assert_eq!(reply.body.message, "New password must be between 6 and 30 characters");

    commands::delete_user(&env.api, &env.store, &id).await.expect("teardown user");
    env.store.delete(&id).expect("teardown fixture");
}

#[tokio::test]
async fn password_change_rejects_a_tampered_token() {
    let Some(env) = common::api_env() else { return };
    let id = random_scope_id();
    commands::register_user(&env.api, &env.store, &id).await.expect("register");
    commands::log_in_user(&env.api, &env.store, &id).await.expect("login");

    let record = env.store.read(&id).expect("fixture record");
    let reply = env
        .api
        .change_password(
            &format!("@{}", record.user_token.as_deref().unwrap()),
            record.user_password.as_deref().unwrap(),
            &data::password(8),
        )
        .await
        .expect("change-password request");

    assert_eq!(reply.status.as_u16(), 401);
    assert_eq!(reply.body.message, TOKEN_REJECTED);

    commands::delete_user(&env.api, &env.store, &id).await.expect("teardown user");
    env.store.delete(&id).expect("teardown fixture");
}

#[tokio::test]
async fn logout_invalidates_the_session() {
    let Some(env) = common::api_env() else { return };
    let id = random_scope_id();
    commands::register_user(&env.api, &env.store, &id).await.expect("register");
    commands::log_in_user(&env.api, &env.store, &id).await.expect("login");

    let record = env.store.read(&id).expect("fixture record");
    let reply = env
        .api
        .logout(record.user_token.as_deref().unwrap())
        .await
        .expect("logout request");

    assert_eq!(reply.status.as_u16(), 200);
    assert_eq!(reply.body.message, "User has been successfully logged out");

    // the old token is dead, log in again to tear down
    commands::log_in_user(&env.api, &env.store, &id).await.expect("re-login for teardown");
    commands::delete_user(&env.api, &env.store, &id).await.expect("teardown user");
    env.store.delete(&id).expect("teardown fixture");
}

#[tokio::test]
async fn logout_rejects_a_bad_content_format_header() {
    let Some(env) = common::api_env() else { return };
    let id = random_scope_id();
    commands::register_user(&env.api, &env.store, &id).await.expect("register");
    commands::log_in_user(&env.api, &env.store, &id).await.expect("login");

    let record = env.store.read(&id).expect("fixture record");
    let reply: ApiReply<serde_json::Value> = env
        .api
        .send(
            env.api
                .request(Method::DELETE, "/users/logout")
                .header(AUTH_HEADER, record.user_token.as_deref().unwrap())
                .header(CONTENT_FORMAT_HEADER, "badRequest"),
        )
        .await
        .expect("logout request");

    assert_eq!(reply.status.as_u16(), 400);
    assert_eq!(reply.body.message, BAD_CONTENT_FORMAT);

    commands::delete_user(&env.api, &env.store, &id).await.expect("teardown user");
    env.store.delete(&id).expect("teardown fixture");
}

#[tokio::test]
async fn logout_rejects_a_tampered_token() {
    let Some(env) = common::api_env() else { return };
    let id = random_scope_id();
    commands::register_user(&env.api, &env.store, &id).await.expect("register");
    commands::log_in_user(&env.api, &env.store, &id).await.expect("login");

    let record = env.store.read(&id).expect("fixture record");
    let reply = env
        .api
        .logout(&format!("@{}", record.user_token.as_deref().unwrap()))
        .await
        .expect("logout request");

    assert_eq!(reply.status.as_u16(), 401);
    assert_eq!(reply.body.message, TOKEN_REJECTED);

    commands::delete_user(&env.api, &env.store, &id).await.expect("teardown user");
    env.store.delete(&id).expect("teardown fixture");
}

#[tokio::test]
async fn account_delete_removes_the_user() {
    let Some(env) = common::api_env() else { return };
    let id = random_scope_id();
    commands::register_user(&env.api, &env.store, &id).await.expect("register");
    commands::log_in_user(&env.api, &env.store, &id).await.expect("login");

    let record = env.store.read(&id).expect("fixture record");
    let reply = env
        .api
        .delete_account(record.user_token.as_deref().unwrap())
        .await
        .expect("delete-account request");

    assert_eq!(reply.status.as_u16(), 200);
    assert_eq!(reply.body.message, "Account successfully deleted");

    // the account is gone, only the fixture file remains
    env.store.delete(&id).expect("teardown fixture");
}

#[tokio::test]
async fn account_delete_rejects_a_bad_content_format_header() {
    let Some(env) = common::api_env() else { return };
    let id = random_scope_id();
    commands::register_user(&env.api, &env.store, &id).await.expect("register");
    commands::log_in_user(&env.api, &env.store, &id).await.expect("login");

    let record = env.store.read(&id).expect("fixture record");
    let reply: ApiReply<serde_json::Value> = env
        .api
        .send(
            env.api
                .request(Method::DELETE, "/users/delete-account")
                .header(AUTH_HEADER, record.user_token.as_deref().unwrap())
                .header(CONTENT_FORMAT_HEADER, "badRequest"),
        )
        .await
        .expect("delete-account request");

    assert_eq!(reply.status.as_u16(), 400);
    assert_eq!(reply.body.message, BAD_CONTENT_FORMAT);

    commands::delete_user(&env.api, &env.store, &id).await.expect("teardown user");
    env.store.delete(&id).expect("teardown fixture");
}

#[tokio::test]
async fn account_delete_rejects_a_tampered_token() {
    let Some(env) = common::api_env() else { return };
    let id = random_scope_id();
    commands::register_user(&env.api, &env.store, &id).await.expect("register");
    commands::log_in_user(&env.api, &env.store, &id).await.expect("login");

    let record = env.store.read(&id).expect("fixture record");
    let reply = env
        .api
        .delete_account(&format!("@{}", record.user_token.as_deref().unwrap()))
        .await
        .expect("delete-account request");

    assert_eq!(reply.status.as_u16(), 401);
    assert_eq!(reply.body.message, TOKEN_REJECTED);

    commands::delete_user(&env.api, &env.store, &id).await.expect("teardown user");
    env.store.delete(&id).expect("teardown fixture");
}
