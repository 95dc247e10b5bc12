//! Entity lifecycle helpers
//!
//! One function per lifecycle step, parameterized by injected handles (API
//! client, browser session, fixture store) rather than registered on any
//! global object. Each helper performs exactly one step, asserts the
//! expected outcome fail-fast, and updates the fixture record for the
//! scenario's scoping identifier.
//!
//! Teardown helpers still return errors: a leaked user or note pollutes the
//! shared external application, so cleanup failures fail the scenario.

use reqwest::StatusCode;
use tracing::debug;

use crate::api::ApiClient;
use crate::browser::{Target, UiSession};
use crate::data::{self, Category};
use crate::error::{E2eError, E2eResult};
use crate::fixtures::{FixtureRecord, FixtureStore};

pub const PAGE_TITLE: &str = "Notes React Application for Automation Testing Practice";

// --- API helpers ---

/// Register a fresh user with generated name/email/8-character password and
/// start the scenario's fixture record.
pub async fn register_user(api: &ApiClient, store: &FixtureStore, id: &str) -> E2eResult<()> {
    let name = data::full_name();
    let email = data::email();
    let password = data::password(8);

    let user = api
        .register(&name, &email, &password)
        .await?
        .ensure_status("POST /users/register", StatusCode::CREATED)?
        .ensure_message("User account created successfully")?
        .data()?;

    if user.email != email || user.name != name {
        return Err(E2eError::AssertionFailed(format!(
            "register echoed ({}, {}), expected ({email}, {name})",
            user.email, user.name
        )));
    }

    store.write(
        id,
        &FixtureRecord {
            user_email: Some(email),
            user_id: Some(user.id),
            user_name: Some(name),
            user_password: Some(password),
            ..Default::default()
        },
    )?;
    debug!(id, "user registered via api");
    Ok(())
}

/// Log in with the record's credentials and merge the auth token.
pub async fn log_in_user(api: &ApiClient, store: &FixtureStore, id: &str) -> E2eResult<()> {
    let record = store.read(id)?;
    let email = record.require("user_email", &record.user_email)?;
    let password = record.require("user_password", &record.user_password)?;

    let login = api
        .login(email, password)
        .await?
        .ensure_status("POST /users/login", StatusCode::OK)?
        .ensure_message("Login successful")?
        .data()?;

    if login.token.is_empty() {
        return Err(E2eError::AssertionFailed("login returned an empty token".into()));
    }

    store.update(id, |r| r.user_token = Some(login.token))?;
    debug!(id, "user logged in via api");
    Ok(())
}

/// Create a note with generated title/description/category and merge the
/// note fields into the record.
pub async fn create_note(api: &ApiClient, store: &FixtureStore, id: &str) -> E2eResult<()> {
    let record = store.read(id)?;
    let token = record.token()?;

    let title = data::words(3);
    let description = data::words(5);
    let category = Category::random();

    let note = api
        .create_note(token, &title, &description, category.as_str(), None)
        .await?
        .ensure_status("POST /notes", StatusCode::OK)?
        .ensure_message("Note successfully created")?
        .data()?;

    if note.title != title || note.description != description {
        return Err(E2eError::AssertionFailed(
            "created note does not echo the submitted fields".into(),
        ));
    }

    store.update(id, |r| {
        r.note_id = Some(note.id);
        r.note_title = Some(note.title);
        r.note_description = Some(note.description);
        r.note_category = Some(note.category);
        r.note_completed = Some(note.completed);
    })?;
    debug!(id, "note created via api");
    Ok(())
}

/// Delete the record's note. Teardown, but failures still fail the scenario.
pub async fn delete_note(api: &ApiClient, store: &FixtureStore, id: &str) -> E2eResult<()> {
    let record = store.read(id)?;
    api.delete_note(record.token()?, record.note_id()?)
        .await?
        .ensure_status("DELETE /notes/:id", StatusCode::OK)?
        .ensure_message("Note successfully deleted")?;
    debug!(id, "note deleted via api");
    Ok(())
}

/// Delete the record's user account.
pub async fn delete_user(api: &ApiClient, store: &FixtureStore, id: &str) -> E2eResult<()> {
    let record = store.read(id)?;
    api.delete_account(record.token()?)
        .await?
        .ensure_status("DELETE /users/delete-account", StatusCode::OK)?
        .ensure_message("Account successfully deleted")?;
    debug!(id, "user deleted via api");
    Ok(())
}

// --- UI helpers ---

/// Register a user through the /register form and start the fixture record
/// with the id the application stores in local storage.
pub async fn create_user_via_web(
    session: &UiSession,
    store: &FixtureStore,
    id: &str,
) -> E2eResult<()> {
    let name = data::full_name();
    let email = data::email();
    let password = data::password(8);

    session.goto("/register").await?;
    session.wait_displayed(&Target::css(".badge")).await?;

    session
        .scroll_and_set_value(&Target::css(r#"input[name="email"]"#), &email)
        .await?;
    session
        .scroll_and_set_value(&Target::css(r#"input[name="name"]"#), &name)
        .await?;
    session
        .scroll_and_set_value(&Target::css(r#"input[name="password"]"#), &password)
        .await?;
    session
        .scroll_and_set_value(&Target::css(r#"input[name="confirmPassword"]"#), &password)
        .await?;
    session.scroll_and_click(&Target::button("Register")).await?;

    session
        .wait_displayed(&Target::text("b", "User account created successfully"))
        .await?;

    let user_id = session.local_storage("user_id").await?;

    store.write(
        id,
        &FixtureRecord {
            user_email: Some(email),
            user_name: Some(name),
            user_password: Some(password),
            user_id,
            ..Default::default()
        },
    )?;
    debug!(id, "user registered via web");
    Ok(())
}

/// Log in through the /login form, read the token the application stores in
/// local storage, land on /profile, and merge the token into the record.
pub async fn log_in_user_via_web(
    session: &UiSession,
    store: &FixtureStore,
    id: &str,
) -> E2eResult<()> {
    let record = store.read(id)?;
    let email = record.require("user_email", &record.user_email)?.to_string();
    let password = record
        .require("user_password", &record.user_password)?
        .to_string();

    session.goto("/login").await?;
    session
        .scroll_and_set_value(&Target::css(r#"input[name="email"]"#), &email)
        .await?;
    session
        .scroll_and_set_value(&Target::css(r#"input[name="password"]"#), &password)
        .await?;
    session.scroll_to_bottom().await?;
    session.scroll_and_click(&Target::button("Login")).await?;

    session
        .wait_displayed(&Target::css(r#"input[placeholder="Search notes..."]"#))
        .await?;

    let token = session.local_storage("token").await?.ok_or_else(|| {
        E2eError::AssertionFailed("no token in local storage after web login".into())
    })?;

    session.goto("/profile").await?;
    session
        .wait_displayed(&Target::css(r#"[data-testid="user-email"]"#))
        .await?;

    store.update(id, |r| r.user_token = Some(token))?;
    debug!(id, "user logged in via web");
    Ok(())
}

/// Create a note through the "+ Add Note" dialog and merge the note fields,
/// extracting the note id from the card's view link.
pub async fn create_note_via_web(
    session: &UiSession,
    store: &FixtureStore,
    id: &str,
) -> E2eResult<()> {
    let title = data::words(3);
    let description = data::words(5);
    let category = Category::random();

    session.goto("/").await?;
    session.scroll_and_click(&Target::button("+ Add Note")).await?;
    session
        .scroll_and_select(&Target::css(r#"select[name="category"]"#), category.as_str())
        .await?;
    session
        .scroll_and_set_value(&Target::css(r#"input[name="title"]"#), &title)
        .await?;
    session
        .scroll_and_set_value(&Target::css(r#"textarea[name="description"]"#), &description)
        .await?;
    session.scroll_and_click(&Target::button("Create")).await?;

    session
        .wait_displayed(&Target::contains_text(
            r#"[data-testid="note-card-title"]"#,
            &title,
        ))
        .await?;

    let note_id = note_id_from_view_link(session).await?;

    store.update(id, |r| {
        r.note_id = Some(note_id);
        r.note_title = Some(title);
        r.note_description = Some(description);
        r.note_category = Some(category.as_str().to_string());
        r.note_completed = Some(false);
    })?;
    debug!(id, "note created via web");
    Ok(())
}

/// The note id is the last segment of the card's view link href.
pub async fn note_id_from_view_link(session: &UiSession) -> E2eResult<String> {
    let view = Target::css(r#"[data-testid="note-view"]"#);
    session.wait_displayed(&view).await?;
    let href = session
        .attribute(&view, "href")
        .await?
        .ok_or_else(|| E2eError::AssertionFailed("note view link has no href".into()))?;
    href.rsplit('/')
        .next()
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .ok_or_else(|| {
            E2eError::AssertionFailed(format!("could not extract a note id from href {href:?}"))
        })
}

/// Delete the record's note through its view page.
pub async fn delete_note_via_web(
    session: &UiSession,
    store: &FixtureStore,
    id: &str,
) -> E2eResult<()> {
    let record = store.read(id)?;
    let note_id = record.note_id()?;

    session.goto(&format!("/notes/{note_id}")).await?;
    session
        .scroll_and_click(&Target::css(r#"[data-testid="note-delete"]"#))
        .await?;
    session
        .scroll_and_click(&Target::css(r#"[data-testid="note-delete-confirm"]"#))
        .await?;
    session
        .wait_displayed(&Target::css(r#"[data-testid="alert-message"]"#))
        .await?;
    debug!(id, "note deleted via web");
    Ok(())
}

/// Delete the logged-in user's account through the profile page.
pub async fn delete_user_via_web(session: &UiSession) -> E2eResult<()> {
    session.goto("/profile").await?;
    session.scroll_to_bottom().await?;
    session
        .scroll_and_click(&Target::button("Delete Account"))
        .await?;
    session
        .scroll_and_click(&Target::css(r#"[data-testid="note-delete-confirm"]"#))
        .await?;
    session
        .wait_displayed(&Target::css(r#"[data-testid="alert-message"]"#))
        .await?;
    debug!("user deleted via web");
    Ok(())
}
