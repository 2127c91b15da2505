use axum::{
    Extension, Json,
    extract::{Form, Query, State},
    http::{StatusCode, header},
    response::{Html, IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{error, warn};

use super::{AdminPrincipal, AppState, WebError, pages};
use crate::services::auth;

// ============================================================================
// Dashboard
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct DashboardQuery {
    password_changed: Option<String>,
    password_error: Option<String>,
}

/// GET /admin — latest workshop with its signups (newest first), or a
/// creation-only view when no workshop exists yet.
pub async fn dashboard(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<AdminPrincipal>,
    Query(query): Query<DashboardQuery>,
) -> Result<Html<String>, WebError> {
    let workshop = state
        .store
        .latest_workshop()
        .await
        .map_err(WebError::database)?;

    let signups = match &workshop {
        Some(workshop) => state
            .store
            .list_signups_desc(workshop.id)
            .await
            .map_err(WebError::database)?,
        None => Vec::new(),
    };

    let view = pages::AdminView {
        username: &principal.username,
        workshop: workshop.as_ref(),
        signups: &signups,
        password_changed: query.password_changed.as_deref() == Some("true"),
        password_error: query.password_error.as_deref(),
    };

    Ok(Html(pages::admin_dashboard(&view)))
}

// ============================================================================
// Create workshop
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct CreateWorkshopForm {
    title: Option<String>,
    description: Option<String>,
    workshop_date: Option<String>,
    workshop_time: Option<String>,
    location: Option<String>,
    max_capacity: Option<String>,
}

/// POST /admin/create-workshop — validate, combine date and time into the
/// stored display string, insert, redirect back to the dashboard.
pub async fn create_workshop(
    State(state): State<Arc<AppState>>,
    Form(form): Form<CreateWorkshopForm>,
) -> Result<Redirect, WebError> {
    let (
        Some(title),
        Some(description),
        Some(date),
        Some(time),
        Some(location),
        Some(capacity_raw),
    ) = (
        non_empty(form.title),
        non_empty(form.description),
        non_empty(form.workshop_date),
        non_empty(form.workshop_time),
        non_empty(form.location),
        non_empty(form.max_capacity),
    )
    else {
        return Err(WebError::validation("All fields are required"));
    };

    let max_capacity: i32 = capacity_raw
        .parse()
        .map_err(|_| WebError::validation("max_capacity must be a number"))?;
    if max_capacity < 1 {
        return Err(WebError::validation("max_capacity must be at least 1"));
    }

    let formatted_date = format_workshop_date(&date, &time)
        .ok_or_else(|| WebError::validation("Invalid date or time format"))?;

    state
        .store
        .insert_workshop(&title, &description, &formatted_date, &location, max_capacity)
        .await
        .map_err(WebError::database)?;

    Ok(Redirect::to("/admin"))
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// "2025-03-15" + "18:00" -> "Saturday, March 15, 2025 at 6:00 PM".
fn format_workshop_date(date: &str, time: &str) -> Option<String> {
    let date = chrono::NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()?;
    let time = chrono::NaiveTime::parse_from_str(time, "%H:%M").ok()?;
    let datetime = chrono::NaiveDateTime::new(date, time);

    Some(datetime.format("%A, %B %-d, %Y at %-I:%M %p").to_string())
}

// ============================================================================
// Change password
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct ChangePasswordForm {
    current_password: Option<String>,
    new_password: Option<String>,
    confirm_password: Option<String>,
}

/// POST /admin/change-password — all outcomes are redirects back to the
/// dashboard carrying a query flag, never an HTTP error status.
pub async fn change_password(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<AdminPrincipal>,
    Form(form): Form<ChangePasswordForm>,
) -> Redirect {
    let (Some(current), Some(new), Some(confirm)) = (
        form.current_password.filter(|v| !v.is_empty()),
        form.new_password.filter(|v| !v.is_empty()),
        form.confirm_password.filter(|v| !v.is_empty()),
    ) else {
        return error_redirect("Invalid form data");
    };

    if new != confirm {
        return error_redirect("New passwords do not match");
    }
    if new.chars().count() < 6 {
        return error_redirect("New password must be at least 6 characters");
    }

    let hash = match state.store.get_password_hash(&principal.username).await {
        Ok(Some(hash)) => hash,
        Ok(None) => return error_redirect("User not found"),
        Err(e) => {
            error!("Failed to load password hash: {e:#}");
            return error_redirect("Error updating password");
        }
    };

    match auth::verify_password(&hash, &current).await {
        Ok(true) => {}
        Ok(false) => return error_redirect("Current password is incorrect"),
        Err(e) => {
            error!("Password verification failed: {e:#}");
            return error_redirect("Error updating password");
        }
    }

    let new_hash = match auth::hash_password(&new).await {
        Ok(hash) => hash,
        Err(e) => {
            error!("Failed to hash new password: {e:#}");
            return error_redirect("Error updating password");
        }
    };

    if let Err(e) = state
        .store
        .update_password_hash(&principal.username, &new_hash)
        .await
    {
        error!("Failed to store new password hash: {e:#}");
        return error_redirect("Error updating password");
    }

    Redirect::to("/admin?password_changed=true")
}

fn error_redirect(message: &str) -> Redirect {
    Redirect::to(&format!(
        "/admin?password_error={}",
        urlencoding::encode(message)
    ))
}

// ============================================================================
// CSV export
// ============================================================================

/// GET /admin/export-csv — all signups for the latest workshop in
/// ascending creation order, as a downloadable attachment.
pub async fn export_csv(State(state): State<Arc<AppState>>) -> Response {
    let workshop = match state.store.latest_workshop().await {
        Ok(Some(workshop)) => workshop,
        Ok(None) => return json_error(StatusCode::NOT_FOUND, "No workshop found"),
        Err(e) => {
            error!("Failed to load workshop for CSV export: {e:#}");
            return json_error(StatusCode::INTERNAL_SERVER_ERROR, "Error loading signups");
        }
    };

    let signups = match state.store.list_signups_asc(workshop.id).await {
        Ok(signups) => signups,
        Err(e) => {
            error!("Failed to load signups for CSV export: {e:#}");
            return json_error(StatusCode::INTERNAL_SERVER_ERROR, "Error loading signups");
        }
    };

    let mut writer = csv::Writer::from_writer(Vec::new());

    if let Err(e) = writer.write_record(["First Name", "Last Name", "Email", "Phone", "Signed Up At"])
    {
        error!("Failed to write CSV header: {e}");
        return json_error(StatusCode::INTERNAL_SERVER_ERROR, "Error exporting signups");
    }

    for signup in &signups {
        let record = [
            signup.first_name.as_str(),
            signup.last_name.as_str(),
            signup.email.as_str(),
            signup.phone.as_deref().unwrap_or(""),
            signup.created_at.as_str(),
        ];
        if let Err(e) = writer.write_record(record) {
            warn!("Skipping signup {} in CSV export: {e}", signup.id);
        }
    }

    let data = match writer.into_inner() {
        Ok(data) => data,
        Err(e) => {
            error!("Failed to finish CSV export: {e}");
            return json_error(StatusCode::INTERNAL_SERVER_ERROR, "Error exporting signups");
        }
    };

    let filename = format!(
        "workshop-signups-{}.csv",
        chrono::Utc::now().format("%Y-%m-%d")
    );

    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename={filename}"),
            ),
        ],
        data,
    )
        .into_response()
}

fn json_error(status: StatusCode, message: &str) -> Response {
    (status, Json(serde_json::json!({ "error": message }))).into_response()
}
