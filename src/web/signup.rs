use axum::{
    Json,
    extract::{Form, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{error, warn};

use super::{AppState, pages, validation};
use crate::db::NewSignup;

const BIND_ERROR: &str = "Please fill in all required fields correctly.";
const PHONE_ERROR: &str = "Please enter a valid phone number with at least 10 digits.";

/// All fields arrive as optional strings so that any submitted form binds
/// and validation failures render the 400 page instead of an extractor
/// rejection.
#[derive(Debug, Deserialize)]
pub struct SignupForm {
    workshop_id: Option<String>,
    first_name: Option<String>,
    last_name: Option<String>,
    email: Option<String>,
    phone: Option<String>,
    country_code: Option<String>,
}

/// POST /signup — validate the form, insert the signup, fire both
/// notification emails on detached tasks, and redirect home.
pub async fn submit(State(state): State<Arc<AppState>>, Form(form): Form<SignupForm>) -> Response {
    let workshop_id = form
        .workshop_id
        .as_deref()
        .and_then(|raw| raw.trim().parse::<i32>().ok());

    let first_name = non_empty(form.first_name);
    let last_name = non_empty(form.last_name);
    let email = non_empty(form.email);

    let (Some(workshop_id), Some(first_name), Some(last_name), Some(email)) =
        (workshop_id, first_name, last_name, email)
    else {
        return form_error(BIND_ERROR);
    };

    if !validation::looks_like_email(&email) {
        return form_error(BIND_ERROR);
    }

    // Country code and number are stored combined, as submitted.
    let phone = non_empty(form.phone);
    let country_code = non_empty(form.country_code);
    let full_phone = match (phone, country_code) {
        (Some(phone), Some(code)) => Some(format!("{code} {phone}")),
        (Some(phone), None) => Some(phone),
        (None, _) => None,
    };

    if !validation::phone_is_valid(full_phone.as_deref().unwrap_or("")) {
        return form_error(PHONE_ERROR);
    }

    let workshop = match state.store.get_workshop(workshop_id).await {
        Ok(Some(workshop)) => workshop,
        Ok(None) => {
            warn!("Signup submitted for unknown workshop {workshop_id}");
            return json_error(StatusCode::INTERNAL_SERVER_ERROR, "Workshop not found");
        }
        Err(e) => {
            error!("Failed to look up workshop {workshop_id}: {e:#}");
            return json_error(StatusCode::INTERNAL_SERVER_ERROR, "Workshop not found");
        }
    };

    let new_signup = NewSignup {
        workshop_id: workshop.id,
        first_name,
        last_name,
        email,
        phone: full_phone,
    };

    let signup = match state.store.insert_signup(&new_signup).await {
        Ok(signup) => signup,
        Err(e) => {
            error!("Failed to insert signup: {e:#}");
            return json_error(StatusCode::INTERNAL_SERVER_ERROR, "Error saving signup");
        }
    };

    // Both notifications run on detached tasks and are deliberately not
    // awaited; the redirect goes out before any SMTP traffic happens.
    {
        let mailer = state.mailer.clone();
        let signup = signup.clone();
        let title = workshop.title.clone();
        let date = workshop.date.clone();
        tokio::spawn(async move {
            if let Err(e) = mailer.notify_admin_of_signup(&signup, &title, &date).await {
                warn!("Failed to send signup notification: {e}");
            }
        });
    }
    {
        let mailer = state.mailer.clone();
        let signup = signup.clone();
        let title = workshop.title.clone();
        let date = workshop.date.clone();
        let location = workshop.location.clone();
        tokio::spawn(async move {
            if let Err(e) = mailer
                .send_participant_confirmation(&signup, &title, &date, &location)
                .await
            {
                warn!("Failed to send confirmation email: {e}");
            }
        });
    }

    Redirect::to("/?success=true").into_response()
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn form_error(message: &str) -> Response {
    (StatusCode::BAD_REQUEST, Html(pages::signup_error(message))).into_response()
}

fn json_error(status: StatusCode, message: &str) -> Response {
    (status, Json(serde_json::json!({ "error": message }))).into_response()
}
