//! Server-rendered HTML pages.
//!
//! The public pages are plain formatting functions over escaped values;
//! there is no template engine. All user-supplied text goes through
//! `html_escape` before it reaches the page.

use html_escape::encode_text;

use crate::db::{Signup, Workshop};

const STYLE: &str = "\
    body{font-family:Georgia,serif;max-width:720px;margin:2rem auto;padding:0 1rem;color:#333}\
    h1{color:#4a6b5d}\
    .banner{padding:.75rem 1rem;border-radius:4px;margin:1rem 0}\
    .banner.success{background:#e7f3e7;border:1px solid #9fc79f}\
    .banner.error{background:#f8e7e7;border:1px solid #d49a9a}\
    form{margin:1.5rem 0}\
    label{display:block;margin:.5rem 0 .25rem}\
    input,select,textarea{width:100%;padding:.4rem;box-sizing:border-box}\
    button{margin-top:1rem;padding:.5rem 1.5rem;background:#4a6b5d;color:#fff;border:none;border-radius:4px;cursor:pointer}\
    table{border-collapse:collapse;width:100%;margin:1rem 0}\
    th,td{border:1px solid #ccc;padding:.4rem .6rem;text-align:left}\
    .muted{color:#777}";

fn layout(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n\
         <html lang=\"en\">\n\
         <head>\n\
         <meta charset=\"UTF-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n\
         <title>{}</title>\n\
         <style>{STYLE}</style>\n\
         </head>\n\
         <body>\n{body}\n</body>\n\
         </html>\n",
        encode_text(title),
    )
}

/// Empty-state page shown when no workshop has been created yet.
#[must_use]
pub fn no_workshop() -> String {
    layout(
        "Shala Yoga Studio",
        "<h1>Shala Yoga Studio</h1>\n\
         <p>No upcoming workshops right now. Please check back soon!</p>",
    )
}

/// Workshop details plus the public signup form.
#[must_use]
pub fn home(workshop: &Workshop, signup_count: i64, success: bool) -> String {
    let banner = if success {
        "<div class=\"banner success\">Thank you for signing up! \
         A confirmation email is on its way.</div>\n"
    } else {
        ""
    };

    let body = format!(
        "<h1>{title}</h1>\n\
         {banner}\
         <p>{description}</p>\n\
         <p><strong>When:</strong> {date}<br>\n\
         <strong>Where:</strong> {location}<br>\n\
         <strong>Spots:</strong> {count} of {capacity} spots filled</p>\n\
         <h2>Sign up</h2>\n\
         <form method=\"POST\" action=\"/signup\">\n\
         <input type=\"hidden\" name=\"workshop_id\" value=\"{id}\">\n\
         <label for=\"first_name\">First name</label>\n\
         <input type=\"text\" id=\"first_name\" name=\"first_name\" required>\n\
         <label for=\"last_name\">Last name</label>\n\
         <input type=\"text\" id=\"last_name\" name=\"last_name\" required>\n\
         <label for=\"email\">Email</label>\n\
         <input type=\"email\" id=\"email\" name=\"email\" required>\n\
         <label for=\"country_code\">Country code</label>\n\
         <select id=\"country_code\" name=\"country_code\">\n\
         <option value=\"+1\">+1 (US/Canada)</option>\n\
         <option value=\"+44\">+44 (UK)</option>\n\
         <option value=\"+49\">+49 (Germany)</option>\n\
         <option value=\"+91\">+91 (India)</option>\n\
         </select>\n\
         <label for=\"phone\">Phone <span class=\"muted\">(optional)</span></label>\n\
         <input type=\"tel\" id=\"phone\" name=\"phone\">\n\
         <button type=\"submit\">Sign up</button>\n\
         </form>",
        title = encode_text(&workshop.title),
        description = encode_text(&workshop.description),
        date = encode_text(&workshop.date),
        location = encode_text(&workshop.location),
        count = signup_count,
        capacity = workshop.max_capacity,
        id = workshop.id,
    );

    layout(&workshop.title, &body)
}

/// 400 page rendered when the signup form fails validation.
#[must_use]
pub fn signup_error(message: &str) -> String {
    let body = format!(
        "<h1>Shala Yoga Studio</h1>\n\
         <div class=\"banner error\">{}</div>\n\
         <p><a href=\"/\">Back to the signup form</a></p>",
        encode_text(message),
    );

    layout("Shala Yoga Studio", &body)
}

pub struct AdminView<'a> {
    pub username: &'a str,
    pub workshop: Option<&'a Workshop>,
    pub signups: &'a [Signup],
    pub password_changed: bool,
    pub password_error: Option<&'a str>,
}

#[must_use]
pub fn admin_dashboard(view: &AdminView<'_>) -> String {
    let mut body = format!(
        "<h1>Admin Dashboard</h1>\n\
         <p class=\"muted\">Signed in as {}</p>\n",
        encode_text(view.username),
    );

    if view.password_changed {
        body.push_str("<div class=\"banner success\">Password changed successfully.</div>\n");
    }
    if let Some(error) = view.password_error {
        body.push_str(&format!(
            "<div class=\"banner error\">{}</div>\n",
            encode_text(error),
        ));
    }

    match view.workshop {
        Some(workshop) => {
            body.push_str(&format!(
                "<h2>{title}</h2>\n\
                 <p><strong>When:</strong> {date}<br>\n\
                 <strong>Capacity:</strong> {capacity}</p>\n\
                 <p><strong>{count} signups</strong> \
                 &middot; <a href=\"/admin/export-csv\">Export CSV</a></p>\n",
                title = encode_text(&workshop.title),
                date = encode_text(&workshop.date),
                capacity = workshop.max_capacity,
                count = view.signups.len(),
            ));

            body.push_str(
                "<table>\n<tr><th>First Name</th><th>Last Name</th>\
                 <th>Email</th><th>Phone</th><th>Signed Up At</th></tr>\n",
            );
            for signup in view.signups {
                body.push_str(&format!(
                    "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
                    encode_text(&signup.first_name),
                    encode_text(&signup.last_name),
                    encode_text(&signup.email),
                    encode_text(signup.phone.as_deref().unwrap_or("")),
                    encode_text(&signup.created_at),
                ));
            }
            body.push_str("</table>\n");
        }
        None => {
            body.push_str(
                "<h2>Create workshop</h2>\n\
                 <form method=\"POST\" action=\"/admin/create-workshop\">\n\
                 <label for=\"title\">Title</label>\n\
                 <input type=\"text\" id=\"title\" name=\"title\" required>\n\
                 <label for=\"description\">Description</label>\n\
                 <textarea id=\"description\" name=\"description\" rows=\"4\" required></textarea>\n\
                 <label for=\"workshop_date\">Date</label>\n\
                 <input type=\"date\" id=\"workshop_date\" name=\"workshop_date\" required>\n\
                 <label for=\"workshop_time\">Time</label>\n\
                 <input type=\"time\" id=\"workshop_time\" name=\"workshop_time\" required>\n\
                 <label for=\"location\">Location</label>\n\
                 <input type=\"text\" id=\"location\" name=\"location\" required>\n\
                 <label for=\"max_capacity\">Max capacity</label>\n\
                 <input type=\"number\" id=\"max_capacity\" name=\"max_capacity\" value=\"20\" min=\"1\" required>\n\
                 <button type=\"submit\">Create workshop</button>\n\
                 </form>\n",
            );
        }
    }

    body.push_str(
        "<h2>Change password</h2>\n\
         <form method=\"POST\" action=\"/admin/change-password\">\n\
         <label for=\"current_password\">Current password</label>\n\
         <input type=\"password\" id=\"current_password\" name=\"current_password\" required>\n\
         <label for=\"new_password\">New password</label>\n\
         <input type=\"password\" id=\"new_password\" name=\"new_password\" required minlength=\"6\">\n\
         <label for=\"confirm_password\">Confirm new password</label>\n\
         <input type=\"password\" id=\"confirm_password\" name=\"confirm_password\" required>\n\
         <button type=\"submit\">Change password</button>\n\
         </form>",
    );

    layout("Admin Dashboard", &body)
}
