//! Best-effort outbound email on signup.
//!
//! Callers fire these sends on detached tasks and never await them from
//! the request path; a delivery failure is logged, never surfaced to the
//! submitting user, and never retried.

use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use thiserror::Error;
use tracing::{debug, info};

use crate::config::SmtpConfig;
use crate::db::Signup;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("Invalid mail address: {0}")]
    Address(#[from] lettre::address::AddressError),

    #[error("Failed to build message: {0}")]
    Message(#[from] lettre::error::Error),

    #[error("SMTP error: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),
}

/// SMTP mailer. When the environment leaves host/username/password unset
/// the transport is absent and every send is a trivial no-op success.
pub struct Mailer {
    transport: Option<AsyncSmtpTransport<Tokio1Executor>>,
    from: String,
    notification_email: String,
}

impl Mailer {
    pub fn from_config(config: &SmtpConfig) -> Result<Self, NotifyError> {
        if !config.is_configured() {
            info!("Email not configured, notifications disabled");
            return Ok(Self {
                transport: None,
                from: String::new(),
                notification_email: String::new(),
            });
        }

        let host = config.host.clone().unwrap_or_default();
        let username = config.username.clone().unwrap_or_default();
        let password = config.password.clone().unwrap_or_default();

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&host)?
            .port(config.port)
            .credentials(Credentials::new(username.clone(), password))
            .build();

        Ok(Self {
            transport: Some(transport),
            from: config.from.clone().unwrap_or(username),
            notification_email: config.notification_email.clone().unwrap_or_default(),
        })
    }

    /// Plain-text notice to the configured notification address.
    pub async fn notify_admin_of_signup(
        &self,
        signup: &Signup,
        workshop_title: &str,
        workshop_date: &str,
    ) -> Result<(), NotifyError> {
        let Some(transport) = &self.transport else {
            debug!("Email not configured, skipping signup notification");
            return Ok(());
        };

        let body = format!(
            "New workshop signup received!\n\n\
             Workshop: {workshop_title}\n\
             Date: {workshop_date}\n\n\
             Participant Details:\n\
             - Name: {} {}\n\
             - Email: {}\n\
             - Phone: {}\n\n\
             Signed up at: {}\n\n\
             View all signups at your admin panel.\n",
            signup.first_name,
            signup.last_name,
            signup.email,
            signup.phone.as_deref().unwrap_or(""),
            signup.created_at,
        );

        let message = Message::builder()
            .from(self.from.parse()?)
            .to(self.notification_email.parse()?)
            .subject(format!("New Signup: {workshop_title}"))
            .header(ContentType::TEXT_PLAIN)
            .body(body)?;

        transport.send(message).await?;
        info!("Signup notification email sent");
        Ok(())
    }

    /// Plain-text confirmation addressed to the participant.
    pub async fn send_participant_confirmation(
        &self,
        signup: &Signup,
        workshop_title: &str,
        workshop_date: &str,
        workshop_location: &str,
    ) -> Result<(), NotifyError> {
        let Some(transport) = &self.transport else {
            return Ok(());
        };

        let body = format!(
            "Dear {},\n\n\
             Thank you for registering for our workshop!\n\n\
             Workshop Details:\n\
             - Title: {workshop_title}\n\
             - Date: {workshop_date}\n\
             - Location: {workshop_location}\n\n\
             We look forward to seeing you there!\n\n\
             If you have any questions, please reply to this email.\n\n\
             Namaste\n",
            signup.first_name,
        );

        let message = Message::builder()
            .from(self.from.parse()?)
            .to(signup.email.parse()?)
            .subject(format!("Registration Confirmed: {workshop_title}"))
            .header(ContentType::TEXT_PLAIN)
            .body(body)?;

        transport.send(message).await?;
        info!("Confirmation email sent to participant");
        Ok(())
    }
}
