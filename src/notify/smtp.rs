//! Entrega de confirmaciones por SMTP con `lettre`.

use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};

use super::{Confirmation, NotificationError, Notifier};

const DEFAULT_SMTP_PORT: u16 = 587;
const DEFAULT_FROM_ADDRESS: &str = "reservations@tasteandtoast.example";

/// Configuración del relay SMTP
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailConfig {
    pub smtp_host: String,
    pub smtp_port: u16,
    pub from_address: String,
    pub smtp_user: Option<String>,
    pub smtp_password: Option<String>,
}

impl EmailConfig {
    /// Lee la configuración SMTP del entorno.
    ///
    /// Retorna `None` si `SMTP_HOST` no está definido; en ese caso no se envían correos.
    ///
    /// | Variable        | Requerida | Default                               |
    /// |-----------------|-----------|---------------------------------------|
    /// | `SMTP_HOST`     | sí        | -                                     |
    /// | `SMTP_PORT`     | no        | `587`                                 |
    /// | `SMTP_FROM`     | no        | `reservations@tasteandtoast.example`  |
    /// | `SMTP_USER`     | no        | -                                     |
    /// | `SMTP_PASSWORD` | no        | -                                     |
    pub fn from_env() -> Option<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Option<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let smtp_host = lookup("SMTP_HOST").filter(|h| !h.trim().is_empty())?;
        Some(Self {
            smtp_host,
            smtp_port: lookup("SMTP_PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_SMTP_PORT),
            from_address: lookup("SMTP_FROM").unwrap_or_else(|| DEFAULT_FROM_ADDRESS.to_string()),
            smtp_user: lookup("SMTP_USER"),
            smtp_password: lookup("SMTP_PASSWORD"),
        })
    }
}

pub struct SmtpNotifier {
    config: EmailConfig,
    mailer: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpNotifier {
    /// Construye el transporte STARTTLS una sola vez; las credenciales son opcionales
    pub fn new(config: EmailConfig) -> Result<Self, NotificationError> {
        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)?
            .port(config.smtp_port);

        if let (Some(user), Some(pass)) = (&config.smtp_user, &config.smtp_password) {
            builder = builder.credentials(Credentials::new(user.clone(), pass.clone()));
        }

        Ok(Self {
            mailer: builder.build(),
            config,
        })
    }
}

fn build_message(from_address: &str, confirmation: &Confirmation) -> Result<Message, NotificationError> {
    let from = parse_mailbox(from_address, None)?;
    let to = parse_mailbox(&confirmation.recipient, Some(&confirmation.name))?;

    Ok(Message::builder()
        .from(from)
        .to(to)
        .subject(confirmation.subject())
        .header(ContentType::TEXT_PLAIN)
        .body(confirmation.body())?)
}

fn parse_mailbox(address: &str, display_name: Option<&str>) -> Result<Mailbox, NotificationError> {
    let email = address
        .trim()
        .parse()
        .map_err(|source| NotificationError::Address {
            address: address.to_string(),
            source,
        })?;
    let name = display_name
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .map(str::to_string);
    Ok(Mailbox::new(name, email))
}

#[async_trait]
impl Notifier for SmtpNotifier {
    async fn send_confirmation(&self, confirmation: &Confirmation) -> Result<(), NotificationError> {
        let message = build_message(&self.config.from_address, confirmation)?;
        self.mailer.send(message).await?;

        tracing::info!(
            to = %confirmation.recipient,
            date = %confirmation.date,
            "Confirmation email sent"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};

    fn confirmation(recipient: &str) -> Confirmation {
        Confirmation {
            recipient: recipient.to_string(),
            name: "Ana".to_string(),
            date: NaiveDate::from_ymd_opt(2026, 11, 6).unwrap(),
            time: NaiveTime::from_hms_opt(20, 0, 0).unwrap(),
            party_size: 2,
        }
    }

    #[test]
    fn from_lookup_requires_host() {
        assert!(EmailConfig::from_lookup(|_| None).is_none());
        assert!(EmailConfig::from_lookup(|k| (k == "SMTP_HOST").then(|| " ".to_string())).is_none());
    }

    #[test]
    fn from_lookup_applies_defaults() {
        let config =
            EmailConfig::from_lookup(|k| (k == "SMTP_HOST").then(|| "mail.local".to_string()))
                .unwrap();
        assert_eq!(config.smtp_port, DEFAULT_SMTP_PORT);
        assert_eq!(config.from_address, DEFAULT_FROM_ADDRESS);
        assert!(config.smtp_user.is_none());
    }

    #[test]
    fn invalid_recipient_is_an_address_error() {
        let err = build_message(DEFAULT_FROM_ADDRESS, &confirmation("not-an-email")).unwrap_err();
        assert!(matches!(err, NotificationError::Address { ref address, .. } if address == "not-an-email"));
    }

    #[test]
    fn message_carries_subject_and_recipient() {
        let message = build_message(DEFAULT_FROM_ADDRESS, &confirmation("ana@example.com")).unwrap();
        let raw = String::from_utf8(message.formatted()).unwrap();
        assert!(raw.contains("Subject: Reservation Confirmed"));
        assert!(raw.contains("ana@example.com"));
        assert!(raw.contains("Your reservation for 2 on 2026-11-06 at 20:00 has been confirmed."));
    }
}
