//! # Envío de confirmaciones
//!
//! El flujo de reservas solo conoce el trait [`Notifier`]. En producción se usa
//! [`SmtpNotifier`]; si no hay relay SMTP configurado se usa [`DisabledNotifier`],
//! que falla siempre con [`NotificationError::NotConfigured`].

pub mod smtp;

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};
use thiserror::Error;

pub use smtp::{EmailConfig, SmtpNotifier};

pub const CONFIRMATION_SUBJECT: &str = "Reservation Confirmed";

/// Errores al entregar un mensaje de confirmación
#[derive(Error, Debug)]
pub enum NotificationError {
    /// No hay relay SMTP configurado (falta `SMTP_HOST`)
    #[error("El envío de correo no está configurado")]
    NotConfigured,

    /// La dirección del destinatario o del remitente no es válida
    #[error("Dirección de correo inválida '{address}': {source}")]
    Address {
        address: String,
        #[source]
        source: lettre::address::AddressError,
    },

    /// No se pudo construir el mensaje MIME
    #[error("Error construyendo el mensaje: {0}")]
    Build(#[from] lettre::error::Error),

    /// Fallo del transporte SMTP (autenticación, conexión, rechazo del servidor)
    #[error("Error del transporte SMTP: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),
}

/// Datos necesarios para confirmar una reserva al cliente
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Confirmation {
    pub recipient: String,
    pub name: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub party_size: u32,
}

impl Confirmation {
    pub fn subject(&self) -> &'static str {
        CONFIRMATION_SUBJECT
    }

    /// Cuerpo en texto plano del correo de confirmación
    pub fn body(&self) -> String {
        format!(
            "Dear {},\n\n\
             Your reservation for {} on {} at {} has been confirmed.\n\
             We look forward to seeing you!\n\n\
             Best regards,\n\
             The Taste & Toast Team\n",
            self.name,
            self.party_size,
            self.date.format("%Y-%m-%d"),
            self.time.format("%H:%M"),
        )
    }
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send_confirmation(&self, confirmation: &Confirmation) -> Result<(), NotificationError>;
}

/// Notificador usado cuando no hay SMTP configurado
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledNotifier;

#[async_trait]
impl Notifier for DisabledNotifier {
    async fn send_confirmation(&self, _confirmation: &Confirmation) -> Result<(), NotificationError> {
        Err(NotificationError::NotConfigured)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn confirmation() -> Confirmation {
        Confirmation {
            recipient: "ana@example.com".to_string(),
            name: "Ana".to_string(),
            date: NaiveDate::from_ymd_opt(2026, 11, 6).unwrap(),
            time: NaiveTime::from_hms_opt(19, 15, 0).unwrap(),
            party_size: 4,
        }
    }

    #[test]
    fn body_states_party_date_and_time() {
        let body = confirmation().body();
        assert!(body.starts_with("Dear Ana,"));
        assert!(body.contains("Your reservation for 4 on 2026-11-06 at 19:15 has been confirmed."));
        assert!(body.contains("The Taste & Toast Team"));
    }

    #[test]
    fn subject_is_fixed() {
        assert_eq!(confirmation().subject(), "Reservation Confirmed");
    }

    #[test]
    fn disabled_notifier_always_fails() {
        let result = tokio_test::block_on(DisabledNotifier.send_confirmation(&confirmation()));
        assert!(matches!(result, Err(NotificationError::NotConfigured)));
    }
}
