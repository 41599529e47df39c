//! # Flujo de admisión de reservas
//!
//! Única regla de negocio: la hora solicitada debe estar dentro del [`ServiceWindow`].
//! Si lo está se envía la confirmación y, si el envío funciona, se deja un registro de
//! auditoría. Ningún otro campo se valida aquí.
//!
//! Los errores de los colaboradores nunca salen de este módulo: se registran con su
//! cadena de causas y el llamador solo ve un [`Outcome`].

use std::sync::Arc;

use chrono::{NaiveDate, NaiveTime};
use uuid::Uuid;

use super::ServiceWindow;
use crate::api::middleware::ErrorLogExt;
use crate::db::{actions, AuditRecord, AuditSink};
use crate::notify::{Confirmation, Notifier};

/// Datos de una solicitud de reserva tal como llegan del formulario
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReservationRequest {
    pub name: String,
    pub email: String,
    pub party_size: u32,
    pub date: NaiveDate,
    pub time: NaiveTime,
}

/// Identidad del visitante que envía la solicitud
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionContext {
    session_id: String,
}

impl SessionContext {
    pub fn new(session_id: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
        }
    }

    /// Nuevo identificador corto: los primeros 8 caracteres de un UUID v4
    pub fn generate() -> Self {
        let mut id = Uuid::new_v4().to_string();
        id.truncate(8);
        Self { session_id: id }
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }
}

/// Resultado de una solicitud
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Confirmed {
        date: NaiveDate,
        time: NaiveTime,
        party_size: u32,
    },
    TimeOutOfRange {
        service_start: NaiveTime,
        service_end: NaiveTime,
    },
    NotificationFailed,
}

impl Outcome {
    /// Mensaje para mostrar al cliente
    pub fn message(&self, contact_fallback: &str) -> String {
        match self {
            Outcome::Confirmed {
                date,
                time,
                party_size,
            } => format!(
                "Reservation confirmed for {} on {} at {}! Check your email for details.",
                party_size,
                date.format("%Y-%m-%d"),
                time.format("%H:%M"),
            ),
            Outcome::TimeOutOfRange {
                service_start,
                service_end,
            } => format!(
                "Please select a time between {} and {}",
                service_start.format(super::window::DISPLAY_FORMAT),
                service_end.format(super::window::DISPLAY_FORMAT),
            ),
            Outcome::NotificationFailed => format!(
                "There was an issue confirming your reservation. \
                 Please try again or contact us directly at {}.",
                contact_fallback
            ),
        }
    }
}

pub struct ReservationWorkflow {
    window: ServiceWindow,
    audit_rejections: bool,
    notifier: Arc<dyn Notifier>,
    audit: Arc<dyn AuditSink>,
}

impl ReservationWorkflow {
    pub fn new(window: ServiceWindow, notifier: Arc<dyn Notifier>, audit: Arc<dyn AuditSink>) -> Self {
        Self {
            window,
            audit_rejections: false,
            notifier,
            audit,
        }
    }

    /// Activa el registro de auditoría de solicitudes fuera de horario
    pub fn with_rejection_audit(mut self, enabled: bool) -> Self {
        self.audit_rejections = enabled;
        self
    }

    /// Procesa una solicitud de reserva.
    ///
    /// 1. Hora fuera del horario: `TimeOutOfRange`, sin notificación.
    /// 2. Se envía la confirmación por correo.
    /// 3. Envío correcto: registro `"Reservation"` y `Confirmed`.
    /// 4. Envío fallido: `NotificationFailed`, sin registro.
    ///
    /// No hay reintentos ni idempotencia: reenviar la misma solicitud manda otro correo.
    pub async fn submit_reservation(
        &self,
        session: &SessionContext,
        request: &ReservationRequest,
    ) -> Outcome {
        if !self.window.contains(request.time) {
            tracing::info!(
                session_id = %session.session_id(),
                time = %request.time,
                window = %self.window.describe(),
                "Reservation time outside service window"
            );
            if self.audit_rejections {
                let detail = format!(
                    "{} requested {} at {}",
                    request.name, request.date, request.time.format("%H:%M")
                );
                self.write_audit(AuditRecord::new(
                    session.session_id(),
                    actions::RESERVATION_REJECTED,
                    detail,
                ))
                .await;
            }
            return Outcome::TimeOutOfRange {
                service_start: self.window.start(),
                service_end: self.window.end(),
            };
        }

        let confirmation = Confirmation {
            recipient: request.email.clone(),
            name: request.name.clone(),
            date: request.date,
            time: request.time,
            party_size: request.party_size,
        };

        if self
            .notifier
            .send_confirmation(&confirmation)
            .await
            .log_error_context("sending reservation confirmation")
            .is_err()
        {
            return Outcome::NotificationFailed;
        }

        let detail = format!(
            "{} on {} at {} (party of {})",
            request.name,
            request.date,
            request.time.format("%H:%M"),
            request.party_size
        );
        self.write_audit(AuditRecord::new(
            session.session_id(),
            actions::RESERVATION,
            detail,
        ))
        .await;

        tracing::info!(
            session_id = %session.session_id(),
            date = %request.date,
            party_size = request.party_size,
            "Reservation confirmed"
        );

        Outcome::Confirmed {
            date: request.date,
            time: request.time,
            party_size: request.party_size,
        }
    }

    /// Escribe un registro; un fallo solo se reporta en el log operativo
    pub async fn write_audit(&self, record: AuditRecord) {
        let _ = self
            .audit
            .record(&record)
            .await
            .log_error_warn();
    }
}
