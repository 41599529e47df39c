//! # Registro de auditoría
//!
//! Cada interacción relevante deja un [`AuditRecord`] de solo escritura. La escritura
//! es de mejor esfuerzo: quien llama decide qué hacer con el error, y el flujo de
//! reservas nunca lo propaga al cliente.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::MongoRepo;

/// Tiempo máximo que se espera a que MongoDB acepte un registro
pub const DEFAULT_WRITE_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Error, Debug)]
pub enum AuditError {
    #[error("Error de base de datos en operación '{operation}': {source}")]
    Database {
        operation: String,
        #[source]
        source: mongodb::error::Error,
    },

    #[error("La escritura del registro superó el tiempo límite de {0:?}")]
    Timeout(Duration),
}

/// Etiquetas de acción usadas por la aplicación
pub mod actions {
    pub const APP_STARTED: &str = "AppStarted";
    pub const RESERVATION: &str = "Reservation";
    pub const RESERVATION_REJECTED: &str = "ReservationRejected";
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditRecord {
    pub timestamp: DateTime<Utc>,
    pub session_id: String,
    pub action: String,
    pub detail: String,
}

impl AuditRecord {
    pub fn new(session_id: &str, action: &str, detail: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            session_id: session_id.to_string(),
            action: action.to_string(),
            detail: detail.into(),
        }
    }

    /// Clave de almacenamiento: `{session_id}/{timestamp_millis}`
    pub fn key(&self) -> String {
        format!("{}/{}", self.session_id, self.timestamp.timestamp_millis())
    }
}

/// Forma persistida de un [`AuditRecord`]
///
/// `key` no es único: dos registros de la misma sesión en el mismo milisegundo
/// comparten clave y el `_id` lo genera MongoDB.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct AuditDocument {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub key: String,
    pub timestamp: i64, // milisegundos unix
    pub session_id: String,
    pub action: String,
    pub detail: String,
}

impl From<&AuditRecord> for AuditDocument {
    fn from(record: &AuditRecord) -> Self {
        AuditDocument {
            id: None,
            key: record.key(),
            timestamp: record.timestamp.timestamp_millis(),
            session_id: record.session_id.clone(),
            action: record.action.clone(),
            detail: record.detail.clone(),
        }
    }
}

#[async_trait]
pub trait AuditSink: Send + Sync {
    async fn record(&self, record: &AuditRecord) -> Result<(), AuditError>;
}

pub struct MongoAuditSink {
    repo: MongoRepo,
    write_timeout: Duration,
}

impl MongoAuditSink {
    pub fn new(repo: MongoRepo) -> Self {
        Self {
            repo,
            write_timeout: DEFAULT_WRITE_TIMEOUT,
        }
    }
}

#[async_trait]
impl AuditSink for MongoAuditSink {
    async fn record(&self, record: &AuditRecord) -> Result<(), AuditError> {
        let document = AuditDocument::from(record);
        let collection = self.repo.audit_events();
        let insert = collection.insert_one(document);

        tokio::time::timeout(self.write_timeout, insert)
            .await
            .map_err(|_| AuditError::Timeout(self.write_timeout))?
            .map_err(|source| AuditError::Database {
                operation: "insert_audit_record".to_string(),
                source,
            })?;

        tracing::debug!(key = %record.key(), action = %record.action, "Audit record stored");
        Ok(())
    }
}

/// Sink de respaldo cuando MongoDB no está disponible: el registro solo va al log
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingAuditSink;

#[async_trait]
impl AuditSink for TracingAuditSink {
    async fn record(&self, record: &AuditRecord) -> Result<(), AuditError> {
        tracing::info!(
            target: "audit",
            key = %record.key(),
            session_id = %record.session_id,
            action = %record.action,
            detail = %record.detail,
            "Audit record"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MongoConfig;
    use chrono::TimeZone;

    fn record() -> AuditRecord {
        AuditRecord {
            timestamp: Utc.timestamp_millis_opt(1_730_000_000_123).unwrap(),
            session_id: "a1b2c3d4".to_string(),
            action: actions::RESERVATION.to_string(),
            detail: "Ana on 2026-11-06 at 19:15 (party of 4)".to_string(),
        }
    }

    #[test]
    fn key_combines_session_and_millis() {
        assert_eq!(record().key(), "a1b2c3d4/1730000000123");
    }

    #[test]
    fn document_is_a_flat_string_number_map() {
        let value = serde_json::to_value(AuditDocument::from(&record())).unwrap();
        let map = value.as_object().unwrap();

        assert!(!map.contains_key("_id"));
        assert_eq!(map["key"], "a1b2c3d4/1730000000123");
        assert_eq!(map["timestamp"], 1_730_000_000_123_i64);
        assert_eq!(map["action"], "Reservation");
        assert!(map.values().all(|v| v.is_string() || v.is_number()));
    }

    #[tokio::test]
    async fn mongo_sink_reports_unreachable_server() {
        let config = MongoConfig {
            uri: "mongodb://127.0.0.1:1/?serverSelectionTimeoutMS=200".to_string(),
            database: "audit_test".to_string(),
            audit_collection: "app_events".to_string(),
        };
        let repo = MongoRepo::connect_lazy(&config).await.unwrap();
        let sink = MongoAuditSink::new(repo);

        let err = sink.record(&record()).await.unwrap_err();
        assert!(matches!(err, AuditError::Database { ref operation, .. } if operation == "insert_audit_record"));
    }

    #[test]
    fn tracing_sink_never_fails() {
        assert!(tokio_test::block_on(TracingAuditSink.record(&record())).is_ok());
    }

    #[test]
    fn timeout_error_mentions_duration() {
        let err = AuditError::Timeout(Duration::from_secs(5));
        assert!(err.to_string().contains("5s"));
    }
}
