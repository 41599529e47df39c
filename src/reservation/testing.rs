//! Dobles de prueba para los colaboradores del flujo de reservas.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::db::{AuditError, AuditRecord, AuditSink};
use crate::notify::{Confirmation, NotificationError, Notifier};

/// Notificador que cuenta las llamadas y responde siempre igual
pub struct RecordingNotifier {
    succeed: bool,
    calls: AtomicUsize,
    sent: Mutex<Vec<Confirmation>>,
}

impl RecordingNotifier {
    pub fn succeeding() -> Self {
        Self::with_result(true)
    }

    pub fn failing() -> Self {
        Self::with_result(false)
    }

    fn with_result(succeed: bool) -> Self {
        Self {
            succeed,
            calls: AtomicUsize::new(0),
            sent: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last(&self) -> Option<Confirmation> {
        self.sent.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send_confirmation(&self, confirmation: &Confirmation) -> Result<(), NotificationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.sent.lock().unwrap().push(confirmation.clone());
        if self.succeed {
            Ok(())
        } else {
            Err(NotificationError::NotConfigured)
        }
    }
}

#[derive(Default)]
pub struct MemoryAuditSink {
    records: Mutex<Vec<AuditRecord>>,
}

impl MemoryAuditSink {
    pub fn records(&self) -> Vec<AuditRecord> {
        self.records.lock().unwrap().clone()
    }
}

#[async_trait]
impl AuditSink for MemoryAuditSink {
    async fn record(&self, record: &AuditRecord) -> Result<(), AuditError> {
        self.records.lock().unwrap().push(record.clone());
        Ok(())
    }
}

/// Sink que falla en cada escritura
pub struct FailingAuditSink;

#[async_trait]
impl AuditSink for FailingAuditSink {
    async fn record(&self, _record: &AuditRecord) -> Result<(), AuditError> {
        Err(AuditError::Timeout(Duration::from_millis(1)))
    }
}
