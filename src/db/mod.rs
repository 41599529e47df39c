// src/db/mod.rs
pub mod audit;
pub mod mongodb;

pub use audit::{actions, AuditError, AuditRecord, AuditSink, MongoAuditSink, TracingAuditSink};
pub use self::mongodb::MongoRepo;
