//! # Manejo de errores de la capa HTTP
//!
//! Jerarquía de errores con thiserror. Cada variante sabe cómo registrarse en el log
//! y qué respuesta JSON devolver al cliente.

use actix_web::{HttpResponse, ResponseError};
use std::error::Error;
use thiserror::Error;

use crate::config::ConfigError;

#[derive(Error, Debug)]
pub enum AppError {
    /// Error de base de datos con contexto adicional
    #[error("Error de base de datos en operación '{operation}': {source}")]
    Database {
        operation: String,
        #[source]
        source: mongodb::error::Error,
    },

    /// Error de validación con campo específico
    #[error("Error de validación en campo '{field}': {message}")]
    ValidationWithField {
        field: String,
        message: String,
    },

    /// Error de recurso no encontrado
    #[error("No encontrado: {0}")]
    NotFound(String),

    /// Configuración inválida al arrancar
    #[error("Configuración inválida: {0}")]
    Configuration(#[from] ConfigError),
}

impl AppError {
    /// Crea un error de base de datos con contexto de operación
    pub fn database(operation: &str, source: mongodb::error::Error) -> Self {
        Self::Database {
            operation: operation.to_string(),
            source,
        }
    }

    /// Crea un error de validación con campo específico
    pub fn validation_field(field: &str, message: &str) -> Self {
        Self::ValidationWithField {
            field: field.to_string(),
            message: message.to_string(),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> actix_web::http::StatusCode {
        use actix_web::http::StatusCode;
        match self {
            Self::ValidationWithField { .. } => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            Self::ValidationWithField { field, message } => {
                tracing::warn!(
                    field = %field,
                    message = %message,
                    "Validation error"
                );
                HttpResponse::BadRequest().json(ErrorResponse {
                    error: "Validation error".to_string(),
                    message: format!("Field '{}': {}", field, message),
                })
            }
            Self::NotFound(what) => {
                tracing::info!(resource = %what, "Resource not found");
                HttpResponse::NotFound().json(ErrorResponse {
                    error: "Not found".to_string(),
                    message: what.clone(),
                })
            }
            error => {
                tracing::error!(
                    error = %error,
                    error_chain = ?error.source(),
                    "General error"
                );
                HttpResponse::InternalServerError().json(ErrorResponse {
                    error: "Error".to_string(),
                    message: "Internal server error".to_string(),
                })
            }
        }
    }
}

#[derive(serde::Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

pub type AppResult<T> = Result<T, AppError>;
