//! # Utilidades de logging para errores
//!
//! Los errores de los colaboradores externos (SMTP, MongoDB) no llegan al cliente;
//! su cadena completa de causas se envía aquí al log operativo.

use std::error::Error as StdError;

/// Recorre `source()` y devuelve cada nivel de la cadena como texto
pub fn error_chain<E>(error: &E) -> Vec<String>
where
    E: StdError + 'static,
{
    let mut chain = Vec::new();
    let mut current_error: Option<&dyn StdError> = Some(error);

    while let Some(err) = current_error {
        chain.push(err.to_string());
        current_error = err.source();
    }
    chain
}

/// Registra la cadena completa de errores
pub fn log_error_chain<E>(error: &E, context: Option<&str>)
where
    E: StdError + 'static,
{
    let error_chain = error_chain(error);

    if let Some(ctx) = context {
        tracing::error!(
            context = %ctx,
            error_chain = ?error_chain,
            "Error with full chain (with context)"
        );
    } else {
        tracing::error!(error_chain = ?error_chain, "Error with full chain");
    }
}

/// Extension trait para Results que añade logging de la cadena de errores
///
/// # Ejemplo de uso
/// ```rust,ignore
/// notifier
///     .send_confirmation(&confirmation)
///     .await
///     .log_error_context("sending reservation confirmation")
///     .is_err();
/// ```
pub trait ErrorLogExt<T, E> {
    /// Loggea la cadena de errores con contexto adicional
    fn log_error_context(self, context: &str) -> Result<T, E>;

    /// Loggea la cadena de errores como advertencia
    fn log_error_warn(self) -> Result<T, E>;
}

impl<T, E> ErrorLogExt<T, E> for Result<T, E>
where
    E: StdError + 'static,
{
    fn log_error_context(self, context: &str) -> Result<T, E> {
        if let Err(ref error) = self {
            log_error_chain(error, Some(context));
        }
        self
    }

    fn log_error_warn(self) -> Result<T, E> {
        if let Err(ref error) = self {
            tracing::warn!(
                error_chain = ?error_chain(error),
                "Warning with error chain"
            );
        }
        self
    }
}
