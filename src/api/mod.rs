//! # Módulo API
//!
//! Este módulo contiene todas las rutas y controladores de la API REST.
//!
//! ## Módulos principales
//!
//! - [`reservation`] - Envío de solicitudes de reserva
//! - [`experience`] - Experiencia del día y calendario semanal
//! - [`errors`] - Manejo de errores de la aplicación
//! - [`middleware`] - Logging de cadenas de errores

pub mod errors;
pub mod experience;
pub mod middleware;
pub mod reservation;

// Re-exportar tipos comunes para facilitar su uso
pub use errors::{AppError, AppResult};

use actix_web::web;

/// Configura todas las rutas de la API
///
/// ## Rutas configuradas
///
/// - `/reservations` - Ver [`reservation::routes`]
/// - `/experiences/*` - Ver [`experience::routes`]
///
/// Las rutas de reservas necesitan `web::Data<ReservationWorkflow>` y
/// `web::Data<AppConfig>` registrados en la aplicación.
pub fn init_routes(cfg: &mut web::ServiceConfig) {
    reservation::routes(cfg);
    experience::routes(cfg);
}
