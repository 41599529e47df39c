//! # Dominio de reservas
//!
//! - [`window`] - Horario de servicio (intervalo cerrado de horas válidas)
//! - [`experience`] - Tabla fija de experiencias por día de la semana
//! - [`workflow`] - Flujo de admisión de una reserva: validación, confirmación y auditoría

pub mod experience;
pub mod window;
pub mod workflow;

#[cfg(test)]
pub mod testing;

pub use experience::{
    experience_for_date, experience_for_weekday, weekly_schedule, DailyExperience,
    GUEST_BENEFITS,
};
pub use window::ServiceWindow;
pub use workflow::{Outcome, ReservationRequest, ReservationWorkflow, SessionContext};
