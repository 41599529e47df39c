use chrono::NaiveTime;

use crate::config::ConfigError;

/// Formato con el que se muestran los límites del horario al cliente (`11:30 AM`)
pub const DISPLAY_FORMAT: &str = "%I:%M %p";

/// Horario en el que se aceptan reservas.
///
/// Es un intervalo cerrado sobre la hora del día: ambos extremos son válidos y la
/// fecha de la reserva no interviene.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceWindow {
    start: NaiveTime,
    end: NaiveTime,
}

impl ServiceWindow {
    pub fn new(start: NaiveTime, end: NaiveTime) -> Result<Self, ConfigError> {
        if start > end {
            return Err(ConfigError::InvertedWindow { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> NaiveTime {
        self.start
    }

    pub fn end(&self) -> NaiveTime {
        self.end
    }

    pub fn contains(&self, time: NaiveTime) -> bool {
        self.start <= time && time <= self.end
    }

    /// Texto que se muestra cuando la hora solicitada queda fuera del horario
    pub fn describe(&self) -> String {
        format!(
            "{} and {}",
            self.start.format(DISPLAY_FORMAT),
            self.end.format(DISPLAY_FORMAT)
        )
    }
}

impl Default for ServiceWindow {
    /// 11:30 a 22:00
    fn default() -> Self {
        Self {
            start: NaiveTime::from_hms_opt(11, 30, 0).expect("11:30 es una hora válida"),
            end: NaiveTime::from_hms_opt(22, 0, 0).expect("22:00 es una hora válida"),
        }
    }
}
