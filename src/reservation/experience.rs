//! # Experiencias del día
//!
//! Tabla fija con la promoción temática de cada día de la semana. El índice sigue la
//! convención de chrono [`Weekday::num_days_from_monday`]: 0 = lunes, 6 = domingo.

use chrono::{Datelike, NaiveDate, Weekday};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DailyExperience {
    pub day: &'static str,
    pub title: &'static str,
    pub description: &'static str,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ExperienceError {
    #[error("Día de la semana fuera de rango: {0} (se espera 0-6)")]
    OutOfRange(u32),
}

const DAILY_EXPERIENCES: [DailyExperience; 7] = [
    DailyExperience {
        day: "Monday",
        title: "Monday Masterclass",
        description: "Craft Cocktail Education Session",
    },
    DailyExperience {
        day: "Tuesday",
        title: "Tuesday Tasting",
        description: "Artisanal Cheese Pairing Experience",
    },
    DailyExperience {
        day: "Wednesday",
        title: "Wine Wednesday",
        description: "Regional Varietal Exploration",
    },
    DailyExperience {
        day: "Thursday",
        title: "Throwback Thursday",
        description: "Historical Mixology Demo",
    },
    DailyExperience {
        day: "Friday",
        title: "Firepit Friday",
        description: "Live Patio Music & Mixology",
    },
    DailyExperience {
        day: "Saturday",
        title: "Saturday Cellar",
        description: "Rare Reserve Tasting",
    },
    DailyExperience {
        day: "Sunday",
        title: "Sunday Social",
        description: "Chef's Tasting Menu Preview",
    },
];

/// Beneficios que se muestran junto al calendario semanal
pub const GUEST_BENEFITS: [&str; 4] = [
    "Complimentary tasting notes with any entrée",
    "Priority seating reservations",
    "Educational mixology materials",
    "Chef-curated pairing suggestions",
];

/// Busca la experiencia de un día de la semana (0 = lunes)
///
/// # Errores
/// - `OutOfRange`: si el índice es mayor que 6
pub fn experience_for_weekday(index: u32) -> Result<&'static DailyExperience, ExperienceError> {
    DAILY_EXPERIENCES
        .get(index as usize)
        .ok_or(ExperienceError::OutOfRange(index))
}

pub fn experience_for_date(date: NaiveDate) -> &'static DailyExperience {
    let weekday: Weekday = date.weekday();
    &DAILY_EXPERIENCES[weekday.num_days_from_monday() as usize]
}

pub fn weekly_schedule() -> &'static [DailyExperience] {
    &DAILY_EXPERIENCES
}

impl DailyExperience {
    /// Texto del banner: "Monday Masterclass: Craft Cocktail Education Session"
    pub fn headline(&self) -> String {
        format!("{}: {}", self.title, self.description)
    }
}
