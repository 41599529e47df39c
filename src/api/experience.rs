//! # API de Experiencias
//!
//! Banner de la experiencia de hoy y calendario semanal con los beneficios.

use actix_web::{get, web, HttpResponse, Responder};
use chrono::{Datelike, Local};
use serde::Serialize;

use super::{AppError, AppResult};
use crate::reservation::{
    experience_for_date, experience_for_weekday, weekly_schedule, DailyExperience,
    GUEST_BENEFITS,
};

#[derive(Serialize)]
struct ExperienceResponse {
    weekday: u32,
    headline: String,
    #[serde(flatten)]
    experience: DailyExperience,
}

impl ExperienceResponse {
    fn new(weekday: u32, experience: &DailyExperience) -> Self {
        Self {
            weekday,
            headline: experience.headline(),
            experience: *experience,
        }
    }
}

#[derive(Serialize)]
struct ScheduleResponse {
    schedule: Vec<ExperienceResponse>,
    benefits: &'static [&'static str],
}

/// Experiencia de hoy según la fecha local del servidor
#[get("/experiences/today")]
async fn today() -> impl Responder {
    let date = Local::now().date_naive();
    let weekday = date.weekday().num_days_from_monday();
    HttpResponse::Ok().json(ExperienceResponse::new(weekday, experience_for_date(date)))
}

/// Calendario semanal completo (0 = lunes)
#[get("/experiences")]
async fn schedule() -> impl Responder {
    let days = weekly_schedule()
        .iter()
        .zip(0u32..)
        .map(|(experience, weekday)| ExperienceResponse::new(weekday, experience))
        .collect();

    HttpResponse::Ok().json(ScheduleResponse {
        schedule: days,
        benefits: &GUEST_BENEFITS,
    })
}

#[get("/experiences/{weekday}")]
async fn by_weekday(path: web::Path<u32>) -> AppResult<impl Responder> {
    let weekday = path.into_inner();
    let experience =
        experience_for_weekday(weekday).map_err(|e| AppError::NotFound(e.to_string()))?;
    Ok(HttpResponse::Ok().json(ExperienceResponse::new(weekday, experience)))
}

/// Configura las rutas de experiencias
///
/// `/experiences/today` se registra antes que `/experiences/{weekday}` para que
/// "today" no se interprete como índice.
pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(today);
    cfg.service(schedule);
    cfg.service(by_weekday);
}
