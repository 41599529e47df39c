//! # API de Reservas
//!
//! Un único endpoint que recibe el formulario, valida el formato de los campos y
//! delega en [`ReservationWorkflow`]. El resultado se traduce a uno de tres estados
//! visibles para el cliente: confirmada, hora fuera de horario o fallo al notificar.
//!
//! La sesión del visitante viaja en la cabecera `X-Session-Id`; si falta se genera
//! una nueva y se devuelve en la respuesta.

use actix_web::{get, post, web, HttpRequest, HttpResponse, Responder};
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use super::{AppError, AppResult};
use crate::config::AppConfig;
use crate::reservation::{Outcome, ReservationRequest, ReservationWorkflow, SessionContext};

pub const SESSION_HEADER: &str = "X-Session-Id";
const MAX_SESSION_ID_LEN: usize = 64;

/// Estructura para crear una nueva reserva
#[derive(Deserialize)]
struct MakeReservation {
    /// Nombre para la reserva
    name: String,
    /// Email donde se envía la confirmación
    email: String,
    /// Número de comensales
    party_size: u32,
    /// Fecha de la reserva (formato YYYY-MM-DD)
    date: String,
    /// Hora de la reserva (formato HH:MM)
    time: String,
}

#[derive(Serialize, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
enum OutcomeKind {
    Confirmed,
    TimeOutOfRange,
    NotificationFailed,
}

#[derive(Serialize)]
struct ReservationResponse {
    outcome: OutcomeKind,
    message: String,
    session_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    party_size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    service_start: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    service_end: Option<String>,
}

impl ReservationResponse {
    fn from_outcome(outcome: &Outcome, session: &SessionContext, contact_fallback: &str) -> Self {
        let mut response = ReservationResponse {
            outcome: OutcomeKind::NotificationFailed,
            message: outcome.message(contact_fallback),
            session_id: session.session_id().to_string(),
            date: None,
            time: None,
            party_size: None,
            service_start: None,
            service_end: None,
        };

        match outcome {
            Outcome::Confirmed {
                date,
                time,
                party_size,
            } => {
                response.outcome = OutcomeKind::Confirmed;
                response.date = Some(date.format("%Y-%m-%d").to_string());
                response.time = Some(time.format("%H:%M").to_string());
                response.party_size = Some(*party_size);
            }
            Outcome::TimeOutOfRange {
                service_start,
                service_end,
            } => {
                response.outcome = OutcomeKind::TimeOutOfRange;
                response.service_start = Some(service_start.format("%H:%M").to_string());
                response.service_end = Some(service_end.format("%H:%M").to_string());
            }
            Outcome::NotificationFailed => {}
        }
        response
    }
}

/// Límites que el formulario necesita para configurar sus campos
#[derive(Serialize)]
struct FormSettings {
    party_size_min: u32,
    party_size_max: u32,
    service_start: String,
    service_end: String,
}

/// Valida y parsea una fecha en formato YYYY-MM-DD
fn validate_date(date_str: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(date_str.trim(), "%Y-%m-%d")
        .map_err(|_| AppError::validation_field("date", "Invalid date format, use YYYY-MM-DD"))
}

/// Valida y parsea una hora en formato HH:MM (se aceptan segundos)
fn validate_time(time_str: &str) -> AppResult<NaiveTime> {
    let time_str = time_str.trim();
    NaiveTime::parse_from_str(time_str, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(time_str, "%H:%M:%S"))
        .map_err(|_| AppError::validation_field("time", "Invalid time format, use HH:MM"))
}

/// Sesión del visitante a partir de la cabecera, o una nueva si falta o no es válida
fn session_from(req: &HttpRequest) -> SessionContext {
    req.headers()
        .get(SESSION_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|id| !id.is_empty() && id.len() <= MAX_SESSION_ID_LEN)
        .map(SessionContext::new)
        .unwrap_or_else(SessionContext::generate)
}

/// Recibe una solicitud de reserva
///
/// # Validaciones de formato
/// - Fecha válida (YYYY-MM-DD), sin restricción de rango
/// - Hora válida (HH:MM)
/// - Número de comensales dentro de los límites configurados
///
/// El horario de servicio lo valida el flujo de reservas, no este handler.
///
/// # Respuesta
/// ```json
/// {
///   "outcome": "confirmed",
///   "message": "Reservation confirmed for 4 on 2026-11-06 at 19:15! Check your email for details.",
///   "session_id": "a1b2c3d4",
///   "date": "2026-11-06",
///   "time": "19:15",
///   "party_size": 4
/// }
/// ```
///
/// # Códigos
/// - `200 OK`: Reserva confirmada
/// - `400 Bad Request`: Formato de campos incorrecto
/// - `422 Unprocessable Entity`: Hora fuera del horario de servicio
/// - `502 Bad Gateway`: No se pudo enviar la confirmación
#[post("/reservations")]
async fn make_reservation(
    workflow: web::Data<ReservationWorkflow>,
    config: web::Data<AppConfig>,
    data: web::Json<MakeReservation>,
    req: HttpRequest,
) -> AppResult<HttpResponse> {
    let date = validate_date(&data.date)?;
    let time = validate_time(&data.time)?;

    if !config.party_size.contains(data.party_size) {
        return Err(AppError::validation_field(
            "party_size",
            &format!(
                "Party size must be between {} and {}",
                config.party_size.min, config.party_size.max
            ),
        ));
    }

    let session = session_from(&req);
    let data = data.into_inner();
    let request = ReservationRequest {
        name: data.name,
        email: data.email,
        party_size: data.party_size,
        date,
        time,
    };

    let outcome = workflow.submit_reservation(&session, &request).await;
    let body = ReservationResponse::from_outcome(&outcome, &session, &config.contact_fallback);

    let mut response = match outcome {
        Outcome::Confirmed { .. } => HttpResponse::Ok(),
        Outcome::TimeOutOfRange { .. } => HttpResponse::UnprocessableEntity(),
        Outcome::NotificationFailed => HttpResponse::BadGateway(),
    };

    Ok(response
        .insert_header((SESSION_HEADER, session.session_id()))
        .json(body))
}

/// Límites configurados de comensales y horario, para el formulario
#[get("/reservations/settings")]
async fn form_settings(config: web::Data<AppConfig>) -> impl Responder {
    HttpResponse::Ok().json(FormSettings {
        party_size_min: config.party_size.min,
        party_size_max: config.party_size.max,
        service_start: config.service_window.start().format("%H:%M").to_string(),
        service_end: config.service_window.end().format("%H:%M").to_string(),
    })
}

/// Configura las rutas relacionadas con reservas
///
/// # Rutas disponibles
/// - `POST /reservations` - Enviar solicitud de reserva
/// - `GET /reservations/settings` - Límites del formulario
pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(make_reservation);
    cfg.service(form_settings);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use actix_web::{http::StatusCode, test, App};
    use serde_json::{json, Value};

    use crate::reservation::testing::{MemoryAuditSink, RecordingNotifier};
    use crate::reservation::ServiceWindow;

    fn app_data(
        notifier: Arc<RecordingNotifier>,
        audit: Arc<MemoryAuditSink>,
    ) -> (web::Data<ReservationWorkflow>, web::Data<AppConfig>) {
        let workflow = ReservationWorkflow::new(ServiceWindow::default(), notifier, audit);
        (web::Data::new(workflow), web::Data::new(AppConfig::default()))
    }

    fn form(time: &str, party_size: u32) -> Value {
        json!({
            "name": "Ana",
            "email": "ana@example.com",
            "party_size": party_size,
            "date": "2026-11-06",
            "time": time,
        })
    }

    #[actix_web::test]
    async fn confirmed_reservation_returns_200_and_echoes_session() {
        let notifier = Arc::new(RecordingNotifier::succeeding());
        let audit = Arc::new(MemoryAuditSink::default());
        let (workflow, config) = app_data(notifier.clone(), audit.clone());
        let app = test::init_service(
            App::new().app_data(workflow).app_data(config).configure(routes),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/reservations")
            .insert_header((SESSION_HEADER, "visitor1"))
            .set_json(form("19:15", 4))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers().get(SESSION_HEADER).unwrap(), "visitor1");
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["outcome"], "confirmed");
        assert_eq!(body["party_size"], 4);
        assert_eq!(body["time"], "19:15");
        assert_eq!(notifier.calls(), 1);
        assert_eq!(audit.records()[0].session_id, "visitor1");
    }

    #[actix_web::test]
    async fn out_of_range_time_returns_422_with_window() {
        let notifier = Arc::new(RecordingNotifier::succeeding());
        let (workflow, config) = app_data(notifier.clone(), Arc::new(MemoryAuditSink::default()));
        let app = test::init_service(
            App::new().app_data(workflow).app_data(config).configure(routes),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/reservations")
            .set_json(form("22:01", 2))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert!(resp.headers().contains_key(SESSION_HEADER));
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["outcome"], "time_out_of_range");
        assert_eq!(body["service_start"], "11:30");
        assert_eq!(body["service_end"], "22:00");
        assert_eq!(
            body["message"],
            "Please select a time between 11:30 AM and 10:00 PM"
        );
        assert_eq!(notifier.calls(), 0);
    }

    #[actix_web::test]
    async fn notification_failure_returns_502_with_contact() {
        let (workflow, config) = app_data(
            Arc::new(RecordingNotifier::failing()),
            Arc::new(MemoryAuditSink::default()),
        );
        let app = test::init_service(
            App::new().app_data(workflow).app_data(config).configure(routes),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/reservations")
            .set_json(form("20:00", 2))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["outcome"], "notification_failed");
        assert!(body["message"].as_str().unwrap().contains("(617) 555-0142"));
    }

    #[actix_web::test]
    async fn party_size_outside_bounds_is_rejected_before_workflow() {
        let notifier = Arc::new(RecordingNotifier::succeeding());
        let (workflow, config) = app_data(notifier.clone(), Arc::new(MemoryAuditSink::default()));
        let app = test::init_service(
            App::new().app_data(workflow).app_data(config).configure(routes),
        )
        .await;

        for size in [0, 11] {
            let req = test::TestRequest::post()
                .uri("/reservations")
                .set_json(form("19:00", size))
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        }
        assert_eq!(notifier.calls(), 0);
    }

    #[actix_web::test]
    async fn malformed_time_is_a_validation_error() {
        let (workflow, config) = app_data(
            Arc::new(RecordingNotifier::succeeding()),
            Arc::new(MemoryAuditSink::default()),
        );
        let app = test::init_service(
            App::new().app_data(workflow).app_data(config).configure(routes),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/reservations")
            .set_json(form("7pm", 2))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "Field 'time': Invalid time format, use HH:MM");
    }

    #[actix_web::test]
    async fn settings_follow_configured_bounds() {
        let config = AppConfig {
            party_size: crate::config::PartySizeBounds::new(1, 100).unwrap(),
            ..AppConfig::default()
        };
        let app = test::init_service(
            App::new().app_data(web::Data::new(config)).configure(routes),
        )
        .await;

        let req = test::TestRequest::get().uri("/reservations/settings").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["party_size_min"], 1);
        assert_eq!(body["party_size_max"], 100);
        assert_eq!(body["service_start"], "11:30");
        assert_eq!(body["service_end"], "22:00");
    }

    #[actix_web::test]
    async fn time_parsing_accepts_seconds() {
        assert_eq!(
            validate_time("11:30:00").unwrap(),
            NaiveTime::from_hms_opt(11, 30, 0).unwrap()
        );
        assert!(validate_date("2026-02-30").is_err());
    }
}
