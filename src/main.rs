//! # Taste & Toast Reservation Server
//!
//! Servidor web de promociones y reservas del restaurante, construido con Rust,
//! Actix Web y MongoDB.
//!
//! ## Características principales
//!
//! - **Experiencia del día**: banner con la promoción temática de cada día
//! - **Calendario semanal**: las siete experiencias y los beneficios para clientes
//! - **Reservas**: validación del horario de servicio, confirmación por email y
//!   registro de auditoría
//! - **Frontend incluido**: formulario en JavaScript vanilla bajo `/static`
//!
//! ## Configuración
//!
//! El servidor se configura mediante variables de entorno (archivo `.env`):
//!
//! ```env
//! # Servidor
//! BIND_ADDRESS=0.0.0.0:8080
//!
//! # Reservas
//! SERVICE_START=11:30
//! SERVICE_END=22:00
//! PARTY_SIZE_MAX=10
//!
//! # Auditoría
//! MONGODB_URI=mongodb://localhost:27017
//! MONGODB_DATABASE=taste_toast
//!
//! # Correo
//! SMTP_HOST=smtp.example.com
//! SMTP_USER=...
//! SMTP_PASSWORD=...
//!
//! # Logging
//! RUST_LOG=debug,mongodb=info
//! ```
//!
//! ## Arquitectura
//!
//! ```text
//! Frontend (HTML/CSS/JS)
//!     ↓ HTTP/JSON
//! API REST (Actix Web)
//!     ↓
//! ReservationWorkflow ──→ Notifier (SMTP)
//!                     └─→ AuditSink (MongoDB)
//! ```

use actix_files::Files;
use actix_web::{web, App, HttpServer, middleware::Logger};
use std::sync::Arc;

mod api;
mod config;
mod db;
mod notify;
mod reservation;

use config::AppConfig;
use db::{actions, AuditRecord, AuditSink, MongoAuditSink, MongoRepo, TracingAuditSink};
use notify::{DisabledNotifier, EmailConfig, Notifier, SmtpNotifier};
use reservation::ReservationWorkflow;

/// Identificador de sesión usado para los registros del propio proceso
const SERVER_SESSION_ID: &str = "server";

/// Conecta con MongoDB para auditoría; si no es posible, los registros van solo al log
async fn build_audit_sink(config: &AppConfig) -> Arc<dyn AuditSink> {
    match MongoRepo::init(&config.mongo).await {
        Ok(repo) => {
            // Intentar crear índices, no es un error fatal
            if let Err(e) = repo.create_indexes().await {
                tracing::warn!("Advertencia creando índices: {}", e);
            }
            Arc::new(MongoAuditSink::new(repo))
        }
        Err(e) => {
            tracing::warn!(
                error = %e,
                "MongoDB no disponible, los registros de auditoría solo irán al log"
            );
            Arc::new(TracingAuditSink)
        }
    }
}

fn build_notifier() -> Arc<dyn Notifier> {
    let Some(email_config) = EmailConfig::from_env() else {
        tracing::warn!("SMTP_HOST no configurado, las confirmaciones por email fallarán");
        return Arc::new(DisabledNotifier);
    };

    match SmtpNotifier::new(email_config) {
        Ok(notifier) => Arc::new(notifier),
        Err(e) => {
            tracing::error!(error = %e, "Error configurando el transporte SMTP");
            Arc::new(DisabledNotifier)
        }
    }
}

/// Función principal que inicia el servidor web
///
/// 1. Carga variables de entorno desde `.env`
/// 2. Configura el sistema de logging con tracing
/// 3. Lee la configuración de la aplicación
/// 4. Prepara el sink de auditoría y el notificador
/// 5. Registra el arranque en la auditoría
/// 6. Inicia el servidor HTTP
///
/// # Errores
///
/// Retorna `std::io::Error` si la configuración es inválida o no se puede bindear
/// al puerto especificado. MongoDB y SMTP no disponibles no impiden el arranque.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();

    // Configurar sistema de logging con tracing
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("taste_toast_reservation=debug,mongodb=info,info"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    tracing::info!("Iniciando Taste & Toast Reservation Server...");

    let config = AppConfig::from_env().map_err(|e| {
        tracing::error!(error = %e, "Configuración inválida");
        std::io::Error::new(std::io::ErrorKind::InvalidInput, api::AppError::from(e).to_string())
    })?;

    tracing::info!(
        service_window = %config.service_window.describe(),
        party_size_min = config.party_size.min,
        party_size_max = config.party_size.max,
        audit_rejections = config.audit_rejections,
        "Configuración cargada"
    );

    let audit = build_audit_sink(&config).await;
    let notifier = build_notifier();

    let workflow = ReservationWorkflow::new(config.service_window, notifier, audit)
        .with_rejection_audit(config.audit_rejections);

    workflow
        .write_audit(AuditRecord::new(SERVER_SESSION_ID, actions::APP_STARTED, "App started"))
        .await;

    let workflow = web::Data::new(workflow);
    let bind_address = config.bind_address.clone();
    let config = web::Data::new(config);

    tracing::info!("Servidor iniciando en {}", bind_address);

    // Crear y configurar el servidor HTTP
    HttpServer::new(move || {
        App::new()
            .app_data(workflow.clone())
            .app_data(config.clone())
            .wrap(Logger::default())
            .configure(api::init_routes)
            .service(Files::new("/static", "./static").index_file("index.html"))
            .route("/", web::get().to(|| async {
                actix_web::HttpResponse::PermanentRedirect()
                    .append_header(("Location", "/static/index.html"))
                    .finish()
            }))
    })
        .bind(&bind_address)?
        .run()
        .await
}
