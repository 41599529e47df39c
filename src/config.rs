//! # Configuración de la aplicación
//!
//! Toda la configuración se lee una sola vez al arrancar desde variables de entorno
//! (archivo `.env` vía `dotenvy`) y después es de solo lectura.
//!
//! | Variable            | Default                     |
//! |---------------------|-----------------------------|
//! | `BIND_ADDRESS`      | `0.0.0.0:8080`              |
//! | `SERVICE_START`     | `11:30`                     |
//! | `SERVICE_END`       | `22:00`                     |
//! | `PARTY_SIZE_MIN`    | `1`                         |
//! | `PARTY_SIZE_MAX`    | `10`                        |
//! | `AUDIT_REJECTIONS`  | `false`                     |
//! | `CONTACT_FALLBACK`  | `(617) 555-0142`            |
//! | `MONGODB_URI`       | `mongodb://localhost:27017` |
//! | `MONGODB_DATABASE`  | `taste_toast`               |
//! | `AUDIT_COLLECTION`  | `app_events`                |

use chrono::NaiveTime;
use thiserror::Error;

use crate::reservation::ServiceWindow;

pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8080";
pub const DEFAULT_CONTACT_FALLBACK: &str = "(617) 555-0142";
pub const DEFAULT_MONGODB_URI: &str = "mongodb://localhost:27017";
pub const DEFAULT_MONGODB_DATABASE: &str = "taste_toast";
pub const DEFAULT_AUDIT_COLLECTION: &str = "app_events";

/// Errores al interpretar la configuración
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Valor inválido para '{key}': '{value}' ({reason})")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },

    #[error("Horario de servicio inválido: el inicio {start} es posterior al fin {end}")]
    InvertedWindow { start: NaiveTime, end: NaiveTime },

    #[error("Límites de comensales inválidos: mínimo {min} mayor que máximo {max}")]
    InvertedPartySize { min: u32, max: u32 },
}

impl ConfigError {
    fn invalid(key: &str, value: &str, reason: impl ToString) -> Self {
        Self::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Límites (inclusivos) del número de comensales aceptado por el formulario
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PartySizeBounds {
    pub min: u32,
    pub max: u32,
}

impl PartySizeBounds {
    pub fn new(min: u32, max: u32) -> Result<Self, ConfigError> {
        if min > max {
            return Err(ConfigError::InvertedPartySize { min, max });
        }
        Ok(Self { min, max })
    }

    pub fn contains(&self, party_size: u32) -> bool {
        (self.min..=self.max).contains(&party_size)
    }
}

impl Default for PartySizeBounds {
    fn default() -> Self {
        Self { min: 1, max: 10 }
    }
}

/// Conexión al almacén de auditoría
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MongoConfig {
    pub uri: String,
    pub database: String,
    pub audit_collection: String,
}

/// Configuración completa del servidor
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_address: String,
    pub service_window: ServiceWindow,
    pub party_size: PartySizeBounds,
    /// Si es `true`, las solicitudes fuera de horario también generan registro de auditoría
    pub audit_rejections: bool,
    /// Contacto que se muestra cuando no se pudo enviar la confirmación
    pub contact_fallback: String,
    pub mongo: MongoConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_address: DEFAULT_BIND_ADDRESS.to_string(),
            service_window: ServiceWindow::default(),
            party_size: PartySizeBounds::default(),
            audit_rejections: false,
            contact_fallback: DEFAULT_CONTACT_FALLBACK.to_string(),
            mongo: MongoConfig {
                uri: DEFAULT_MONGODB_URI.to_string(),
                database: DEFAULT_MONGODB_DATABASE.to_string(),
                audit_collection: DEFAULT_AUDIT_COLLECTION.to_string(),
            },
        }
    }
}

impl AppConfig {
    /// Carga la configuración desde el entorno del proceso
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Carga la configuración usando una función de búsqueda arbitraria.
    ///
    /// Separado de [`AppConfig::from_env`] para poder probarlo sin tocar el entorno global.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let start = match lookup("SERVICE_START") {
            Some(raw) => parse_time("SERVICE_START", &raw)?,
            None => defaults.service_window.start(),
        };
        let end = match lookup("SERVICE_END") {
            Some(raw) => parse_time("SERVICE_END", &raw)?,
            None => defaults.service_window.end(),
        };
        let service_window = ServiceWindow::new(start, end)?;

        let min = match lookup("PARTY_SIZE_MIN") {
            Some(raw) => parse_number("PARTY_SIZE_MIN", &raw)?,
            None => defaults.party_size.min,
        };
        let max = match lookup("PARTY_SIZE_MAX") {
            Some(raw) => parse_number("PARTY_SIZE_MAX", &raw)?,
            None => defaults.party_size.max,
        };
        let party_size = PartySizeBounds::new(min, max)?;

        let audit_rejections = match lookup("AUDIT_REJECTIONS") {
            Some(raw) => parse_flag("AUDIT_REJECTIONS", &raw)?,
            None => defaults.audit_rejections,
        };

        Ok(Self {
            bind_address: lookup("BIND_ADDRESS").unwrap_or(defaults.bind_address),
            service_window,
            party_size,
            audit_rejections,
            contact_fallback: lookup("CONTACT_FALLBACK").unwrap_or(defaults.contact_fallback),
            mongo: MongoConfig {
                uri: lookup("MONGODB_URI").unwrap_or(defaults.mongo.uri),
                database: lookup("MONGODB_DATABASE").unwrap_or(defaults.mongo.database),
                audit_collection: lookup("AUDIT_COLLECTION")
                    .unwrap_or(defaults.mongo.audit_collection),
            },
        })
    }
}

fn parse_time(key: &str, raw: &str) -> Result<NaiveTime, ConfigError> {
    NaiveTime::parse_from_str(raw.trim(), "%H:%M")
        .map_err(|e| ConfigError::invalid(key, raw, format!("use HH:MM, {}", e)))
}

fn parse_number(key: &str, raw: &str) -> Result<u32, ConfigError> {
    raw.trim().parse().map_err(|e| ConfigError::invalid(key, raw, e))
}

fn parse_flag(key: &str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::invalid(key, raw, "se esperaba true/false")),
    }
}
