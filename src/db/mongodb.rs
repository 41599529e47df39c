use mongodb::{Client, Collection, Database};
use crate::api::AppError;
use crate::config::MongoConfig;
use super::audit::AuditDocument;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Clone)]
pub struct MongoRepo {
    database: Database,
    audit_collection: String,
}

impl MongoRepo {
    /// Conecta y verifica el servidor con un `ping`
    pub async fn init(config: &MongoConfig) -> Result<MongoRepo> {
        let repo = Self::connect_lazy(config).await?;

        // Test connection
        repo.database
            .run_command(mongodb::bson::doc! {"ping": 1})
            .await
            .map_err(|e| AppError::database("ping", e))?;

        tracing::info!(database = %config.database, "Conexión a MongoDB establecida exitosamente");
        Ok(repo)
    }

    /// Crea el cliente sin contactar al servidor; la primera operación hace la conexión
    pub async fn connect_lazy(config: &MongoConfig) -> Result<MongoRepo> {
        let client = Client::with_uri_str(&config.uri)
            .await
            .map_err(|e| AppError::database("connect", e))?;

        Ok(MongoRepo {
            database: client.database(&config.database),
            audit_collection: config.audit_collection.clone(),
        })
    }

    pub fn audit_events(&self) -> Collection<AuditDocument> {
        self.database.collection(&self.audit_collection)
    }

    // Los registros nunca se consultan desde aquí; los índices son para análisis externo
    pub async fn create_indexes(&self) -> Result<()> {
        use mongodb::{IndexModel, bson::doc};

        let indexes = vec![
            IndexModel::builder()
                .keys(doc! { "session_id": 1 })
                .build(),
            IndexModel::builder()
                .keys(doc! { "key": 1 })
                .build(),
            IndexModel::builder()
                .keys(doc! { "action": 1, "timestamp": 1 })
                .build(),
        ];

        self.audit_events()
            .create_indexes(indexes)
            .await
            .map_err(|e| AppError::database("create_indexes", e))?;

        tracing::info!("Índices MongoDB creados exitosamente");
        Ok(())
    }
}
