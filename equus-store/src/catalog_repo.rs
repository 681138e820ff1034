use async_trait::async_trait;
use equus_catalog::{AdditionalBenefit, HorseRecord, JourneyRecord, PriceUnit, ServiceRecord, ServiceType};
use equus_core::repository::CatalogRepository;
use sqlx::types::Json;
use sqlx::PgPool;

pub struct PgCatalogRepository {
    pool: PgPool,
}

impl PgCatalogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct ServiceRow {
    id: String,
    name: String,
    price: i64,
    price_unit: String,
    service_type: String,
    additional_benefits: Option<Json<Vec<AdditionalBenefit>>>,
    provider_ref: Option<String>,
    is_active: Option<bool>,
}

impl From<ServiceRow> for ServiceRecord {
    fn from(row: ServiceRow) -> Self {
        ServiceRecord {
            id: row.id,
            name: row.name,
            price: row.price,
            // Unrecognised tags fall back to the catch-all variants
            price_unit: PriceUnit::from_tag(&row.price_unit),
            service_type: ServiceType::from_tag(&row.service_type),
            additional_benefits: row.additional_benefits.map(|b| b.0).unwrap_or_default(),
            provider_ref: row.provider_ref,
            is_active: row.is_active.unwrap_or(true),
        }
    }
}

#[derive(sqlx::FromRow)]
struct HorseRow {
    id: String,
    name: String,
    owner_ref: Option<String>,
}

#[derive(sqlx::FromRow)]
struct JourneyRow {
    id: String,
    name: String,
    max_participants: Option<i32>,
}

#[async_trait]
impl CatalogRepository for PgCatalogRepository {
    async fn get_service(
        &self,
        id: &str,
    ) -> Result<Option<ServiceRecord>, Box<dyn std::error::Error + Send + Sync>> {
        let row: Option<ServiceRow> = sqlx::query_as(
            "SELECT id, name, price, price_unit, service_type, additional_benefits, provider_ref, is_active FROM services WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(ServiceRecord::from))
    }

    async fn list_user_horses(
        &self,
        user_id: &str,
    ) -> Result<Vec<HorseRecord>, Box<dyn std::error::Error + Send + Sync>> {
        let rows: Vec<HorseRow> = sqlx::query_as(
            "SELECT id, name, owner_ref FROM horses WHERE owner_ref = $1 ORDER BY name",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| HorseRecord {
                id: r.id,
                name: r.name,
                owner_ref: r.owner_ref,
            })
            .collect())
    }

    async fn list_journeys(
        &self,
    ) -> Result<Vec<JourneyRecord>, Box<dyn std::error::Error + Send + Sync>> {
        let rows: Vec<JourneyRow> =
            sqlx::query_as("SELECT id, name, max_participants FROM journeys ORDER BY name")
                .fetch_all(&self.pool)
                .await?;

        Ok(rows
            .into_iter()
            .map(|r| JourneyRecord {
                id: r.id,
                name: r.name,
                max_participants: r.max_participants.and_then(|m| u32::try_from(m).ok()),
            })
            .collect())
    }
}
