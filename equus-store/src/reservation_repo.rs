use async_trait::async_trait;
use equus_booking::Reservation;
use equus_core::repository::ReservationStore;
use sqlx::types::Json;
use sqlx::PgPool;

pub struct PgReservationStore {
    pool: PgPool,
}

impl PgReservationStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReservationStore for PgReservationStore {
    async fn create_reservation(
        &self,
        reservation: &Reservation,
    ) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
        let status = serde_json::to_value(&reservation.status)?;
        let payment_status = serde_json::to_value(&reservation.payment_status)?;

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO reservations (id, user_ref, total_price, currency, status, payment_status, document)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(reservation.id)
        .bind(&reservation.user.id)
        .bind(reservation.total_price)
        .bind(&reservation.currency)
        .bind(status.as_str().unwrap_or("pending"))
        .bind(payment_status.as_str().unwrap_or("pending"))
        .bind(Json(reservation))
        .execute(&mut *tx)
        .await?;

        for (position, item) in reservation.items.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO reservation_items (reservation_id, position, service_ref, service_type, line_total)
                VALUES ($1, $2, $3, $4, $5)
                "#,
            )
            .bind(reservation.id)
            .bind(position as i32)
            .bind(&item.service.id)
            .bind(item.service_type.as_str())
            .bind(item.line_total)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(reservation.id.to_string())
    }
}
