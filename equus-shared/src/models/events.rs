use uuid::Uuid;

#[derive(Debug, serde::Serialize, serde::Deserialize, Clone)]
pub struct ReservationSubmittedEvent {
    pub reservation_id: Uuid,
    pub store_id: String,
    pub user_id: String,
    pub service_ids: Vec<String>,
    pub total_price: i64,
    pub currency: String,
    pub timestamp: i64,
}
