pub mod models;
pub mod pii;
pub mod reference;
pub mod time;

pub use pii::Masked;
pub use reference::Reference;
pub use time::to_iso_utc;
