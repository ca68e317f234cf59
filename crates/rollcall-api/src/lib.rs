// rollcall-api: Async Rust client for the activity sign-up service API

pub mod client;
pub mod error;
pub mod model;
pub mod transport;

pub use client::ActivitiesClient;
pub use error::Error;
pub use model::{Activity, ActivitySummary, Availability, Catalog, Message, MyActivities};
pub use transport::TransportConfig;
