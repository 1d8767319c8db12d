//! Typed domain services over the request pipeline.
//!
//! Each service is a thin wrapper holding a clone of the shared
//! [`ApiClient`](crate::http::ApiClient): it shapes paths and payloads and
//! nothing else. Credential handling and failure recovery live entirely in
//! the pipeline, so no service here can get them wrong.

mod auth;
mod games;
mod lots;
mod orders;

pub use auth::AuthApi;
pub use games::GamesApi;
pub use lots::LotsApi;
pub use orders::OrdersApi;
