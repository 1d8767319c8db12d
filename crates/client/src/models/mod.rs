//! Wire models for the marketplace API.
//!
//! Field names match the server's JSON exactly; request types skip optional
//! fields that are unset. These are transport shapes, not domain logic.

mod auth;
mod catalog;
mod order;
mod user;

pub use auth::{AuthResponse, LoginRequest, RegisterRequest};
pub use catalog::{Category, Game, GameQuery, Lot, LotFilters, LotUpdate, NewGame, NewLot};
pub use order::{NewOrder, Order, OrderQuery, Paginated};
pub use user::User;
