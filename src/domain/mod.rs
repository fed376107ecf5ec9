//! Domain layer - The user record and its request payload.

mod user;

pub use user::{User, UserPayload};
