pub mod client;
pub mod credential;
pub mod error;
mod token;

pub use client::{FirebaseClient, object_key};
pub use credential::ServiceAccountKey;
pub use error::FirebaseError;
