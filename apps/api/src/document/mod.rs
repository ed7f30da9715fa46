// Document Store: cover-letter model, the single-writer store that mutates it,
// and the per-document editing sessions exposed over HTTP.

pub mod clock;
pub mod handlers;
pub mod ids;
pub mod models;
pub mod sessions;
pub mod store;
pub mod validation;
