pub mod model;
pub mod prompt;
pub mod routes;
pub mod service;

pub use routes::routes;
