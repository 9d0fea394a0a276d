pub mod prompt;
pub mod routes;

pub use routes::routes;
