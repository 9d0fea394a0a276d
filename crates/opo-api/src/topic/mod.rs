mod content;
pub mod pdf;
pub mod routes;

pub use content::{TopicText, load_text};
pub use routes::routes;
