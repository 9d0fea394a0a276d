// All repository functions are generic over `E: Executor<'e, Database = Postgres>`
// so they accept both a `&PgPool` (direct query) and a `&mut Transaction` (atomic operations).

pub mod exam;
pub mod question;
pub mod session;
pub mod stats;
pub mod topic;
