pub mod handlers;
pub mod routes;
pub mod scans;
pub mod ws;

pub use routes::create_router;
