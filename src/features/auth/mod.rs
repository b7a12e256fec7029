pub mod access;
pub mod handler;
pub mod model;
pub mod repository;
pub mod routes;
pub mod session;

pub use repository::PgUserRepository;
pub use session::SessionResolver;
