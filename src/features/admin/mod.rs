pub mod dtos;
pub mod filter;
pub mod handlers;
pub mod routes;
pub mod services;

pub use services::AdminService;
