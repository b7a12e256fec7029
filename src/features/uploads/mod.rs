pub mod dtos;
pub mod handlers;
pub mod multipart;
pub mod routes;
pub mod services;
pub mod validation;

pub use routes::routes;
pub use services::UploadService;
