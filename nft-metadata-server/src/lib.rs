mod context;
mod error;
mod handlers;
mod routers;
mod server;
mod settings;

pub use context::ServiceContext;
pub use error::ApiError;
pub use routers::{configure_router, AppRouter, Router};
pub use server::run;
pub use settings::{ServerSettings, Settings};
