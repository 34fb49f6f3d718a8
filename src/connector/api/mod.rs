pub mod container;
pub mod controller;
pub mod http;
pub mod router;

pub use container::{Container, ContainerConfig, Environment};
pub use http::{build_router, serve, AppState, ServerConfig};
pub use router::Router;
