//! HTTP REST API
//!
//! - `common`: response envelope, error mapping and body extractors
//! - `modules`: handlers and DTOs per resource
//! - `router`: route table, middleware stack and Swagger documentation

pub mod common;
pub mod modules;
pub mod router;


pub use router::{create_api_router, ApiContext, ApiDoc};
