// Module layout (Clean Architecture style)
// - bootstrap: configuration and startup
// - infrastructure: Postgres adapters for the ports
// - presentation: HTTP handlers and routing
// - application: ports, use cases and DTOs
// - domain: core models

pub mod application;
pub mod bootstrap;
pub mod domain;
pub mod infrastructure;
pub mod presentation;
