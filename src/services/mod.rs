/// OpenAPI documentation generation.
pub mod documentation;
/// Team draw orchestration: balance, persist, broadcast.
pub mod draw_service;
/// Health check service.
pub mod health_service;
/// Read access to drawn match teams.
pub mod match_service;
/// Server-Sent Events message generation.
pub mod sse_events;
/// Server-Sent Events broadcasting service.
pub mod sse_service;
