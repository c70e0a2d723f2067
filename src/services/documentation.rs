use utoipa::OpenApi;

#[derive(OpenApi)]
/// Aggregated OpenAPI specification for Futebol Back.
#[openapi(
    paths(
        crate::routes::health::healthcheck,
        crate::routes::matches::draw_teams,
        crate::routes::matches::get_teams,
        crate::routes::sse::match_stream,
    ),
    components(
        schemas(
            crate::dto::health::HealthResponse,
            crate::dto::health::HealthStatus,
            crate::dto::matches::DrawRequest,
            crate::dto::matches::AttendeeInput,
            crate::dto::matches::SkillsInput,
            crate::dto::matches::DrawConfigInput,
            crate::dto::matches::TeamAssignmentResponse,
            crate::dto::matches::TeamResponse,
            crate::dto::matches::TeamMemberResponse,
            crate::dto::sse::Handshake,
            crate::balancer::Position,
            crate::balancer::Role,
            crate::balancer::SkillWeights,
            crate::balancer::RatingWeights,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "matches", description = "Team draws for club matches"),
        (name = "sse", description = "Server-sent events streams"),
    )
)]
pub struct ApiDoc;
