//! OpenAPI documentation.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::error;
use crate::handlers;
use tubely_core::models;

pub fn get_openapi_spec() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Tubely API",
        version = "0.1.0",
        description = "Video upload service: uploads are staged, probed, classified by aspect ratio, remuxed for fast start with ffmpeg, and stored in S3 or on local disk."
    ),
    paths(
        handlers::health::health_check,
        handlers::video_upload::upload_video,
        handlers::video_get::get_video,
    ),
    components(schemas(
        models::VideoResponse,
        models::VideoLocation,
        error::ErrorResponse,
        handlers::health::HealthResponse,
    )),
    modifiers(&BearerAuth),
    tags(
        (name = "videos", description = "Video upload and retrieval"),
        (name = "health", description = "Liveness")
    )
)]
pub struct ApiDoc;
