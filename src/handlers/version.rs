//! Version information endpoint handler.

use crate::models::VersionResponse;
use actix_web::web;
use paperclip::actix::api_v2_operation;

/// Version information endpoint
///
/// Returns the package version, the git commit, and the build time captured
/// by the build script. Fields the build could not determine read `unknown`.
#[api_v2_operation(
    summary = "Version Information Endpoint",
    description = "Returns the current API version, commit hash, and build time.",
    tags("Version"),
    responses(
        (status = 200, description = "Successful response", body = VersionResponse)
    )
)]
pub async fn version() -> web::Json<VersionResponse> {
    web::Json(VersionResponse {
        version: env!("CARGO_PKG_VERSION").to_string(),
        commit: option_env!("VERGEN_GIT_SHA").unwrap_or("unknown").to_string(),
        build_time: option_env!("VERGEN_BUILD_TIMESTAMP")
            .unwrap_or("unknown")
            .to_string(),
    })
}
