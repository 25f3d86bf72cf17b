pub mod comment;
pub mod dashboard;
pub mod extract;
pub mod like;
pub mod playlist;
pub mod response;
pub mod subscription;
pub mod tweet;
pub mod upload;
pub mod user;
pub mod video;

use response::ApiResponse;

pub async fn healthcheck() -> ApiResponse<&'static str> {
    ApiResponse::ok("OK", "Health check passed")
}
