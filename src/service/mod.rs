pub(crate) mod comment;
pub(crate) mod dashboard;
mod errors;
pub(crate) mod like;
pub(crate) mod media;
pub(crate) mod playlist;
pub(crate) mod subscription;
pub(crate) mod tweet;
pub(crate) mod user;
pub(crate) mod video;

pub use comment::CommentService;
pub use dashboard::DashboardService;
pub use errors::{Error, Result};
pub use like::LikeService;
pub use media::MediaService;
pub use playlist::PlaylistService;
pub use subscription::SubscriptionService;
pub use tweet::TweetService;
pub use user::UserService;
pub use video::VideoService;
