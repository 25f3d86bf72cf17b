pub mod comment;
pub mod like;
pub mod page;
pub mod playlist;
pub mod subscription;
pub mod tweet;
pub mod user;
pub mod video;

pub use comment::CommentData;
pub use like::LikeData;
pub use page::{Page, PageQuery};
pub use playlist::PlaylistData;
pub use subscription::SubscriptionData;
pub use tweet::TweetData;
pub use user::UserData;
pub use video::VideoData;
