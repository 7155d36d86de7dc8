pub mod feed;
pub mod follow;
pub mod interactions;
pub mod notifications;

pub use feed::{FeedQuery, FeedService};
pub use follow::FollowService;
pub use interactions::InteractionService;
pub use notifications::NotificationService;
