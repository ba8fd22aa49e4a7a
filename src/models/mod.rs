pub mod category;
pub mod live_update;
pub mod post;
pub mod tag;
pub mod user;
