pub mod prelude;

pub mod categories;
pub mod live_updates;
pub mod post_tags;
pub mod posts;
pub mod tags;
pub mod users;
