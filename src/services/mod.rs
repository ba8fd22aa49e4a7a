pub mod token;
pub use token::{Claims, TokenService};

pub mod rate_limit;
pub use rate_limit::{LoginRateLimiter, MemoryRateLimitStore, RateDecision, RateLimitStore};

pub mod auth_service;
pub mod auth_service_impl;
pub use auth_service::{AuthError, AuthService, LoginResult};
pub use auth_service_impl::SeaOrmAuthService;

pub mod category_service;
pub mod category_service_impl;
pub use category_service::{CategoryError, CategoryInput, CategoryService};
pub use category_service_impl::SeaOrmCategoryService;

pub mod tag_service;
pub mod tag_service_impl;
pub use tag_service::{TagError, TagInput, TagService};
pub use tag_service_impl::SeaOrmTagService;

pub mod live_update_service;
pub mod live_update_service_impl;
pub use live_update_service::{
    CreateLiveUpdate, EditLiveUpdate, LiveUpdateError, LiveUpdateService,
};
pub use live_update_service_impl::SeaOrmLiveUpdateService;
