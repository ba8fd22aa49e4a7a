pub mod roles {

    pub const ADMIN: &str = "admin";

    pub const DEFAULT: &str = "editor";
}

pub mod posts {

    pub const STATUS_PUBLISHED: &str = "published";

    pub const STATUS_DRAFT: &str = "draft";
}

pub mod categories {

    /// Parent value the editor sends for "no parent".
    pub const NO_PARENT: &str = "none";

    /// Reported as `lastUpdated` when a category has no published post.
    pub const NEVER_UPDATED: &str = "N/A";
}
