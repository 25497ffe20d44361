pub(crate) mod auth_service;
pub(crate) mod bug_service;
pub(crate) mod post_service;
