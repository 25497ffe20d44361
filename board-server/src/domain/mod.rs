pub(crate) mod bug;
pub(crate) mod error;
pub(crate) mod identity;
pub(crate) mod ownership;
pub(crate) mod post;
pub(crate) mod user;
