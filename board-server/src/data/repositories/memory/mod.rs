//! Хранилища в памяти процесса. Используются, когда `DATABASE_URL` не задан,
//! и в тестах.

pub(crate) mod bug_repository;
pub(crate) mod post_repository;
pub(crate) mod user_repository;
