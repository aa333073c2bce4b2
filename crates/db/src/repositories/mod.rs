//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods
//! that accept `&PgPool` as the first argument.

pub mod game_repo;
pub mod game_update_task_repo;
pub mod user_repo;

pub use game_repo::GameRepo;
pub use game_update_task_repo::GameUpdateTaskRepo;
pub use user_repo::UserRepo;
