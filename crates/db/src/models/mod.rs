pub mod game_update_task;
pub mod status;
pub mod user;
