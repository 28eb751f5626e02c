pub mod auth;
pub mod export;
pub mod reservation;
pub mod task;
