//! Wire models shared by the admin dashboard client and the export job server.

pub mod jobs;
pub mod model;
pub mod requests;
