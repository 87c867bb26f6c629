pub mod admin;
pub mod articles;
pub mod comments;
pub mod jobs;
pub mod members;
pub mod properties;
