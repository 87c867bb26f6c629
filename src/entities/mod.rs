pub mod community;
pub mod listing;
pub mod mark;
pub mod member;
pub mod view;
