pub mod auth_service;
pub mod board_article_service;
pub mod comment_service;
pub mod job_service;
pub mod mark_service;
pub mod member_service;
pub mod property_service;
pub mod view_service;
