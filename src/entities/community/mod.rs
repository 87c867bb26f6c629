pub mod board_article_entity;
pub mod comment_entity;
