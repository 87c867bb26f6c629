pub mod member_entity;
