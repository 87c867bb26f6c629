pub mod mark;
pub mod view;
