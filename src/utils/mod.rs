pub mod hash;
pub mod jwt;
pub mod logging;
pub mod validate_utils;
