pub mod article;
pub mod tag;
