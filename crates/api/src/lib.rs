pub mod component;
pub mod message;
pub mod product;
