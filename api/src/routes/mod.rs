pub mod media;
pub mod reviews;
pub mod vehicle;
