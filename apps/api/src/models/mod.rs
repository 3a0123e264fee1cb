pub mod brand;
pub mod post;
pub mod schedule;
