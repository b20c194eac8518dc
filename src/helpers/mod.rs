pub mod extractors;
pub mod handler_404;
pub mod text;
