pub mod calendar;
pub mod derived;
pub mod render;
pub mod sessions;
pub mod sink;
pub mod validation;
pub mod wizard;
