pub mod models;
pub mod registry;
pub mod replace;
pub mod validation;
