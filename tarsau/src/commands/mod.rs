pub mod build;
pub mod extract;
pub mod list;

pub use build::run as build;
pub use extract::run as extract;
pub use list::run as list;
