pub mod sanitize;
#[allow(clippy::module_inception)]
mod template;
pub use template::Template;
