pub mod strategy_trait;
pub mod native;
pub mod web;

pub use strategy_trait::RegisterStrategy;
pub use native::NativeStrategy;
pub use web::WebStrategy;
