pub mod constants;
pub mod identity;

pub use identity::Identity;
