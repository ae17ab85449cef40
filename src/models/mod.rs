//! Data models for the DongneLink platform.

mod business;
mod post;
mod review;
mod user;

pub use business::*;
pub use post::*;
pub use review::*;
pub use user::*;
