pub mod category;
pub mod item;
pub mod entries;
pub mod snapshot;
pub mod defaults;
pub mod user;
pub mod config;

pub use category::*;
pub use item::*;
pub use entries::*;
pub use snapshot::*;
pub use user::*;
pub use config::*;
