pub mod assets;
pub mod detect;
pub mod health;

pub use assets::{create_asset, get_asset};
pub use detect::detect_objects;
pub use health::{health_check, root};
