// HTTP routes
pub mod health;
pub mod influencers;
pub mod runs;

pub use health::*;
pub use influencers::*;
pub use runs::*;
