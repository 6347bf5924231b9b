// HTTP routes
pub mod health;
pub mod notifications;
pub mod submissions;
pub mod themes;
pub mod users;

pub use health::*;
pub use notifications::*;
pub use submissions::*;
pub use themes::*;
pub use users::*;
