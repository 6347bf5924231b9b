pub mod ban;
pub mod unban;
pub mod validate;

pub use ban::{ban_user, BanRequest};
pub use unban::unban_user;
pub use validate::{resolve_user_ids, ResolvedUsers, ValidateUsersRequest};
