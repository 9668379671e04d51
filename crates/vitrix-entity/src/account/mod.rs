//! Account domain entities: who can receive notifications and on which devices.

pub mod model;
pub mod role;
pub mod token;

pub use model::Account;
pub use role::UserRole;
pub use token::DeviceToken;
