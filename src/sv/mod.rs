pub mod account;
pub mod campaign;
pub mod lifecycle;
pub mod user;

pub use account::Account;
pub use campaign::Campaign;
pub use lifecycle::Lifecycle;
pub use user::User;
