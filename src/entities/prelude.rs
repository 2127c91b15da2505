pub use super::admin_users::Entity as AdminUsers;
pub use super::signups::Entity as Signups;
pub use super::workshops::Entity as Workshops;
