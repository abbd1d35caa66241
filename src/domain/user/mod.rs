pub mod model;

pub use model::{PublicUser, SubscriptionTier, User};
