pub mod lemonsqueezy;
pub mod resend;
pub mod stripe;
pub mod turnstile;

pub use lemonsqueezy::{LemonCheckout, LemonSqueezyClient};
pub use resend::{EmailSender, ResendEmailClient};
pub use stripe::{StripeCheckout, StripeClient, StripeSubscription};
pub use turnstile::TurnstileVerifier;
