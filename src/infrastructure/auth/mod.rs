pub mod middleware;
pub mod request_id;
pub mod session;
pub mod usage_gate;

pub use middleware::{auth_middleware, AuthUser};
pub use request_id::{request_id_middleware, RequestId};
pub use session::{with_session_cookie, without_session_cookie, AUTH_COOKIE};
pub use usage_gate::usage_gate_middleware;
