pub mod admin_auth;
pub mod request_id;

pub use admin_auth::AdminAuth;
pub use request_id::RequestId;
