pub mod auth;
pub mod contest;
pub mod membership;
pub mod question;
pub mod wallet;
