mod common;

mod auth;
mod contest;
mod membership;
mod questions;
mod wallet;
