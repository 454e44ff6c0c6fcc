// airguardian-radar/src/auth/mod.rs
// OAuth2 client-credentials tokens for the OpenSky API

pub mod client;
pub mod token_cache;

pub use client::{ClientCredentialsProvider, TokenProvider};
pub use token_cache::TokenCache;
