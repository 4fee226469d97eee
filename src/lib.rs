//! Recipes API: recipe documents in PostgreSQL, a Redis read-through cache
//! for the collection, and stateless HMAC-signed session tokens guarding
//! writes.

pub mod config;
pub mod db;
pub mod error;
pub mod routes;
pub mod state;

pub mod crypto {
    pub mod password;
    pub mod token;
}

pub mod models {
    pub mod recipe;
    pub mod session;
    pub mod user;
}

pub mod repositories {
    pub mod cache;
    pub mod recipe;
    pub mod user;
}

pub mod services {
    pub mod auth;
    pub mod recipe_cache;
    pub mod recipes;
}

pub mod handlers {
    pub mod auth;
    pub mod health;
    pub mod recipes;
}

pub mod middleware_layer {
    pub mod auth;
}

pub mod validation {
    pub mod auth;
}
