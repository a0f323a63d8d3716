//! Headless client for a dairy/grocery storefront backend: session handling,
//! typed REST access, and the cart / checkout / wishlist / admin state
//! machines that sit between a UI and the API.

pub mod admin;
pub mod api;
pub mod auth;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod dto;
pub mod error;
pub mod events;
pub mod guard;
pub mod models;
pub mod orders;
pub mod session;
pub mod state;
pub mod wishlist;
