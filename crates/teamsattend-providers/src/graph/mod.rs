//! Microsoft Graph backend.
//!
//! - [`GraphClient`]: [`CalendarService`](crate::CalendarService) over the Graph REST API
//! - [`DeviceCodeFlow`]: interactive sign-in producing a bearer token
//! - [`GraphConfig`]: endpoints, identity, and timeouts shared by both

mod client;
mod config;
mod device_code;

pub use client::GraphClient;
pub use config::GraphConfig;
pub use device_code::{DeviceCode, DeviceCodeFlow};
