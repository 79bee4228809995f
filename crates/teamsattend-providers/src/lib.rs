//! CalendarService trait, Microsoft Graph backend, and pipeline stages.
//!
//! This crate provides everything that talks to the remote calendar:
//!
//! - [`CalendarService`] - The transport seam, returning raw payloads
//! - [`GraphClient`] - The Microsoft Graph implementation
//! - [`CredentialProvider`] - Bearer token acquisition ([`DeviceCodeFlow`], [`StaticToken`])
//! - [`EventLister`], [`EventDetailFetcher`], [`AttendanceResolver`] - The stages
//! - [`ProviderError`] - Error types for all of the above
//!
//! # Architecture
//!
//! ```text
//!  FilterCriteria        event id           join URL
//!        │                  │                  │
//!        ▼                  ▼                  ▼
//! ┌─────────────┐ ┌──────────────────┐ ┌──────────────────┐
//! │ EventLister │ │EventDetailFetcher│ │AttendanceResolver│
//! └──────┬──────┘ └────────┬─────────┘ └────────┬─────────┘
//!        │                 │                    │
//!        └─────────────────┼────────────────────┘
//!                          │ CalendarService
//!                 ┌────────┴────────┐
//!                 ▼                 ▼
//!          ┌─────────────┐   ┌───────────────┐
//!          │ GraphClient │   │ MemoryService │
//!          └─────────────┘   └───────────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use teamsattend_providers::{EventLister, GraphClient, GraphConfig, StaticToken, CredentialProvider};
//!
//! let client = GraphClient::new(&GraphConfig::new(tenant, client_id))?;
//! let token = StaticToken::new(access_token).acquire().await?;
//! let events = EventLister::new(&client).list(&token, &criteria).await?;
//! ```

pub mod attendance;
pub mod credentials;
pub mod detail;
pub mod error;
#[cfg(feature = "graph")]
pub mod graph;
pub mod lister;
#[cfg(any(test, feature = "test-util"))]
pub mod memory;
pub mod normalize;
pub mod raw_event;
pub mod service;

// Re-export main types at crate root
pub use attendance::AttendanceResolver;
pub use credentials::{BearerToken, CredentialProvider, StaticToken};
pub use detail::EventDetailFetcher;
pub use error::{ProviderError, ProviderErrorCode, ProviderResult};
#[cfg(feature = "graph")]
pub use graph::{DeviceCode, DeviceCodeFlow, GraphClient, GraphConfig};
pub use lister::EventLister;
#[cfg(any(test, feature = "test-util"))]
pub use memory::{MemoryService, ServiceCall};
pub use raw_event::{
    RawAttendanceReport, RawCollection, RawDateTimeTimeZone, RawEmailAddress, RawEvent,
    RawEventItem, RawLocation, RawOnlineMeeting, RawOnlineMeetingInfo, RawRecipient,
};
pub use service::{BoxFuture, CalendarService};
