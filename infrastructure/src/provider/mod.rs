//! Room provider adapters.
//!
//! Two implementations of the
//! [`RoomProvider`](convene_application::RoomProvider) port: an HTTP
//! adapter for hosting services that create rooms on demand, and a static
//! adapter that derives every room from the catalog's base URL without any
//! network traffic.

pub mod http;
pub mod static_catalog;

pub use http::HttpRoomProvider;
pub use static_catalog::StaticRoomProvider;
