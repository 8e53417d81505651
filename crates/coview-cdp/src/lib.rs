//! # Coview CDP - Chrome DevTools Protocol Transport
//!
//! Low-level Chrome DevTools Protocol (CDP) client over WebSocket, providing
//! the transport layer for the coview browser mediation tier.
//!
//! This crate handles:
//! - WebSocket connection management to a browser's CDP endpoint
//! - CDP message serialization and deserialization
//! - Command/response correlation with async/await
//! - Event subscription for flattened multi-session dispatch
//!
//! One [`CdpConnection`] carries every logical page session of one browser:
//! commands are routed with an optional `sessionId`, and events arrive tagged
//! with the `sessionId` of the page that produced them.
//!
//! ## Sending commands
//!
//! ```no_run
//! use coview_cdp::CdpConnection;
//! use coview_cdp::protocol::target_domain::{GetTargetsParams, GetTargetsResult};
//!
//! # async fn example() -> Result<(), coview_cdp::CdpError> {
//! let conn = CdpConnection::connect("ws://localhost:8100/browser?token=abc").await?;
//!
//! // Browser-level command (no session)
//! let targets: GetTargetsResult = conn
//!     .send_command("Target.getTargets", Some(GetTargetsParams::default()), None)
//!     .await?;
//!
//! for target in targets.target_infos {
//!     println!("{} {}", target.target_type, target.url);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Subscribing to events
//!
//! ```no_run
//! use coview_cdp::CdpConnection;
//!
//! # async fn example(conn: &CdpConnection) {
//! let mut events = conn.subscribe_events();
//! while let Ok(event) = events.recv().await {
//!     match event.method.as_str() {
//!         "Target.targetCreated" => println!("new target"),
//!         "Page.screencastFrame" => println!("frame for {:?}", event.session_id),
//!         _ => {}
//!     }
//! }
//! # }
//! ```
//!
//! ## Module organization
//!
//! - [`connection`] - WebSocket connection management
//! - [`transport`] - Message types and serialization
//! - [`protocol`] - CDP domain type definitions
//! - [`error`] - Error types

pub mod connection;
pub mod error;
pub mod protocol;
pub mod transport;

pub use connection::CdpConnection;
pub use error::CdpError;
pub use transport::{CdpEvent, CdpMessage, CdpRequest, CdpResponse};
