//! # Coview Core - Browser Session Mediation
//!
//! The session-multiplexing middle tier of the coview platform. One
//! [`BrowserSession`] owns the persistent CDP connection to one headless
//! browser (addressed by an opaque token) and aggregates every live client of
//! that browser:
//!
//! - **Viewer clients** receive the JPEG screencast and lifecycle events, and
//!   drive input (pointer, keyboard, IME) fire-and-forget.
//! - **API clients** act through structured request/reply: accessibility
//!   snapshots, screenshots, and clicks/fills addressed by stable backend DOM
//!   node ids.
//!
//! The [`SessionRegistry`] routes client attaches to a new or existing
//! session and tears a session down when its last client detaches. The
//! expensive screencast runs only while at least one viewer is attached,
//! transparently across page switches.
//!
//! ## Attaching clients
//!
//! ```no_run
//! use coview_core::{ClientKind, Config, SessionRegistry};
//!
//! # async fn example() -> Result<(), coview_core::RegistryError> {
//! let registry = SessionRegistry::new(Config::from_env());
//!
//! let (sink, _events) = tokio::sync::mpsc::unbounded_channel();
//! let outcome = registry
//!     .attach("socket-1", "browser-token", ClientKind::Viewer, sink)
//!     .await?;
//! assert!(!outcome.reused);
//! # Ok(())
//! # }
//! ```
//!
//! ## Dispatching client messages
//!
//! ```no_run
//! use coview_core::{ClientRequest, SessionRegistry};
//!
//! # async fn example(registry: &SessionRegistry, sink: &coview_core::EventSink) {
//! let reply = registry
//!     .dispatch("socket-1", sink, ClientRequest::Navigate("https://example.com".into()))
//!     .await;
//! assert!(reply.success);
//! # }
//! ```
//!
//! ## Module organization
//!
//! - [`session`] - per-token browser session and its action surface
//! - [`registry`] - token/client bookkeeping and request dispatch
//! - [`client`] - client model (viewer vs API) and event sinks
//! - [`protocol`] - client-facing message types
//! - [`a11y`] - accessibility tree filtering and compact rendering
//! - [`keymap`] - key-to-virtual-key-code mapping
//! - [`pool`] - typed client for the upstream browser pool
//! - [`config`] - environment-driven tuning knobs

pub mod a11y;
pub mod client;
pub mod config;
pub mod error;
pub mod keymap;
pub mod pool;
pub mod protocol;
pub mod registry;
pub mod session;

pub use client::{ClientHandle, ClientId, ClientKind, EventSink};
pub use config::Config;
pub use error::{PoolError, RegistryError, SessionError};
pub use pool::PoolClient;
pub use protocol::{ActionReply, ClientRequest, KeyModifiers, PageSummary, ServerEvent};
pub use registry::{AttachOutcome, SessionRegistry};
pub use session::BrowserSession;
