//! Client-side connection hooks
//!
//! [`ClientTrace`] is the outbound counterpart of
//! [`ServerTrace`](crate::server::ServerTrace): callbacks an HTTP client
//! invokes while acquiring a connection and sending a request.

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use crate::compose::Hook;
use crate::context::Context;

/// Hooks run at various stages of an outgoing HTTP request.
///
/// Any hook may be unset. Hooks may be called concurrently from different
/// threads; connection hooks may fire for dials whose result is never used.
#[derive(crate::HookSet, Clone, Default)]
pub struct ClientTrace {
    /// About to obtain a connection for the target.
    pub get_conn: Option<Hook<GetConnInfo>>,

    /// Obtained a connection, new or pooled.
    pub got_conn: Option<Hook<GotConnInfo>>,

    /// Name resolution started.
    pub dns_start: Option<Hook<DnsStartInfo>>,

    /// Name resolution finished.
    pub dns_done: Option<Hook<DnsDoneInfo>>,

    /// A dial started.
    pub connect_start: Option<Hook<ConnectStartInfo>>,

    /// A dial finished.
    pub connect_done: Option<Hook<ConnectDoneInfo>>,

    /// The request, body included, was written.
    pub wrote_request: Option<Hook<WroteRequestInfo>>,
}

/// Connection lookup for a target.
#[derive(Debug, Clone)]
pub struct GetConnInfo {
    /// Target in `host:port` form
    pub host_port: String,
}

/// A connection handed to the request.
#[derive(Debug, Clone)]
pub struct GotConnInfo {
    /// Remote address of the connection
    pub remote_addr: Option<SocketAddr>,
    /// The connection was previously used for another request
    pub reused: bool,
    /// The connection came from the idle pool
    pub was_idle: bool,
    /// How long the connection sat idle, if `was_idle`
    pub idle_time: Option<Duration>,
}

/// Start of name resolution.
#[derive(Debug, Clone)]
pub struct DnsStartInfo {
    /// Host being resolved
    pub host: String,
}

/// End of name resolution.
#[derive(Debug, Clone)]
pub struct DnsDoneInfo {
    /// Resolved addresses
    pub addrs: Vec<IpAddr>,
    /// Resolution error, if any
    pub error: Option<String>,
}

/// Start of a dial.
#[derive(Debug, Clone)]
pub struct ConnectStartInfo {
    /// Network, e.g. `"tcp"`
    pub network: String,
    /// Address being dialled
    pub addr: SocketAddr,
}

/// End of a dial.
#[derive(Debug, Clone)]
pub struct ConnectDoneInfo {
    /// Network, e.g. `"tcp"`
    pub network: String,
    /// Address dialled
    pub addr: SocketAddr,
    /// Dial error, if any
    pub error: Option<String>,
}

/// The request was written.
#[derive(Debug, Clone, Default)]
pub struct WroteRequestInfo {
    /// Write error, if any
    pub error: Option<String>,
}

/// Returns a child of `ctx` whose outgoing requests will run the hooks in
/// `trace` in addition to any previously bound; hooks in `trace` run first.
#[must_use]
pub fn with_client_trace(ctx: &Context, trace: &ClientTrace) -> Context {
    ctx.with_hooks(trace)
}

/// Returns the [`ClientTrace`] visible from `ctx`, if one was bound.
#[must_use]
pub fn client_trace(ctx: &Context) -> Option<&ClientTrace> {
    ctx.hooks::<ClientTrace>()
}
