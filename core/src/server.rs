//! Server-side response hooks
//!
//! [`ServerTrace`] carries the callbacks an HTTP server pipeline invokes while
//! handling one request. The pipeline looks the trace up from the request's
//! [`Context`] at each lifecycle point and calls the matching `emit_*`
//! method; nothing fires if no trace was bound.

use std::time::Duration;

use bytes::Bytes;
use http::{HeaderMap, Method, StatusCode, Uri};

use crate::compose::Hook;
use crate::context::Context;

/// Hooks run at various stages of an ongoing HTTP response.
///
/// Any hook may be unset. Hooks may be called concurrently from different
/// threads, and some may be called after the request has completed or failed.
#[derive(crate::HookSet, Clone, Default)]
pub struct ServerTrace {
    /// Received a malformed request; the handler will not be called.
    pub got_bad_request: Option<Hook<BadRequestInfo>>,

    /// Received a request, just before calling the handler.
    pub got_request: Option<Hook<RequestInfo>>,

    /// The handler wrote the response header.
    pub wrote_header: Option<Hook<WroteHeaderInfo>>,

    /// The handler wrote a chunk of the response body.
    pub wrote_body_chunk: Option<Hook<WroteBodyChunkInfo>>,

    /// The handler returned.
    pub handler_done: Option<Hook<HandlerDoneInfo>>,
}

/// A request rejected before reaching the handler.
#[derive(Debug, Clone)]
pub struct BadRequestInfo {
    /// Status code of the error response (typically 400 or 431)
    pub status: StatusCode,
    /// Error text sent as the response body, if any
    pub body: Option<String>,
}

/// A request about to be handed to the handler.
///
/// Hooks see a snapshot; changing it has no effect on the request.
#[derive(Debug, Clone)]
pub struct RequestInfo {
    /// Request method
    pub method: Method,
    /// Request target
    pub uri: Uri,
    /// Request headers
    pub headers: HeaderMap,
}

/// The response header as written by the handler.
#[derive(Debug, Clone)]
pub struct WroteHeaderInfo {
    /// Response status
    pub status: StatusCode,
    /// Response headers
    pub headers: HeaderMap,
}

/// One write of response body data, before any transfer encoding.
#[derive(Debug, Clone)]
pub struct WroteBodyChunkInfo {
    /// Data passed to the write
    pub data: Bytes,
    /// Bytes actually written
    pub written: usize,
    /// Write error, if the write failed
    pub error: Option<String>,
}

/// The handler finished.
#[derive(Debug, Clone, Default)]
pub struct HandlerDoneInfo {
    /// Time spent inside the handler, when the pipeline measures it
    pub elapsed: Option<Duration>,
}

/// Returns a child of `ctx` whose responses will run the hooks in `trace`
/// in addition to any previously bound; hooks in `trace` run first.
#[must_use]
pub fn with_server_trace(ctx: &Context, trace: &ServerTrace) -> Context {
    ctx.with_hooks(trace)
}

/// Returns the [`ServerTrace`] visible from `ctx`, if one was bound.
#[must_use]
pub fn server_trace(ctx: &Context) -> Option<&ServerTrace> {
    ctx.hooks::<ServerTrace>()
}
