//! Ready-made hook sets that log lifecycle events through `tracing`
//!
//! A logger is an ordinary hook set: bind it like any other and it composes
//! with whatever the application registers.
//!
//! ```
//! use reqtrace_core::Context;
//! use reqtrace_core::config::LogConfig;
//! use reqtrace_core::logging::server_logger;
//!
//! # fn main() -> Result<(), reqtrace_core::error::ConfigError> {
//! let logger = server_logger(&LogConfig::default())?;
//! let ctx = Context::background().with_hooks(&logger);
//! # let _ = ctx;
//! # Ok(())
//! # }
//! ```

use tracing::Level;

use crate::client::ClientTrace;
use crate::config::LogConfig;
use crate::error::ConfigError;
use crate::server::ServerTrace;

/// Target of server events
pub const SERVER_TARGET: &str = "reqtrace::server";
/// Target of client events
pub const CLIENT_TARGET: &str = "reqtrace::client";

// `tracing` needs the level at the callsite as a constant.
macro_rules! event_at {
    ($level:expr, $target:expr, $($rest:tt)+) => {{
        let level: Level = $level;
        if level == Level::ERROR {
            tracing::event!(target: $target, Level::ERROR, $($rest)+);
        } else if level == Level::WARN {
            tracing::event!(target: $target, Level::WARN, $($rest)+);
        } else if level == Level::INFO {
            tracing::event!(target: $target, Level::INFO, $($rest)+);
        } else if level == Level::DEBUG {
            tracing::event!(target: $target, Level::DEBUG, $($rest)+);
        } else {
            tracing::event!(target: $target, Level::TRACE, $($rest)+);
        }
    }};
}

/// Build a [`ServerTrace`] emitting one `tracing` event per configured event.
///
/// # Errors
///
/// Returns error if the configuration fails [`LogConfig::validate_for`].
pub fn server_logger(config: &LogConfig) -> Result<ServerTrace, ConfigError> {
    config.validate_for::<ServerTrace>()?;
    let level = config.tracing_level()?;
    let with_headers = config.include_headers;

    let mut trace = ServerTrace::default();

    if config.logs("got_bad_request") {
        trace = trace.on_got_bad_request(move |info| {
            event_at!(level, SERVER_TARGET, status = info.status.as_u16(), body = ?info.body, "bad request");
        });
    }
    if config.logs("got_request") {
        trace = trace.on_got_request(move |info| {
            if with_headers {
                event_at!(level, SERVER_TARGET, method = %info.method, uri = %info.uri, headers = ?info.headers, "request received");
            } else {
                event_at!(level, SERVER_TARGET, method = %info.method, uri = %info.uri, "request received");
            }
        });
    }
    if config.logs("wrote_header") {
        trace = trace.on_wrote_header(move |info| {
            if with_headers {
                event_at!(level, SERVER_TARGET, status = info.status.as_u16(), headers = ?info.headers, "response header written");
            } else {
                event_at!(level, SERVER_TARGET, status = info.status.as_u16(), "response header written");
            }
        });
    }
    if config.logs("wrote_body_chunk") {
        trace = trace.on_wrote_body_chunk(move |info| {
            event_at!(level, SERVER_TARGET, len = info.data.len(), written = info.written, error = ?info.error, "response body chunk written");
        });
    }
    if config.logs("handler_done") {
        trace = trace.on_handler_done(move |info| {
            event_at!(level, SERVER_TARGET, elapsed = ?info.elapsed, "handler done");
        });
    }

    Ok(trace)
}

/// Build a [`ClientTrace`] emitting one `tracing` event per configured event.
///
/// # Errors
///
/// Returns error if the configuration fails [`LogConfig::validate_for`].
pub fn client_logger(config: &LogConfig) -> Result<ClientTrace, ConfigError> {
    config.validate_for::<ClientTrace>()?;
    let level = config.tracing_level()?;

    let mut trace = ClientTrace::default();

    if config.logs("get_conn") {
        trace = trace.on_get_conn(move |info| {
            event_at!(level, CLIENT_TARGET, host_port = %info.host_port, "getting connection");
        });
    }
    if config.logs("got_conn") {
        trace = trace.on_got_conn(move |info| {
            event_at!(level, CLIENT_TARGET, remote_addr = ?info.remote_addr, reused = info.reused, was_idle = info.was_idle, idle_time = ?info.idle_time, "got connection");
        });
    }
    if config.logs("dns_start") {
        trace = trace.on_dns_start(move |info| {
            event_at!(level, CLIENT_TARGET, host = %info.host, "dns start");
        });
    }
    if config.logs("dns_done") {
        trace = trace.on_dns_done(move |info| {
            event_at!(level, CLIENT_TARGET, addrs = ?info.addrs, error = ?info.error, "dns done");
        });
    }
    if config.logs("connect_start") {
        trace = trace.on_connect_start(move |info| {
            event_at!(level, CLIENT_TARGET, network = %info.network, addr = %info.addr, "connect start");
        });
    }
    if config.logs("connect_done") {
        trace = trace.on_connect_done(move |info| {
            event_at!(level, CLIENT_TARGET, network = %info.network, addr = %info.addr, error = ?info.error, "connect done");
        });
    }
    if config.logs("wrote_request") {
        trace = trace.on_wrote_request(move |info| {
            event_at!(level, CLIENT_TARGET, error = ?info.error, "request written");
        });
    }

    Ok(trace)
}
