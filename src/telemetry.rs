//! Log setup for the binary and panic reporting through `tracing`.

use std::any::Any;
use std::backtrace::Backtrace;
use std::io;
use tracing_subscriber::EnvFilter;

/// Installs the global `fmt` subscriber, writing to stderr.
///
/// The filter comes from `RUST_LOG` and defaults to `info`.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();
}

/// Replaces the process panic hook with one that logs the panic, its location
/// and a captured backtrace at `error` level.
///
/// Handler panics are still turned into `HandlerFault` by the dispatcher; this
/// hook only makes sure the stack of the failing handler ends up in the logs.
pub fn install_panic_hook() {
    std::panic::set_hook(Box::new(|info| {
        let backtrace = Backtrace::force_capture();
        let location = info
            .location()
            .map(ToString::to_string)
            .unwrap_or_else(|| "unknown".to_string());
        tracing::error!(
            %location,
            %backtrace,
            "Panic: {}",
            panic_message(info.payload())
        );
    }));
}

/// Best-effort text of a panic payload.
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
