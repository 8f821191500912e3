use std::io::{self, Write};
use std::sync::{Arc, Mutex};
use tourney_directory::application::dispatcher::{DispatchMode, Dispatcher};
use tourney_directory::domain::envelope::Envelope;
use tourney_directory::domain::messages::{ListRequest, ListResponse, protocol_catalog};
use tourney_directory::error::{DirectoryError, Result};
use tourney_directory::telemetry;

/// Log sink shared between the subscriber and the test.
#[derive(Clone, Default)]
struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

async fn corrupt(_: ListRequest) -> Result<ListResponse> {
    panic!("tournament table corrupted")
}

// The current-thread test runtime runs the handler task on this thread, so
// the thread-local subscriber sees the panic hook's event.
#[tokio::test]
async fn test_handler_panic_is_logged_with_backtrace() {
    let logs = CapturedLogs::default();
    let sink = logs.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_ansi(false)
        .with_writer(move || sink.clone())
        .finish();
    let _guard = tracing::subscriber::set_default(subscriber);
    telemetry::install_panic_hook();

    let dispatcher = Dispatcher::builder("player", DispatchMode::Strict, protocol_catalog())
        .register(corrupt)
        .build();
    let request = Envelope::wrap(&ListRequest::default()).unwrap();

    let err = dispatcher.dispatch(&request).await.unwrap_err();
    assert!(matches!(err, DirectoryError::HandlerFault(reason) if reason == "tournament table corrupted"));

    let output = logs.contents();
    assert!(output.contains("Panic: tournament table corrupted"), "{output}");
    assert!(output.contains("backtrace="), "{output}");
    assert!(output.contains("panic_log_test.rs"), "{output}");
    assert!(output.contains("Handler panicked"), "{output}");
}
