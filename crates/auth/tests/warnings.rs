//! Unknown permissions are denied with a single warning, never an error.

use std::io;
use std::sync::{Arc, Mutex};

use dealerhub_auth::{Role, default_model, has_any_permission, has_permission};

#[derive(Clone, Default)]
struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl CapturedLogs {
    fn warnings(&self) -> usize {
        let bytes = self.0.lock().unwrap();
        String::from_utf8_lossy(&bytes)
            .lines()
            .filter(|line| line.contains("WARN"))
            .count()
    }
}

fn capture<T>(f: impl FnOnce() -> T) -> (T, CapturedLogs) {
    let logs = CapturedLogs::default();
    let writer = logs.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::DEBUG)
        .finish();
    let out = tracing::subscriber::with_default(subscriber, f);
    (out, logs)
}

#[test]
fn unregistered_module_warns_once() {
    let model = default_model().unwrap();
    let (granted, logs) = capture(|| has_permission(&model, Role::PlatformAdmin, "warranty.extend"));
    assert!(!granted);
    assert_eq!(logs.warnings(), 1);
}

#[test]
fn malformed_permission_warns_once() {
    let model = default_model().unwrap();
    let (granted, logs) = capture(|| has_permission(&model, Role::DealerManager, "approve_order"));
    assert!(!granted);
    assert_eq!(logs.warnings(), 1);
}

#[test]
fn ordinary_denial_is_silent() {
    let model = default_model().unwrap();
    let (granted, logs) = capture(|| has_permission(&model, Role::DealerStaff, "sales.approve_order"));
    assert!(!granted);
    assert_eq!(logs.warnings(), 0);
}

#[test]
fn each_unknown_entry_in_a_list_warns() {
    let model = default_model().unwrap();
    let (granted, logs) = capture(|| {
        has_any_permission(&model, Role::Customer, &["warranty.view", "loyalty.view"])
    });
    assert!(!granted);
    assert_eq!(logs.warnings(), 2);
}
