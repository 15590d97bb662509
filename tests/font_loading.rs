use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use cottonbro_editor::fonts::FontFuture;
use cottonbro_editor::{Editor, EditorConfig, FontLoader, FontService, RasterDecoder};
use egui::pos2;
use futures::FutureExt;
use futures::channel::oneshot;
use futures::executor::block_on;
use futures::future::join;
use parking_lot::Mutex;

/// Counts fetches; the first one waits on a gate the test opens
struct CountingService {
    calls: AtomicUsize,
    gate: Mutex<Option<oneshot::Receiver<()>>>,
}

impl CountingService {
    fn gated() -> (Arc<Self>, oneshot::Sender<()>) {
        let (tx, rx) = oneshot::channel();
        let service = Arc::new(Self {
            calls: AtomicUsize::new(0),
            gate: Mutex::new(Some(rx)),
        });
        (service, tx)
    }

    fn open() -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            gate: Mutex::new(None),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl FontService for CountingService {
    fn load(&self, _family: &str) -> FontFuture {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.gate.lock().take() {
            Some(gate) => async move { gate.await.map_err(|_| "gate dropped".to_owned()) }.boxed(),
            None => futures::future::ready(Ok(())).boxed(),
        }
    }
}

/// Each fetch waits on the next gate in line
struct QueuedService {
    calls: AtomicUsize,
    gates: Mutex<VecDeque<oneshot::Receiver<()>>>,
}

impl FontService for QueuedService {
    fn load(&self, _family: &str) -> FontFuture {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.gates.lock().pop_front() {
            Some(gate) => async move { gate.await.map_err(|_| "gate dropped".to_owned()) }.boxed(),
            None => futures::future::ready(Ok(())).boxed(),
        }
    }
}

struct OfflineService;

impl FontService for OfflineService {
    fn load(&self, _family: &str) -> FontFuture {
        futures::future::ready(Err("offline".to_owned())).boxed()
    }
}

#[test]
fn test_concurrent_requests_share_one_fetch() {
    let (service, gate) = CountingService::gated();
    let loader = FontLoader::new(service.clone());

    let first = loader.load("Lobster");
    let second = loader.load("Lobster");
    assert_eq!(service.calls(), 1);
    assert_eq!(loader.in_flight_count(), 1);
    assert!(!loader.is_loaded("Lobster"));

    gate.send(()).unwrap();
    assert_eq!(block_on(join(first, second)), (true, true));
    assert!(loader.is_loaded("Lobster"));
    assert_eq!(loader.in_flight_count(), 0);

    // Already loaded: no further fetch
    assert!(block_on(loader.load("Lobster")));
    assert_eq!(service.calls(), 1);
}

#[test]
fn test_different_families_fetch_separately() {
    let service = CountingService::open();
    let loader = FontLoader::new(service.clone());

    let (a, b) = block_on(join(loader.load("Lobster"), loader.load("Pacifico")));
    assert!(a && b);
    assert_eq!(service.calls(), 2);
}

#[test]
fn test_dropped_gate_reports_failure() {
    let (service, gate) = CountingService::gated();
    let loader = FontLoader::new(service);

    let pending = loader.load("Lobster");
    drop(gate);
    assert!(!block_on(pending));
    assert!(!loader.is_loaded("Lobster"));
    assert_eq!(loader.in_flight_count(), 0);
}

#[test]
fn test_late_waiter_on_failed_fetch_keeps_retry_in_flight() {
    let (fail_tx, fail_rx) = oneshot::channel();
    let (retry_tx, retry_rx) = oneshot::channel();
    let service = Arc::new(QueuedService {
        calls: AtomicUsize::new(0),
        gates: Mutex::new(VecDeque::from([fail_rx, retry_rx])),
    });
    let loader = FontLoader::new(service.clone());

    let early = loader.load("Lobster");
    let late = loader.load("Lobster");
    drop(fail_tx);
    assert!(!block_on(early));
    assert_eq!(loader.in_flight_count(), 0);

    let retry = loader.load("Lobster");
    assert_eq!(service.calls.load(Ordering::SeqCst), 2);
    assert_eq!(loader.in_flight_count(), 1);

    // The second waiter on the failed fetch finishes after the retry started
    assert!(!block_on(late));
    assert_eq!(loader.in_flight_count(), 1);

    let joined = loader.load("Lobster");
    assert_eq!(service.calls.load(Ordering::SeqCst), 2);
    retry_tx.send(()).unwrap();
    assert_eq!(block_on(join(retry, joined)), (true, true));
    assert!(loader.is_loaded("Lobster"));
    assert_eq!(loader.in_flight_count(), 0);
}

#[test]
fn test_font_family_applies_to_selected_text() {
    let service = CountingService::open();
    let mut editor =
        Editor::with_services(EditorConfig::default(), service.clone(), Arc::new(RasterDecoder)).unwrap();
    let id = editor.add_text(pos2(250.0, 250.0));
    let undo_before = editor.history().undo_len();

    assert!(block_on(editor.set_font_family("Lobster")));
    assert_eq!(editor.scene().get(id).unwrap().as_text().unwrap().font_family, "Lobster");
    assert_eq!(editor.history().undo_len(), undo_before + 1);
    assert_eq!(service.calls(), 1);
    assert!(editor.fonts().is_loaded("Lobster"));
}

#[test]
fn test_failed_font_still_applies() {
    let mut editor =
        Editor::with_services(EditorConfig::default(), Arc::new(OfflineService), Arc::new(RasterDecoder)).unwrap();
    let id = editor.add_text(pos2(250.0, 250.0));

    assert!(block_on(editor.set_font_family("Lobster")));
    assert_eq!(editor.scene().get(id).unwrap().as_text().unwrap().font_family, "Lobster");
    assert!(!editor.fonts().is_loaded("Lobster"));
}
