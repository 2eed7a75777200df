use std::sync::{Condvar, Mutex};
use std::time::{Duration, Instant};

use super::*;
use crate::assets::provider::InMemoryAssetProvider;

fn textures() -> InMemoryAssetProvider {
    let mut p = InMemoryAssetProvider::new();
    p.insert("red.png", Texture::solid(1, 1, [255, 0, 0, 255]).unwrap())
        .unwrap();
    p.insert("blue.png", Texture::solid(2, 2, [0, 0, 255, 255]).unwrap())
        .unwrap();
    p
}

fn provider() -> Arc<dyn AssetProvider> {
    Arc::new(textures())
}

/// Holds loads back until released. Gives up after ten seconds so a broken test fails
/// instead of hanging.
#[derive(Default)]
struct Gate {
    open: Mutex<bool>,
    cv: Condvar,
}

impl Gate {
    fn wait(&self) {
        let open = self.open.lock().unwrap();
        let _ = self
            .cv
            .wait_timeout_while(open, Duration::from_secs(10), |open| !*open)
            .unwrap();
    }

    fn release(&self) {
        *self.open.lock().unwrap() = true;
        self.cv.notify_all();
    }
}

/// Serves `textures()`, but requests for `held` wait at the gate first.
struct GatedProvider {
    inner: InMemoryAssetProvider,
    held: &'static str,
    gate: Arc<Gate>,
}

impl AssetProvider for GatedProvider {
    fn load_texture(&self, path: &str) -> StampResult<Texture> {
        if path == self.held {
            self.gate.wait();
        }
        self.inner.load_texture(path)
    }
}

/// Records the name of every thread a load runs on.
#[derive(Default)]
struct ThreadRecorder {
    names: Mutex<Vec<String>>,
}

impl AssetProvider for ThreadRecorder {
    fn load_texture(&self, _path: &str) -> StampResult<Texture> {
        let name = std::thread::current().name().unwrap_or("").to_owned();
        self.names.lock().unwrap().push(name);
        Texture::solid(1, 1, [1, 2, 3, 255])
    }
}

#[test]
fn slots_start_unbound() {
    let slots = AssetSlots::new(provider()).unwrap();
    for role in TextureRole::ALL {
        assert!(!slots.is_bound(role));
        assert_eq!(slots.generation(role), 0);
    }
}

#[test]
fn request_binds_after_wait() {
    let mut slots = AssetSlots::new(provider()).unwrap();
    let ticket = slots.request(TextureRole::Pattern, "red.png");
    assert_eq!(ticket.generation, 1);
    assert_eq!(slots.pending_loads(), 1);

    assert_eq!(slots.wait_for_loads(), 1);
    assert_eq!(slots.pending_loads(), 0);
    let tex = slots.get(TextureRole::Pattern).unwrap();
    assert_eq!(tex.width(), 1);
    assert!(!slots.is_bound(TextureRole::Product));
}

#[test]
fn newer_request_wins_when_older_load_finishes_last() {
    let gate = Arc::new(Gate::default());
    let mut slots = AssetSlots::new(Arc::new(GatedProvider {
        inner: textures(),
        held: "red.png",
        gate: Arc::clone(&gate),
    }))
    .unwrap();
    slots.request(TextureRole::Pattern, "red.png");
    slots.request(TextureRole::Pattern, "blue.png");

    // blue.png arrives while red.png is still held.
    let deadline = Instant::now() + Duration::from_secs(10);
    while slots.pending_loads() > 1 && Instant::now() < deadline {
        slots.poll();
        std::thread::sleep(Duration::from_millis(1));
    }
    assert_eq!(slots.pending_loads(), 1);
    assert_eq!(slots.get(TextureRole::Pattern).unwrap().width(), 2);
    assert!(!slots.is_loading(TextureRole::Pattern));

    gate.release();
    assert_eq!(slots.wait_for_loads(), 0);
    assert_eq!(slots.get(TextureRole::Pattern).unwrap().width(), 2);
}

#[test]
fn loads_run_on_dedicated_loader_threads() {
    let recorder = Arc::new(ThreadRecorder::default());
    let mut slots = AssetSlots::new(Arc::clone(&recorder) as Arc<dyn AssetProvider>).unwrap();
    for role in TextureRole::ALL {
        slots.request(role, "any.png");
    }
    assert_eq!(slots.wait_for_loads(), 3);

    let names = recorder.names.lock().unwrap();
    assert_eq!(names.len(), 3);
    for name in names.iter() {
        assert!(name.starts_with("stampwarp-loader-"), "load ran on '{name}'");
    }
}

#[test]
fn loading_flag_tracks_newest_request() {
    let mut slots = AssetSlots::new(provider()).unwrap();
    assert!(!slots.is_loading(TextureRole::Product));
    slots.request(TextureRole::Product, "missing.png");
    assert!(slots.is_loading(TextureRole::Product));
    slots.wait_for_loads();
    assert!(!slots.is_loading(TextureRole::Product));

    slots.request(TextureRole::Product, "red.png");
    slots.clear(TextureRole::Product);
    assert!(!slots.is_loading(TextureRole::Product));
    slots.wait_for_loads();
}

#[test]
fn bind_supersedes_in_flight_load() {
    let mut slots = AssetSlots::new(provider()).unwrap();
    slots.request(TextureRole::Product, "blue.png");
    slots.bind(
        TextureRole::Product,
        Texture::solid(5, 5, [9, 9, 9, 255]).unwrap(),
    );

    assert_eq!(slots.wait_for_loads(), 0);
    assert_eq!(slots.get(TextureRole::Product).unwrap().width(), 5);
}

#[test]
fn clear_supersedes_in_flight_load() {
    let mut slots = AssetSlots::new(provider()).unwrap();
    slots.request(TextureRole::Depth, "red.png");
    slots.clear(TextureRole::Depth);

    slots.wait_for_loads();
    assert!(!slots.is_bound(TextureRole::Depth));
}

#[test]
fn failed_load_leaves_slot_unbound() {
    let mut slots = AssetSlots::new(provider()).unwrap();
    slots.bind(
        TextureRole::Pattern,
        Texture::solid(1, 1, [0, 255, 0, 255]).unwrap(),
    );
    slots.request(TextureRole::Pattern, "missing.png");

    slots.wait_for_loads();
    assert!(!slots.is_bound(TextureRole::Pattern));
}

#[test]
fn roles_are_independent() {
    let mut slots = AssetSlots::new(provider()).unwrap();
    slots.request(TextureRole::Product, "blue.png");
    slots.request(TextureRole::Pattern, "red.png");
    slots.clear(TextureRole::Depth);

    assert_eq!(slots.wait_for_loads(), 2);
    assert!(slots.is_bound(TextureRole::Product));
    assert!(slots.is_bound(TextureRole::Pattern));
    assert!(!slots.is_bound(TextureRole::Depth));
}
