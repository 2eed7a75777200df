use std::sync::{Arc, mpsc};

use crate::assets::provider::AssetProvider;
use crate::assets::texture::Texture;
use crate::foundation::error::{StampError, StampResult};

/// Worker threads in each loader pool; one per role.
const LOADER_THREADS: usize = 3;

/// The three independently bound texture roles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextureRole {
    /// Product color photograph.
    Product,
    /// Grayscale depth map aligned with the product.
    Depth,
    /// Pattern overlaid onto the product.
    Pattern,
}

impl TextureRole {
    /// All roles, in slot order.
    pub const ALL: [TextureRole; 3] = [Self::Product, Self::Depth, Self::Pattern];

    pub(crate) fn index(self) -> usize {
        match self {
            Self::Product => 0,
            Self::Depth => 1,
            Self::Pattern => 2,
        }
    }
}

impl std::fmt::Display for TextureRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Product => "product",
            Self::Depth => "depth",
            Self::Pattern => "pattern",
        };
        f.write_str(s)
    }
}

/// Identifies one load request. Only the newest ticket per role can bind.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LoadTicket {
    /// Target slot.
    pub role: TextureRole,
    /// Slot generation this load was issued for.
    pub generation: u64,
}

#[derive(Debug, Default)]
struct Slot {
    bound: Option<Arc<Texture>>,
    generation: u64,
    loading: bool,
}

struct LoadOutcome {
    ticket: LoadTicket,
    path: String,
    result: StampResult<Texture>,
}

/// Texture slots shared between the asset loader and the frame driver.
///
/// All mutation happens on the owning (control) thread. Loads run on a loader pool owned by the
/// slots, never on the pool that shades frames, and report back over a channel; [`AssetSlots::poll`] applies finished loads with a single handle swap per
/// slot. Every request, bind or clear bumps the slot generation, so results of superseded loads
/// are dropped on arrival.
pub struct AssetSlots {
    slots: [Slot; 3],
    provider: Arc<dyn AssetProvider>,
    loader: rayon::ThreadPool,
    tx: mpsc::Sender<LoadOutcome>,
    rx: mpsc::Receiver<LoadOutcome>,
    in_flight: usize,
}

impl AssetSlots {
    /// Empty slots loading through `provider`.
    pub fn new(provider: Arc<dyn AssetProvider>) -> StampResult<Self> {
        let loader = rayon::ThreadPoolBuilder::new()
            .num_threads(LOADER_THREADS)
            .thread_name(|i| format!("stampwarp-loader-{i}"))
            .build()
            .map_err(|e| StampError::asset(format!("failed to build loader pool: {e}")))?;
        let (tx, rx) = mpsc::channel();
        Ok(Self {
            slots: Default::default(),
            provider,
            loader,
            tx,
            rx,
            in_flight: 0,
        })
    }

    /// Currently bound texture for `role`, if any.
    pub fn get(&self, role: TextureRole) -> Option<&Arc<Texture>> {
        self.slots[role.index()].bound.as_ref()
    }

    /// Whether `role` has a texture bound.
    pub fn is_bound(&self, role: TextureRole) -> bool {
        self.get(role).is_some()
    }

    /// Whether the newest request for `role` has not been received yet.
    pub fn is_loading(&self, role: TextureRole) -> bool {
        self.slots[role.index()].loading
    }

    /// Current generation of `role`.
    pub fn generation(&self, role: TextureRole) -> u64 {
        self.slots[role.index()].generation
    }

    /// Number of loads issued but not yet received by [`AssetSlots::poll`].
    pub fn pending_loads(&self) -> usize {
        self.in_flight
    }

    /// Bind a texture immediately, superseding any in-flight load for the slot.
    pub fn bind(&mut self, role: TextureRole, texture: Texture) {
        let slot = &mut self.slots[role.index()];
        slot.generation += 1;
        slot.loading = false;
        slot.bound = Some(Arc::new(texture));
        tracing::debug!(%role, generation = slot.generation, "slot bound");
    }

    /// Unbind the slot, superseding any in-flight load for it.
    pub fn clear(&mut self, role: TextureRole) {
        let slot = &mut self.slots[role.index()];
        slot.generation += 1;
        slot.loading = false;
        slot.bound = None;
        tracing::debug!(%role, generation = slot.generation, "slot cleared");
    }

    /// Start an asynchronous load into `role`.
    ///
    /// The previously bound texture stays in place until the load completes and is polled.
    pub fn request(&mut self, role: TextureRole, path: impl Into<String>) -> LoadTicket {
        let slot = &mut self.slots[role.index()];
        slot.generation += 1;
        slot.loading = true;
        let ticket = LoadTicket {
            role,
            generation: slot.generation,
        };

        let path = path.into();
        let provider = Arc::clone(&self.provider);
        let tx = self.tx.clone();
        self.in_flight += 1;
        tracing::debug!(%role, generation = ticket.generation, path = %path, "load requested");

        self.loader.spawn(move || {
            let result = provider.load_texture(&path);
            // The receiver only disappears together with the slots.
            let _ = tx.send(LoadOutcome {
                ticket,
                path,
                result,
            });
        });
        ticket
    }

    /// Apply every finished load without blocking. Returns the number of slots rebound.
    pub fn poll(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(outcome) = self.rx.try_recv() {
            if self.apply(outcome) {
                applied += 1;
            }
        }
        applied
    }

    /// Block until every issued load has arrived, applying them. Returns the number of slots
    /// rebound.
    pub fn wait_for_loads(&mut self) -> usize {
        let mut applied = 0;
        while self.in_flight > 0 {
            match self.rx.recv() {
                Ok(outcome) => {
                    if self.apply(outcome) {
                        applied += 1;
                    }
                }
                Err(_) => break,
            }
        }
        applied
    }

    fn apply(&mut self, outcome: LoadOutcome) -> bool {
        self.in_flight = self.in_flight.saturating_sub(1);
        let LoadOutcome {
            ticket,
            path,
            result,
        } = outcome;
        let role = ticket.role;
        let slot = &mut self.slots[role.index()];

        if ticket.generation != slot.generation {
            tracing::debug!(
                %role,
                generation = ticket.generation,
                current = slot.generation,
                path = %path,
                "dropping superseded load"
            );
            return false;
        }

        slot.loading = false;
        match result {
            Ok(texture) => {
                tracing::debug!(
                    %role,
                    path = %path,
                    width = texture.width(),
                    height = texture.height(),
                    "load complete"
                );
                slot.bound = Some(Arc::new(texture));
            }
            Err(err) => {
                tracing::warn!(%role, path = %path, error = %err, "load failed; slot unbound");
                slot.bound = None;
            }
        }
        true
    }
}

impl std::fmt::Debug for AssetSlots {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssetSlots")
            .field("slots", &self.slots)
            .field("in_flight", &self.in_flight)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/slots.rs"]
mod tests;
