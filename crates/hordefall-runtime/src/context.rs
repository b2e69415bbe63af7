//! The shared game context passed to every system and state.
//!
//! There is no global state anywhere in the runtime: the context owns the
//! registry, the ECS world, the seeded RNG, time tracking, and the event
//! queue, and is constructed explicitly by the engine. Tests build as many
//! isolated contexts as they need.

use hecs::World;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use hordefall_core::config::RuntimeConfig;
use hordefall_core::events::GameEvent;
use hordefall_core::types::GameTime;

use crate::registry::Registry;
use crate::state_machine::GameState;

pub struct GameContext {
    pub registry: Registry,
    /// Live entities (spawned enemies).
    pub world: World,
    /// Single RNG stream; all randomness flows through here for determinism.
    pub rng: ChaCha8Rng,
    pub time: GameTime,
    /// Global time scale. The pause gate drops this to zero and restores it
    /// to one on resume.
    pub time_scale: f64,
    pub config: RuntimeConfig,
    events: Vec<GameEvent>,
    state_requests: Vec<Box<dyn GameState>>,
}

impl GameContext {
    pub fn new(config: RuntimeConfig) -> Self {
        Self {
            registry: Registry::new(),
            world: World::new(),
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            time: GameTime::default(),
            time_scale: 1.0,
            config,
            events: Vec::new(),
            state_requests: Vec::new(),
        }
    }

    /// Queue an event for this tick's snapshot.
    pub fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take all events queued since the last drain.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Request a state transition from inside a state's update.
    ///
    /// States must use this rather than borrowing the state machine from
    /// the registry: the machine is already borrowed while it drives their
    /// update. The scheduler applies queued requests right after the
    /// machine's update each tick.
    pub fn request_state(&mut self, state: Box<dyn GameState>) {
        self.state_requests.push(state);
    }

    pub(crate) fn take_state_requests(&mut self) -> Vec<Box<dyn GameState>> {
        std::mem::take(&mut self.state_requests)
    }

    /// Drop per-run transient state: queued events, queued transition
    /// requests, and every live entity. Called by scheduler cleanup.
    pub fn clear_transient(&mut self) {
        self.events.clear();
        self.state_requests.clear();
        self.world.clear();
    }
}
