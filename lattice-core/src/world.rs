//! World management: bodies, force collaborators, diagnostics.

use lattice_contact::ContactParams;
use lattice_types::{EventSink, NullSink, Severity, SimEvent, SolverConfig};

use crate::body::Body;
use crate::forces::EnvironmentForce;

/// Identifier of a body within a [`World`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyId(usize);

impl BodyId {
    /// Create a body ID from a raw index.
    #[must_use]
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    /// The raw index value.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// The simulation world: every body, the registered environment forces,
/// and the diagnostic sink.
pub struct World {
    pub(crate) config: SolverConfig,
    pub(crate) contact_params: ContactParams,
    pub(crate) bodies: Vec<Body>,
    pub(crate) forces: Vec<Box<dyn EnvironmentForce>>,
    pub(crate) sink: Box<dyn EventSink>,
    pub(crate) time: f64,
    pub(crate) step_count: u64,
}

impl World {
    /// Create an empty world with the given solver configuration.
    #[must_use]
    pub fn new(config: SolverConfig) -> Self {
        Self {
            config,
            contact_params: ContactParams::default(),
            bodies: Vec::new(),
            forces: Vec::new(),
            sink: Box::new(NullSink),
            time: 0.0,
            step_count: 0,
        }
    }

    /// Create a world with custom contact parameters.
    #[must_use]
    pub fn with_contact_params(config: SolverConfig, contact_params: ContactParams) -> Self {
        Self {
            contact_params,
            ..Self::new(config)
        }
    }

    /// Replace the diagnostic sink.
    pub fn set_event_sink(&mut self, sink: Box<dyn EventSink>) {
        self.sink = sink;
    }

    /// Register an environment force applied to every non-frozen body
    /// each tick.
    pub fn add_force(&mut self, force: impl EnvironmentForce + 'static) {
        self.forces.push(Box::new(force));
    }

    /// Add a body to the world.
    pub fn add_body(&mut self, body: Body) -> BodyId {
        self.bodies.push(body);
        BodyId::new(self.bodies.len() - 1)
    }

    /// Remove every body.
    pub fn clear_bodies(&mut self) {
        self.bodies.clear();
    }

    /// A body by ID.
    #[must_use]
    pub fn body(&self, id: BodyId) -> Option<&Body> {
        self.bodies.get(id.index())
    }

    /// Mutable access to a body by ID.
    pub fn body_mut(&mut self, id: BodyId) -> Option<&mut Body> {
        self.bodies.get_mut(id.index())
    }

    /// All bodies.
    #[must_use]
    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    /// Number of bodies.
    #[must_use]
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// The solver configuration.
    #[must_use]
    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// The contact parameters.
    #[must_use]
    pub fn contact_params(&self) -> &ContactParams {
        &self.contact_params
    }

    /// The fixed tick duration.
    #[must_use]
    pub fn timestep(&self) -> f64 {
        self.config.timestep
    }

    /// Elapsed simulation time.
    #[must_use]
    pub fn time(&self) -> f64 {
        self.time
    }

    /// Number of completed ticks.
    #[must_use]
    pub fn step_count(&self) -> u64 {
        self.step_count
    }

    /// Route one diagnostic event to the log and the sink.
    pub(crate) fn emit(&mut self, event: SimEvent) {
        match event.severity() {
            Severity::Info => tracing::debug!(%event, "sim event"),
            Severity::Warning => tracing::warn!(%event, "sim event"),
        }
        self.sink.post(event);
    }
}
