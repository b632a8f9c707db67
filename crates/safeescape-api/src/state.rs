//! Shared application state for the evacuation API.
//!
//! The planner is read-only after construction, so the state needs no
//! locks; handlers share it through an `Arc`.

use safeescape_planner::{EvacuationPlanner, Unadvised};

/// State shared by every request handler.
pub struct AppState<G, A = Unadvised> {
    /// The evacuation planner serving all requests.
    pub planner: EvacuationPlanner<G, A>,
}

impl<G, A> AppState<G, A> {
    /// Wrap a configured planner.
    pub const fn new(planner: EvacuationPlanner<G, A>) -> Self {
        Self { planner }
    }
}
