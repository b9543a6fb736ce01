use pager_logging::pager_debug;

use crate::{Effect, ListState, Msg};

/// Pure update function: applies a message to state and returns any effects.
pub fn update<T>(mut state: ListState<T>, msg: Msg<T>) -> (ListState<T>, Vec<Effect>) {
    let effects = match msg {
        Msg::Initialize { key, mode } => state.initialize(key, mode),
        Msg::AdvanceRequested => {
            if !state.can_advance() {
                // Exhausted or busy; the result set stays untouched.
                pager_debug!("advance ignored in status {}", state.status());
                return (state, Vec::new());
            }
            state.advance()
        }
        Msg::RetractRequested => {
            if !state.can_retract() {
                pager_debug!("retract ignored in status {}", state.status());
                return (state, Vec::new());
            }
            state.retract()
        }
        Msg::RetryRequested => state.retry(),
        Msg::PageFetched { ticket, result } => {
            state.apply_fetched(ticket, result);
            Vec::new()
        }
        Msg::Unmounted => state.unmount(),
    };

    (state, effects)
}
