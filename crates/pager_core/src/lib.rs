//! Pager core: pure state machine for a paginated remote list and its view-model.
mod effect;
mod msg;
mod state;
mod types;
mod update;
mod view_model;

pub use effect::{Effect, FetchTicket, PageRequest};
pub use msg::Msg;
pub use state::ListState;
pub use types::{
    Cursor, FailureKind, FetchError, ListMode, Page, QueryKey, Status, FIRST_PAGE,
};
pub use update::update;
pub use view_model::ListView;
