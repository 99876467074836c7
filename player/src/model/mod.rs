mod backend_event;
mod item;
mod item_id;
mod playback_state;
mod snapshot;

pub use backend_event::{state_code, BackendCommand, BackendEvent};
pub use item::Item;
pub use item_id::ItemId;
pub use playback_state::PlaybackState;
pub use snapshot::PlaybackSnapshot;
