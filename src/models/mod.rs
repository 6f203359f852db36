//! Data models for raindrop-mcp.
//!
//! Typed mirrors of the Raindrop.io REST payloads. Field names follow the
//! API (`_id`, `$id`, `lastUpdate`) on the wire and Rust conventions in code.

mod collection;
mod group;
mod raindrop;
pub mod response;
mod tag;
mod user;

pub use collection::{
    ALL_COLLECTION_ID, CollectionId, CollectionItem, CollectionPayload, ParentRef,
    TRASH_COLLECTION_ID, UNSORTED_COLLECTION_ID, is_system_collection,
};
pub use group::{CollectionGroup, Group};
pub use raindrop::{
    RaindropCreate, RaindropId, RaindropItem, RaindropQuery, RaindropUpdate, RaindropsUpdate,
    parse_hint,
};
pub use tag::Tag;
pub use user::User;
