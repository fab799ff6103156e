//! Domain Model
//!
//! The entity types cached locally. They mirror the server's records except
//! that identity is tagged: a server-assigned id and a locally synthesized
//! placeholder are different variants of [`EntityId`], never the same
//! numeric space.

pub mod client;
pub mod followup;
pub mod id;
pub mod note;

pub use client::{Client, ClientPatch, ClientStatus, NewClient};
pub use followup::{Followup, FollowupPatch, NewFollowup};
pub use id::{EntityId, LocalIdAllocator, ParseIdError};
pub use note::{NewNote, Note};
