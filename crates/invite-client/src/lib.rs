//! Front-end shell for the invitation service: typed HTTP calls, the
//! device's browser-session identity, and refresh boards that derive the
//! reaction strips and dashboard with `invite-engine`.

pub mod board;
pub mod client;
pub mod error;
pub mod session;

pub use board::{AttendanceBoard, ReactionBoard, Viewer, WishCard};
pub use client::InviteClient;
pub use error::ClientError;
pub use session::FileSessionStore;
