//! DB-compatible (e.g. de/serialisable) types.
//!
//! Each entity follows the same pattern: an `XCore` holding the data, a
//! `NewX` alias for inserts (MongoDB assigns the `_id`), and an `X` wrapper
//! carrying the ID once read back.

pub mod candidate;
pub mod partylist;
pub mod position;
pub mod settings;
pub mod user;
pub mod vote;

pub use candidate::{Candidate, CandidateCore, NewCandidate};
pub use partylist::{NewPartylist, Partylist, PartylistCore};
pub use position::{NewPosition, Position, PositionCore};
pub use settings::{ensure_settings_exist, school_settings, SchoolSettings};
pub use user::{ensure_admin_exists, hash_password, NewUser, User, UserCore};
pub use vote::{vote_counts, NewVote, Vote, VoteCore, VoteCount};
