//! Pure client-side core of the fleet manager.
//!
//! Everything with an invariant lives here, free of I/O so it can be tested
//! without a server:
//!
//! - [`Session`] and its four named transitions (the only writers of auth
//!   state),
//! - the authorization gate ([`resolve_destination`], [`guard`]),
//! - the transaction aggregation pipeline ([`aggregate`], [`summarize`]),
//! - the double-tap delete coordinator ([`TapCoordinator`]).
//!
//! The `tui` crate drives these with real network calls.

pub use aggregate::{
    Collections, RecordKey, Summary, TransactionKind, TransactionRecord, aggregate,
    filter_by_kind, remove_record, summarize,
};
pub use error::CoreError;
pub use gate::{Destination, Guard, entry_destination, guard, resolve_destination};
pub use money::MoneyCents;
pub use session::{Role, Session, SessionStatus, validate_signup};
pub use tap::{ARM_WINDOW, TapCoordinator, TapOutcome, TapState};

mod aggregate;
mod error;
mod gate;
mod money;
mod session;
mod tap;

pub type CoreResult<T> = Result<T, CoreError>;
