//! Stream mapping and packet timestamp rebasing.
//!
//! Every pass-through transform follows the same shape: decide once which
//! input streams are copied to the output ([`StreamMap`]), then, for every
//! packet of a mapped stream, rewrite its stream index and rescale its
//! timestamps into the output stream's time base. Windowed, speed-changing,
//! concatenating, and interleaving transforms add a rebasing step before the
//! rescale; the pieces for each live here.

pub mod concat;
pub mod interleave;
pub mod map;
pub mod rebase;

pub use concat::ConcatTracker;
pub use interleave::{pick_earlier, MergePick, ZeroBase};
pub use map::{StreamMap, StreamSelector};
pub use rebase::{SpeedChange, TrimDecision, TrimWindow};
