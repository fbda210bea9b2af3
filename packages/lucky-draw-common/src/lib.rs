pub mod candidates;
pub mod error;
pub mod export;
pub mod pool;
pub mod prizes;
pub mod reveal;
pub mod selector;
pub mod session;
pub mod types;

pub use error::DrawError;
pub use selector::{draw_winners, shuffle, HashRng, RandomSource};
pub use session::{DrawRequest, DrawSession, SessionSnapshot};
pub use types::{
    DrawRecord, Prize, PrizePatch, PrizeStatus, RedrawHistoryEntry, Winner, WinnerStatus,
};
