use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Addr, StdResult, Storage};
use cw_storage_plus::Item;
use lucky_draw_common::{DrawRecord, DrawSession, Prize, SessionSnapshot};

pub const CONFIG: Item<SessionConfig> = Item::new("config");

/// Full roster as loaded
pub const CANDIDATES: Item<Vec<String>> = Item::new("candidates");
/// Roster members not yet drawn
pub const AVAILABLE: Item<Vec<String>> = Item::new("available");
pub const PRIZES: Item<Vec<Prize>> = Item::new("prizes");
pub const HISTORY: Item<Vec<DrawRecord>> = Item::new("history");
pub const SESSION_STATE: Item<SessionState> = Item::new("session_state");

#[cw_serde]
pub struct SessionConfig {
    pub admin: Addr,
    /// Addresses allowed to run the session besides the admin
    pub operators: Vec<Addr>,
}

impl SessionConfig {
    pub fn can_operate(&self, sender: &Addr) -> bool {
        *sender == self.admin || self.operators.contains(sender)
    }
}

/// Counters and pointers that are not derivable from the other slots.
#[cw_serde]
#[derive(Default)]
pub struct SessionState {
    pub next_draw_id: u64,
    pub next_prize_id: u64,
    pub current_draw: Option<u64>,
}

/// Rebuild the session from storage. Missing slots load as empty.
pub fn load_session(storage: &dyn Storage) -> StdResult<DrawSession> {
    let state = SESSION_STATE.may_load(storage)?.unwrap_or_default();

    Ok(DrawSession::restore(SessionSnapshot {
        roster: CANDIDATES.may_load(storage)?.unwrap_or_default(),
        available: AVAILABLE.may_load(storage)?.unwrap_or_default(),
        prizes: PRIZES.may_load(storage)?.unwrap_or_default(),
        history: HISTORY.may_load(storage)?.unwrap_or_default(),
        current_draw: state.current_draw,
        next_draw_id: state.next_draw_id,
        next_prize_id: state.next_prize_id,
    }))
}

/// Write every slot of the session back.
pub fn save_session(storage: &mut dyn Storage, session: &DrawSession) -> StdResult<()> {
    let SessionSnapshot {
        roster,
        available,
        prizes,
        history,
        current_draw,
        next_draw_id,
        next_prize_id,
    } = session.snapshot();

    CANDIDATES.save(storage, &roster)?;
    AVAILABLE.save(storage, &available)?;
    PRIZES.save(storage, &prizes)?;
    HISTORY.save(storage, &history)?;
    SESSION_STATE.save(
        storage,
        &SessionState {
            next_draw_id,
            next_prize_id,
            current_draw,
        },
    )
}
