use cosmwasm_schema::cw_serde;
use cosmwasm_std::Timestamp;

/// Whether a winner still holds their slot.
#[cw_serde]
pub enum WinnerStatus {
    Won,
    Forfeited,
}

/// Lifecycle status of a registered prize.
#[cw_serde]
pub enum PrizeStatus {
    Active,
    Drawn,
}

/// One entry of a draw's winner list.
///
/// Forfeited winners stay in the list with their status flipped.
#[cw_serde]
pub struct Winner {
    pub name: String,
    pub status: WinnerStatus,
    pub is_replacement: bool,
    /// Name of the forfeited winner this entry replaces
    pub original_winner: Option<String>,
    pub forfeited_at: Option<Timestamp>,
    pub reason: Option<String>,
}

impl Winner {
    pub fn won(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: WinnerStatus::Won,
            is_replacement: false,
            original_winner: None,
            forfeited_at: None,
            reason: None,
        }
    }

    pub fn replacement(name: impl Into<String>, original_winner: impl Into<String>) -> Self {
        Self {
            is_replacement: true,
            original_winner: Some(original_winner.into()),
            ..Self::won(name)
        }
    }

    pub fn is_won(&self) -> bool {
        self.status == WinnerStatus::Won
    }
}

/// One forfeit -> replacement pairing inside a draw.
#[cw_serde]
pub struct RedrawHistoryEntry {
    pub forfeited_winner: String,
    pub replacement_winner: String,
    pub timestamp: Timestamp,
    pub reason: Option<String>,
}

#[cw_serde]
pub struct DrawRecord {
    pub id: u64,
    pub prize_id: Option<u64>,
    pub prize_name: String,
    pub expected_count: u32,
    pub winners: Vec<Winner>,
    pub timestamp: Timestamp,
    /// Session-wide sequence number, reused after an undo
    pub draw_number: u64,
    pub redraw_history: Vec<RedrawHistoryEntry>,
    /// Successful redraws of this draw, undone ones included
    #[serde(default)]
    pub redraw_rounds: u64,
}

impl DrawRecord {
    pub fn winner(&self, name: &str) -> Option<&Winner> {
        self.winners.iter().find(|w| w.name == name)
    }

    /// Winners currently holding a slot, replacements included.
    pub fn active_winners(&self) -> Vec<&Winner> {
        self.winners.iter().filter(|w| w.is_won()).collect()
    }

    /// Forfeited winners that have not been paired with a replacement yet.
    pub fn pending_forfeits(&self) -> Vec<&Winner> {
        self.winners
            .iter()
            .filter(|w| w.status == WinnerStatus::Forfeited)
            .filter(|w| {
                !self
                    .redraw_history
                    .iter()
                    .any(|entry| entry.forfeited_winner == w.name)
            })
            .collect()
    }

    pub fn winner_names(&self) -> Vec<String> {
        self.winners.iter().map(|w| w.name.clone()).collect()
    }
}

#[cw_serde]
pub struct Prize {
    pub id: u64,
    pub name: String,
    pub winner_count: u32,
    pub description: Option<String>,
    pub created_at: Timestamp,
    pub status: PrizeStatus,
}

/// Partial update for a prize. `None` fields are left as they are.
#[cw_serde]
#[derive(Default)]
pub struct PrizePatch {
    pub name: Option<String>,
    pub winner_count: Option<u32>,
    pub description: Option<String>,
}
