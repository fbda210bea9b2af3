use cosmwasm_schema::{cw_serde, QueryResponses};
use lucky_draw_common::export::ExportFormat;
use lucky_draw_common::{DrawRecord, Prize};

use crate::state::SessionConfig;

#[cw_serde]
pub struct InstantiateMsg {
    /// Addresses allowed to run the session alongside the admin
    pub operators: Vec<String>,
}

#[cw_serde]
pub enum ExecuteMsg {
    /// Replace the roster with an already split list of names.
    SetCandidates { names: Vec<String> },
    /// Replace the roster from free text (comma or newline separated).
    ImportCandidates { text: String },
    /// Make the whole roster available again. History is kept.
    ResetPool {},
    /// Empty roster, pool and history.
    ClearAll {},
    /// Empty the history only.
    ClearHistory {},
    AddPrize {
        name: String,
        winner_count: u32,
        description: Option<String>,
    },
    UpdatePrize {
        prize_id: u64,
        name: Option<String>,
        winner_count: Option<u32>,
        description: Option<String>,
    },
    /// Only prizes that have not been drawn can be deleted.
    DeletePrize { prize_id: u64 },
    PerformDraw {
        count: u32,
        prize_label: Option<String>,
        prize_id: Option<u64>,
        /// Optional caller entropy, hex-encoded, mixed into the draw seed
        entropy: Option<String>,
    },
    UndoLastDraw {},
    MarkForfeited {
        draw_id: u64,
        winner_name: String,
        reason: Option<String>,
    },
    RedrawForfeited {
        draw_id: u64,
        reason: Option<String>,
        entropy: Option<String>,
    },
    UndoLastForfeit { draw_id: u64 },
    /// Update operator list (admin only).
    UpdateOperators { add: Vec<String>, remove: Vec<String> },
}

/// Unpacked `ExecuteMsg::PerformDraw`.
pub struct PerformDrawParams {
    pub count: u32,
    pub prize_label: Option<String>,
    pub prize_id: Option<u64>,
    pub entropy: Option<String>,
}

/// Unpacked `ExecuteMsg::RedrawForfeited`.
pub struct RedrawParams {
    pub draw_id: u64,
    pub reason: Option<String>,
    pub entropy: Option<String>,
}

#[cw_serde]
pub struct MigrateMsg {}

#[cw_serde]
#[derive(QueryResponses)]
pub enum QueryMsg {
    #[returns(SessionConfig)]
    Config {},
    #[returns(SummaryResponse)]
    Summary {},
    #[returns(CandidatesResponse)]
    Roster {},
    #[returns(CandidatesResponse)]
    Available {},
    #[returns(Option<DrawRecord>)]
    CurrentDraw {},
    #[returns(Option<DrawRecord>)]
    Draw { draw_id: u64 },
    #[returns(DrawHistoryResponse)]
    DrawHistory {
        start_after: Option<u64>,
        limit: Option<u32>,
    },
    #[returns(PrizesResponse)]
    Prizes {},
    #[returns(Option<Prize>)]
    Prize { prize_id: u64 },
    #[returns(String)]
    ExportDraw { draw_id: u64, format: ExportFormat },
    #[returns(String)]
    ExportHistory {},
}

#[cw_serde]
pub struct SummaryResponse {
    pub candidate_count: u64,
    pub available_count: u64,
    pub history_count: u64,
    pub next_draw_number: u64,
    pub current_draw_id: Option<u64>,
}

#[cw_serde]
pub struct CandidatesResponse {
    pub names: Vec<String>,
}

#[cw_serde]
pub struct DrawHistoryResponse {
    pub draws: Vec<DrawRecord>,
}

#[cw_serde]
pub struct PrizesResponse {
    pub prizes: Vec<Prize>,
}
