use cosmwasm_std::{to_json_binary, Binary, Deps, StdError, StdResult};
use lucky_draw_common::export::{export_draw, history_to_csv, ExportFormat};

use crate::msg::{CandidatesResponse, DrawHistoryResponse, PrizesResponse, SummaryResponse};
use crate::state::{load_session, AVAILABLE, CANDIDATES, CONFIG, HISTORY, PRIZES};

pub fn query_config(deps: Deps) -> StdResult<Binary> {
    let config = CONFIG.load(deps.storage)?;
    to_json_binary(&config)
}

pub fn query_summary(deps: Deps) -> StdResult<Binary> {
    let session = load_session(deps.storage)?;
    to_json_binary(&SummaryResponse {
        candidate_count: session.candidate_count() as u64,
        available_count: session.available_count() as u64,
        history_count: session.history_count() as u64,
        next_draw_number: session.next_draw_number(),
        current_draw_id: session.current_draw_id(),
    })
}

pub fn query_roster(deps: Deps) -> StdResult<Binary> {
    let names = CANDIDATES.may_load(deps.storage)?.unwrap_or_default();
    to_json_binary(&CandidatesResponse { names })
}

pub fn query_available(deps: Deps) -> StdResult<Binary> {
    let names = AVAILABLE.may_load(deps.storage)?.unwrap_or_default();
    to_json_binary(&CandidatesResponse { names })
}

pub fn query_current_draw(deps: Deps) -> StdResult<Binary> {
    let session = load_session(deps.storage)?;
    to_json_binary(&session.current_draw())
}

pub fn query_draw(deps: Deps, draw_id: u64) -> StdResult<Binary> {
    let history = HISTORY.may_load(deps.storage)?.unwrap_or_default();
    let draw = history.into_iter().find(|d| d.id == draw_id);
    to_json_binary(&draw)
}

/// Draws in history order, paged by draw id.
pub fn query_draw_history(
    deps: Deps,
    start_after: Option<u64>,
    limit: Option<u32>,
) -> StdResult<Binary> {
    let limit = limit.unwrap_or(20).min(100) as usize;
    let history = HISTORY.may_load(deps.storage)?.unwrap_or_default();

    let draws: Vec<_> = history
        .into_iter()
        .filter(|d| start_after.map_or(true, |after| d.id > after))
        .take(limit)
        .collect();

    to_json_binary(&DrawHistoryResponse { draws })
}

pub fn query_prizes(deps: Deps) -> StdResult<Binary> {
    let prizes = PRIZES.may_load(deps.storage)?.unwrap_or_default();
    to_json_binary(&PrizesResponse { prizes })
}

pub fn query_prize(deps: Deps, prize_id: u64) -> StdResult<Binary> {
    let prizes = PRIZES.may_load(deps.storage)?.unwrap_or_default();
    to_json_binary(&prizes.into_iter().find(|p| p.id == prize_id))
}

pub fn query_export_draw(deps: Deps, draw_id: u64, format: ExportFormat) -> StdResult<Binary> {
    let history = HISTORY.may_load(deps.storage)?.unwrap_or_default();
    let draw = history
        .iter()
        .find(|d| d.id == draw_id)
        .ok_or_else(|| StdError::generic_err(format!("draw {draw_id} not found")))?;
    to_json_binary(&export_draw(draw, &format))
}

pub fn query_export_history(deps: Deps) -> StdResult<Binary> {
    let history = HISTORY.may_load(deps.storage)?.unwrap_or_default();
    to_json_binary(&history_to_csv(&history))
}
