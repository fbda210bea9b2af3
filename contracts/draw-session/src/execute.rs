use cosmwasm_std::{Deps, DepsMut, Env, Event, MessageInfo, Response};
use lucky_draw_common::candidates::parse_manual_input;
use lucky_draw_common::{DrawRequest, HashRng, PrizePatch};

use crate::error::ContractError;
use crate::msg::{PerformDrawParams, RedrawParams};
use crate::state::{load_session, save_session, SessionConfig, CONFIG};

/// Only the admin or a listed operator may change the session.
fn ensure_operator(deps: Deps, info: &MessageInfo) -> Result<SessionConfig, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    if !config.can_operate(&info.sender) {
        return Err(ContractError::Unauthorized {
            reason: "only admin or operators can run the session".to_string(),
        });
    }
    Ok(config)
}

/// Seed a generator from the block, the transaction and optional caller
/// entropy.
fn session_rng(
    env: &Env,
    domain: &str,
    nonces: &[u64],
    entropy_hex: Option<String>,
) -> Result<HashRng, ContractError> {
    let entropy = match entropy_hex {
        Some(h) => hex::decode(&h).map_err(|_| ContractError::InvalidHex {
            field: "entropy".to_string(),
        })?,
        None => Vec::new(),
    };

    let height = env.block.height.to_be_bytes();
    let time = env.block.time.nanos().to_be_bytes();
    let tx_index = env
        .transaction
        .as_ref()
        .map(|tx| tx.index)
        .unwrap_or(0)
        .to_be_bytes();
    let nonces: Vec<[u8; 8]> = nonces.iter().map(|n| n.to_be_bytes()).collect();

    let mut parts: Vec<&[u8]> = vec![
        domain.as_bytes(),
        height.as_slice(),
        time.as_slice(),
        tx_index.as_slice(),
    ];
    parts.extend(nonces.iter().map(|n| n.as_slice()));
    parts.push(entropy.as_slice());
    Ok(HashRng::from_entropy(&parts))
}

fn names_attr(names: &[String]) -> String {
    names.join(",")
}

pub fn set_candidates(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    names: Vec<String>,
) -> Result<Response, ContractError> {
    ensure_operator(deps.as_ref(), &info)?;

    let mut session = load_session(deps.storage)?;
    session.set_candidates(names)?;
    save_session(deps.storage, &session)?;

    let count = session.candidate_count();
    Ok(Response::new()
        .add_attribute("action", "set_candidates")
        .add_attribute("candidate_count", count.to_string())
        .add_event(
            Event::new("lucky_candidates_set")
                .add_attribute("candidate_count", count.to_string())
                .add_attribute("history_count", session.history_count().to_string()),
        ))
}

pub fn import_candidates(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    text: String,
) -> Result<Response, ContractError> {
    set_candidates(deps, env, info, parse_manual_input(&text))
}

pub fn reset_pool(deps: DepsMut, _env: Env, info: MessageInfo) -> Result<Response, ContractError> {
    ensure_operator(deps.as_ref(), &info)?;

    let mut session = load_session(deps.storage)?;
    session.reset_pool();
    save_session(deps.storage, &session)?;

    Ok(Response::new()
        .add_attribute("action", "reset_pool")
        .add_event(
            Event::new("lucky_pool_reset")
                .add_attribute("available_count", session.available_count().to_string()),
        ))
}

pub fn clear_all(deps: DepsMut, _env: Env, info: MessageInfo) -> Result<Response, ContractError> {
    ensure_operator(deps.as_ref(), &info)?;

    let mut session = load_session(deps.storage)?;
    let cleared = session.history_count();
    session.clear_all();
    save_session(deps.storage, &session)?;

    Ok(Response::new()
        .add_attribute("action", "clear_all")
        .add_event(
            Event::new("lucky_session_cleared")
                .add_attribute("draws_removed", cleared.to_string()),
        ))
}

pub fn clear_history(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
) -> Result<Response, ContractError> {
    ensure_operator(deps.as_ref(), &info)?;

    let mut session = load_session(deps.storage)?;
    let cleared = session.history_count();
    session.clear_history();
    save_session(deps.storage, &session)?;

    Ok(Response::new()
        .add_attribute("action", "clear_history")
        .add_event(
            Event::new("lucky_history_cleared")
                .add_attribute("draws_removed", cleared.to_string()),
        ))
}

pub fn add_prize(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    name: String,
    winner_count: u32,
    description: Option<String>,
) -> Result<Response, ContractError> {
    ensure_operator(deps.as_ref(), &info)?;

    let mut session = load_session(deps.storage)?;
    let prize_id = session.add_prize(&name, winner_count, description, env.block.time)?;
    save_session(deps.storage, &session)?;

    Ok(Response::new()
        .add_attribute("action", "add_prize")
        .add_attribute("prize_id", prize_id.to_string())
        .add_event(
            Event::new("lucky_prize_added")
                .add_attribute("prize_id", prize_id.to_string())
                .add_attribute("name", name.trim())
                .add_attribute("winner_count", winner_count.to_string()),
        ))
}

pub fn update_prize(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    prize_id: u64,
    patch: PrizePatch,
) -> Result<Response, ContractError> {
    ensure_operator(deps.as_ref(), &info)?;

    let mut session = load_session(deps.storage)?;
    let prize = session.update_prize(prize_id, patch)?.clone();
    save_session(deps.storage, &session)?;

    Ok(Response::new()
        .add_attribute("action", "update_prize")
        .add_attribute("prize_id", prize_id.to_string())
        .add_event(
            Event::new("lucky_prize_updated")
                .add_attribute("prize_id", prize_id.to_string())
                .add_attribute("name", prize.name)
                .add_attribute("winner_count", prize.winner_count.to_string()),
        ))
}

pub fn delete_prize(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    prize_id: u64,
) -> Result<Response, ContractError> {
    ensure_operator(deps.as_ref(), &info)?;

    let mut session = load_session(deps.storage)?;
    let removed = session.delete_prize(prize_id)?;
    save_session(deps.storage, &session)?;

    Ok(Response::new()
        .add_attribute("action", "delete_prize")
        .add_attribute("prize_id", prize_id.to_string())
        .add_event(
            Event::new("lucky_prize_deleted")
                .add_attribute("prize_id", prize_id.to_string())
                .add_attribute("name", removed.name),
        ))
}

/// Draw winners from the available pool.
///
/// 1. Load the session and seed a generator for the upcoming draw id
/// 2. Select winners, flip the prize to drawn, shrink the pool
/// 3. Persist every slot and report the winners
pub fn perform_draw(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    params: PerformDrawParams,
) -> Result<Response, ContractError> {
    let PerformDrawParams {
        count,
        prize_label,
        prize_id,
        entropy,
    } = params;

    ensure_operator(deps.as_ref(), &info)?;

    let mut session = load_session(deps.storage)?;
    let mut rng = session_rng(&env, "perform_draw", &[session.next_draw_id()], entropy)?;
    let seed_hex = hex::encode(rng.seed());

    let draw = session.perform_draw(
        DrawRequest {
            count,
            prize_label: prize_label.unwrap_or_default(),
            prize_id,
        },
        env.block.time,
        &mut rng,
    )?;
    save_session(deps.storage, &session)?;

    let mut event = Event::new("lucky_draw_performed")
        .add_attribute("draw_id", draw.id.to_string())
        .add_attribute("draw_number", draw.draw_number.to_string())
        .add_attribute("winner_count", draw.winners.len().to_string())
        .add_attribute("winners", names_attr(&draw.winner_names()))
        .add_attribute("available_count", session.available_count().to_string())
        .add_attribute("seed", seed_hex)
        .add_attribute("timestamp", env.block.time.seconds().to_string());
    if !draw.prize_name.is_empty() {
        event = event.add_attribute("prize_name", draw.prize_name.clone());
    }
    if let Some(prize_id) = draw.prize_id {
        event = event.add_attribute("prize_id", prize_id.to_string());
    }

    Ok(Response::new()
        .add_attribute("action", "perform_draw")
        .add_attribute("draw_id", draw.id.to_string())
        .add_event(event))
}

pub fn undo_last_draw(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
) -> Result<Response, ContractError> {
    ensure_operator(deps.as_ref(), &info)?;

    let mut session = load_session(deps.storage)?;
    let undone = session.undo_last_draw()?;
    save_session(deps.storage, &session)?;

    Ok(Response::new()
        .add_attribute("action", "undo_last_draw")
        .add_attribute("draw_id", undone.id.to_string())
        .add_event(
            Event::new("lucky_draw_undone")
                .add_attribute("draw_id", undone.id.to_string())
                .add_attribute("draw_number", undone.draw_number.to_string())
                .add_attribute("restored", names_attr(&undone.winner_names()))
                .add_attribute("available_count", session.available_count().to_string()),
        ))
}

pub fn mark_forfeited(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    draw_id: u64,
    winner_name: String,
    reason: Option<String>,
) -> Result<Response, ContractError> {
    ensure_operator(deps.as_ref(), &info)?;

    let mut session = load_session(deps.storage)?;
    let changed =
        session.mark_winner_as_forfeited(draw_id, &winner_name, reason, env.block.time)?;
    if changed {
        save_session(deps.storage, &session)?;
    }

    Ok(Response::new()
        .add_attribute("action", "mark_forfeited")
        .add_attribute("draw_id", draw_id.to_string())
        .add_attribute("changed", changed.to_string())
        .add_event(
            Event::new("lucky_winner_forfeited")
                .add_attribute("draw_id", draw_id.to_string())
                .add_attribute("winner", winner_name)
                .add_attribute("changed", changed.to_string())
                .add_attribute("timestamp", env.block.time.seconds().to_string()),
        ))
}

pub fn redraw_forfeited(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    params: RedrawParams,
) -> Result<Response, ContractError> {
    let RedrawParams {
        draw_id,
        reason,
        entropy,
    } = params;

    ensure_operator(deps.as_ref(), &info)?;

    let mut session = load_session(deps.storage)?;
    // Rounds only grow, so a redraw after an undo gets a fresh seed
    let round = session.draw(draw_id).map_or(0, |d| d.redraw_rounds);
    let mut rng = session_rng(&env, "redraw_forfeited", &[draw_id, round], entropy)?;
    let seed_hex = hex::encode(rng.seed());

    let entries = session.redraw_forfeited_slots(draw_id, reason, env.block.time, &mut rng)?;
    save_session(deps.storage, &session)?;

    let forfeited: Vec<String> = entries.iter().map(|e| e.forfeited_winner.clone()).collect();
    let replacements: Vec<String> = entries
        .iter()
        .map(|e| e.replacement_winner.clone())
        .collect();

    Ok(Response::new()
        .add_attribute("action", "redraw_forfeited")
        .add_attribute("draw_id", draw_id.to_string())
        .add_event(
            Event::new("lucky_redraw_completed")
                .add_attribute("draw_id", draw_id.to_string())
                .add_attribute("round", round.to_string())
                .add_attribute("forfeited", names_attr(&forfeited))
                .add_attribute("replacements", names_attr(&replacements))
                .add_attribute("seed", seed_hex)
                .add_attribute("timestamp", env.block.time.seconds().to_string()),
        ))
}

pub fn undo_last_forfeit(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    draw_id: u64,
) -> Result<Response, ContractError> {
    ensure_operator(deps.as_ref(), &info)?;

    let mut session = load_session(deps.storage)?;
    let entry = session.undo_last_forfeit(draw_id)?;
    save_session(deps.storage, &session)?;

    Ok(Response::new()
        .add_attribute("action", "undo_last_forfeit")
        .add_attribute("draw_id", draw_id.to_string())
        .add_event(
            Event::new("lucky_forfeit_undone")
                .add_attribute("draw_id", draw_id.to_string())
                .add_attribute("reinstated", entry.forfeited_winner)
                .add_attribute("returned_to_pool", entry.replacement_winner),
        ))
}

/// Update the operator list. Admin only.
pub fn update_operators(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    add: Vec<String>,
    remove: Vec<String>,
) -> Result<Response, ContractError> {
    let mut config = CONFIG.load(deps.storage)?;

    if info.sender != config.admin {
        return Err(ContractError::Unauthorized {
            reason: "only admin can update operators".to_string(),
        });
    }

    for addr_str in &remove {
        let addr = deps.api.addr_validate(addr_str)?;
        config.operators.retain(|a| *a != addr);
    }

    for addr_str in &add {
        let addr = deps.api.addr_validate(addr_str)?;
        if !config.operators.contains(&addr) {
            config.operators.push(addr);
        }
    }

    CONFIG.save(deps.storage, &config)?;

    Ok(Response::new()
        .add_attribute("action", "update_operators")
        .add_attribute("operator_count", config.operators.len().to_string()))
}
