use cosmwasm_std::{entry_point, Binary, Deps, DepsMut, Env, MessageInfo, Response, StdResult};
use cw2::{get_contract_version, set_contract_version};
use lucky_draw_common::{DrawSession, PrizePatch};

use crate::error::ContractError;
use crate::execute;
use crate::msg::{ExecuteMsg, InstantiateMsg, MigrateMsg, PerformDrawParams, QueryMsg, RedrawParams};
use crate::query;
use crate::state::{save_session, SessionConfig, CONFIG};

const CONTRACT_NAME: &str = "crates.io:lucky-draw-session";
const CONTRACT_VERSION: &str = env!("CARGO_PKG_VERSION");

#[entry_point]
pub fn instantiate(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    msg: InstantiateMsg,
) -> Result<Response, ContractError> {
    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    let mut operators = Vec::with_capacity(msg.operators.len());
    for op in &msg.operators {
        let addr = deps.api.addr_validate(op)?;
        if !operators.contains(&addr) {
            operators.push(addr);
        }
    }

    let config = SessionConfig {
        admin: info.sender.clone(),
        operators,
    };
    CONFIG.save(deps.storage, &config)?;
    save_session(deps.storage, &DrawSession::new())?;

    Ok(Response::new()
        .add_attribute("action", "instantiate")
        .add_attribute("contract", "lucky-draw-session")
        .add_attribute("admin", info.sender.to_string()))
}

#[entry_point]
pub fn execute(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    msg: ExecuteMsg,
) -> Result<Response, ContractError> {
    match msg {
        ExecuteMsg::SetCandidates { names } => execute::set_candidates(deps, env, info, names),
        ExecuteMsg::ImportCandidates { text } => execute::import_candidates(deps, env, info, text),
        ExecuteMsg::ResetPool {} => execute::reset_pool(deps, env, info),
        ExecuteMsg::ClearAll {} => execute::clear_all(deps, env, info),
        ExecuteMsg::ClearHistory {} => execute::clear_history(deps, env, info),
        ExecuteMsg::AddPrize {
            name,
            winner_count,
            description,
        } => execute::add_prize(deps, env, info, name, winner_count, description),
        ExecuteMsg::UpdatePrize {
            prize_id,
            name,
            winner_count,
            description,
        } => execute::update_prize(
            deps,
            env,
            info,
            prize_id,
            PrizePatch {
                name,
                winner_count,
                description,
            },
        ),
        ExecuteMsg::DeletePrize { prize_id } => execute::delete_prize(deps, env, info, prize_id),
        ExecuteMsg::PerformDraw {
            count,
            prize_label,
            prize_id,
            entropy,
        } => execute::perform_draw(
            deps,
            env,
            info,
            PerformDrawParams {
                count,
                prize_label,
                prize_id,
                entropy,
            },
        ),
        ExecuteMsg::UndoLastDraw {} => execute::undo_last_draw(deps, env, info),
        ExecuteMsg::MarkForfeited {
            draw_id,
            winner_name,
            reason,
        } => execute::mark_forfeited(deps, env, info, draw_id, winner_name, reason),
        ExecuteMsg::RedrawForfeited {
            draw_id,
            reason,
            entropy,
        } => execute::redraw_forfeited(
            deps,
            env,
            info,
            RedrawParams {
                draw_id,
                reason,
                entropy,
            },
        ),
        ExecuteMsg::UndoLastForfeit { draw_id } => {
            execute::undo_last_forfeit(deps, env, info, draw_id)
        }
        ExecuteMsg::UpdateOperators { add, remove } => {
            execute::update_operators(deps, env, info, add, remove)
        }
    }
}

#[entry_point]
pub fn query(deps: Deps, _env: Env, msg: QueryMsg) -> StdResult<Binary> {
    match msg {
        QueryMsg::Config {} => query::query_config(deps),
        QueryMsg::Summary {} => query::query_summary(deps),
        QueryMsg::Roster {} => query::query_roster(deps),
        QueryMsg::Available {} => query::query_available(deps),
        QueryMsg::CurrentDraw {} => query::query_current_draw(deps),
        QueryMsg::Draw { draw_id } => query::query_draw(deps, draw_id),
        QueryMsg::DrawHistory { start_after, limit } => {
            query::query_draw_history(deps, start_after, limit)
        }
        QueryMsg::Prizes {} => query::query_prizes(deps),
        QueryMsg::Prize { prize_id } => query::query_prize(deps, prize_id),
        QueryMsg::ExportDraw { draw_id, format } => {
            query::query_export_draw(deps, draw_id, format)
        }
        QueryMsg::ExportHistory {} => query::query_export_history(deps),
    }
}

#[entry_point]
pub fn migrate(deps: DepsMut, _env: Env, _msg: MigrateMsg) -> Result<Response, ContractError> {
    let stored = get_contract_version(deps.storage)?;
    if stored.contract != CONTRACT_NAME {
        return Err(ContractError::Unauthorized {
            reason: "Cannot migrate from different contract type".to_string(),
        });
    }

    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    Ok(Response::new()
        .add_attribute("action", "migrate")
        .add_attribute("from_version", stored.version)
        .add_attribute("to_version", CONTRACT_VERSION))
}
