//! Integration tests for the lucky draw session contract.
//!
//! These tests drive a whole event through the `instantiate` / `execute` /
//! `query` entry points using `cosmwasm_std::testing` mocks, checking the
//! pool and history invariants after every step.
//!
//! Run:
//! ```bash
//! cargo test -p lucky-draw-integration-tests
//! ```

use std::collections::HashSet;

use cosmwasm_std::testing::{message_info, mock_dependencies, mock_env, MockApi, MockQuerier};
use cosmwasm_std::{from_json, Env, MemoryStorage, OwnedDeps, Timestamp};
use lucky_draw_common::export::ExportFormat;
use lucky_draw_common::{DrawError, DrawRecord, PrizeStatus, WinnerStatus};
use lucky_draw_session::contract::{execute, instantiate, query};
use lucky_draw_session::error::ContractError;
use lucky_draw_session::msg::{
    CandidatesResponse, DrawHistoryResponse, ExecuteMsg, InstantiateMsg, PrizesResponse, QueryMsg,
    SummaryResponse,
};

type Deps = OwnedDeps<MemoryStorage, MockApi, MockQuerier>;

// ─── Constants ───

const GUESTS: &str = "Alice, Bob, Carol, Dave, Eve, Frank, Grace, Heidi, Ivan, Judy";

// ─── Helpers ───

fn setup_session(deps: &mut Deps) {
    let admin = deps.api.addr_make("admin");
    let operator = deps.api.addr_make("host");
    let msg = InstantiateMsg {
        operators: vec![operator.to_string()],
    };
    instantiate(deps.as_mut(), mock_env(), message_info(&admin, &[]), msg).unwrap();
}

fn env_at(offset_secs: u64) -> Env {
    let mut env = mock_env();
    env.block.time = Timestamp::from_seconds(env.block.time.seconds() + offset_secs);
    env.block.height += offset_secs / 5;
    env
}

fn host_exec(deps: &mut Deps, env: Env, msg: ExecuteMsg) -> Result<(), ContractError> {
    let host = deps.api.addr_make("host");
    execute(deps.as_mut(), env, message_info(&host, &[]), msg).map(|_| ())
}

fn draw_msg(count: u32, prize_id: Option<u64>) -> ExecuteMsg {
    ExecuteMsg::PerformDraw {
        count,
        prize_label: None,
        prize_id,
        entropy: None,
    }
}

fn summary(deps: &Deps) -> SummaryResponse {
    let res = query(deps.as_ref(), mock_env(), QueryMsg::Summary {}).unwrap();
    serde_json::from_slice(&res).unwrap()
}

fn roster(deps: &Deps) -> Vec<String> {
    let res: CandidatesResponse =
        from_json(query(deps.as_ref(), mock_env(), QueryMsg::Roster {}).unwrap()).unwrap();
    res.names
}

fn available(deps: &Deps) -> Vec<String> {
    let res: CandidatesResponse =
        from_json(query(deps.as_ref(), mock_env(), QueryMsg::Available {}).unwrap()).unwrap();
    res.names
}

fn history(deps: &Deps) -> Vec<DrawRecord> {
    let res: DrawHistoryResponse = from_json(
        query(
            deps.as_ref(),
            mock_env(),
            QueryMsg::DrawHistory {
                start_after: None,
                limit: Some(100),
            },
        )
        .unwrap(),
    )
    .unwrap();
    res.draws
}

fn get_draw(deps: &Deps, draw_id: u64) -> DrawRecord {
    let res: Option<DrawRecord> =
        from_json(query(deps.as_ref(), mock_env(), QueryMsg::Draw { draw_id }).unwrap()).unwrap();
    res.unwrap()
}

/// The available pool is a subset of the roster, and no active winner of
/// any recorded draw is still available.
fn assert_pool_consistent(deps: &Deps) {
    let roster: HashSet<String> = roster(deps).into_iter().collect();
    let available = available(deps);
    let available_set: HashSet<&String> = available.iter().collect();

    assert_eq!(available.len(), available_set.len(), "duplicates in pool");
    for name in &available {
        assert!(roster.contains(name), "{name} available but not on roster");
    }
    for draw in history(deps) {
        for winner in draw.active_winners() {
            assert!(
                !available_set.contains(&winner.name),
                "{} won draw {} but is still available",
                winner.name,
                draw.id
            );
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[test]
fn test_full_event_cycle() {
    // One evening of draws:
    // 1. Import the guest list and register two prizes
    // 2. Draw each prize, then a free-form draw
    // 3. A winner does not show up and is replaced
    // 4. Undo the replacement and the last draw
    // 5. Export the result

    let mut deps = mock_dependencies();
    setup_session(&mut deps);

    // ── Step 1: Guests and prizes ──
    host_exec(
        &mut deps,
        mock_env(),
        ExecuteMsg::ImportCandidates {
            text: GUESTS.to_string(),
        },
    )
    .unwrap();
    assert_eq!(roster(&deps).len(), 10);

    for (name, count) in [("Bike", 1), ("Headphones", 3)] {
        host_exec(
            &mut deps,
            mock_env(),
            ExecuteMsg::AddPrize {
                name: name.to_string(),
                winner_count: count,
                description: None,
            },
        )
        .unwrap();
    }

    // ── Step 2: Draws ──
    host_exec(&mut deps, env_at(60), draw_msg(1, Some(0))).unwrap();
    host_exec(&mut deps, env_at(120), draw_msg(3, Some(1))).unwrap();
    host_exec(
        &mut deps,
        env_at(180),
        ExecuteMsg::PerformDraw {
            count: 2,
            prize_label: Some("Lucky dip".to_string()),
            prize_id: None,
            entropy: Some("c0ffee".to_string()),
        },
    )
    .unwrap();
    assert_pool_consistent(&deps);

    let s = summary(&deps);
    assert_eq!(s.available_count, 4);
    assert_eq!(s.history_count, 3);
    assert_eq!(s.current_draw_id, Some(2));

    let draws = history(&deps);
    let numbers: Vec<u64> = draws.iter().map(|d| d.draw_number).collect();
    assert_eq!(numbers, vec![1, 2, 3]);
    assert_eq!(draws[0].prize_name, "Bike");
    assert_eq!(draws[1].prize_name, "Headphones");
    assert_eq!(draws[2].prize_name, "Lucky dip");

    // Nobody wins twice across draws
    let mut seen = HashSet::new();
    for draw in &draws {
        for winner in &draw.winners {
            assert!(seen.insert(winner.name.clone()), "{} drawn twice", winner.name);
        }
    }

    let prizes: PrizesResponse =
        from_json(query(deps.as_ref(), mock_env(), QueryMsg::Prizes {}).unwrap()).unwrap();
    assert!(prizes.prizes.iter().all(|p| p.status == PrizeStatus::Drawn));

    // ── Step 3: Forfeit and replace ──
    let no_show = draws[1].winners[2].name.clone();
    host_exec(
        &mut deps,
        env_at(240),
        ExecuteMsg::MarkForfeited {
            draw_id: 1,
            winner_name: no_show.clone(),
            reason: Some("left early".to_string()),
        },
    )
    .unwrap();
    host_exec(
        &mut deps,
        env_at(300),
        ExecuteMsg::RedrawForfeited {
            draw_id: 1,
            reason: Some("left early".to_string()),
            entropy: None,
        },
    )
    .unwrap();
    assert_pool_consistent(&deps);

    let headphones = get_draw(&deps, 1);
    assert_eq!(headphones.active_winners().len(), 3);
    assert_eq!(headphones.winners.len(), 4);
    let forfeited = headphones.winner(&no_show).unwrap();
    assert_eq!(forfeited.status, WinnerStatus::Forfeited);
    assert_eq!(forfeited.reason.as_deref(), Some("left early"));
    assert_eq!(
        forfeited.forfeited_at,
        Some(env_at(240).block.time)
    );
    let replacement = headphones.redraw_history[0].replacement_winner.clone();
    assert!(!seen.contains(&replacement));
    assert_eq!(summary(&deps).available_count, 3);

    // ── Step 4: Undo ──
    host_exec(&mut deps, mock_env(), ExecuteMsg::UndoLastForfeit { draw_id: 1 }).unwrap();
    let headphones = get_draw(&deps, 1);
    assert_eq!(headphones.winners.len(), 3);
    assert!(headphones.winner(&no_show).unwrap().is_won());
    assert!(available(&deps).contains(&replacement));

    host_exec(&mut deps, mock_env(), ExecuteMsg::UndoLastDraw {}).unwrap();
    assert_pool_consistent(&deps);
    let s = summary(&deps);
    assert_eq!(s.available_count, 6);
    assert_eq!(s.history_count, 2);
    assert_eq!(s.next_draw_number, 3);
    assert_eq!(s.current_draw_id, Some(1));

    // ── Step 5: Export ──
    let text: String = from_json(
        query(
            deps.as_ref(),
            mock_env(),
            QueryMsg::ExportDraw {
                draw_id: 1,
                format: ExportFormat::Text,
            },
        )
        .unwrap(),
    )
    .unwrap();
    assert!(text.starts_with("Prize: Headphones\n"));
    assert!(text.contains("Winners (3):"));

    let csv: String =
        from_json(query(deps.as_ref(), mock_env(), QueryMsg::ExportHistory {}).unwrap()).unwrap();
    assert_eq!(csv.lines().count(), 3);
}

#[test]
fn test_same_block_same_winners() {
    // Two independent sessions fed identical messages in identical blocks
    // pick the same winners.
    let run_session = || {
        let mut deps = mock_dependencies();
        setup_session(&mut deps);
        host_exec(
            &mut deps,
            mock_env(),
            ExecuteMsg::ImportCandidates {
                text: GUESTS.to_string(),
            },
        )
        .unwrap();
        host_exec(&mut deps, env_at(10), draw_msg(4, None)).unwrap();
        get_draw(&deps, 0).winner_names()
    };

    let first = run_session();
    assert_eq!(first.len(), 4);
    assert_eq!(first, run_session());
}

#[test]
fn test_redraw_excludes_earlier_winners_after_reset() {
    // After a pool reset the earlier winners are available again, yet a
    // redraw of their own draw must never hand the slot back to them.
    let mut deps = mock_dependencies();
    setup_session(&mut deps);
    host_exec(
        &mut deps,
        mock_env(),
        ExecuteMsg::SetCandidates {
            names: vec!["Ann".into(), "Ben".into(), "Cat".into(), "Dan".into()],
        },
    )
    .unwrap();

    host_exec(&mut deps, mock_env(), draw_msg(3, None)).unwrap();
    host_exec(&mut deps, mock_env(), ExecuteMsg::ResetPool {}).unwrap();
    assert_eq!(available(&deps).len(), 4);

    let winners = get_draw(&deps, 0).winner_names();
    host_exec(
        &mut deps,
        mock_env(),
        ExecuteMsg::MarkForfeited {
            draw_id: 0,
            winner_name: winners[0].clone(),
            reason: None,
        },
    )
    .unwrap();
    host_exec(
        &mut deps,
        env_at(30),
        ExecuteMsg::RedrawForfeited {
            draw_id: 0,
            reason: None,
            entropy: None,
        },
    )
    .unwrap();

    let record = get_draw(&deps, 0);
    let replacement = &record.redraw_history[0].replacement_winner;
    assert!(!winners.contains(replacement));

    // Only one name was never in the draw, so a second forfeit cannot be
    // filled.
    host_exec(
        &mut deps,
        mock_env(),
        ExecuteMsg::MarkForfeited {
            draw_id: 0,
            winner_name: winners[1].clone(),
            reason: None,
        },
    )
    .unwrap();
    let err = host_exec(
        &mut deps,
        env_at(60),
        ExecuteMsg::RedrawForfeited {
            draw_id: 0,
            reason: None,
            entropy: None,
        },
    )
    .unwrap_err();
    assert!(matches!(
        err,
        ContractError::Draw(DrawError::InsufficientCandidates {
            requested: 1,
            available: 0
        })
    ));
}

#[test]
fn test_draw_exhausts_pool_then_roster_change() {
    let mut deps = mock_dependencies();
    setup_session(&mut deps);
    host_exec(
        &mut deps,
        mock_env(),
        ExecuteMsg::ImportCandidates {
            text: "Ann\nBen\nCat".to_string(),
        },
    )
    .unwrap();

    host_exec(&mut deps, mock_env(), draw_msg(3, None)).unwrap();
    assert!(available(&deps).is_empty());

    let err = host_exec(&mut deps, mock_env(), draw_msg(1, None)).unwrap_err();
    assert!(matches!(err, ContractError::Draw(DrawError::EmptyPool)));

    // A new roster keeps the history but clears the current draw
    host_exec(
        &mut deps,
        mock_env(),
        ExecuteMsg::ImportCandidates {
            text: "Zed, Yan".to_string(),
        },
    )
    .unwrap();
    let s = summary(&deps);
    assert_eq!(s.available_count, 2);
    assert_eq!(s.history_count, 1);
    assert_eq!(s.current_draw_id, None);

    // Undoing the old draw only restores names that are on the roster now
    host_exec(&mut deps, mock_env(), ExecuteMsg::UndoLastDraw {}).unwrap();
    assert_eq!(available(&deps), vec!["Zed", "Yan"]);
    assert_pool_consistent(&deps);
}

#[test]
fn test_clear_history_frees_prizes() {
    let mut deps = mock_dependencies();
    setup_session(&mut deps);
    host_exec(
        &mut deps,
        mock_env(),
        ExecuteMsg::ImportCandidates {
            text: GUESTS.to_string(),
        },
    )
    .unwrap();
    host_exec(
        &mut deps,
        mock_env(),
        ExecuteMsg::AddPrize {
            name: "Bike".to_string(),
            winner_count: 1,
            description: Some("Blue".to_string()),
        },
    )
    .unwrap();
    host_exec(&mut deps, mock_env(), draw_msg(1, Some(0))).unwrap();

    host_exec(&mut deps, mock_env(), ExecuteMsg::ClearAll {}).unwrap();
    let s = summary(&deps);
    assert_eq!(s.candidate_count, 0);
    assert_eq!(s.history_count, 0);

    // Prizes survive a full clear and can be drawn again
    let prizes: PrizesResponse =
        from_json(query(deps.as_ref(), mock_env(), QueryMsg::Prizes {}).unwrap()).unwrap();
    assert_eq!(prizes.prizes.len(), 1);
    assert_eq!(prizes.prizes[0].status, PrizeStatus::Active);

    // Draw ids keep counting after a clear, draw numbers start over
    host_exec(
        &mut deps,
        mock_env(),
        ExecuteMsg::ImportCandidates {
            text: GUESTS.to_string(),
        },
    )
    .unwrap();
    host_exec(&mut deps, mock_env(), draw_msg(1, Some(0))).unwrap();
    let draws = history(&deps);
    assert_eq!(draws.len(), 1);
    assert_eq!(draws[0].id, 1);
    assert_eq!(draws[0].draw_number, 1);
}
