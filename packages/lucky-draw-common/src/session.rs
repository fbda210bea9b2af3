use std::collections::HashSet;

use cosmwasm_schema::cw_serde;
use cosmwasm_std::Timestamp;

use crate::candidates::normalize_candidates;
use crate::error::DrawError;
use crate::pool::CandidatePool;
use crate::prizes::PrizeRegistry;
use crate::selector::{draw_winners, RandomSource};
use crate::types::{
    DrawRecord, Prize, PrizePatch, PrizeStatus, RedrawHistoryEntry, Winner, WinnerStatus,
};

/// Parameters for a single draw.
#[cw_serde]
pub struct DrawRequest {
    pub count: u32,
    /// Free-form label; falls back to the prize name when empty
    pub prize_label: String,
    pub prize_id: Option<u64>,
}

/// Everything needed to rebuild a session from storage.
#[cw_serde]
#[derive(Default)]
pub struct SessionSnapshot {
    pub roster: Vec<String>,
    pub available: Vec<String>,
    pub prizes: Vec<Prize>,
    pub history: Vec<DrawRecord>,
    pub current_draw: Option<u64>,
    pub next_draw_id: u64,
    pub next_prize_id: u64,
}

/// The draw lifecycle engine.
///
/// Owns the candidate pool, the prize registry and the draw history, and
/// exposes every mutation as a method. Each method checks all of its
/// preconditions before touching any field, so an `Err` always leaves the
/// session unchanged.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawSession {
    pool: CandidatePool,
    prizes: PrizeRegistry,
    history: Vec<DrawRecord>,
    current_draw: Option<u64>,
    next_draw_id: u64,
    next_draw_number: u64,
}

impl Default for DrawSession {
    fn default() -> Self {
        Self::new()
    }
}

impl DrawSession {
    pub fn new() -> Self {
        Self {
            pool: CandidatePool::default(),
            prizes: PrizeRegistry::default(),
            history: Vec::new(),
            current_draw: None,
            next_draw_id: 0,
            next_draw_number: 1,
        }
    }

    /// Rebuild a session from persisted state.
    ///
    /// The next draw number is derived from the history, not stored.
    pub fn restore(snapshot: SessionSnapshot) -> Self {
        let SessionSnapshot {
            roster,
            available,
            prizes,
            history,
            current_draw,
            next_draw_id,
            next_prize_id,
        } = snapshot;

        let next_draw_number = history
            .iter()
            .map(|d| d.draw_number)
            .max()
            .map_or(1, |n| n + 1);
        let id_floor = history.iter().map(|d| d.id + 1).max().unwrap_or(0);
        let current_draw = current_draw.filter(|id| history.iter().any(|d| d.id == *id));

        Self {
            pool: CandidatePool::from_parts(roster, available),
            prizes: PrizeRegistry::from_parts(prizes, next_prize_id),
            history,
            current_draw,
            next_draw_id: next_draw_id.max(id_floor),
            next_draw_number,
        }
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            roster: self.pool.roster().to_vec(),
            available: self.pool.available().to_vec(),
            prizes: self.prizes.prizes().to_vec(),
            history: self.history.clone(),
            current_draw: self.current_draw,
            next_draw_id: self.next_draw_id,
            next_prize_id: self.prizes.next_prize_id(),
        }
    }

    // ── Read model ──

    pub fn pool(&self) -> &CandidatePool {
        &self.pool
    }

    pub fn prizes(&self) -> &PrizeRegistry {
        &self.prizes
    }

    pub fn history(&self) -> &[DrawRecord] {
        &self.history
    }

    pub fn draw(&self, draw_id: u64) -> Option<&DrawRecord> {
        self.history.iter().find(|d| d.id == draw_id)
    }

    pub fn current_draw(&self) -> Option<&DrawRecord> {
        self.current_draw.and_then(|id| self.draw(id))
    }

    pub fn current_draw_id(&self) -> Option<u64> {
        self.current_draw
    }

    pub fn next_draw_number(&self) -> u64 {
        self.next_draw_number
    }

    /// Id the next successful draw will receive. Ids are never reused.
    pub fn next_draw_id(&self) -> u64 {
        self.next_draw_id
    }

    pub fn candidate_count(&self) -> usize {
        self.pool.candidate_count()
    }

    pub fn available_count(&self) -> usize {
        self.pool.available_count()
    }

    pub fn history_count(&self) -> usize {
        self.history.len()
    }

    // ── Candidate pool ──

    /// Replace the roster. The current draw is dropped; history is kept.
    ///
    /// A list with no usable name is rejected and the pool stays as it was.
    pub fn set_candidates(&mut self, names: Vec<String>) -> Result<(), DrawError> {
        let names = normalize_candidates(names);
        if names.is_empty() {
            return Err(DrawError::NoCandidates);
        }
        self.pool.set_candidates(names);
        self.current_draw = None;
        Ok(())
    }

    /// Make the whole roster available again. History is kept.
    pub fn reset_pool(&mut self) {
        self.pool.reset();
        self.current_draw = None;
    }

    pub fn clear_all(&mut self) {
        self.pool.clear();
        self.clear_history();
    }

    /// Drop every draw record. Prizes consumed by those draws become
    /// active again.
    pub fn clear_history(&mut self) {
        for prize_id in self.history.iter().filter_map(|d| d.prize_id) {
            self.prizes.set_status(prize_id, PrizeStatus::Active);
        }
        self.history.clear();
        self.current_draw = None;
        self.next_draw_number = 1;
    }

    // ── Prize registry ──

    pub fn add_prize(
        &mut self,
        name: &str,
        winner_count: u32,
        description: Option<String>,
        now: Timestamp,
    ) -> Result<u64, DrawError> {
        self.prizes.add_prize(name, winner_count, description, now)
    }

    pub fn update_prize(&mut self, prize_id: u64, patch: PrizePatch) -> Result<&Prize, DrawError> {
        self.prizes.update_prize(prize_id, patch)
    }

    pub fn delete_prize(&mut self, prize_id: u64) -> Result<Prize, DrawError> {
        self.prizes.delete_prize(prize_id)
    }

    // ── Draw lifecycle ──

    pub fn perform_draw<R: RandomSource + ?Sized>(
        &mut self,
        request: DrawRequest,
        now: Timestamp,
        rng: &mut R,
    ) -> Result<DrawRecord, DrawError> {
        let available = self.pool.available_count();
        if available == 0 {
            return Err(DrawError::EmptyPool);
        }

        let count = request.count as usize;
        if count == 0 {
            return Err(DrawError::InvalidDrawSize {
                requested: 0,
                available,
            });
        }
        if count > available {
            return Err(DrawError::InsufficientCandidates {
                requested: count,
                available,
            });
        }

        let prize_name = match request.prize_id {
            Some(prize_id) => {
                let prize = self
                    .prizes
                    .get(prize_id)
                    .ok_or(DrawError::PrizeNotFound { prize_id })?;
                if prize.status == PrizeStatus::Drawn {
                    return Err(DrawError::PrizeAlreadyDrawn { prize_id });
                }
                label_or(&request.prize_label, &prize.name)
            }
            None => label_or(&request.prize_label, ""),
        };

        let selected = draw_winners(self.pool.available(), count, rng)?;

        let record = DrawRecord {
            id: self.next_draw_id,
            prize_id: request.prize_id,
            prize_name,
            expected_count: request.count,
            winners: selected.iter().map(|name| Winner::won(name.clone())).collect(),
            timestamp: now,
            draw_number: self.next_draw_number,
            redraw_history: Vec::new(),
            redraw_rounds: 0,
        };

        self.pool.remove(&selected);
        if let Some(prize_id) = request.prize_id {
            self.prizes.set_status(prize_id, PrizeStatus::Drawn);
        }
        self.next_draw_id += 1;
        self.next_draw_number += 1;
        self.current_draw = Some(record.id);
        self.history.push(record.clone());

        Ok(record)
    }

    /// Discard the most recent draw and give its names back to the pool.
    ///
    /// Works at record granularity: forfeits and redraws inside the record
    /// are discarded with it, and every name that appears in it (winner,
    /// forfeited or replacement) is restored.
    pub fn undo_last_draw(&mut self) -> Result<DrawRecord, DrawError> {
        let record = self.history.pop().ok_or(DrawError::NoDrawsToUndo)?;

        self.current_draw = self.history.last().map(|d| d.id);
        self.pool.restore(&record.winner_names());
        if let Some(prize_id) = record.prize_id {
            self.prizes.set_status(prize_id, PrizeStatus::Active);
        }
        self.next_draw_number = self.next_draw_number.saturating_sub(1).max(1);

        Ok(record)
    }

    /// Flip a `won` winner to `forfeited`.
    ///
    /// Returns `false` when the name is not currently `won` in that draw;
    /// nothing changes in that case. Forfeited names are not returned to
    /// the pool.
    pub fn mark_winner_as_forfeited(
        &mut self,
        draw_id: u64,
        winner_name: &str,
        reason: Option<String>,
        now: Timestamp,
    ) -> Result<bool, DrawError> {
        let index = self.draw_index(draw_id)?;
        let winner = self.history[index]
            .winners
            .iter_mut()
            .find(|w| w.name == winner_name && w.is_won());

        match winner {
            Some(winner) => {
                winner.status = WinnerStatus::Forfeited;
                winner.forfeited_at = Some(now);
                winner.reason = clean_reason(reason);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Draw one replacement for every forfeited winner not yet replaced.
    ///
    /// Anyone already listed in the draw, or named anywhere in its redraw
    /// history, is excluded. Replacements leave the available pool.
    pub fn redraw_forfeited_slots<R: RandomSource + ?Sized>(
        &mut self,
        draw_id: u64,
        reason: Option<String>,
        now: Timestamp,
        rng: &mut R,
    ) -> Result<Vec<RedrawHistoryEntry>, DrawError> {
        let index = self.draw_index(draw_id)?;

        let (pending, eligible) = {
            let draw = &self.history[index];
            let pending: Vec<String> = draw
                .pending_forfeits()
                .iter()
                .map(|w| w.name.clone())
                .collect();
            if pending.is_empty() {
                return Err(DrawError::NoForfeitsToRedraw { draw_id });
            }

            let mut excluded: HashSet<&str> = draw.winners.iter().map(|w| w.name.as_str()).collect();
            for entry in &draw.redraw_history {
                excluded.insert(entry.forfeited_winner.as_str());
                excluded.insert(entry.replacement_winner.as_str());
            }
            let eligible: Vec<String> = self
                .pool
                .available()
                .iter()
                .filter(|name| !excluded.contains(name.as_str()))
                .cloned()
                .collect();
            (pending, eligible)
        };

        if eligible.len() < pending.len() {
            return Err(DrawError::InsufficientCandidates {
                requested: pending.len(),
                available: eligible.len(),
            });
        }

        let replacements = draw_winners(&eligible, pending.len(), rng)?;
        let reason = clean_reason(reason);
        let entries: Vec<RedrawHistoryEntry> = pending
            .iter()
            .zip(replacements.iter())
            .map(|(forfeited, replacement)| RedrawHistoryEntry {
                forfeited_winner: forfeited.clone(),
                replacement_winner: replacement.clone(),
                timestamp: now,
                reason: reason.clone(),
            })
            .collect();

        let draw = &mut self.history[index];
        for entry in &entries {
            draw.winners.push(Winner::replacement(
                entry.replacement_winner.clone(),
                entry.forfeited_winner.clone(),
            ));
        }
        draw.redraw_history.extend(entries.iter().cloned());
        draw.redraw_rounds += 1;
        self.pool.remove(&replacements);

        Ok(entries)
    }

    /// Reverse the most recent forfeit -> replacement pairing of a draw.
    ///
    /// The replacement leaves the winner list and returns to the pool; the
    /// forfeited winner is reinstated as `won`.
    pub fn undo_last_forfeit(&mut self, draw_id: u64) -> Result<RedrawHistoryEntry, DrawError> {
        let index = self.draw_index(draw_id)?;
        let draw = &mut self.history[index];
        let entry = draw
            .redraw_history
            .pop()
            .ok_or(DrawError::NoForfeitsToUndo { draw_id })?;

        draw.winners.retain(|w| w.name != entry.replacement_winner);
        if let Some(original) = draw
            .winners
            .iter_mut()
            .find(|w| w.name == entry.forfeited_winner)
        {
            original.status = WinnerStatus::Won;
            original.forfeited_at = None;
            original.reason = None;
        }
        self.pool
            .restore(std::slice::from_ref(&entry.replacement_winner));

        Ok(entry)
    }

    fn draw_index(&self, draw_id: u64) -> Result<usize, DrawError> {
        self.history
            .iter()
            .position(|d| d.id == draw_id)
            .ok_or(DrawError::DrawNotFound { draw_id })
    }
}

fn label_or(label: &str, fallback: &str) -> String {
    let label = label.trim();
    if label.is_empty() {
        fallback.to_string()
    } else {
        label.to_string()
    }
}

fn clean_reason(reason: Option<String>) -> Option<String> {
    reason
        .map(|r| r.trim().to_string())
        .filter(|r| !r.is_empty())
}
