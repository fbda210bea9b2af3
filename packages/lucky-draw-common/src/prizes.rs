use cosmwasm_std::Timestamp;

use crate::error::DrawError;
use crate::types::{Prize, PrizePatch, PrizeStatus};

/// Named prizes that can pre-fill draw parameters.
///
/// Status flips between `Active` and `Drawn` are driven by the draw engine
/// only; the public API here never changes a prize's status.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PrizeRegistry {
    prizes: Vec<Prize>,
    next_prize_id: u64,
}

impl PrizeRegistry {
    pub fn from_parts(prizes: Vec<Prize>, next_prize_id: u64) -> Self {
        // Never hand out an id that is already taken
        let floor = prizes.iter().map(|p| p.id + 1).max().unwrap_or(0);
        Self {
            prizes,
            next_prize_id: next_prize_id.max(floor),
        }
    }

    pub fn prizes(&self) -> &[Prize] {
        &self.prizes
    }

    pub fn next_prize_id(&self) -> u64 {
        self.next_prize_id
    }

    pub fn get(&self, prize_id: u64) -> Option<&Prize> {
        self.prizes.iter().find(|p| p.id == prize_id)
    }

    pub fn add_prize(
        &mut self,
        name: &str,
        winner_count: u32,
        description: Option<String>,
        now: Timestamp,
    ) -> Result<u64, DrawError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DrawError::EmptyPrizeName);
        }
        if winner_count < 1 {
            return Err(DrawError::InvalidWinnerCount {
                count: winner_count,
            });
        }

        let id = self.next_prize_id;
        self.next_prize_id += 1;
        self.prizes.push(Prize {
            id,
            name: name.to_string(),
            winner_count,
            description: description
                .map(|d| d.trim().to_string())
                .filter(|d| !d.is_empty()),
            created_at: now,
            status: PrizeStatus::Active,
        });
        Ok(id)
    }

    /// Merge `patch` into an existing prize. Only existence is checked.
    pub fn update_prize(&mut self, prize_id: u64, patch: PrizePatch) -> Result<&Prize, DrawError> {
        let prize = self
            .prizes
            .iter_mut()
            .find(|p| p.id == prize_id)
            .ok_or(DrawError::PrizeNotFound { prize_id })?;

        if let Some(name) = patch.name {
            prize.name = name;
        }
        if let Some(count) = patch.winner_count {
            prize.winner_count = count;
        }
        if let Some(description) = patch.description {
            prize.description = Some(description);
        }
        Ok(&*prize)
    }

    pub fn delete_prize(&mut self, prize_id: u64) -> Result<Prize, DrawError> {
        let index = self
            .prizes
            .iter()
            .position(|p| p.id == prize_id)
            .ok_or(DrawError::PrizeNotFound { prize_id })?;

        if self.prizes[index].status == PrizeStatus::Drawn {
            return Err(DrawError::CannotDeleteDrawnPrize { prize_id });
        }
        Ok(self.prizes.remove(index))
    }

    pub(crate) fn set_status(&mut self, prize_id: u64, status: PrizeStatus) {
        if let Some(prize) = self.prizes.iter_mut().find(|p| p.id == prize_id) {
            prize.status = status;
        }
    }
}
