//! Secret Santa draw
//!
//! Produces a permutation of the participants in which nobody draws
//! themselves and nobody draws a name from their own `skip` list.

use std::collections::HashSet;

use rand::Rng;
use rand::seq::SliceRandom;

use crate::config::Participant;
use crate::error::{AppError, AppResult};

/// Who gives to whom
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Assignment<'a> {
    pub giver: &'a Participant,
    pub recipient: &'a Participant,
}

/// Draw recipients for every participant
///
/// Assignments are returned in participant order. Candidate lists are
/// shuffled with `rng` and searched with backtracking, most constrained
/// giver first, so any satisfiable set of skip lists is found.
///
/// # Errors
/// `AppError::Validation` when there are fewer than two participants, a name
/// appears twice, or the skip lists leave no valid draw.
pub fn assign<'a, R>(participants: &'a [Participant], rng: &mut R) -> AppResult<Vec<Assignment<'a>>>
where
    R: Rng + ?Sized,
{
    if participants.len() < 2 {
        return Err(AppError::validation(
            "participants",
            "at least two participants are needed for a draw",
        ));
    }

    let mut seen = HashSet::new();
    if let Some(duplicate) = participants.iter().find(|p| !seen.insert(p.name.as_str())) {
        return Err(AppError::validation(
            "participants",
            format!("participant name '{}' appears more than once", duplicate.name),
        ));
    }

    let candidates: Vec<Vec<usize>> = participants
        .iter()
        .enumerate()
        .map(|(giver_idx, giver)| {
            let mut options: Vec<usize> = participants
                .iter()
                .enumerate()
                .filter(|(idx, recipient)| {
                    *idx != giver_idx && !giver.skip.iter().any(|name| *name == recipient.name)
                })
                .map(|(idx, _)| idx)
                .collect();
            options.shuffle(rng);
            options
        })
        .collect();

    let mut order: Vec<usize> = (0..participants.len()).collect();
    order.shuffle(rng);
    order.sort_by_key(|&giver| candidates[giver].len());

    let mut draw = Draw {
        candidates: &candidates,
        taken: vec![false; participants.len()],
        recipient_of: vec![None; participants.len()],
    };

    if !draw.search(&order) {
        return Err(AppError::validation(
            "participants",
            "no draw satisfies every participant's skip list",
        ));
    }

    Ok(draw
        .recipient_of
        .into_iter()
        .enumerate()
        .filter_map(|(giver, recipient)| {
            recipient.map(|recipient| Assignment {
                giver: &participants[giver],
                recipient: &participants[recipient],
            })
        })
        .collect())
}

struct Draw<'c> {
    candidates: &'c [Vec<usize>],
    taken: Vec<bool>,
    recipient_of: Vec<Option<usize>>,
}

impl Draw<'_> {
    fn search(&mut self, order: &[usize]) -> bool {
        let Some((&giver, rest)) = order.split_first() else {
            return true;
        };

        for &candidate in &self.candidates[giver] {
            if self.taken[candidate] {
                continue;
            }
            self.taken[candidate] = true;
            self.recipient_of[giver] = Some(candidate);

            if self.search(rest) {
                return true;
            }

            self.taken[candidate] = false;
            self.recipient_of[giver] = None;
        }

        false
    }
}
