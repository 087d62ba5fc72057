//! Ordered waiting lists, one per qualification.
//!
//! Positions inside a queue are always dense (`1..=N`). Every removal
//! re-indexes the remaining entries while keeping their relative order.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::models::{QueueEntryRow, Qualification};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueueError {
    #[error("Player {0} appears more than once in the requested order")]
    Duplicate(Uuid),

    #[error("Player {0} is not in the {1} queue")]
    NotQueued(Uuid, Qualification),

    #[error("Requested order omits {0} queued player(s)")]
    Incomplete(usize),
}

/// Tail position for a queue holding the given positions.
pub fn next_position(positions: impl IntoIterator<Item = i32>) -> i32 {
    positions.into_iter().max().unwrap_or(0) + 1
}

/// Check that `requested` is a permutation of `current`.
pub fn validate_reorder(
    queue_type: Qualification,
    current: &[Uuid],
    requested: &[Uuid],
) -> Result<(), QueueError> {
    let members: HashSet<Uuid> = current.iter().copied().collect();
    let mut seen = HashSet::with_capacity(requested.len());

    for id in requested {
        if !seen.insert(*id) {
            return Err(QueueError::Duplicate(*id));
        }
        if !members.contains(id) {
            return Err(QueueError::NotQueued(*id, queue_type));
        }
    }

    if seen.len() != members.len() {
        return Err(QueueError::Incomplete(members.len() - seen.len()));
    }

    Ok(())
}

#[derive(Debug, Clone, Default)]
pub struct WaitingQueues {
    entries: Vec<QueueEntryRow>,
}

impl WaitingQueues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from persisted entries, normalizing every queue to dense positions.
    pub fn from_entries(entries: Vec<QueueEntryRow>) -> Self {
        let mut queues = Self { entries };
        for queue_type in Qualification::ALL {
            queues.reindex(queue_type);
        }
        queues
    }

    pub fn entries(&self) -> &[QueueEntryRow] {
        &self.entries
    }

    pub fn entry_for(&self, player_id: Uuid) -> Option<&QueueEntryRow> {
        self.entries.iter().find(|e| e.player_id == player_id)
    }

    /// Entries of one queue, lowest position first.
    pub fn ordered(&self, queue_type: Qualification) -> Vec<&QueueEntryRow> {
        let mut line: Vec<&QueueEntryRow> = self
            .entries
            .iter()
            .filter(|e| e.queue_type == queue_type)
            .collect();
        line.sort_by_key(|e| e.position);
        line
    }

    pub fn len(&self, queue_type: Qualification) -> usize {
        self.entries
            .iter()
            .filter(|e| e.queue_type == queue_type)
            .count()
    }

    pub fn is_empty(&self, queue_type: Qualification) -> bool {
        self.len(queue_type) == 0
    }

    /// Append a player to the tail of `queue_type`, dropping any previous
    /// membership first.
    pub fn enqueue(
        &mut self,
        player_id: Uuid,
        queue_type: Qualification,
        now: DateTime<Utc>,
    ) -> QueueEntryRow {
        self.remove(player_id);

        let position = next_position(
            self.entries
                .iter()
                .filter(|e| e.queue_type == queue_type)
                .map(|e| e.position),
        );

        let entry = QueueEntryRow {
            id: Uuid::new_v4(),
            player_id,
            queue_type,
            position,
            enqueued_at: now,
        };
        self.entries.push(entry.clone());
        entry
    }

    pub fn remove(&mut self, player_id: Uuid) -> Option<QueueEntryRow> {
        let idx = self.entries.iter().position(|e| e.player_id == player_id)?;
        let removed = self.entries.remove(idx);
        self.reindex(removed.queue_type);
        Some(removed)
    }

    /// Replace the order of a queue. Nothing changes unless the whole order
    /// is valid.
    pub fn reorder(
        &mut self,
        queue_type: Qualification,
        order: &[Uuid],
    ) -> Result<Vec<QueueEntryRow>, QueueError> {
        let current: Vec<Uuid> = self
            .ordered(queue_type)
            .into_iter()
            .map(|e| e.player_id)
            .collect();
        validate_reorder(queue_type, &current, order)?;

        for (idx, player_id) in order.iter().enumerate() {
            if let Some(entry) = self
                .entries
                .iter_mut()
                .find(|e| e.player_id == *player_id)
            {
                entry.position = idx as i32 + 1;
            }
        }

        Ok(self.ordered(queue_type).into_iter().cloned().collect())
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn is_dense(&self, queue_type: Qualification) -> bool {
        self.ordered(queue_type)
            .iter()
            .enumerate()
            .all(|(idx, e)| e.position == idx as i32 + 1)
    }

    fn reindex(&mut self, queue_type: Qualification) {
        let mut ids: Vec<(i32, Uuid)> = self
            .entries
            .iter()
            .filter(|e| e.queue_type == queue_type)
            .map(|e| (e.position, e.id))
            .collect();
        ids.sort();

        for (idx, (_, id)) in ids.into_iter().enumerate() {
            if let Some(entry) = self.entries.iter_mut().find(|e| e.id == id) {
                entry.position = idx as i32 + 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(n: usize) -> Vec<Uuid> {
        (0..n).map(|_| Uuid::new_v4()).collect()
    }

    fn order_of(queues: &WaitingQueues, q: Qualification) -> Vec<Uuid> {
        queues.ordered(q).into_iter().map(|e| e.player_id).collect()
    }

    #[test]
    fn enqueue_appends_to_tail() {
        let players = ids(3);
        let mut queues = WaitingQueues::new();
        for p in &players {
            queues.enqueue(*p, Qualification::Advanced, Utc::now());
        }

        assert_eq!(order_of(&queues, Qualification::Advanced), players);
        assert_eq!(queues.entry_for(players[2]).map(|e| e.position), Some(3));
    }

    #[test]
    fn removal_keeps_positions_dense_and_ordered() {
        let players = ids(5);
        let mut queues = WaitingQueues::new();
        for p in &players {
            queues.enqueue(*p, Qualification::Intermediate, Utc::now());
        }

        queues.remove(players[1]);
        queues.remove(players[3]);

        assert!(queues.is_dense(Qualification::Intermediate));
        assert_eq!(
            order_of(&queues, Qualification::Intermediate),
            vec![players[0], players[2], players[4]]
        );
    }

    #[test]
    fn enqueue_moves_player_between_queues() {
        let players = ids(2);
        let mut queues = WaitingQueues::new();
        queues.enqueue(players[0], Qualification::Advanced, Utc::now());
        queues.enqueue(players[1], Qualification::Advanced, Utc::now());

        let entry = queues.enqueue(players[0], Qualification::Intermediate, Utc::now());

        assert_eq!(entry.position, 1);
        assert_eq!(queues.len(Qualification::Advanced), 1);
        assert_eq!(queues.entry_for(players[1]).map(|e| e.position), Some(1));
    }

    #[test]
    fn reorder_is_all_or_nothing() {
        let players = ids(3);
        let mut queues = WaitingQueues::new();
        for p in &players {
            queues.enqueue(*p, Qualification::Advanced, Utc::now());
        }

        let stranger = Uuid::new_v4();
        let err = queues
            .reorder(Qualification::Advanced, &[players[2], stranger, players[0]])
            .unwrap_err();
        assert_eq!(err, QueueError::NotQueued(stranger, Qualification::Advanced));
        assert_eq!(order_of(&queues, Qualification::Advanced), players);

        let dup = queues
            .reorder(Qualification::Advanced, &[players[0], players[0], players[1]])
            .unwrap_err();
        assert_eq!(dup, QueueError::Duplicate(players[0]));

        let short = queues
            .reorder(Qualification::Advanced, &[players[0]])
            .unwrap_err();
        assert_eq!(short, QueueError::Incomplete(2));

        let reordered = queues
            .reorder(Qualification::Advanced, &[players[2], players[0], players[1]])
            .unwrap();
        let positions: Vec<i32> = reordered.iter().map(|e| e.position).collect();
        assert_eq!(positions, vec![1, 2, 3]);
        assert_eq!(
            order_of(&queues, Qualification::Advanced),
            vec![players[2], players[0], players[1]]
        );
    }

    #[test]
    fn from_entries_closes_gaps() {
        let players = ids(2);
        let entries = vec![
            QueueEntryRow {
                id: Uuid::new_v4(),
                player_id: players[0],
                queue_type: Qualification::Advanced,
                position: 4,
                enqueued_at: Utc::now(),
            },
            QueueEntryRow {
                id: Uuid::new_v4(),
                player_id: players[1],
                queue_type: Qualification::Advanced,
                position: 9,
                enqueued_at: Utc::now(),
            },
        ];

        let queues = WaitingQueues::from_entries(entries);
        assert!(queues.is_dense(Qualification::Advanced));
        assert_eq!(order_of(&queues, Qualification::Advanced), players);
    }

    #[test]
    fn next_position_starts_at_one() {
        assert_eq!(next_position(Vec::new()), 1);
        assert_eq!(next_position(vec![1, 2, 3]), 4);
    }
}
