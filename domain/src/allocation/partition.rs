//! Pure partitioning rules.
//!
//! Given N participants and a room capacity C, the session needs
//! `ceil(N / C)` rooms, and the participant list splits into consecutive
//! groups of at most C. The last group may be short. N = 0 is a valid
//! input and yields no groups.

use crate::participant::Participant;

/// Number of rooms needed to seat `n` participants at capacity `capacity`.
///
/// `capacity` must be at least 1.
pub fn rooms_needed(n: usize, capacity: usize) -> usize {
    debug_assert!(capacity >= 1, "room capacity must be at least 1");
    n.div_ceil(capacity)
}

/// Split `participants` into consecutive groups of at most `capacity`.
///
/// Every participant lands in exactly one group and group order follows
/// input order; shuffle the input first for randomized grouping.
pub fn partition(participants: &[Participant], capacity: usize) -> Vec<Vec<Participant>> {
    debug_assert!(capacity >= 1, "room capacity must be at least 1");
    participants
        .chunks(capacity)
        .map(|chunk| chunk.to_vec())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn people(n: usize) -> Vec<Participant> {
        (0..n)
            .map(|i| Participant::new(format!("p{}", i), format!("Person {}", i)))
            .collect()
    }

    #[test]
    fn test_rooms_needed() {
        assert_eq!(rooms_needed(0, 2), 0);
        assert_eq!(rooms_needed(1, 2), 1);
        assert_eq!(rooms_needed(6, 2), 3);
        assert_eq!(rooms_needed(7, 2), 4);
        assert_eq!(rooms_needed(7, 3), 3);
        assert_eq!(rooms_needed(6, 6), 1);
    }

    #[test]
    fn test_partition_covers_everyone_exactly_once() {
        for n in 0..20 {
            for capacity in 1..7 {
                let input = people(n);
                let groups = partition(&input, capacity);

                assert_eq!(groups.len(), rooms_needed(n, capacity));

                let flattened: Vec<_> = groups.iter().flatten().collect();
                assert_eq!(flattened.len(), n, "n={} c={}", n, capacity);

                let mut seen = std::collections::HashSet::new();
                for p in &flattened {
                    assert!(seen.insert(p.id.clone()), "duplicate {}", p.id);
                }

                for group in &groups {
                    assert!(group.len() <= capacity);
                    assert!(!group.is_empty());
                }
            }
        }
    }

    #[test]
    fn test_last_group_may_be_short() {
        let groups = partition(&people(7), 3);
        assert_eq!(groups.len(), 3);
        assert_eq!(groups[0].len(), 3);
        assert_eq!(groups[1].len(), 3);
        assert_eq!(groups[2].len(), 1);
    }

    #[test]
    fn test_empty_input_yields_no_groups() {
        assert!(partition(&[], 4).is_empty());
    }
}
