//! Suitability rule for a single slot.

use super::types::SlotInfo;

/// A slot is suitable when it is bookable and either nobody has booked it
/// yet or at least `spots_required` positions are still open.
pub fn is_suitable(slot: &SlotInfo, spots_required: usize) -> bool {
    slot.bookable && (slot.participants.is_empty() || slot.open_count() >= spots_required)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slot::types::Participant;
    use proptest::prelude::*;

    fn slot(bookable: bool, named: usize, open: usize) -> SlotInfo {
        let mut participants = Vec::new();
        participants.extend((0..named).map(|i| Participant::named(format!("Player {i}"))));
        participants.extend((0..open).map(|_| Participant::open()));
        SlotInfo::new(bookable, participants)
    }

    #[test]
    fn full_slot_is_not_suitable() {
        assert!(!is_suitable(&slot(true, 2, 0), 2));
    }

    #[test]
    fn enough_open_positions_is_suitable() {
        assert!(is_suitable(&slot(true, 2, 2), 2));
    }

    #[test]
    fn empty_bookable_slot_is_suitable_even_for_large_parties() {
        assert!(is_suitable(&slot(true, 0, 0), 4));
    }

    proptest! {
        #[test]
        fn unbookable_is_never_suitable(named in 0usize..6, open in 0usize..6, spots in 0usize..6) {
            prop_assert!(!is_suitable(&slot(false, named, open), spots));
        }

        #[test]
        fn bookable_with_no_participants_is_suitable(spots in 0usize..10) {
            prop_assert!(is_suitable(&slot(true, 0, 0), spots));
        }

        #[test]
        fn bookable_with_participants_depends_on_open_count(
            named in 0usize..6,
            open in 0usize..6,
            spots in 1usize..6,
        ) {
            prop_assume!(named + open > 0);
            prop_assert_eq!(is_suitable(&slot(true, named, open), spots), open >= spots);
        }
    }
}
