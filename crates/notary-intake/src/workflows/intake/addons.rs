use std::collections::BTreeSet;

use tracing::debug;

use super::domain::{AddonId, BookingOption};

/// Mutually exclusive add-on groups; selecting one member deselects the rest.
pub const EXCLUSIVITY_GROUPS: [&[AddonId]; 3] = [
    &[AddonId::Audio, AddonId::AudioVideo],
    &[AddonId::SameDayDelivery, AddonId::NextDayDelivery],
    &[AddonId::ArchiveMonthly, AddonId::ArchiveYearly],
];

/// Pure rules over checkbox-style add-on sets, independent of any UI event model.
pub struct AddonSelectionResolver;

impl AddonSelectionResolver {
    pub fn exclusivity_group(addon: AddonId) -> Option<&'static [AddonId]> {
        EXCLUSIVITY_GROUPS
            .into_iter()
            .find(|group| group.contains(&addon))
    }

    /// Apply a single toggle and return the next legal set.
    ///
    /// Only the toggled id and members of its own exclusivity group are ever removed.
    pub fn resolve(
        current: &BTreeSet<AddonId>,
        toggled: AddonId,
        now_selected: bool,
    ) -> BTreeSet<AddonId> {
        let mut next = current.clone();

        if !now_selected {
            next.remove(&toggled);
            return next;
        }

        if let Some(group) = Self::exclusivity_group(toggled) {
            for member in group.iter().filter(|member| **member != toggled) {
                if next.remove(member) {
                    debug!(
                        selected = toggled.as_str(),
                        deselected = member.as_str(),
                        "exclusive add-on replaced"
                    );
                }
            }
        }
        next.insert(toggled);
        next
    }

    /// Repair a set that did not arrive through `resolve`, keeping the first member of each
    /// conflicting group.
    pub fn normalize(current: &BTreeSet<AddonId>) -> BTreeSet<AddonId> {
        let mut next = current.clone();
        for group in EXCLUSIVITY_GROUPS {
            let mut present = group.iter().filter(|member| current.contains(*member));
            if present.next().is_some() {
                for dropped in present {
                    debug!(dropped = dropped.as_str(), "conflicting add-on removed");
                    next.remove(dropped);
                }
            }
        }
        next
    }

    /// `timestamp` is bundled free with audio + video recording.
    pub fn is_waived(current: &BTreeSet<AddonId>, addon: AddonId) -> bool {
        addon == AddonId::Timestamp && current.contains(&AddonId::AudioVideo)
    }

    pub fn toggle_booking(
        current: &BTreeSet<BookingOption>,
        option: BookingOption,
        now_selected: bool,
    ) -> BTreeSet<BookingOption> {
        let mut next = current.clone();
        if now_selected {
            next.insert(option);
        } else {
            next.remove(&option);
        }
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(addons: &[AddonId]) -> BTreeSet<AddonId> {
        addons.iter().copied().collect()
    }

    #[test]
    fn selecting_a_group_member_deselects_its_partner() {
        for group in EXCLUSIVITY_GROUPS {
            let (first, second) = (group[0], group[1]);
            let next = AddonSelectionResolver::resolve(&set(&[first]), second, true);
            assert_eq!(next, set(&[second]));

            let next = AddonSelectionResolver::resolve(&set(&[second]), first, true);
            assert_eq!(next, set(&[first]));
        }
    }

    #[test]
    fn toggles_leave_other_groups_alone() {
        let current = set(&[
            AddonId::Audio,
            AddonId::ArchiveYearly,
            AddonId::MultiParty,
            AddonId::Timestamp,
        ]);

        let next = AddonSelectionResolver::resolve(&current, AddonId::SameDayDelivery, true);
        assert_eq!(
            next,
            set(&[
                AddonId::Audio,
                AddonId::ArchiveYearly,
                AddonId::MultiParty,
                AddonId::Timestamp,
                AddonId::SameDayDelivery,
            ])
        );

        let next = AddonSelectionResolver::resolve(&current, AddonId::Audio, false);
        assert_eq!(
            next,
            set(&[AddonId::ArchiveYearly, AddonId::MultiParty, AddonId::Timestamp])
        );
    }

    #[test]
    fn resolve_is_idempotent() {
        let current = set(&[AddonId::Audio, AddonId::NextDayDelivery]);
        let once = AddonSelectionResolver::resolve(&current, AddonId::AudioVideo, true);
        let twice = AddonSelectionResolver::resolve(&once, AddonId::AudioVideo, true);
        assert_eq!(once, twice);

        let removed = AddonSelectionResolver::resolve(&once, AddonId::AudioVideo, false);
        let removed_again = AddonSelectionResolver::resolve(&removed, AddonId::AudioVideo, false);
        assert_eq!(removed, removed_again);
    }

    #[test]
    fn normalize_keeps_one_member_per_group() {
        let current = set(&[
            AddonId::Audio,
            AddonId::AudioVideo,
            AddonId::ArchiveMonthly,
            AddonId::ArchiveYearly,
            AddonId::ExhibitManagement,
        ]);
        let normalized = AddonSelectionResolver::normalize(&current);
        assert_eq!(
            normalized,
            set(&[
                AddonId::Audio,
                AddonId::ArchiveMonthly,
                AddonId::ExhibitManagement
            ])
        );
        assert_eq!(AddonSelectionResolver::normalize(&normalized), normalized);
    }

    #[test]
    fn timestamp_waiver_follows_audio_video() {
        let bundled = set(&[AddonId::AudioVideo, AddonId::Timestamp]);
        assert!(AddonSelectionResolver::is_waived(&bundled, AddonId::Timestamp));
        assert!(!AddonSelectionResolver::is_waived(&bundled, AddonId::AudioVideo));

        let audio_only = set(&[AddonId::Audio, AddonId::Timestamp]);
        assert!(!AddonSelectionResolver::is_waived(&audio_only, AddonId::Timestamp));
    }

    #[test]
    fn booking_toggles_are_plain_set_updates() {
        let current = BTreeSet::from([BookingOption::Weekend]);
        let next = AddonSelectionResolver::toggle_booking(&current, BookingOption::RushBooking, true);
        assert_eq!(
            next,
            BTreeSet::from([BookingOption::RushBooking, BookingOption::Weekend])
        );
        let next = AddonSelectionResolver::toggle_booking(&next, BookingOption::Weekend, false);
        assert_eq!(next, BTreeSet::from([BookingOption::RushBooking]));
    }
}
