use crate::model::entries::{day_key, Entries, TRACKED_DAYS};
use crate::model::snapshot::TrackerData;

/// Flip the completion flag for `item_id` on `day`. Returns the new state.
///
/// Completing stores `true`; un-completing removes the flag and the day when
/// it becomes empty, so `false` is never stored.
pub fn toggle(entries: &mut Entries, day: u32, item_id: &str) -> bool {
    if entries.is_checked(day, item_id) {
        entries.uncheck(day, item_id);
        false
    } else {
        entries.check(day, item_id);
        true
    }
}

// ---------------------------------------------------------------------------
// Progress statistics
// ---------------------------------------------------------------------------

/// Overall progress figures for a snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub total_checked: usize,
    pub total_possible: usize,
    pub percent: u32,
    pub days_active: usize,
}

pub fn progress(data: &TrackerData) -> Progress {
    let total_possible = data.items.len() * TRACKED_DAYS as usize;
    let total_checked = total_checked(data);
    Progress {
        total_checked,
        total_possible,
        percent: completion_percent(data),
        days_active: days_active(data),
    }
}

/// Number of stored completion flags across all days
pub fn total_checked(data: &TrackerData) -> usize {
    data.entries.days().map(|(_, ids)| ids.count()).sum()
}

/// Checked flags over items × tracked days, rounded to a whole percent
pub fn completion_percent(data: &TrackerData) -> u32 {
    percent(total_checked(data), data.items.len() * TRACKED_DAYS as usize)
}

/// Days with at least one completed item
pub fn days_active(data: &TrackerData) -> usize {
    data.entries
        .days()
        .filter_map(|(_, mut ids)| ids.next())
        .count()
}

/// Share of all items completed on `day`
pub fn day_completion(data: &TrackerData, day: u32) -> u32 {
    let checked = data.entries.checked_on(&day_key(day)).count();
    percent(checked, data.items.len())
}

/// Share of a category's items (sub-items included) completed across the
/// tracked period
pub fn category_completion(data: &TrackerData, category_id: &str) -> u32 {
    let items: Vec<&str> = data
        .items
        .iter()
        .filter(|i| i.category_id == category_id)
        .map(|i| i.id.as_str())
        .collect();
    let checked: usize = data
        .entries
        .days()
        .map(|(_, ids)| ids.filter(|id| items.contains(id)).count())
        .sum();
    percent(checked, items.len() * TRACKED_DAYS as usize)
}

fn percent(part: usize, whole: usize) -> u32 {
    if whole == 0 {
        return 0;
    }
    (part as f64 / whole as f64 * 100.0).round() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_sets_then_clears() {
        let mut entries = Entries::new();
        assert!(toggle(&mut entries, 1, "fajr"));
        assert!(entries.is_checked(1, "fajr"));
        assert!(!toggle(&mut entries, 1, "fajr"));
        assert!(entries.is_empty());
    }

    #[test]
    fn toggle_twice_restores_structure() {
        let mut data = TrackerData::default();
        data.entries.check(2, "asr");
        let before = data.clone();
        toggle(&mut data.entries, 2, "isha");
        toggle(&mut data.entries, 2, "isha");
        assert_eq!(data, before);
    }

    #[test]
    fn toggle_keeps_other_flags_on_the_day() {
        let mut entries = Entries::new();
        toggle(&mut entries, 3, "fajr");
        toggle(&mut entries, 3, "asr");
        toggle(&mut entries, 3, "fajr");
        assert!(entries.is_checked(3, "asr"));
        assert!(!entries.is_checked(3, "fajr"));
    }

    #[test]
    fn out_of_range_days_are_stored_as_given() {
        let mut entries = Entries::new();
        assert!(toggle(&mut entries, 31, "fajr"));
        assert!(entries.is_checked(31, "fajr"));
    }

    #[test]
    fn empty_snapshot_stats_are_zero() {
        let data = TrackerData::empty();
        assert_eq!(
            progress(&data),
            Progress {
                total_checked: 0,
                total_possible: 0,
                percent: 0,
                days_active: 0
            }
        );
        assert_eq!(day_completion(&data, 1), 0);
        assert_eq!(category_completion(&data, "quran"), 0);
    }

    #[test]
    fn progress_counts_flags_and_active_days() {
        let mut data = TrackerData::default();
        for day in 1..=3 {
            data.entries.check(day, "fajr");
        }
        data.entries.check(3, "asr");
        let p = progress(&data);
        assert_eq!(p.total_checked, 4);
        assert_eq!(p.total_possible, 23 * 30);
        assert_eq!(p.percent, 1);
        assert_eq!(p.days_active, 3);
    }

    #[test]
    fn day_completion_rounds() {
        let mut data = TrackerData::default();
        for id in ["fajr", "dhuhr", "asr", "maghrib", "isha"] {
            data.entries.check(1, id);
        }
        // 5 of 23
        assert_eq!(day_completion(&data, 1), 22);
        assert_eq!(day_completion(&data, 2), 0);
    }

    #[test]
    fn category_completion_counts_only_its_items() {
        let mut data = TrackerData::default();
        for day in 1..=30 {
            data.entries.check(day, "duha");
        }
        data.entries.check(1, "fajr");
        assert_eq!(category_completion(&data, "sunnah-salat"), 50);
        assert_eq!(category_completion(&data, "quran"), 0);
        assert_eq!(completion_percent(&data), 4);
        assert_eq!(progress(&data).percent, 4);
    }
}
