//! Working representation of the schedule while the pipeline runs.

use crate::application::window::DayWindow;
use crate::domain::models::{Block, BlockKind};
use crate::domain::time::{minutes_to_time, try_parse_time};
use tracing::debug;

pub const FOCUS_BLOCK_TITLE: &str = "Focus Block";
pub const FREE_TIME_TITLE: &str = "Free Time";

/// A block payload positioned on the day timeline. `start < end` holds at
/// every stage boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub start: i64,
    pub end: i64,
    pub kind: BlockKind,
    pub title: String,
    pub focus_required: bool,
}

impl Entry {
    pub fn new(
        start: i64,
        end: i64,
        kind: BlockKind,
        title: impl Into<String>,
        focus_required: bool,
    ) -> Self {
        Self {
            start,
            end,
            kind,
            title: title.into(),
            focus_required,
        }
    }

    pub fn focus(start: i64, end: i64) -> Self {
        Self::new(start, end, BlockKind::FocusBlock, FOCUS_BLOCK_TITLE, true)
    }

    pub fn free_time(start: i64, end: i64) -> Self {
        Self::new(start, end, BlockKind::FreeTime, FREE_TIME_TITLE, false)
    }

    pub fn duration(&self) -> i64 {
        self.end - self.start
    }

    pub fn overlaps(&self, start: i64, end: i64) -> bool {
        self.start < end && self.end > start
    }

    /// Copy of this entry's payload over a different span.
    pub fn with_span(&self, start: i64, end: i64) -> Self {
        Self {
            start,
            end,
            ..self.clone()
        }
    }

    pub fn into_block(self) -> Block {
        Block {
            start: minutes_to_time(self.start),
            end: minutes_to_time(self.end),
            kind: self.kind,
            title: self.title,
            focus_required: self.focus_required,
        }
    }
}

/// Stable sort by start minute.
pub fn sort_entries(entries: &mut [Entry]) {
    entries.sort_by_key(|entry| entry.start);
}

/// Converts raw blocks into entries clamped to the window. Blocks with
/// unparsable times or less than a minute inside the window are dropped, and
/// an entry overlapping an earlier-starting one keeps only the part after it.
pub fn ingest(blocks: &[Block], window: &DayWindow) -> Vec<Entry> {
    let mut entries = blocks
        .iter()
        .filter_map(|block| {
            let (Some(raw_start), Some(raw_end)) =
                (try_parse_time(&block.start), try_parse_time(&block.end))
            else {
                debug!(start = %block.start, end = %block.end, "dropping block with malformed time");
                return None;
            };
            let (start, end) = window.normalize(raw_start, raw_end);
            let (start, end) = window.clamp(start, end);
            if end - start < 1 {
                debug!(title = %block.title, "dropping block outside the day window");
                return None;
            }
            Some(Entry::new(
                start,
                end,
                block.kind.clone(),
                block.title.clone(),
                block.focus_required,
            ))
        })
        .collect::<Vec<_>>();
    sort_entries(&mut entries);

    let mut cursor = window.day_start;
    entries
        .into_iter()
        .filter_map(|mut entry| {
            entry.start = entry.start.max(cursor);
            if entry.end <= entry.start {
                debug!(title = %entry.title, "dropping block covered by an earlier block");
                return None;
            }
            cursor = entry.end;
            Some(entry)
        })
        .collect()
}

/// Inserts `inserted` over its span, keeping the non-overlapping remainders of
/// every entry it covers and dropping the covered middles.
pub fn carve(entries: Vec<Entry>, inserted: Entry) -> Vec<Entry> {
    let (start, end) = (inserted.start, inserted.end);
    if end <= start {
        return entries;
    }

    let mut carved = Vec::with_capacity(entries.len() + 2);
    for entry in entries {
        if !entry.overlaps(start, end) {
            carved.push(entry);
            continue;
        }
        if entry.start < start {
            carved.push(entry.with_span(entry.start, start));
        }
        if entry.end > end {
            carved.push(entry.with_span(end, entry.end));
        }
    }
    carved.push(inserted);
    sort_entries(&mut carved);
    carved
}

pub fn render(entries: Vec<Entry>) -> Vec<Block> {
    entries.into_iter().map(Entry::into_block).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::Preferences;

    fn block(start: &str, end: &str, kind: &str, title: &str) -> Block {
        Block {
            start: start.to_string(),
            end: end.to_string(),
            kind: BlockKind::parse(kind),
            title: title.to_string(),
            focus_required: false,
        }
    }

    fn window(wake: &str, sleep: &str) -> DayWindow {
        let preferences = Preferences {
            wake_time: wake.to_string(),
            sleep_time: sleep.to_string(),
            ..Preferences::default()
        };
        DayWindow::resolve(&preferences, &[])
    }

    fn spans(entries: &[Entry]) -> Vec<(i64, i64)> {
        entries.iter().map(|entry| (entry.start, entry.end)).collect()
    }

    #[test]
    fn ingest_sorts_clamps_and_drops_malformed_blocks() {
        let blocks = vec![
            block("12:00", "12:30", "meal", "Lunch"),
            block("06:00", "07:30", "focus_block", "Early"),
            block("bad", "09:00", "focus_block", "Broken"),
            block("05:00", "06:00", "focus_block", "Before wake"),
            block("22:30", "23:30", "freetime", "Late"),
        ];
        let entries = ingest(&blocks, &window("07:00", "23:00"));

        assert_eq!(spans(&entries), vec![(420, 450), (720, 750), (1350, 1380)]);
        assert_eq!(entries[1].title, "Lunch");
    }

    #[test]
    fn ingest_maps_after_midnight_blocks_past_1440() {
        let blocks = vec![
            block("00:00", "00:45", "freetime", "Late night"),
            block("23:30", "00:15", "focus_block", "Spanning"),
        ];
        let entries = ingest(&blocks, &window("08:00", "01:00"));
        assert_eq!(spans(&entries), vec![(1410, 1455), (1455, 1485)]);
        assert_eq!(entries[1].title, "Late night");
    }

    #[test]
    fn ingest_cuts_overlaps_in_favor_of_the_earlier_block() {
        let blocks = vec![
            block("09:00", "10:00", "focus_block", "Study"),
            block("09:30", "10:00", "task", "Essay"),
            block("09:45", "10:30", "task", "Reading"),
        ];
        let entries = ingest(&blocks, &window("07:00", "23:00"));
        assert_eq!(spans(&entries), vec![(540, 600), (600, 630)]);
        assert_eq!(entries[1].title, "Reading");
    }

    #[test]
    fn carve_splits_partially_covered_entries() {
        let entries = vec![
            Entry::focus(420, 600),
            Entry::free_time(600, 660),
            Entry::focus(660, 720),
        ];
        let event = Entry::new(570, 690, BlockKind::WeeklyEvent, "Lecture", false);
        let carved = carve(entries, event);

        assert_eq!(spans(&carved), vec![(420, 570), (570, 690), (690, 720)]);
        assert_eq!(carved[0].kind, BlockKind::FocusBlock);
        assert_eq!(carved[1].kind, BlockKind::WeeklyEvent);
        assert_eq!(carved[2].kind, BlockKind::FocusBlock);
    }

    #[test]
    fn carve_inside_a_single_entry_keeps_both_sides() {
        let carved = carve(
            vec![Entry::focus(420, 720)],
            Entry::new(500, 530, BlockKind::Meal, "Breakfast", false),
        );
        assert_eq!(spans(&carved), vec![(420, 500), (500, 530), (530, 720)]);
    }

    #[test]
    fn carve_ignores_empty_spans() {
        let entries = vec![Entry::focus(420, 480)];
        let carved = carve(
            entries.clone(),
            Entry::new(450, 450, BlockKind::WeeklyEvent, "Empty", false),
        );
        assert_eq!(carved, entries);
    }

    #[test]
    fn entries_render_as_wrapped_clock_strings() {
        let blocks = render(vec![Entry::focus(1430, 1480)]);
        assert_eq!(blocks[0].start, "23:50");
        assert_eq!(blocks[0].end, "00:40");
        assert_eq!(blocks[0].kind, BlockKind::FocusBlock);
        assert!(blocks[0].focus_required);
    }
}
