//! Bookable time slots for one working day.

use chrono::NaiveTime;
use serde::Serialize;

use crate::clock;
use crate::config::CalendarConfig;

/// A fixed-width interval on the working-day timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSlot {
    #[serde(with = "clock::hhmm")]
    pub start: NaiveTime,
    #[serde(with = "clock::hhmm")]
    pub end: NaiveTime,
    pub is_lunch: bool,
}

impl TimeSlot {
    /// Whether `time` falls inside `[start, end)`.
    pub fn contains(&self, time: NaiveTime) -> bool {
        self.start <= time && time < self.end
    }
}

/// One slot per `step_minutes` from `work_start_hour` until the last slot
/// that still ends by `work_end_hour`. Slots starting inside
/// `[lunch_start_hour, lunch_end_hour)` are flagged as lunch.
pub fn generate_slots(
    work_start_hour: u32,
    work_end_hour: u32,
    lunch_start_hour: u32,
    lunch_end_hour: u32,
    step_minutes: u32,
) -> Vec<TimeSlot> {
    if step_minutes == 0 {
        return Vec::new();
    }

    let day_end = work_end_hour.min(24) * 60;
    // hours past the end of the day saturate instead of wrapping
    let lunch = lunch_start_hour.saturating_mul(60)..lunch_end_hour.saturating_mul(60);
    let mut slots = Vec::new();
    let mut minute = work_start_hour.saturating_mul(60);

    while let Some(next) = minute.checked_add(step_minutes).filter(|next| *next <= day_end) {
        let Some(start) = clock::from_minutes(minute) else {
            break;
        };
        // a slot closing at midnight ends at the last representable second
        let end = clock::from_minutes(next)
            .or_else(|| NaiveTime::from_hms_opt(23, 59, 59))
            .unwrap_or(start);
        slots.push(TimeSlot {
            start,
            end,
            is_lunch: lunch.contains(&minute),
        });
        minute = next;
    }

    slots
}

/// The day's slot grid, generated once from configuration.
#[derive(Debug, Clone)]
pub struct SlotCalendar {
    slots: Vec<TimeSlot>,
}

impl SlotCalendar {
    pub fn new(config: &CalendarConfig) -> Self {
        Self {
            slots: generate_slots(
                config.work_start_hour,
                config.work_end_hour,
                config.lunch_start_hour,
                config.lunch_end_hour,
                config.step_minutes,
            ),
        }
    }

    pub fn slots(&self) -> &[TimeSlot] {
        &self.slots
    }

    /// Whether `time` starts inside a lunch slot.
    pub fn is_lunch(&self, time: NaiveTime) -> bool {
        self.slots
            .iter()
            .any(|slot| slot.is_lunch && slot.contains(time))
    }

    /// Non-lunch slots that no occupied time falls into, in chronological order.
    pub fn available_slots(&self, occupied: &[NaiveTime]) -> Vec<TimeSlot> {
        self.slots
            .iter()
            .filter(|slot| !slot.is_lunch)
            .filter(|slot| !occupied.iter().any(|time| slot.contains(*time)))
            .copied()
            .collect()
    }
}
