use serde::{Deserialize, Serialize};
use std::fmt;

/// Weekday a study task is planned for
///
/// Ordering follows the week starting on Monday, so a `BTreeSet<Day>`
/// iterates in the order the day menu shows it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Day {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Day {
    /// All seven days, Monday first
    pub const ALL: [Day; 7] = [
        Day::Monday,
        Day::Tuesday,
        Day::Wednesday,
        Day::Thursday,
        Day::Friday,
        Day::Saturday,
        Day::Sunday,
    ];

    /// Label written to the task document
    pub fn label(&self) -> &'static str {
        match self {
            Day::Monday => "Monday",
            Day::Tuesday => "Tuesday",
            Day::Wednesday => "Wednesday",
            Day::Thursday => "Thursday",
            Day::Friday => "Friday",
            Day::Saturday => "Saturday",
            Day::Sunday => "Sunday",
        }
    }

    /// Three-letter label for narrow columns
    pub fn short(&self) -> &'static str {
        &self.label()[..3]
    }

    /// Parse a day label.
    ///
    /// Accepts English names and three-letter abbreviations in any case, and
    /// the Vietnamese labels ("Thứ 2" .. "Thứ 7", "Chủ nhật") found in older
    /// documents.
    pub fn parse(input: &str) -> Option<Self> {
        let normalized = input.trim().to_lowercase();
        if normalized.is_empty() {
            return None;
        }

        for day in Day::ALL {
            let label = day.label().to_lowercase();
            if normalized == label || normalized == label[..3] {
                return Some(day);
            }
        }

        match normalized.as_str() {
            "thứ 2" | "thứ hai" => Some(Day::Monday),
            "thứ 3" | "thứ ba" => Some(Day::Tuesday),
            "thứ 4" | "thứ tư" => Some(Day::Wednesday),
            "thứ 5" | "thứ năm" => Some(Day::Thursday),
            "thứ 6" | "thứ sáu" => Some(Day::Friday),
            "thứ 7" | "thứ bảy" => Some(Day::Saturday),
            "chủ nhật" => Some(Day::Sunday),
            _ => None,
        }
    }

    /// Position in the week (Monday = 0)
    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn next(&self) -> Self {
        Day::ALL[(self.index() + 1) % Day::ALL.len()]
    }

    pub fn prev(&self) -> Self {
        Day::ALL[(self.index() + Day::ALL.len() - 1) % Day::ALL.len()]
    }

    /// Day of the week for a calendar date
    pub fn from_weekday(weekday: chrono::Weekday) -> Self {
        Day::ALL[weekday.num_days_from_monday() as usize]
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
