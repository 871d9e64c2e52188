//! Jalali Clock
//!
//! Report header in Solar Hijri date and Tehran local time:
//!
//! ```text
//! 🗓️ یکشنبه 26 مهر 1405
//! 🕰️ ساعت 14:05
//! ```

use chrono::{DateTime, Datelike, FixedOffset, Offset, Timelike, Utc, Weekday};
use nerkh_core::HeaderSource;

/// Tehran standard time, UTC+03:30
const TEHRAN_OFFSET_SECS: i32 = 3 * 3600 + 30 * 60;

const MONTHS: [&str; 12] = [
    "فروردین",
    "اردیبهشت",
    "خرداد",
    "تیر",
    "مرداد",
    "شهریور",
    "مهر",
    "آبان",
    "آذر",
    "دی",
    "بهمن",
    "اسفند",
];

/// A Solar Hijri calendar date
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct JalaliDate {
    pub year: i32,
    pub month: u32,
    pub day: u32,
}

impl JalaliDate {
    /// Convert a proleptic Gregorian date
    pub fn from_gregorian(year: i32, month: u32, day: u32) -> Self {
        const DAYS_BEFORE_MONTH: [i64; 12] = [0, 31, 59, 90, 120, 151, 181, 212, 243, 273, 304, 334];

        let gy = i64::from(year);
        let gy2 = if month > 2 { gy + 1 } else { gy };
        let month_index = (month.clamp(1, 12) - 1) as usize;

        let mut days = 355_666 + 365 * gy + (gy2 + 3) / 4 - (gy2 + 99) / 100
            + (gy2 + 399) / 400
            + i64::from(day)
            + DAYS_BEFORE_MONTH[month_index];

        // 33-year cycles, then 4-year cycles
        let mut jy = -1595 + 33 * (days / 12_053);
        days %= 12_053;
        jy += 4 * (days / 1461);
        days %= 1461;
        if days > 365 {
            jy += (days - 1) / 365;
            days = (days - 1) % 365;
        }

        // First six months have 31 days, the rest 30 (29 in Esfand of common years)
        let (jm, jd) = if days < 186 {
            (1 + days / 31, 1 + days % 31)
        } else {
            (7 + (days - 186) / 30, 1 + (days - 186) % 30)
        };

        Self {
            year: jy as i32,
            month: jm as u32,
            day: jd as u32,
        }
    }

    pub fn month_name(&self) -> &'static str {
        MONTHS[(self.month.clamp(1, 12) - 1) as usize]
    }
}

fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Sat => "شنبه",
        Weekday::Sun => "یکشنبه",
        Weekday::Mon => "دوشنبه",
        Weekday::Tue => "سه‌شنبه",
        Weekday::Wed => "چهارشنبه",
        Weekday::Thu => "پنجشنبه",
        Weekday::Fri => "جمعه",
    }
}

/// Render the header for a Tehran-local timestamp
pub fn render_header(local: &DateTime<FixedOffset>) -> String {
    let date = JalaliDate::from_gregorian(local.year(), local.month(), local.day());
    format!(
        "🗓️ {} {:02} {} {}\n🕰️ ساعت {:02}:{:02}\n\n",
        weekday_name(local.weekday()),
        date.day,
        date.month_name(),
        date.year,
        local.hour(),
        local.minute(),
    )
}

/// Wall-clock header source
#[derive(Clone, Copy, Debug, Default)]
pub struct JalaliClock;

impl HeaderSource for JalaliClock {
    fn current_header(&self) -> String {
        let tehran = FixedOffset::east_opt(TEHRAN_OFFSET_SECS).unwrap_or_else(|| Utc.fix());
        render_header(&Utc::now().with_timezone(&tehran))
    }
}
