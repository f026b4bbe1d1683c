use chrono::{DateTime, TimeZone, Utc};

// The frontend used toLocaleDateString('id-ID') for article
// dates. chrono has no Indonesian locale so the names live here.
const DAY_NAMES: [&'static str; 7] = [
  "Minggu", "Senin", "Selasa", "Rabu", "Kamis", "Jumat", "Sabtu"
];
const MONTH_NAMES: [&'static str; 12] = [
  "Januari", "Februari", "Maret", "April", "Mei", "Juni",
  "Juli", "Agustus", "September", "Oktober", "November", "Desember"
];

pub fn current_timestamp() -> i64 {
  Utc::now().timestamp()
}

// Long Indonesian date format, e.g.
// "Senin, 24 Agustus 2026 13:05".
// Everything is UTC, the old site displayed browser-local time
// but the API shouldn't depend on where the server lives.
pub fn timestamp_to_indonesian_date(timestamp: i64) -> String {
  let d: DateTime<Utc> = Utc.timestamp(timestamp, 0);
  use chrono::{Datelike, Timelike};
  format!(
    "{}, {} {} {} {:02}:{:02}",
    DAY_NAMES[d.weekday().num_days_from_sunday() as usize],
    d.day(),
    MONTH_NAMES[(d.month() - 1) as usize],
    d.year(),
    d.hour(),
    d.minute()
  )
}

// "x hari/minggu/bulan lalu" strings for the popular sidebar.
// Same day counts as one day, like the frontend did with its
// Math.ceil on the millisecond diff.
pub fn relative_time_string(timestamp: i64, now: i64) -> String {
  let diff_secs = (now - timestamp).max(0);
  let days = ((diff_secs as f64) / 86400.0).ceil().max(1.0) as i64;
  if days == 1 {
    String::from("1 hari lalu")
  } else if days < 7 {
    format!("{} hari lalu", days)
  } else if days < 30 {
    format!("{} minggu lalu", days / 7)
  } else {
    format!("{} bulan lalu", days / 30)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn indonesian_date_formats_as_expected() {
    // 2021-03-07 20:59:00 UTC was a Sunday:
    let timestamp: i64 = 1615150740;
    assert_eq!(
      "Minggu, 7 Maret 2021 20:59",
      timestamp_to_indonesian_date(timestamp)
    );
  }

  #[test]
  fn relative_time_same_day_is_one_day() {
    let now = 1_700_000_000;
    assert_eq!(relative_time_string(now - 3600, now), "1 hari lalu");
  }

  #[test]
  fn relative_time_weeks_and_months() {
    let now = 1_700_000_000;
    let day = 86400;
    assert_eq!(relative_time_string(now - 3 * day, now), "3 hari lalu");
    assert_eq!(relative_time_string(now - 14 * day, now), "2 minggu lalu");
    assert_eq!(relative_time_string(now - 65 * day, now), "2 bulan lalu");
  }
}
