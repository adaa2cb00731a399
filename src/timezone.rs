//! Works out the user's local date, which decides which expense dates are in
//! the future.

use time::{Date, OffsetDateTime, UtcOffset};
use time_tz::{Offset, TimeZone};

use crate::Error;

/// The current UTC offset of a canonical timezone such as "Pacific/Auckland".
pub fn get_local_offset(canonical_timezone: &str) -> Option<UtcOffset> {
    time_tz::timezones::get_by_name(canonical_timezone)
        .map(|tz| tz.get_offset_utc(&OffsetDateTime::now_utc()).to_utc())
}

/// The UTC offset to treat as local time.
///
/// A configured timezone wins. Without one the operating system's offset is
/// used, and if that cannot be determined, UTC.
///
/// # Errors
/// Returns [Error::InvalidTimezone] if `canonical_timezone` is not a known
/// timezone name.
pub fn resolve_local_offset(canonical_timezone: Option<&str>) -> Result<UtcOffset, Error> {
    match canonical_timezone {
        Some(timezone) => get_local_offset(timezone).ok_or_else(|| {
            tracing::error!("Invalid timezone {timezone}");
            Error::InvalidTimezone(timezone.to_owned())
        }),
        None => Ok(UtcOffset::current_local_offset().unwrap_or_else(|error| {
            tracing::warn!("Could not get the local UTC offset, using UTC: {error}");
            UtcOffset::UTC
        })),
    }
}

/// Today's date at `offset`.
pub fn today(offset: UtcOffset) -> Date {
    OffsetDateTime::now_utc().to_offset(offset).date()
}
