//! # Usage Audit Queries
//!
//! Billing-style existence queries: which records held payload bytes
//! during a given calendar period. A record counts when it had bytes and
//! either is still live (created no later than the period end) or was
//! soft-deleted inside or after the period (created before the end,
//! deleted at or after the start). Soft-deleted records are retained by
//! the repository precisely so these queries stay answerable.

use chrono::{DateTime, Datelike, Duration, NaiveTime, Timelike, Utc};
use gallery_core::{Image, RegistryError, RequestContext, Timestamp};

use crate::filter::{FilterSet, LocationExclusion};
use crate::repo::ImageRepository;

/// Calendar period granularity for existence audits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditPeriod {
    Hour,
    Day,
    Week,
    Month,
}

impl AuditPeriod {
    pub fn parse(s: &str) -> Result<Self, RegistryError> {
        match s {
            "hour" => Ok(Self::Hour),
            "day" => Ok(Self::Day),
            "week" => Ok(Self::Week),
            "month" => Ok(Self::Month),
            other => Err(RegistryError::bad_request(format!(
                "unknown audit period '{other}'"
            ))),
        }
    }
}

/// The inclusive `[start, end]` bounds of the period containing `now`.
///
/// Bounds are aligned to the calendar: an `Hour` period starts on the
/// hour, a `Week` on Monday, a `Month` on the first. The end is the last
/// representable second of the period, matching the registry's
/// second-truncated timestamps.
pub fn period_range(period: AuditPeriod, now: DateTime<Utc>) -> (Timestamp, Timestamp) {
    let day_start = now.date_naive().and_time(NaiveTime::MIN).and_utc();
    let (start, next) = match period {
        AuditPeriod::Hour => {
            let start = day_start + Duration::hours(i64::from(now.hour()));
            (start, start + Duration::hours(1))
        }
        AuditPeriod::Day => (day_start, day_start + Duration::days(1)),
        AuditPeriod::Week => {
            let weekday = i64::from(now.date_naive().weekday().num_days_from_monday());
            let start = day_start - Duration::days(weekday);
            (start, start + Duration::days(7))
        }
        AuditPeriod::Month => {
            let start = day_start - Duration::days(i64::from(now.day() - 1));
            let days_in_month = {
                let next_first = if now.month() == 12 {
                    start.date_naive().with_year(now.year() + 1).and_then(|d| d.with_month(1))
                } else {
                    start.date_naive().with_month(now.month() + 1)
                };
                next_first
                    .map(|d| (d - start.date_naive()).num_days())
                    .unwrap_or(30)
            };
            (start, start + Duration::days(days_in_month))
        }
    };
    (
        Timestamp::from_utc(start),
        Timestamp::from_utc(next - Duration::seconds(1)),
    )
}

/// Records that held payload bytes during the period.
///
/// Two passes over the repository: live records created by the period
/// end, and soft-deleted records created by the end whose deletion
/// happened at or after the start. Both restrict to records with a
/// store locator.
pub fn exists_images(
    repo: &dyn ImageRepository,
    ctx: &RequestContext,
    period_start: Timestamp,
    period_end: Timestamp,
) -> Result<Vec<Image>, RegistryError> {
    let live = FilterSet {
        location_not: Some(LocationExclusion::Unset),
        created_at_max: Some(period_end),
        deleted: Some(false),
        ..Default::default()
    };
    let removed = FilterSet {
        location_not: Some(LocationExclusion::Unset),
        created_at_max: Some(period_end),
        deleted: Some(true),
        deleted_at_min: Some(period_start),
        ..Default::default()
    };

    let mut matched: Vec<Image> = repo
        .list(ctx, &live)?
        .into_iter()
        .filter(|image| live.matches(image))
        .collect();
    matched.extend(
        repo.list(ctx, &removed)?
            .into_iter()
            .filter(|image| removed.matches(image)),
    );
    Ok(matched)
}

#[cfg(test)]
mod tests {
    use gallery_core::{ImageDelta, ImageId, ImageStatus};

    use super::*;
    use crate::memory::MemoryRepository;

    fn ts(s: &str) -> Timestamp {
        Timestamp::parse(s).unwrap()
    }

    fn at(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    fn record(created: &str, location: Option<&str>) -> Image {
        let ctx = RequestContext::for_tenant("user-1", "tenant-1");
        let mut image = Image::from_delta(&ctx, ImageDelta::default());
        image.id = ImageId::generate();
        image.created_at = ts(created);
        image.updated_at = ts(created);
        image.location = location.map(str::to_string);
        image
    }

    #[test]
    fn test_period_parse() {
        assert_eq!(AuditPeriod::parse("day").unwrap(), AuditPeriod::Day);
        assert!(AuditPeriod::parse("fortnight").is_err());
    }

    #[test]
    fn test_hour_range() {
        let (start, end) = period_range(AuditPeriod::Hour, at("2026-08-29T14:37:12Z"));
        assert_eq!(start, ts("2026-08-29T14:00:00Z"));
        assert_eq!(end, ts("2026-08-29T14:59:59Z"));
    }

    #[test]
    fn test_day_range() {
        let (start, end) = period_range(AuditPeriod::Day, at("2026-08-29T14:37:12Z"));
        assert_eq!(start, ts("2026-08-29T00:00:00Z"));
        assert_eq!(end, ts("2026-08-29T23:59:59Z"));
    }

    #[test]
    fn test_week_range_starts_monday() {
        // 2026-08-29 is a Saturday; the week began Monday the 24th.
        let (start, end) = period_range(AuditPeriod::Week, at("2026-08-29T14:37:12Z"));
        assert_eq!(start, ts("2026-08-24T00:00:00Z"));
        assert_eq!(end, ts("2026-08-30T23:59:59Z"));
    }

    #[test]
    fn test_month_range() {
        let (start, end) = period_range(AuditPeriod::Month, at("2026-02-10T08:00:00Z"));
        assert_eq!(start, ts("2026-02-01T00:00:00Z"));
        assert_eq!(end, ts("2026-02-28T23:59:59Z"));
    }

    #[test]
    fn test_december_rolls_into_next_year() {
        let (start, end) = period_range(AuditPeriod::Month, at("2025-12-15T00:00:00Z"));
        assert_eq!(start, ts("2025-12-01T00:00:00Z"));
        assert_eq!(end, ts("2025-12-31T23:59:59Z"));
    }

    #[test]
    fn test_exists_counts_live_and_period_deleted() {
        let repo = MemoryRepository::new();
        let ctx = RequestContext::admin();

        // Live with bytes, created before the period.
        let live = record("2026-08-01T00:00:00Z", Some("store://a"));
        repo.insert(live.clone());

        // Deleted inside the period: still counts.
        let mut deleted_in = record("2026-08-01T00:00:00Z", Some("store://b"));
        deleted_in.deleted = true;
        deleted_in.deleted_at = Some(ts("2026-08-29T10:00:00Z"));
        deleted_in.status = ImageStatus::Deleted;
        repo.insert(deleted_in.clone());

        // Deleted before the period: no longer counts.
        let mut deleted_before = record("2026-08-01T00:00:00Z", Some("store://c"));
        deleted_before.deleted = true;
        deleted_before.deleted_at = Some(ts("2026-08-20T10:00:00Z"));
        deleted_before.status = ImageStatus::Deleted;
        repo.insert(deleted_before);

        // No bytes ever: never counts.
        repo.insert(record("2026-08-01T00:00:00Z", None));

        // Created after the period end: not yet counted.
        repo.insert(record("2026-09-05T00:00:00Z", Some("store://d")));

        let (start, end) = period_range(AuditPeriod::Day, at("2026-08-29T12:00:00Z"));
        let matched = exists_images(&repo, &ctx, start, end).unwrap();
        let ids: Vec<ImageId> = matched.iter().map(|i| i.id).collect();
        assert_eq!(matched.len(), 2);
        assert!(ids.contains(&live.id));
        assert!(ids.contains(&deleted_in.id));
    }
}
