//! Settings-driven notification scheduler
//!
//! Owns at most one recurring job. The job has no state of its own: every
//! `recompute` re-derives the trigger from the current settings row, tears
//! down whatever was running, and spawns a fresh loop. All schedule
//! arithmetic is UTC.

use std::sync::Arc;

use chrono::{DateTime, Duration, NaiveTime, Timelike, Utc};
use rand::Rng;
use sqlx::SqlitePool;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use crate::domain::settings;
use crate::error::ApiError;
use crate::models::Settings;
use crate::notify::{self, NotificationSink};

// Fixed-schedule hourly mode fires only within this daytime window. It
// intentionally ignores the configured start_time/end_time, preserving the
// reference behavior.
const FIXED_HOURLY_START: u32 = 9;
const FIXED_HOURLY_END: u32 = 17;

/// How the recurring job fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// Repeatedly at a fixed period, starting one period from now
    Every { minutes: u64 },
    /// Once per day at the given time of day
    DailyAt { time: NaiveTime },
    /// At the top of every hour within the inclusive hour window
    HourlyBetween { start_hour: u32, end_hour: u32 },
}

impl Trigger {
    /// Next fire instant strictly after `now`. `None` for interval
    /// triggers, which tick on their own clock.
    pub fn next_fire(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match *self {
            Trigger::Every { .. } => None,
            Trigger::DailyAt { time } => {
                let today = now.date_naive().and_time(time).and_utc();
                Some(if today > now {
                    today
                } else {
                    today + Duration::days(1)
                })
            }
            Trigger::HourlyBetween {
                start_hour,
                end_hour,
            } => {
                let midnight = now.date_naive().and_time(NaiveTime::MIN).and_utc();
                let next_hour = now.hour() + 1;
                let fire = if next_hour < start_hour {
                    midnight + Duration::hours(i64::from(start_hour))
                } else if next_hour <= end_hour {
                    midnight + Duration::hours(i64::from(next_hour))
                } else {
                    midnight + Duration::days(1) + Duration::hours(i64::from(start_hour))
                };
                Some(fire)
            }
        }
    }
}

/// Derive the job trigger from a settings row.
///
/// Random mode draws a fixed interval from a frequency-dependent range.
/// Fixed mode schedules cron-like times; "custom" fixed schedules are an
/// unimplemented placeholder and yield no job.
pub fn derive_trigger<R: Rng>(settings: &Settings, rng: &mut R) -> Option<Trigger> {
    if settings.random_mode {
        let minutes = match settings.notification_frequency.as_str() {
            "hourly" => rng.random_range(30..=90),
            "daily" => rng.random_range(720..=1440),
            _ => rng.random_range(15..=180),
        };
        return Some(Trigger::Every { minutes });
    }

    match settings.notification_frequency.as_str() {
        "hourly" => Some(Trigger::HourlyBetween {
            start_hour: FIXED_HOURLY_START,
            end_hour: FIXED_HOURLY_END,
        }),
        "daily" => match parse_hhmm(&settings.start_time) {
            Some(time) => Some(Trigger::DailyAt { time }),
            None => {
                tracing::warn!(
                    "unparsable start_time '{}'; no job scheduled",
                    settings.start_time
                );
                None
            }
        },
        _ => None,
    }
}

fn parse_hhmm(s: &str) -> Option<NaiveTime> {
    let (hour, minute) = s.split_once(':')?;
    NaiveTime::from_hms_opt(hour.trim().parse().ok()?, minute.trim().parse().ok()?, 0)
}

/// Owns the single recurring "show tweet" job.
pub struct Scheduler {
    db: SqlitePool,
    sink: Arc<dyn NotificationSink>,
    // Also serializes recompute itself, so two concurrent recomputes can
    // never interleave their remove/add steps.
    job: Mutex<Option<JoinHandle<()>>>,
}

impl Scheduler {
    pub fn new(db: SqlitePool, sink: Arc<dyn NotificationSink>) -> Self {
        Self {
            db,
            sink,
            job: Mutex::new(None),
        }
    }

    /// Tear down the current job (if any) and re-derive it from the current
    /// settings row. A missing row or a non-scheduling settings combination
    /// leaves no job running.
    pub async fn recompute(&self) -> Result<(), ApiError> {
        let mut job = self.job.lock().await;
        if let Some(handle) = job.take() {
            handle.abort();
        }

        let Some(settings) = settings::get_row(&self.db).await? else {
            tracing::warn!("settings row missing; no notification job scheduled");
            return Ok(());
        };

        let Some(trigger) = derive_trigger(&settings, &mut rand::rng()) else {
            tracing::info!(
                "no notification job for frequency='{}' random_mode={}",
                settings.notification_frequency,
                settings.random_mode
            );
            return Ok(());
        };

        tracing::info!("scheduling notification job: {:?}", trigger);
        let db = self.db.clone();
        let sink = Arc::clone(&self.sink);
        *job = Some(tokio::spawn(run_job(db, sink, trigger)));
        Ok(())
    }

    /// Whether a recurring job is currently scheduled.
    #[allow(dead_code)]
    pub async fn has_job(&self) -> bool {
        self.job.lock().await.is_some()
    }
}

async fn run_job(db: SqlitePool, sink: Arc<dyn NotificationSink>, trigger: Trigger) {
    match trigger {
        Trigger::Every { minutes } => {
            let period = std::time::Duration::from_secs(minutes * 60);
            let mut interval =
                tokio::time::interval_at(tokio::time::Instant::now() + period, period);
            loop {
                interval.tick().await;
                fire(&db, sink.as_ref()).await;
            }
        }
        _ => loop {
            let now = Utc::now();
            let Some(next) = trigger.next_fire(now) else {
                return;
            };
            let wait = (next - now).to_std().unwrap_or_default();
            tokio::time::sleep(wait).await;
            fire(&db, sink.as_ref()).await;
        },
    }
}

async fn fire(db: &SqlitePool, sink: &dyn NotificationSink) {
    if let Err(e) = notify::show_tweet(db, sink).await {
        tracing::warn!("notification job failed: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_pool;
    use crate::domain::settings::SettingsPatch;
    use crate::notify::ConsoleSink;
    use chrono::{Datelike, TimeZone};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn settings_row(frequency: &str, start_time: &str, random_mode: bool) -> Settings {
        Settings {
            notification_frequency: frequency.to_string(),
            active_tweetbook_id: 1,
            start_time: start_time.to_string(),
            end_time: "17:00".to_string(),
            random_mode,
        }
    }

    #[test]
    fn test_random_mode_interval_ranges() {
        let mut rng = StdRng::seed_from_u64(7);
        for (frequency, lo, hi) in [
            ("hourly", 30, 90),
            ("daily", 720, 1440),
            ("custom", 15, 180),
            ("garbage", 15, 180),
        ] {
            for _ in 0..200 {
                let trigger =
                    derive_trigger(&settings_row(frequency, "09:00", true), &mut rng).unwrap();
                let Trigger::Every { minutes } = trigger else {
                    panic!("expected interval trigger, got {:?}", trigger);
                };
                assert!(
                    (lo..=hi).contains(&minutes),
                    "{frequency}: {minutes} outside [{lo}, {hi}]"
                );
            }
        }
    }

    #[test]
    fn test_fixed_daily_fires_at_start_time() {
        let mut rng = StdRng::seed_from_u64(7);
        let trigger = derive_trigger(&settings_row("daily", "09:30", false), &mut rng).unwrap();
        assert_eq!(
            trigger,
            Trigger::DailyAt {
                time: NaiveTime::from_hms_opt(9, 30, 0).unwrap()
            }
        );

        let now = Utc.with_ymd_and_hms(2026, 2, 22, 7, 0, 0).unwrap();
        let next = trigger.next_fire(now).unwrap();
        assert_eq!(next.hour(), 9);
        assert_eq!(next.minute(), 30);
        assert_eq!(next.day(), 22);

        // Already past today's slot: fires tomorrow.
        let later = Utc.with_ymd_and_hms(2026, 2, 22, 9, 30, 0).unwrap();
        let next = trigger.next_fire(later).unwrap();
        assert_eq!(next.day(), 23);
        assert_eq!(next.hour(), 9);
        assert_eq!(next.minute(), 30);
    }

    #[test]
    fn test_fixed_hourly_uses_hardcoded_window() {
        let mut rng = StdRng::seed_from_u64(7);
        // The configured start_time plays no part in fixed-hourly mode.
        let trigger = derive_trigger(&settings_row("hourly", "13:45", false), &mut rng).unwrap();
        assert_eq!(
            trigger,
            Trigger::HourlyBetween {
                start_hour: 9,
                end_hour: 17
            }
        );

        let cases = [
            // before the window: first slot of the day
            ((8, 30), (22, 9)),
            // inside the window: next top of hour
            ((12, 10), (22, 13)),
            // 17:xx still fires at 17 the next day, not 18 today
            ((17, 30), (23, 9)),
            ((23, 40), (23, 9)),
        ];
        for ((hour, minute), (day, fire_hour)) in cases {
            let now = Utc.with_ymd_and_hms(2026, 2, 22, hour, minute, 0).unwrap();
            let next = trigger.next_fire(now).unwrap();
            assert_eq!((next.day(), next.hour(), next.minute()), (day, fire_hour, 0));
        }
    }

    #[test]
    fn test_fixed_custom_schedules_nothing() {
        let mut rng = StdRng::seed_from_u64(7);
        assert!(derive_trigger(&settings_row("custom", "09:00", false), &mut rng).is_none());
        assert!(derive_trigger(&settings_row("weekly", "09:00", false), &mut rng).is_none());
    }

    #[test]
    fn test_bad_start_time_schedules_nothing() {
        let mut rng = StdRng::seed_from_u64(7);
        assert!(derive_trigger(&settings_row("daily", "9am", false), &mut rng).is_none());
        assert!(derive_trigger(&settings_row("daily", "25:00", false), &mut rng).is_none());
    }

    #[tokio::test]
    async fn test_recompute_follows_settings() {
        let pool = test_pool().await;
        let scheduler = Scheduler::new(pool.clone(), Arc::new(ConsoleSink));

        // Default settings are hourly + random mode: a job gets scheduled.
        scheduler.recompute().await.unwrap();
        assert!(scheduler.has_job().await);

        // Fixed custom mode schedules nothing and tears the old job down.
        let patch = SettingsPatch {
            notification_frequency: Some("custom".to_string()),
            random_mode: Some(false),
            ..Default::default()
        };
        settings::update(&pool, &patch).await.unwrap();
        scheduler.recompute().await.unwrap();
        assert!(!scheduler.has_job().await);
    }
}
