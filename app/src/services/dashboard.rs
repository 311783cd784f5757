//! Dashboard figures for one franchise, with a scope-bound refresh loop.

use std::sync::Arc;
use std::time::Duration;

use chrono::{Datelike, NaiveDate, Utc};
use chrono_tz::Tz;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::error::AppError;
use crate::models::dashboard::{DashboardSnapshot, StudentBirthday, UpcomingBirthday};
use crate::repositories::DashboardRepository;
use crate::types::FranchiseId;

/// Shortest period `spawn_refresh` will poll at.
pub const MIN_REFRESH_PERIOD: Duration = Duration::from_secs(1);

/// The date `birth` is celebrated in `year`. Feb 29 falls back to Feb 28
/// outside leap years.
fn birthday_in_year(birth: NaiveDate, year: i32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, birth.month(), birth.day())
        .or_else(|| NaiveDate::from_ymd_opt(year, 2, 28))
}

fn next_birthday(birth: NaiveDate, today: NaiveDate) -> Option<NaiveDate> {
    [today.year(), today.year() + 1]
        .into_iter()
        .filter_map(|year| birthday_in_year(birth, year))
        .find(|date| *date >= today)
}

/// Students whose next birthday is within `window_days` of `today`
/// (inclusive), soonest first, then by name.
pub fn upcoming_birthdays(
    students: &[StudentBirthday],
    today: NaiveDate,
    window_days: u32,
) -> Vec<UpcomingBirthday> {
    let mut upcoming: Vec<UpcomingBirthday> = students
        .iter()
        .filter(|student| student.birth_date <= today)
        .filter_map(|student| {
            let date = next_birthday(student.birth_date, today)?;
            let days_until = (date - today).num_days();
            if days_until > i64::from(window_days) {
                return None;
            }
            let turning = u32::try_from(date.year() - student.birth_date.year()).ok()?;
            Some(UpcomingBirthday {
                student_id: student.student_id,
                full_name: student.full_name.clone(),
                date,
                turning,
                days_until,
            })
        })
        .collect();
    upcoming.sort_by(|a, b| {
        a.days_until
            .cmp(&b.days_until)
            .then_with(|| a.full_name.cmp(&b.full_name))
    });
    upcoming
}

#[derive(Clone)]
pub struct DashboardService {
    repository: Arc<dyn DashboardRepository>,
    birthday_window_days: u32,
    time_zone: Tz,
}

impl DashboardService {
    pub fn new(
        repository: Arc<dyn DashboardRepository>,
        birthday_window_days: u32,
        time_zone: Tz,
    ) -> Self {
        Self {
            repository,
            birthday_window_days,
            time_zone,
        }
    }

    /// Calendar date in the configured time zone.
    pub fn today(&self) -> NaiveDate {
        Utc::now().with_timezone(&self.time_zone).date_naive()
    }

    pub async fn snapshot(
        &self,
        franchise_id: FranchiseId,
        today: NaiveDate,
    ) -> Result<DashboardSnapshot, AppError> {
        let counts = self.repository.counts(franchise_id, today).await?;
        let students = self.repository.student_birthdays(franchise_id).await?;
        Ok(DashboardSnapshot {
            counts,
            upcoming_birthdays: upcoming_birthdays(&students, today, self.birthday_window_days),
            generated_on: today,
        })
    }

    /// Re-queries every `period` (first run immediately) until the handle is
    /// dropped. A failed refresh is logged and the previous snapshot kept.
    /// Periods below [`MIN_REFRESH_PERIOD`] are raised to it.
    pub fn spawn_refresh(&self, franchise_id: FranchiseId, period: Duration) -> RefreshHandle {
        let period = period.max(MIN_REFRESH_PERIOD);
        let (tx, rx) = watch::channel(None);
        let service = self.clone();
        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                match service.snapshot(franchise_id, service.today()).await {
                    Ok(snapshot) => {
                        if tx.send(Some(snapshot)).is_err() {
                            break;
                        }
                    }
                    Err(err) => {
                        tracing::warn!(
                            %franchise_id,
                            error = %err,
                            "Dashboard refresh failed; keeping previous snapshot"
                        );
                    }
                }
            }
        });
        tracing::debug!(%franchise_id, ?period, "Dashboard refresh started");
        RefreshHandle { rx, task }
    }
}

/// Owner of a running refresh loop; dropping it cancels the loop.
pub struct RefreshHandle {
    rx: watch::Receiver<Option<DashboardSnapshot>>,
    task: JoinHandle<()>,
}

impl RefreshHandle {
    pub fn latest(&self) -> Option<DashboardSnapshot> {
        self.rx.borrow().clone()
    }

    /// Waits for the next published snapshot.
    pub async fn changed(&mut self) -> Option<DashboardSnapshot> {
        self.rx.changed().await.ok()?;
        self.rx.borrow_and_update().clone()
    }
}

impl Drop for RefreshHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::dashboard::DashboardCounts;
    use crate::repositories::MockDashboardRepository;
    use crate::types::StudentId;
    use std::sync::atomic::{AtomicI64, Ordering};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    fn student(id: i64, name: &str, birth: NaiveDate) -> StudentBirthday {
        StudentBirthday {
            student_id: StudentId::new(id),
            full_name: name.into(),
            birth_date: birth,
        }
    }

    #[test]
    fn birthdays_inside_window_are_sorted_by_proximity() {
        let today = date(2024, 3, 10);
        let students = vec![
            student(1, "Valentina", date(2018, 3, 15)),
            student(2, "Camila", date(2019, 3, 10)),
            student(3, "Sofía", date(2017, 3, 18)),
            student(4, "Abril", date(2018, 3, 15)),
            student(5, "Lucía", date(2016, 3, 9)),
        ];

        let upcoming = upcoming_birthdays(&students, today, 7);
        let names: Vec<&str> = upcoming.iter().map(|b| b.full_name.as_str()).collect();
        assert_eq!(names, vec!["Camila", "Abril", "Valentina"]);
        assert_eq!(upcoming[0].days_until, 0);
        assert_eq!(upcoming[0].turning, 5);
        assert_eq!(upcoming[1].date, date(2024, 3, 15));
        assert_eq!(upcoming[1].turning, 6);
    }

    #[test]
    fn window_wraps_into_next_year() {
        let today = date(2024, 12, 29);
        let students = vec![student(1, "Martina", date(2019, 1, 2))];

        let upcoming = upcoming_birthdays(&students, today, 7);
        assert_eq!(upcoming.len(), 1);
        assert_eq!(upcoming[0].date, date(2025, 1, 2));
        assert_eq!(upcoming[0].days_until, 4);
        assert_eq!(upcoming[0].turning, 6);
    }

    #[test]
    fn leap_day_birthdays_fall_on_feb_28() {
        let students = vec![student(1, "Emma", date(2016, 2, 29))];

        let common_year = upcoming_birthdays(&students, date(2023, 2, 25), 7);
        assert_eq!(common_year[0].date, date(2023, 2, 28));

        let leap_year = upcoming_birthdays(&students, date(2024, 2, 25), 7);
        assert_eq!(leap_year[0].date, date(2024, 2, 29));
        assert_eq!(leap_year[0].turning, 8);
    }

    #[test]
    fn future_birth_dates_are_ignored() {
        let students = vec![student(1, "Error", date(2030, 3, 12))];
        assert!(upcoming_birthdays(&students, date(2024, 3, 10), 7).is_empty());
    }

    #[tokio::test]
    async fn snapshot_combines_counts_and_birthdays() {
        let mut repo = MockDashboardRepository::new();
        repo.expect_counts().returning(|_, _| {
            Ok(DashboardCounts {
                students: 42,
                staff: 6,
                disciplines: 4,
                active_events: 1,
            })
        });
        repo.expect_student_birthdays()
            .returning(|_| Ok(vec![student(7, "Isabella", date(2019, 5, 3))]));
        let service = DashboardService::new(Arc::new(repo), 7, chrono_tz::UTC);

        let snapshot = service
            .snapshot(FranchiseId::new(2), date(2024, 5, 1))
            .await
            .expect("snapshot");
        assert_eq!(snapshot.counts.students, 42);
        assert_eq!(snapshot.upcoming_birthdays.len(), 1);
        assert_eq!(snapshot.generated_on, date(2024, 5, 1));
    }

    fn counting_repo(calls: Arc<AtomicI64>, fail_on: Option<i64>) -> MockDashboardRepository {
        let mut repo = MockDashboardRepository::new();
        repo.expect_counts().returning(move |_, _| {
            let call = calls.fetch_add(1, Ordering::SeqCst) + 1;
            if Some(call) == fail_on {
                return Err(AppError::InternalServerError(anyhow::anyhow!("busy")));
            }
            Ok(DashboardCounts {
                students: call,
                ..DashboardCounts::default()
            })
        });
        repo.expect_student_birthdays().returning(|_| Ok(Vec::new()));
        repo
    }

    #[tokio::test(start_paused = true)]
    async fn refresh_loop_requeries_each_period() {
        let calls = Arc::new(AtomicI64::new(0));
        let service = DashboardService::new(
            Arc::new(counting_repo(calls.clone(), None)),
            7,
            chrono_tz::UTC,
        );
        let mut handle = service.spawn_refresh(FranchiseId::new(1), Duration::from_secs(30));

        let first = handle.changed().await.expect("first snapshot");
        assert_eq!(first.counts.students, 1);
        let second = handle.changed().await.expect("second snapshot");
        assert_eq!(second.counts.students, 2);
        assert_eq!(handle.latest(), Some(second));
    }

    #[tokio::test(start_paused = true)]
    async fn failed_refresh_keeps_previous_snapshot() {
        let calls = Arc::new(AtomicI64::new(0));
        let service = DashboardService::new(
            Arc::new(counting_repo(calls.clone(), Some(2))),
            7,
            chrono_tz::UTC,
        );
        let mut handle = service.spawn_refresh(FranchiseId::new(1), Duration::from_secs(5));

        let first = handle.changed().await.expect("first snapshot");
        assert_eq!(first.counts.students, 1);
        let next = handle.changed().await.expect("next snapshot");
        assert_eq!(next.counts.students, 3);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_the_handle_stops_the_loop() {
        let calls = Arc::new(AtomicI64::new(0));
        let service = DashboardService::new(
            Arc::new(counting_repo(calls.clone(), None)),
            7,
            chrono_tz::UTC,
        );
        let mut handle = service.spawn_refresh(FranchiseId::new(1), Duration::from_secs(30));
        handle.changed().await.expect("first snapshot");
        drop(handle);

        tokio::time::sleep(Duration::from_secs(600)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn zero_period_is_raised_to_the_minimum() {
        let calls = Arc::new(AtomicI64::new(0));
        let service = DashboardService::new(
            Arc::new(counting_repo(calls.clone(), None)),
            7,
            chrono_tz::UTC,
        );
        let mut handle = service.spawn_refresh(FranchiseId::new(1), Duration::ZERO);

        let first = handle.changed().await.expect("first snapshot");
        assert_eq!(first.counts.students, 1);
        let started = tokio::time::Instant::now();
        let second = handle.changed().await.expect("second snapshot");
        assert_eq!(second.counts.students, 2);
        assert!(started.elapsed() >= MIN_REFRESH_PERIOD);
    }
}
