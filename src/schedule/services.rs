use std::sync::Arc;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use tracing::debug;

use super::interval::filter_by_interval;
use super::repo::{EntityRepository, EntityStoreError, UpdateRejected};
use super::repo_types::Scheduled;

/// Timezone-aware reads and normalising writes over one entity store.
pub struct ScheduleService<T: Scheduled> {
    repo: Arc<dyn EntityRepository<T>>,
}

impl<T: Scheduled> ScheduleService<T> {
    pub fn new(repo: Arc<dyn EntityRepository<T>>) -> Self {
        Self { repo }
    }

    /// Every entity rendered in `tz`, optionally narrowed to an interval
    /// keyword (`day`, `week`, `month`, `year`).
    pub async fn get_all(
        &self,
        interval: Option<&str>,
        tz: &Tz,
    ) -> Result<Vec<T>, EntityStoreError> {
        self.get_all_at(interval, tz, Utc::now()).await
    }

    pub(crate) async fn get_all_at(
        &self,
        interval: Option<&str>,
        tz: &Tz,
        now: DateTime<Utc>,
    ) -> Result<Vec<T>, EntityStoreError> {
        let mut items = self.repo.get_all().await?;
        for item in &mut items {
            item.render_in(tz);
        }
        let items = filter_by_interval(items, interval, now);
        debug!(kind = T::KIND, count = items.len(), ?interval, "listed");
        Ok(items)
    }

    pub async fn get(&self, id: u64, tz: &Tz) -> Result<T, EntityStoreError> {
        let mut item = self.repo.get(id).await?;
        item.render_in(tz);
        Ok(item)
    }

    pub async fn create(&self, mut entity: T) -> Result<T, EntityStoreError> {
        entity.normalize();
        self.repo.create(entity).await
    }

    /// On a miss the caller's entity comes back as sent, aside from the id.
    pub async fn update(&self, id: u64, entity: T) -> Result<T, UpdateRejected<T>> {
        let mut normalized = entity.clone();
        normalized.normalize();
        self.repo
            .update(id, normalized)
            .await
            .map_err(|rejected| {
                let mut entity = entity;
                entity.set_id(id);
                UpdateRejected {
                    entity,
                    error: rejected.error,
                }
            })
    }

    pub async fn delete(&self, id: u64) -> Result<(), EntityStoreError> {
        self.repo.delete(id).await
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, FixedOffset, TimeZone};

    use super::*;
    use crate::schedule::repo::InMemoryRepository;
    use crate::schedule::repo_types::{Event, Notification};

    fn service<T: Scheduled>() -> ScheduleService<T> {
        ScheduleService::new(Arc::new(InMemoryRepository::<T>::new()))
    }

    fn event_at(title: &str, time: DateTime<FixedOffset>) -> Event {
        Event {
            id: 0,
            title: title.into(),
            description: String::new(),
            time_utc: DateTime::<Utc>::default(),
            time,
        }
    }

    #[tokio::test]
    async fn create_derives_time_utc_from_time() {
        let svc = service::<Event>();
        let plus3 = FixedOffset::east_opt(3 * 3600).unwrap();
        let created = svc
            .create(event_at("standup", plus3.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()))
            .await
            .unwrap();
        assert_eq!(created.id, 1);
        assert_eq!(
            created.time_utc,
            Utc.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).unwrap()
        );
    }

    #[tokio::test]
    async fn reads_render_in_the_callers_zone() {
        let svc = service::<Event>();
        let utc = FixedOffset::east_opt(0).unwrap();
        svc.create(event_at("a", utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap()))
            .await
            .unwrap();

        let tokyo = svc.get(1, &Tz::Asia__Tokyo).await.unwrap();
        assert_eq!(tokyo.time.offset().local_minus_utc(), 9 * 3600);
        assert_eq!(tokyo.time.with_timezone(&Utc), tokyo.time_utc);

        let all = svc.get_all(None, &Tz::America__New_York).await.unwrap();
        assert_eq!(all[0].time.offset().local_minus_utc(), -5 * 3600);
    }

    #[tokio::test]
    async fn get_all_filters_by_interval() {
        let svc = service::<Notification>();
        let now = Utc.with_ymd_and_hms(2024, 5, 20, 12, 0, 0).unwrap();
        for (title, age) in [("fresh", 2), ("stale", 10)] {
            let time = (now - Duration::days(age)).fixed_offset();
            svc.create(Notification {
                id: 0,
                title: title.into(),
                description: String::new(),
                time_utc: DateTime::<Utc>::default(),
                time,
            })
            .await
            .unwrap();
        }

        let week = svc.get_all_at(Some("week"), &Tz::UTC, now).await.unwrap();
        assert_eq!(week.len(), 1);
        assert_eq!(week[0].title, "fresh");

        let year = svc.get_all_at(Some("year"), &Tz::UTC, now).await.unwrap();
        assert_eq!(year.len(), 2);

        let bogus = svc.get_all_at(Some("decade"), &Tz::UTC, now).await.unwrap();
        assert_eq!(bogus.len(), 2);
    }

    #[tokio::test]
    async fn update_normalizes_and_reports_missing_ids() {
        let svc = service::<Event>();
        let utc = FixedOffset::east_opt(0).unwrap();
        svc.create(event_at("a", utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()))
            .await
            .unwrap();

        let minus2 = FixedOffset::west_opt(2 * 3600).unwrap();
        let moved = event_at("a", minus2.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap());
        let updated = svc.update(1, moved.clone()).await.unwrap();
        assert_eq!(
            updated.time_utc,
            Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap()
        );

        let rejected = svc.update(42, moved.clone()).await.unwrap_err();
        assert_eq!(rejected.entity, Event { id: 42, ..moved });
        assert_eq!(rejected.entity.time_utc, DateTime::<Utc>::default());
        assert_eq!(
            rejected.error,
            EntityStoreError::NotFound { kind: "event", id: 42 }
        );
    }

    #[tokio::test]
    async fn delete_then_get_is_not_found() {
        let svc = service::<Event>();
        let utc = FixedOffset::east_opt(0).unwrap();
        svc.create(event_at("a", utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()))
            .await
            .unwrap();
        svc.delete(1).await.unwrap();
        assert!(svc.get(1, &Tz::UTC).await.is_err());
        assert!(svc.delete(1).await.is_err());
    }
}
