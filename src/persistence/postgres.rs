//! PostgreSQL implementation of the store contract.
//!
//! Every mutation that touches both tables runs in a single transaction.
//! Bookings lock the target date's schedule row (`SELECT … FOR UPDATE`) so
//! concurrent requests for the same date serialize at the store; the
//! `UNIQUE (date, time)` index on `appointments` is the backstop for the
//! race window when no schedule row exists to lock.

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use super::models::{AppointmentRow, ScheduleRow};
use super::BookingStore;
use crate::domain::{Appointment, AppointmentDraft, AppointmentId, DaySchedule, SlotTime};
use crate::error::BookingError;

const SELECT_APPOINTMENT: &str = "SELECT id, date, time, service, client_name, client_phone, \
     client_email, note, created_at FROM appointments";

/// PostgreSQL-backed store using `sqlx::PgPool`.
#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Creates a new store with the given connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Loads and row-locks the schedule for `date` inside `tx`.
    async fn schedule_for_update(
        tx: &mut Transaction<'_, Postgres>,
        date: NaiveDate,
    ) -> Result<Option<DaySchedule>, BookingError> {
        let row = sqlx::query_as::<_, ScheduleRow>(
            "SELECT date, slots FROM schedules WHERE date = $1 FOR UPDATE",
        )
        .bind(date)
        .fetch_optional(&mut **tx)
        .await
        .map_err(store_error)?;
        row.map(DaySchedule::try_from).transpose()
    }

    /// Writes a schedule's slot list back inside `tx`.
    async fn write_slots(
        tx: &mut Transaction<'_, Postgres>,
        schedule: &DaySchedule,
    ) -> Result<(), BookingError> {
        let slots: Vec<String> = schedule
            .slots
            .iter()
            .map(|slot| slot.as_str().to_string())
            .collect();
        sqlx::query("UPDATE schedules SET slots = $2 WHERE date = $1")
            .bind(schedule.date)
            .bind(&slots)
            .execute(&mut **tx)
            .await
            .map_err(store_error)?;
        Ok(())
    }
}

#[async_trait]
impl BookingStore for PostgresStore {
    async fn upsert_schedule(&self, schedule: DaySchedule) -> Result<DaySchedule, BookingError> {
        let slots: Vec<String> = schedule
            .slots
            .iter()
            .map(|slot| slot.as_str().to_string())
            .collect();
        sqlx::query(
            "INSERT INTO schedules (date, slots) VALUES ($1, $2) \
             ON CONFLICT (date) DO UPDATE SET slots = EXCLUDED.slots",
        )
        .bind(schedule.date)
        .bind(&slots)
        .execute(&self.pool)
        .await
        .map_err(store_error)?;
        Ok(schedule)
    }

    async fn fetch_schedule(&self, date: NaiveDate) -> Result<Option<DaySchedule>, BookingError> {
        let row = sqlx::query_as::<_, ScheduleRow>(
            "SELECT date, slots FROM schedules WHERE date = $1",
        )
        .bind(date)
        .fetch_optional(&self.pool)
        .await
        .map_err(store_error)?;
        row.map(DaySchedule::try_from).transpose()
    }

    async fn list_schedules(&self) -> Result<Vec<DaySchedule>, BookingError> {
        let rows = sqlx::query_as::<_, ScheduleRow>(
            "SELECT date, slots FROM schedules ORDER BY date ASC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(store_error)?;
        rows.into_iter().map(DaySchedule::try_from).collect()
    }

    async fn delete_schedule(&self, date: NaiveDate) -> Result<Option<DaySchedule>, BookingError> {
        let row = sqlx::query_as::<_, ScheduleRow>(
            "DELETE FROM schedules WHERE date = $1 RETURNING date, slots",
        )
        .bind(date)
        .fetch_optional(&self.pool)
        .await
        .map_err(store_error)?;
        row.map(DaySchedule::try_from).transpose()
    }

    async fn consume_slot(&self, date: NaiveDate, time: &SlotTime) -> Result<bool, BookingError> {
        let mut tx = self.pool.begin().await.map_err(store_error)?;
        let Some(mut schedule) = Self::schedule_for_update(&mut tx, date).await? else {
            return Ok(false);
        };
        let removed = schedule.consume(time);
        if removed {
            Self::write_slots(&mut tx, &schedule).await?;
            tx.commit().await.map_err(store_error)?;
        }
        Ok(removed)
    }

    async fn restore_slot(&self, date: NaiveDate, time: &SlotTime) -> Result<(), BookingError> {
        let mut tx = self.pool.begin().await.map_err(store_error)?;
        let Some(mut schedule) = Self::schedule_for_update(&mut tx, date).await? else {
            return Ok(());
        };
        if !schedule.contains(time) {
            schedule.restore(time);
            Self::write_slots(&mut tx, &schedule).await?;
            tx.commit().await.map_err(store_error)?;
        }
        Ok(())
    }

    async fn booked_times(&self, date: NaiveDate) -> Result<Vec<SlotTime>, BookingError> {
        let rows = sqlx::query_as::<_, (String,)>(
            "SELECT time FROM appointments WHERE date = $1 ORDER BY time ASC",
        )
        .bind(date)
        .fetch_all(&self.pool)
        .await
        .map_err(store_error)?;
        rows.into_iter()
            .map(|(label,)| {
                SlotTime::parse(&label)
                    .map_err(|_| BookingError::Store(format!("corrupt time label {label:?}")))
            })
            .collect()
    }

    async fn list_appointments(&self) -> Result<Vec<Appointment>, BookingError> {
        let rows = sqlx::query_as::<_, AppointmentRow>(&format!(
            "{SELECT_APPOINTMENT} ORDER BY date ASC, time ASC"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(store_error)?;
        rows.into_iter().map(Appointment::try_from).collect()
    }

    async fn fetch_appointment(
        &self,
        id: AppointmentId,
    ) -> Result<Option<Appointment>, BookingError> {
        let row = sqlx::query_as::<_, AppointmentRow>(&format!(
            "{SELECT_APPOINTMENT} WHERE id = $1"
        ))
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(store_error)?;
        row.map(Appointment::try_from).transpose()
    }

    async fn insert_appointment(
        &self,
        draft: AppointmentDraft,
    ) -> Result<Appointment, BookingError> {
        let mut tx = self.pool.begin().await.map_err(store_error)?;

        // Lock the schedule row first; concurrent bookings for the same
        // date serialize here.
        let schedule = Self::schedule_for_update(&mut tx, draft.date).await?;

        let taken = sqlx::query_as::<_, (Uuid,)>(
            "SELECT id FROM appointments WHERE date = $1 AND time = $2",
        )
        .bind(draft.date)
        .bind(draft.time.as_str())
        .fetch_optional(&mut *tx)
        .await
        .map_err(store_error)?;
        if taken.is_some() {
            return Err(BookingError::SlotConflict {
                date: draft.date,
                time: draft.time.clone(),
            });
        }

        let id = AppointmentId::new();
        let row = sqlx::query_as::<_, AppointmentRow>(
            "INSERT INTO appointments \
             (id, date, time, service, client_name, client_phone, client_email, note) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING id, date, time, service, client_name, client_phone, client_email, \
             note, created_at",
        )
        .bind(id.as_uuid())
        .bind(draft.date)
        .bind(draft.time.as_str())
        .bind(&draft.service)
        .bind(&draft.client_name)
        .bind(&draft.client_phone)
        .bind(&draft.client_email)
        .bind(&draft.note)
        .fetch_one(&mut *tx)
        .await
        .map_err(|err| conflict_or_store(err, draft.date, &draft.time))?;

        if let Some(mut schedule) = schedule
            && schedule.consume(&draft.time)
        {
            Self::write_slots(&mut tx, &schedule).await?;
        }

        tx.commit().await.map_err(store_error)?;
        Appointment::try_from(row)
    }

    async fn delete_appointment(
        &self,
        id: AppointmentId,
    ) -> Result<Option<Appointment>, BookingError> {
        let mut tx = self.pool.begin().await.map_err(store_error)?;

        let Some(row) = sqlx::query_as::<_, AppointmentRow>(&format!(
            "{SELECT_APPOINTMENT} WHERE id = $1 FOR UPDATE"
        ))
        .bind(id.as_uuid())
        .fetch_optional(&mut *tx)
        .await
        .map_err(store_error)?
        else {
            return Ok(None);
        };
        let appointment = Appointment::try_from(row)?;

        sqlx::query("DELETE FROM appointments WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&mut *tx)
            .await
            .map_err(store_error)?;

        if let Some(mut schedule) =
            Self::schedule_for_update(&mut tx, appointment.date).await?
        {
            schedule.restore(&appointment.time);
            Self::write_slots(&mut tx, &schedule).await?;
        }

        tx.commit().await.map_err(store_error)?;
        Ok(Some(appointment))
    }

    async fn replace_appointment(
        &self,
        updated: Appointment,
    ) -> Result<Option<Appointment>, BookingError> {
        let mut tx = self.pool.begin().await.map_err(store_error)?;

        let Some(old_row) = sqlx::query_as::<_, AppointmentRow>(&format!(
            "{SELECT_APPOINTMENT} WHERE id = $1 FOR UPDATE"
        ))
        .bind(updated.id.as_uuid())
        .fetch_optional(&mut *tx)
        .await
        .map_err(store_error)?
        else {
            return Ok(None);
        };
        let old = Appointment::try_from(old_row)?;
        let slot_moved = (old.date, &old.time) != (updated.date, &updated.time);

        if slot_moved {
            let taken = sqlx::query_as::<_, (Uuid,)>(
                "SELECT id FROM appointments WHERE date = $1 AND time = $2 AND id <> $3",
            )
            .bind(updated.date)
            .bind(updated.time.as_str())
            .bind(updated.id.as_uuid())
            .fetch_optional(&mut *tx)
            .await
            .map_err(store_error)?;
            if taken.is_some() {
                return Err(BookingError::SlotConflict {
                    date: updated.date,
                    time: updated.time.clone(),
                });
            }
        }

        let row = sqlx::query_as::<_, AppointmentRow>(
            "UPDATE appointments SET date = $2, time = $3, service = $4, client_name = $5, \
             client_phone = $6, client_email = $7, note = $8 WHERE id = $1 \
             RETURNING id, date, time, service, client_name, client_phone, client_email, \
             note, created_at",
        )
        .bind(updated.id.as_uuid())
        .bind(updated.date)
        .bind(updated.time.as_str())
        .bind(&updated.service)
        .bind(&updated.client_name)
        .bind(&updated.client_phone)
        .bind(&updated.client_email)
        .bind(&updated.note)
        .fetch_one(&mut *tx)
        .await
        .map_err(|err| conflict_or_store(err, updated.date, &updated.time))?;

        if slot_moved {
            // Lock both schedule rows in date order so concurrent moves
            // between the same pair of dates cannot deadlock.
            let mut dates = vec![old.date, updated.date];
            dates.sort_unstable();
            dates.dedup();
            let locked = sqlx::query_as::<_, ScheduleRow>(
                "SELECT date, slots FROM schedules WHERE date = ANY($1) \
                 ORDER BY date ASC FOR UPDATE",
            )
            .bind(&dates)
            .fetch_all(&mut *tx)
            .await
            .map_err(store_error)?;

            for locked_row in locked {
                let mut schedule = DaySchedule::try_from(locked_row)?;
                let mut dirty = false;
                if schedule.date == old.date && !schedule.contains(&old.time) {
                    schedule.restore(&old.time);
                    dirty = true;
                }
                if schedule.date == updated.date && schedule.consume(&updated.time) {
                    dirty = true;
                }
                if dirty {
                    Self::write_slots(&mut tx, &schedule).await?;
                }
            }
        }

        tx.commit().await.map_err(store_error)?;
        Appointment::try_from(row).map(Some)
    }
}

/// Maps an sqlx error onto the store-class variants, keeping the
/// retry-later class (`StoreUnavailable`) apart from permanent failures.
fn store_error(err: sqlx::Error) -> BookingError {
    match &err {
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
            BookingError::StoreUnavailable(err.to_string())
        }
        _ => BookingError::Store(err.to_string()),
    }
}

/// Maps a unique-index violation on `(date, time)` onto `SlotConflict`;
/// everything else falls through to [`store_error`].
fn conflict_or_store(err: sqlx::Error, date: NaiveDate, time: &SlotTime) -> BookingError {
    if let sqlx::Error::Database(db) = &err
        && db.is_unique_violation()
    {
        return BookingError::SlotConflict {
            date,
            time: time.clone(),
        };
    }
    store_error(err)
}
