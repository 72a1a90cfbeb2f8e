//! Repository implementation for CSV import jobs and their failure reports.

use chrono::Utc;
use diesel::prelude::*;

use crate::{
    domain::import::{ImportFailure, ImportJob, ImportStatus, NewImportFailure, NewImportJob},
    repository::errors::{RepositoryError, RepositoryResult},
    repository::{DieselRepository, ImportJobReader, ImportJobWriter},
};

impl ImportJobReader for DieselRepository {
    fn get_import_job(&self, id: i32) -> RepositoryResult<Option<ImportJob>> {
        use crate::models::import::ImportJob as DbImportJob;
        use crate::schema::import_jobs;

        let mut conn = self.conn()?;
        let job = import_jobs::table
            .find(id)
            .first::<DbImportJob>(&mut conn)
            .optional()?;

        Ok(job.map(Into::into))
    }

    fn list_import_jobs(&self, created_by: Option<i32>) -> RepositoryResult<Vec<ImportJob>> {
        use crate::models::import::ImportJob as DbImportJob;
        use crate::schema::import_jobs;

        let mut conn = self.conn()?;

        let mut items = import_jobs::table.into_boxed::<diesel::sqlite::Sqlite>();
        if let Some(created_by) = created_by {
            items = items.filter(import_jobs::created_by.eq(created_by));
        }

        let jobs = items
            .order(import_jobs::created_at.desc())
            .load::<DbImportJob>(&mut conn)?
            .into_iter()
            .map(Into::into)
            .collect();

        Ok(jobs)
    }

    fn list_import_failures(&self, job_id: i32) -> RepositoryResult<Vec<ImportFailure>> {
        use crate::models::import::ImportFailure as DbImportFailure;
        use crate::schema::import_failures;

        let mut conn = self.conn()?;
        let failures = import_failures::table
            .filter(import_failures::job_id.eq(job_id))
            .order(import_failures::row_number.asc())
            .load::<DbImportFailure>(&mut conn)?
            .into_iter()
            .map(Into::into)
            .collect();

        Ok(failures)
    }

    fn import_job_cancelled(&self, id: i32) -> RepositoryResult<bool> {
        use crate::schema::import_jobs;

        let mut conn = self.conn()?;
        let cancelled = import_jobs::table
            .find(id)
            .select(import_jobs::cancelled)
            .get_result::<bool>(&mut conn)
            .optional()?;

        cancelled.ok_or(RepositoryError::NotFound)
    }
}

impl ImportJobWriter for DieselRepository {
    fn create_import_job(&self, new_job: &NewImportJob) -> RepositoryResult<ImportJob> {
        use crate::models::import::{ImportJob as DbImportJob, NewImportJob as DbNewImportJob};
        use crate::schema::import_jobs;

        let mut conn = self.conn()?;
        let insertable: DbNewImportJob = new_job.into();

        let created = diesel::insert_into(import_jobs::table)
            .values(&insertable)
            .get_result::<DbImportJob>(&mut conn)?;

        Ok(created.into())
    }

    fn set_import_status(&self, job_id: i32, status: ImportStatus) -> RepositoryResult<ImportJob> {
        use crate::models::import::ImportJob as DbImportJob;
        use crate::schema::import_jobs;

        let mut conn = self.conn()?;
        let updated = diesel::update(import_jobs::table.find(job_id))
            .set((
                import_jobs::status.eq(status.to_string()),
                import_jobs::updated_at.eq(Utc::now().naive_utc()),
            ))
            .get_result::<DbImportJob>(&mut conn)?;

        Ok(updated.into())
    }

    fn record_import_progress(
        &self,
        job_id: i32,
        processed_rows: i32,
        failed_rows: i32,
    ) -> RepositoryResult<()> {
        use crate::schema::import_jobs;

        let mut conn = self.conn()?;
        diesel::update(import_jobs::table.find(job_id))
            .set((
                import_jobs::processed_rows.eq(processed_rows),
                import_jobs::failed_rows.eq(failed_rows),
                import_jobs::updated_at.eq(Utc::now().naive_utc()),
            ))
            .execute(&mut conn)?;

        Ok(())
    }

    fn record_import_failure(&self, failure: &NewImportFailure) -> RepositoryResult<ImportFailure> {
        use crate::models::import::{
            ImportFailure as DbImportFailure, NewImportFailure as DbNewImportFailure,
        };
        use crate::schema::import_failures;

        let mut conn = self.conn()?;
        let insertable: DbNewImportFailure = failure.into();

        let created = diesel::insert_into(import_failures::table)
            .values(&insertable)
            .get_result::<DbImportFailure>(&mut conn)?;

        Ok(created.into())
    }

    fn cancel_import_job(&self, job_id: i32) -> RepositoryResult<ImportJob> {
        use crate::models::import::ImportJob as DbImportJob;
        use crate::schema::import_jobs;

        let mut conn = self.conn()?;
        let updated = diesel::update(import_jobs::table.find(job_id))
            .set((
                import_jobs::cancelled.eq(true),
                import_jobs::updated_at.eq(Utc::now().naive_utc()),
            ))
            .get_result::<DbImportJob>(&mut conn)?;

        Ok(updated.into())
    }
}
