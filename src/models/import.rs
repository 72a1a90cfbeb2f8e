use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::import::{
    ImportFailure as DomainImportFailure, ImportJob as DomainImportJob, ImportStatus,
    NewImportFailure as DomainNewImportFailure, NewImportJob as DomainNewImportJob,
};

#[derive(Debug, Clone, Identifiable, Queryable)]
#[diesel(table_name = crate::schema::import_jobs)]
pub struct ImportJob {
    pub id: i32,
    pub created_by: i32,
    pub file_name: String,
    pub status: String,
    pub total_rows: i32,
    pub processed_rows: i32,
    pub failed_rows: i32,
    pub cancelled: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::import_jobs)]
pub struct NewImportJob<'a> {
    pub created_by: i32,
    pub file_name: &'a str,
    pub status: String,
    pub total_rows: i32,
}

#[derive(Debug, Clone, Identifiable, Queryable, Associations)]
#[diesel(belongs_to(ImportJob, foreign_key = job_id))]
#[diesel(table_name = crate::schema::import_failures)]
pub struct ImportFailure {
    pub id: i32,
    pub job_id: i32,
    pub row_number: i32,
    pub reason: String,
    pub row_data: String,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::import_failures)]
pub struct NewImportFailure<'a> {
    pub job_id: i32,
    pub row_number: i32,
    pub reason: &'a str,
    pub row_data: &'a str,
}

impl From<ImportJob> for DomainImportJob {
    fn from(job: ImportJob) -> Self {
        Self {
            id: job.id,
            created_by: job.created_by,
            file_name: job.file_name,
            status: ImportStatus::from(job.status.as_str()),
            total_rows: job.total_rows,
            processed_rows: job.processed_rows,
            failed_rows: job.failed_rows,
            cancelled: job.cancelled,
            created_at: job.created_at,
            updated_at: job.updated_at,
        }
    }
}

impl<'a> From<&'a DomainNewImportJob> for NewImportJob<'a> {
    fn from(job: &'a DomainNewImportJob) -> Self {
        Self {
            created_by: job.created_by,
            file_name: job.file_name.as_str(),
            status: ImportStatus::Pending.to_string(),
            total_rows: job.total_rows,
        }
    }
}

impl From<ImportFailure> for DomainImportFailure {
    fn from(failure: ImportFailure) -> Self {
        Self {
            id: failure.id,
            job_id: failure.job_id,
            row_number: failure.row_number,
            reason: failure.reason,
            row_data: failure.row_data,
        }
    }
}

impl<'a> From<&'a DomainNewImportFailure> for NewImportFailure<'a> {
    fn from(failure: &'a DomainNewImportFailure) -> Self {
        Self {
            job_id: failure.job_id,
            row_number: failure.row_number,
            reason: failure.reason.as_str(),
            row_data: failure.row_data.as_str(),
        }
    }
}
