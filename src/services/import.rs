use std::sync::mpsc::{Receiver, Sender, channel};
use std::thread;
use std::time::Duration;

use serde_json::json;
use validator::ValidateEmail;

use crate::domain::activity::{Action, EntityType};
use crate::domain::company::NewCompany;
use crate::domain::contact::NewContact;
use crate::domain::import::{CsvContactRow, ImportJob, ImportStatus, NewImportFailure, NewImportJob};
use crate::dto::import::{ImportJobPageData, ImportJobsPageData};
use crate::forms::contacts::UploadContactsForm;
use crate::models::auth::AuthenticatedUser;
use crate::repository::errors::RepositoryResult;
use crate::repository::{
    ActivityWriter, CompanyReader, CompanyWriter, ContactWriter, DieselRepository, ImportJobReader,
    ImportJobWriter, UserWriter,
};
use crate::routes::check_role;
use crate::services::{
    ServiceError, ServiceResult, activity, ensure_access, sees_all_records, users,
};
use crate::SERVICE_ADMIN_ROLE;

/// Rows processed between cancellation checks and progress updates.
const CHUNK_SIZE: usize = 20;
/// Attempts per row before a transient error becomes a failure report entry.
const MAX_ATTEMPTS: u32 = 3;
const RETRY_DELAY: Duration = Duration::from_millis(200);

/// One queued import, handed to the background worker.
#[derive(Debug)]
pub struct ImportTask {
    pub job_id: i32,
    pub owner_id: i32,
    pub rows: Vec<CsvContactRow>,
}

/// Cloneable handle the routes use to enqueue imports.
#[derive(Clone)]
pub struct ImportQueue {
    sender: Sender<ImportTask>,
}

impl ImportQueue {
    pub fn enqueue(&self, task: ImportTask) -> ServiceResult<()> {
        self.sender.send(task).map_err(|err| {
            log::error!("Import worker is gone: {err}");
            ServiceError::Internal("Import queue is unavailable".to_string())
        })
    }
}

/// Spawns the import worker thread and returns the queue handle. The worker
/// lives for the whole process; it exits when the last queue handle drops.
pub fn start_import_worker(repo: DieselRepository) -> ImportQueue {
    let (sender, receiver) = channel();

    thread::Builder::new()
        .name("import-worker".to_string())
        .spawn(move || run_worker(&repo, receiver))
        // Thread spawning only fails when the process is out of resources.
        .map_err(|err| log::error!("Failed to spawn import worker: {err}"))
        .ok();

    ImportQueue { sender }
}

/// Worker loop: one import job at a time, in queue order.
pub fn run_worker<R>(repo: &R, receiver: Receiver<ImportTask>)
where
    R: ContactWriter
        + CompanyReader
        + CompanyWriter
        + ImportJobReader
        + ImportJobWriter
        + ActivityWriter,
{
    while let Ok(task) = receiver.recv() {
        log::info!("Processing import job {}", task.job_id);
        if let Err(err) = process_job(repo, &task) {
            log::error!("Import job {} failed: {err}", task.job_id);
            if let Err(status_err) = repo.set_import_status(task.job_id, ImportStatus::Failed) {
                log::error!("Failed to mark job as failed: {status_err}");
            }
        }
    }
}

/// Runs one import job to completion, cancellation, or failure.
///
/// Bad rows never abort the job; they land in the failure report. An error
/// returned from here means the job itself could not make progress and is
/// marked `Failed` by the caller.
pub fn process_job<R>(repo: &R, task: &ImportTask) -> RepositoryResult<()>
where
    R: ContactWriter
        + CompanyReader
        + CompanyWriter
        + ImportJobReader
        + ImportJobWriter
        + ActivityWriter,
{
    if repo.import_job_cancelled(task.job_id)? {
        repo.set_import_status(task.job_id, ImportStatus::Cancelled)?;
        return Ok(());
    }

    repo.set_import_status(task.job_id, ImportStatus::Running)?;

    let mut processed = 0i32;
    let mut failed = 0i32;

    for chunk in task.rows.chunks(CHUNK_SIZE) {
        for row in chunk {
            match import_row(repo, task.owner_id, row) {
                Ok(()) => {}
                Err(reason) => {
                    failed += 1;
                    let failure = NewImportFailure {
                        job_id: task.job_id,
                        row_number: row.row_number,
                        reason,
                        row_data: format!("{},{}", row.name, row.email.as_deref().unwrap_or("")),
                    };
                    if let Err(err) = repo.record_import_failure(&failure) {
                        log::error!("Failed to record import failure: {err}");
                    }
                }
            }
            processed += 1;
        }

        repo.record_import_progress(task.job_id, processed, failed)?;

        if repo.import_job_cancelled(task.job_id)? {
            repo.set_import_status(task.job_id, ImportStatus::Cancelled)?;
            return Ok(());
        }
    }

    // A job where not a single row made it through counts as failed.
    let outcome = if processed > 0 && failed == processed {
        ImportStatus::Failed
    } else {
        ImportStatus::Completed
    };
    repo.set_import_status(task.job_id, outcome)?;

    activity::record(
        repo,
        task.owner_id,
        EntityType::ImportJob,
        task.job_id,
        Action::Imported,
        json!({ "processed": processed, "failed": failed }),
    );

    Ok(())
}

/// Imports a single CSV row, retrying transient repository errors. Returns
/// the rejection reason for the failure report.
fn import_row<R>(repo: &R, owner_id: i32, row: &CsvContactRow) -> Result<(), String>
where
    R: ContactWriter + CompanyReader + CompanyWriter,
{
    if row.name.trim().is_empty() {
        return Err("Missing name".to_string());
    }
    if let Some(email) = &row.email
        && !email.validate_email()
    {
        return Err(format!("Invalid email: {email}"));
    }

    let company_id = match &row.company {
        Some(name) => Some(resolve_company(repo, name).map_err(|err| err.to_string())?),
        None => None,
    };

    let new_contact = NewContact::new(
        company_id,
        owner_id,
        row.name.clone(),
        row.email.clone(),
        row.phone.clone(),
        row.position.clone(),
        row.address.clone(),
    );

    let mut attempt = 1;
    loop {
        match repo.create_contact(&new_contact) {
            Ok(_) => return Ok(()),
            Err(err) if err.is_transient() && attempt < MAX_ATTEMPTS => {
                log::warn!(
                    "Transient error on row {} (attempt {attempt}): {err}",
                    row.row_number
                );
                thread::sleep(RETRY_DELAY * attempt);
                attempt += 1;
            }
            Err(err) => return Err(err.to_string()),
        }
    }
}

/// Looks the company up by exact name, creating it on first sight.
fn resolve_company<R>(repo: &R, name: &str) -> RepositoryResult<i32>
where
    R: CompanyReader + CompanyWriter,
{
    if let Some(company) = repo.get_company_by_name(name)? {
        return Ok(company.id);
    }

    let company = repo.create_company(&NewCompany::new(name.to_string(), None, None, None, None))?;
    Ok(company.id)
}

/// Parses the uploaded CSV, records the job, and hands it to the worker.
pub fn enqueue_import<R>(
    repo: &R,
    queue: &ImportQueue,
    user: &AuthenticatedUser,
    mut form: UploadContactsForm,
) -> ServiceResult<ImportJob>
where
    R: ImportJobWriter + ActivityWriter + UserWriter + ?Sized,
{
    ensure_access(user)?;

    let file_name = form
        .csv
        .file_name
        .clone()
        .unwrap_or_else(|| "contacts.csv".to_string());

    let rows = form.parse().map_err(|err| {
        log::error!("Failed to parse contacts csv: {err}");
        ServiceError::Form("Could not parse the uploaded CSV".to_string())
    })?;

    if rows.is_empty() {
        return Err(ServiceError::Form("The CSV has no data rows".to_string()));
    }

    let local_user = users::sync_user(repo, user)?;

    let job = repo
        .create_import_job(&NewImportJob {
            created_by: local_user.id,
            file_name,
            total_rows: rows.len() as i32,
        })
        .map_err(|err| {
            log::error!("Failed to create import job: {err}");
            ServiceError::from(err)
        })?;

    if let Err(err) = queue.enqueue(ImportTask {
        job_id: job.id,
        owner_id: local_user.id,
        rows,
    }) {
        if let Err(status_err) = repo.set_import_status(job.id, ImportStatus::Failed) {
            log::error!("Failed to mark job as failed: {status_err}");
        }
        return Err(err);
    }

    activity::record(
        repo,
        local_user.id,
        EntityType::ImportJob,
        job.id,
        Action::Created,
        json!({ "file_name": job.file_name, "total_rows": job.total_rows }),
    );

    Ok(job)
}

/// Lists import jobs. Sales reps only see jobs they started.
pub fn load_import_jobs_page<R>(
    repo: &R,
    user: &AuthenticatedUser,
) -> ServiceResult<ImportJobsPageData>
where
    R: ImportJobReader + UserWriter + ?Sized,
{
    ensure_access(user)?;

    let local_user = users::sync_user(repo, user)?;
    let created_by = (!sees_all_records(user)).then_some(local_user.id);

    let jobs = repo
        .list_import_jobs(created_by)
        .map_err(ServiceError::from)?;

    Ok(ImportJobsPageData { jobs })
}

/// Loads one import job with its failure report.
pub fn load_import_job_page<R>(
    repo: &R,
    user: &AuthenticatedUser,
    job_id: i32,
) -> ServiceResult<ImportJobPageData>
where
    R: ImportJobReader + UserWriter + ?Sized,
{
    ensure_access(user)?;

    let local_user = users::sync_user(repo, user)?;
    let job = get_visible_job(repo, user, local_user.id, job_id)?;

    let failures = repo
        .list_import_failures(job_id)
        .map_err(ServiceError::from)?;

    Ok(ImportJobPageData { job, failures })
}

/// Requests cancellation of a queued or running import. The worker honors
/// the flag at its next chunk boundary.
pub fn cancel_import<R>(repo: &R, user: &AuthenticatedUser, job_id: i32) -> ServiceResult<ImportJob>
where
    R: ImportJobReader + ImportJobWriter + UserWriter + ?Sized,
{
    ensure_access(user)?;

    let local_user = users::sync_user(repo, user)?;
    let job = get_visible_job(repo, user, local_user.id, job_id)?;

    if job.is_finished() {
        return Err(ServiceError::Form(
            "The import has already finished".to_string(),
        ));
    }

    repo.cancel_import_job(job_id).map_err(|err| {
        log::error!("Failed to cancel import job: {err}");
        ServiceError::from(err)
    })
}

fn get_visible_job<R>(
    repo: &R,
    user: &AuthenticatedUser,
    local_user_id: i32,
    job_id: i32,
) -> ServiceResult<ImportJob>
where
    R: ImportJobReader + ?Sized,
{
    let job = repo
        .get_import_job(job_id)
        .map_err(ServiceError::from)?
        .ok_or(ServiceError::NotFound)?;

    if job.created_by != local_user_id && !check_role(SERVICE_ADMIN_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    Ok(job)
}

#[cfg(all(test, feature = "test-mocks"))]
mod tests {
    use super::*;
    use crate::domain::contact::Contact;
    use crate::repository::errors::RepositoryError;
    use crate::repository::mock::MockRepository;
    use chrono::Utc;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn job(id: i32, status: ImportStatus) -> ImportJob {
        ImportJob {
            id,
            created_by: 1,
            file_name: "contacts.csv".to_string(),
            status,
            total_rows: 2,
            processed_rows: 0,
            failed_rows: 0,
            cancelled: false,
            created_at: Utc::now().naive_utc(),
            updated_at: Utc::now().naive_utc(),
        }
    }

    fn row(row_number: i32, name: &str, email: Option<&str>) -> CsvContactRow {
        CsvContactRow {
            row_number,
            name: name.to_string(),
            email: email.map(str::to_string),
            phone: None,
            position: None,
            address: None,
            company: None,
        }
    }

    fn created_contact(owner_id: i32) -> Contact {
        Contact {
            id: 1,
            owner_id,
            name: "Imported".to_string(),
            ..Contact::default()
        }
    }

    fn stub_activity(repo: &mut MockRepository) {
        repo.expect_log_activity().returning(|entry| {
            Ok(crate::domain::activity::ActivityEntry {
                id: 1,
                user_id: entry.user_id,
                entity_type: entry.entity_type.clone(),
                entity_id: entry.entity_id,
                action: entry.action.clone(),
                details: entry.details.clone(),
                created_at: Utc::now().naive_utc(),
            })
        });
    }

    #[test]
    fn bad_rows_become_failures_not_job_errors() {
        let mut repo = MockRepository::new();
        repo.expect_import_job_cancelled().returning(|_| Ok(false));
        repo.expect_set_import_status()
            .withf(|_, status| *status == ImportStatus::Running)
            .returning(|id, status| Ok(job(id, status)));
        repo.expect_create_contact()
            .times(1)
            .returning(|new| Ok(created_contact(new.owner_id)));
        repo.expect_record_import_failure()
            .times(2)
            .returning(|failure| {
                Ok(crate::domain::import::ImportFailure {
                    id: 1,
                    job_id: failure.job_id,
                    row_number: failure.row_number,
                    reason: failure.reason.clone(),
                    row_data: failure.row_data.clone(),
                })
            });
        repo.expect_record_import_progress()
            .withf(|_, processed, failed| *processed == 3 && *failed == 2)
            .returning(|_, _, _| Ok(()));
        repo.expect_set_import_status()
            .withf(|_, status| *status == ImportStatus::Completed)
            .returning(|id, status| Ok(job(id, status)));
        stub_activity(&mut repo);

        let task = ImportTask {
            job_id: 1,
            owner_id: 1,
            rows: vec![
                row(1, "Jane", Some("jane@example.com")),
                row(2, "", None),
                row(3, "Joe", Some("not-an-email")),
            ],
        };
        process_job(&repo, &task).expect("job completes");
    }

    #[test]
    fn cancellation_stops_between_chunks() {
        let mut repo = MockRepository::new();
        let polls = AtomicU32::new(0);
        repo.expect_import_job_cancelled().returning(move |_| {
            // First poll happens before the job starts, the second after
            // the first chunk.
            Ok(polls.fetch_add(1, Ordering::SeqCst) >= 1)
        });
        repo.expect_set_import_status()
            .withf(|_, status| *status == ImportStatus::Running)
            .returning(|id, status| Ok(job(id, status)));
        repo.expect_create_contact()
            .times(CHUNK_SIZE)
            .returning(|new| Ok(created_contact(new.owner_id)));
        repo.expect_record_import_progress().returning(|_, _, _| Ok(()));
        repo.expect_set_import_status()
            .withf(|_, status| *status == ImportStatus::Cancelled)
            .times(1)
            .returning(|id, status| Ok(job(id, status)));

        let rows = (1..=(CHUNK_SIZE as i32 * 2))
            .map(|n| row(n, "Jane", None))
            .collect();
        let task = ImportTask {
            job_id: 1,
            owner_id: 1,
            rows,
        };
        process_job(&repo, &task).expect("job cancels cleanly");
    }

    #[test]
    fn transient_errors_are_retried() {
        let mut repo = MockRepository::new();
        let attempts = AtomicU32::new(0);
        repo.expect_import_job_cancelled().returning(|_| Ok(false));
        repo.expect_set_import_status()
            .returning(|id, status| Ok(job(id, status)));
        repo.expect_create_contact().returning(move |new| {
            if attempts.fetch_add(1, Ordering::SeqCst) == 0 {
                Err(RepositoryError::DatabaseError("locked".to_string()))
            } else {
                Ok(created_contact(new.owner_id))
            }
        });
        repo.expect_record_import_failure().times(0);
        repo.expect_record_import_progress()
            .withf(|_, processed, failed| *processed == 1 && *failed == 0)
            .returning(|_, _, _| Ok(()));
        stub_activity(&mut repo);

        let task = ImportTask {
            job_id: 1,
            owner_id: 1,
            rows: vec![row(1, "Jane", None)],
        };
        process_job(&repo, &task).expect("job completes after retry");
    }

    #[test]
    fn company_column_creates_missing_companies() {
        let mut repo = MockRepository::new();
        repo.expect_get_company_by_name()
            .withf(|name| name == "Acme")
            .returning(|_| Ok(None));
        repo.expect_create_company()
            .withf(|new| new.name == "Acme")
            .returning(|new| {
                Ok(crate::domain::company::Company {
                    id: 42,
                    name: new.name.clone(),
                    ..crate::domain::company::Company::default()
                })
            });
        repo.expect_create_contact()
            .withf(|new| new.company_id == Some(42))
            .returning(|new| Ok(created_contact(new.owner_id)));

        let mut csv_row = row(1, "Jane", None);
        csv_row.company = Some("Acme".to_string());
        import_row(&repo, 1, &csv_row).expect("row imports");
    }

    #[test]
    fn finished_jobs_cannot_be_cancelled() {
        let mut repo = MockRepository::new();
        repo.expect_create_or_update_user().returning(|new_user| {
            Ok(crate::domain::user::User {
                id: 1,
                name: new_user.name.clone(),
                email: new_user.email.clone(),
                role: new_user.role.clone(),
                created_at: Utc::now().naive_utc(),
            })
        });
        repo.expect_get_import_job()
            .returning(|id| Ok(Some(job(id, ImportStatus::Completed))));
        repo.expect_cancel_import_job().times(0);

        let user = crate::services::test_support::admin_user();
        let result = cancel_import(&repo, &user, 1);
        assert!(matches!(result, Err(ServiceError::Form(_))));
    }
}
