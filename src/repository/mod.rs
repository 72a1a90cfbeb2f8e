use chrono::NaiveDateTime;

use crate::{
    db::{DbConnection, DbPool},
    domain::{
        activity::{ActivityEntry, EntityType, NewActivityEntry},
        company::{Company, NewCompany, UpdateCompany},
        contact::{Contact, NewContact, UpdateContact},
        document::{Document, NewDocument},
        import::{ImportFailure, ImportJob, ImportStatus, NewImportFailure, NewImportJob},
        opportunity::{NewOpportunity, Opportunity, Stage, StageMove, UpdateOpportunity},
        reminder::{NewReminder, Reminder},
        settings::{NewSetting, Setting},
        user::{NewUser, User},
    },
    repository::errors::RepositoryResult,
};

pub mod activity;
pub mod company;
pub mod contact;
pub mod document;
pub mod errors;
pub mod import;
#[cfg(feature = "test-mocks")]
pub mod mock;
pub mod opportunity;
pub mod reminder;
pub mod settings;
pub mod user;

/// Diesel-backed implementation of every repository trait in this module.
#[derive(Clone)]
pub struct DieselRepository {
    pool: DbPool,
}

impl DieselRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub(crate) fn conn(&self) -> RepositoryResult<DbConnection> {
        Ok(self.pool.get()?)
    }
}

#[derive(Debug, Clone)]
pub struct Pagination {
    pub page: usize,
    pub per_page: usize,
}

#[derive(Debug, Clone, Default)]
pub struct ContactListQuery {
    pub search: Option<String>,
    pub owner_id: Option<i32>,
    pub company_id: Option<i32>,
    pub pagination: Option<Pagination>,
}

impl ContactListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    pub fn owner(mut self, owner_id: i32) -> Self {
        self.owner_id = Some(owner_id);
        self
    }

    pub fn company(mut self, company_id: i32) -> Self {
        self.company_id = Some(company_id);
        self
    }

    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct CompanyListQuery {
    pub search: Option<String>,
    pub pagination: Option<Pagination>,
}

impl CompanyListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct OpportunityListQuery {
    pub owner_id: Option<i32>,
    pub company_id: Option<i32>,
    pub stage: Option<Stage>,
    /// Won/Lost cards are excluded unless set.
    pub include_terminal: bool,
    pub pagination: Option<Pagination>,
}

impl OpportunityListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn owner(mut self, owner_id: i32) -> Self {
        self.owner_id = Some(owner_id);
        self
    }

    pub fn company(mut self, company_id: i32) -> Self {
        self.company_id = Some(company_id);
        self
    }

    pub fn stage(mut self, stage: Stage) -> Self {
        self.stage = Some(stage);
        self
    }

    pub fn include_terminal(mut self) -> Self {
        self.include_terminal = true;
        self
    }

    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}

#[derive(Debug, Clone)]
pub struct ReminderListQuery {
    pub user_id: i32,
    pub range: Option<(NaiveDateTime, NaiveDateTime)>,
    pub include_done: bool,
    pub contact_id: Option<i32>,
}

impl ReminderListQuery {
    pub fn new(user_id: i32) -> Self {
        Self {
            user_id,
            range: None,
            include_done: false,
            contact_id: None,
        }
    }

    pub fn between(mut self, from: NaiveDateTime, until: NaiveDateTime) -> Self {
        self.range = Some((from, until));
        self
    }

    pub fn include_done(mut self) -> Self {
        self.include_done = true;
        self
    }

    pub fn contact(mut self, contact_id: i32) -> Self {
        self.contact_id = Some(contact_id);
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct ActivityListQuery {
    pub user_id: Option<i32>,
    pub entity: Option<(EntityType, i32)>,
    pub pagination: Option<Pagination>,
}

impl ActivityListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn user(mut self, user_id: i32) -> Self {
        self.user_id = Some(user_id);
        self
    }

    pub fn entity(mut self, entity_type: EntityType, entity_id: i32) -> Self {
        self.entity = Some((entity_type, entity_id));
        self
    }

    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}

pub trait UserReader {
    fn get_user_by_id(&self, id: i32) -> RepositoryResult<Option<User>>;
    fn get_user_by_email(&self, email: &str) -> RepositoryResult<Option<User>>;
    fn list_users(&self) -> RepositoryResult<Vec<User>>;
}

pub trait UserWriter {
    fn create_or_update_user(&self, new_user: &NewUser) -> RepositoryResult<User>;
}

pub trait ContactReader {
    fn get_contact_by_id(&self, id: i32) -> RepositoryResult<Option<Contact>>;
    fn list_contacts(&self, query: ContactListQuery) -> RepositoryResult<(usize, Vec<Contact>)>;
}

pub trait ContactWriter {
    fn create_contact(&self, new_contact: &NewContact) -> RepositoryResult<Contact>;
    fn update_contact(&self, contact_id: i32, updates: &UpdateContact)
    -> RepositoryResult<Contact>;
    fn delete_contact(&self, contact_id: i32) -> RepositoryResult<()>;
}

pub trait CompanyReader {
    fn get_company_by_id(&self, id: i32) -> RepositoryResult<Option<Company>>;
    fn get_company_by_name(&self, name: &str) -> RepositoryResult<Option<Company>>;
    fn list_companies(&self, query: CompanyListQuery) -> RepositoryResult<(usize, Vec<Company>)>;
}

pub trait CompanyWriter {
    fn create_company(&self, new_company: &NewCompany) -> RepositoryResult<Company>;
    fn update_company(&self, company_id: i32, updates: &UpdateCompany)
    -> RepositoryResult<Company>;
    fn delete_company(&self, company_id: i32) -> RepositoryResult<()>;
}

pub trait DocumentReader {
    fn get_document_by_id(&self, id: i32) -> RepositoryResult<Option<Document>>;
    fn list_contact_documents(&self, contact_id: i32) -> RepositoryResult<Vec<Document>>;
    fn list_company_documents(&self, company_id: i32) -> RepositoryResult<Vec<Document>>;
}

pub trait DocumentWriter {
    fn create_document(&self, new_document: &NewDocument) -> RepositoryResult<Document>;
    fn delete_document(&self, document_id: i32) -> RepositoryResult<()>;
}

pub trait OpportunityReader {
    fn get_opportunity_by_id(&self, id: i32) -> RepositoryResult<Option<Opportunity>>;
    fn list_opportunities(
        &self,
        query: OpportunityListQuery,
    ) -> RepositoryResult<(usize, Vec<Opportunity>)>;
    /// Count and total amount per stage, for the dashboard pipeline summary.
    /// When `owner_id` is set only that owner's cards are aggregated.
    fn pipeline_summary(
        &self,
        owner_id: Option<i32>,
    ) -> RepositoryResult<Vec<(Stage, usize, i64)>>;
}

pub trait OpportunityWriter {
    fn create_opportunity(
        &self,
        new_opportunity: &NewOpportunity,
    ) -> RepositoryResult<Opportunity>;
    fn update_opportunity(
        &self,
        opportunity_id: i32,
        updates: &UpdateOpportunity,
    ) -> RepositoryResult<Opportunity>;
    fn delete_opportunity(&self, opportunity_id: i32) -> RepositoryResult<()>;
    /// Applies a kanban move: stage change plus dense re-numbering of the
    /// target column, all in one transaction.
    fn move_opportunity(&self, movement: &StageMove) -> RepositoryResult<Opportunity>;
}

pub trait ReminderReader {
    fn get_reminder_by_id(&self, id: i32) -> RepositoryResult<Option<Reminder>>;
    fn list_reminders(&self, query: ReminderListQuery) -> RepositoryResult<Vec<Reminder>>;
}

pub trait ReminderWriter {
    fn create_reminder(&self, new_reminder: &NewReminder) -> RepositoryResult<Reminder>;
    fn set_reminder_done(&self, reminder_id: i32, done: bool) -> RepositoryResult<Reminder>;
    fn delete_reminder(&self, reminder_id: i32) -> RepositoryResult<()>;
}

pub trait ActivityReader {
    fn list_activity(
        &self,
        query: ActivityListQuery,
    ) -> RepositoryResult<(usize, Vec<ActivityEntry>)>;
}

pub trait ActivityWriter {
    fn log_activity(&self, entry: &NewActivityEntry) -> RepositoryResult<ActivityEntry>;
}

pub trait SettingReader {
    fn get_setting(&self, key: &str) -> RepositoryResult<Option<Setting>>;
    fn list_settings(&self) -> RepositoryResult<Vec<Setting>>;
}

pub trait SettingWriter {
    fn upsert_setting(&self, setting: &NewSetting) -> RepositoryResult<Setting>;
}

pub trait ImportJobReader {
    fn get_import_job(&self, id: i32) -> RepositoryResult<Option<ImportJob>>;
    fn list_import_jobs(&self, created_by: Option<i32>) -> RepositoryResult<Vec<ImportJob>>;
    fn list_import_failures(&self, job_id: i32) -> RepositoryResult<Vec<ImportFailure>>;
    /// Re-reads the cancellation flag; the worker polls this between chunks.
    fn import_job_cancelled(&self, id: i32) -> RepositoryResult<bool>;
}

pub trait ImportJobWriter {
    fn create_import_job(&self, new_job: &NewImportJob) -> RepositoryResult<ImportJob>;
    fn set_import_status(&self, job_id: i32, status: ImportStatus) -> RepositoryResult<ImportJob>;
    fn record_import_progress(
        &self,
        job_id: i32,
        processed_rows: i32,
        failed_rows: i32,
    ) -> RepositoryResult<()>;
    fn record_import_failure(&self, failure: &NewImportFailure) -> RepositoryResult<ImportFailure>;
    fn cancel_import_job(&self, job_id: i32) -> RepositoryResult<ImportJob>;
}
