//! Mock repository implementations for isolating services in tests.

use mockall::mock;

use crate::domain::activity::{ActivityEntry, NewActivityEntry};
use crate::domain::company::{Company, NewCompany, UpdateCompany};
use crate::domain::contact::{Contact, NewContact, UpdateContact};
use crate::domain::document::{Document, NewDocument};
use crate::domain::import::{
    ImportFailure, ImportJob, ImportStatus, NewImportFailure, NewImportJob,
};
use crate::domain::opportunity::{
    NewOpportunity, Opportunity, Stage, StageMove, UpdateOpportunity,
};
use crate::domain::reminder::{NewReminder, Reminder};
use crate::domain::settings::{NewSetting, Setting};
use crate::domain::user::{NewUser, User};
use crate::repository::errors::RepositoryResult;
use crate::repository::{
    ActivityListQuery, ActivityReader, ActivityWriter, CompanyListQuery, CompanyReader,
    CompanyWriter, ContactListQuery, ContactReader, ContactWriter, DocumentReader, DocumentWriter,
    ImportJobReader, ImportJobWriter, OpportunityListQuery, OpportunityReader, OpportunityWriter,
    ReminderListQuery, ReminderReader, ReminderWriter, SettingReader, SettingWriter, UserReader,
    UserWriter,
};

mock! {
    pub Repository {}

    impl UserReader for Repository {
        fn get_user_by_id(&self, id: i32) -> RepositoryResult<Option<User>>;
        fn get_user_by_email(&self, email: &str) -> RepositoryResult<Option<User>>;
        fn list_users(&self) -> RepositoryResult<Vec<User>>;
    }

    impl UserWriter for Repository {
        fn create_or_update_user(&self, new_user: &NewUser) -> RepositoryResult<User>;
    }

    impl ContactReader for Repository {
        fn get_contact_by_id(&self, id: i32) -> RepositoryResult<Option<Contact>>;
        fn list_contacts(&self, query: ContactListQuery) -> RepositoryResult<(usize, Vec<Contact>)>;
    }

    impl ContactWriter for Repository {
        fn create_contact(&self, new_contact: &NewContact) -> RepositoryResult<Contact>;
        fn update_contact(
            &self,
            contact_id: i32,
            updates: &UpdateContact,
        ) -> RepositoryResult<Contact>;
        fn delete_contact(&self, contact_id: i32) -> RepositoryResult<()>;
    }

    impl CompanyReader for Repository {
        fn get_company_by_id(&self, id: i32) -> RepositoryResult<Option<Company>>;
        fn get_company_by_name(&self, name: &str) -> RepositoryResult<Option<Company>>;
        fn list_companies(&self, query: CompanyListQuery) -> RepositoryResult<(usize, Vec<Company>)>;
    }

    impl CompanyWriter for Repository {
        fn create_company(&self, new_company: &NewCompany) -> RepositoryResult<Company>;
        fn update_company(
            &self,
            company_id: i32,
            updates: &UpdateCompany,
        ) -> RepositoryResult<Company>;
        fn delete_company(&self, company_id: i32) -> RepositoryResult<()>;
    }

    impl DocumentReader for Repository {
        fn get_document_by_id(&self, id: i32) -> RepositoryResult<Option<Document>>;
        fn list_contact_documents(&self, contact_id: i32) -> RepositoryResult<Vec<Document>>;
        fn list_company_documents(&self, company_id: i32) -> RepositoryResult<Vec<Document>>;
    }

    impl DocumentWriter for Repository {
        fn create_document(&self, new_document: &NewDocument) -> RepositoryResult<Document>;
        fn delete_document(&self, document_id: i32) -> RepositoryResult<()>;
    }

    impl OpportunityReader for Repository {
        fn get_opportunity_by_id(&self, id: i32) -> RepositoryResult<Option<Opportunity>>;
        fn list_opportunities(
            &self,
            query: OpportunityListQuery,
        ) -> RepositoryResult<(usize, Vec<Opportunity>)>;
        fn pipeline_summary(
            &self,
            owner_id: Option<i32>,
        ) -> RepositoryResult<Vec<(Stage, usize, i64)>>;
    }

    impl OpportunityWriter for Repository {
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
        fn move_opportunity(&self, movement: &StageMove) -> RepositoryResult<Opportunity>;
    }

    impl ReminderReader for Repository {
        fn get_reminder_by_id(&self, id: i32) -> RepositoryResult<Option<Reminder>>;
        fn list_reminders(&self, query: ReminderListQuery) -> RepositoryResult<Vec<Reminder>>;
    }

    impl ReminderWriter for Repository {
        fn create_reminder(&self, new_reminder: &NewReminder) -> RepositoryResult<Reminder>;
        fn set_reminder_done(&self, reminder_id: i32, done: bool) -> RepositoryResult<Reminder>;
        fn delete_reminder(&self, reminder_id: i32) -> RepositoryResult<()>;
    }

    impl ActivityReader for Repository {
        fn list_activity(
            &self,
            query: ActivityListQuery,
        ) -> RepositoryResult<(usize, Vec<ActivityEntry>)>;
    }

    impl ActivityWriter for Repository {
        fn log_activity(&self, entry: &NewActivityEntry) -> RepositoryResult<ActivityEntry>;
    }

    impl SettingReader for Repository {
        fn get_setting(&self, key: &str) -> RepositoryResult<Option<Setting>>;
        fn list_settings(&self) -> RepositoryResult<Vec<Setting>>;
    }

    impl SettingWriter for Repository {
        fn upsert_setting(&self, setting: &NewSetting) -> RepositoryResult<Setting>;
    }

    impl ImportJobReader for Repository {
        fn get_import_job(&self, id: i32) -> RepositoryResult<Option<ImportJob>>;
        fn list_import_jobs(&self, created_by: Option<i32>) -> RepositoryResult<Vec<ImportJob>>;
        fn list_import_failures(&self, job_id: i32) -> RepositoryResult<Vec<ImportFailure>>;
        fn import_job_cancelled(&self, id: i32) -> RepositoryResult<bool>;
    }

    impl ImportJobWriter for Repository {
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
}
