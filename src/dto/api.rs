//! DTOs exposed by the CRM API endpoints.

use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::activity::ActivityEntry;
use crate::domain::company::Company;
use crate::domain::contact::Contact;
use crate::domain::opportunity::{Opportunity, Stage};
use crate::domain::reminder::Reminder;

/// Query parameters accepted by the `/api/v1/contacts` service.
#[derive(Debug, Default)]
pub struct ContactsQuery {
    /// Optional free-form search string applied to the contact list.
    pub search: Option<String>,
    /// Optional page number for pagination.
    pub page: Option<usize>,
}

/// Result payload returned by [`crate::services::api::list_contacts`].
#[derive(Debug, Serialize)]
pub struct ContactsResponse {
    /// Total number of contacts matching the filter.
    pub total: usize,
    /// Page of contacts requested by the caller.
    pub contacts: Vec<Contact>,
}

/// Query parameters accepted by the `/api/v1/companies` service.
#[derive(Debug, Default)]
pub struct CompaniesQuery {
    pub search: Option<String>,
    pub page: Option<usize>,
}

/// Result payload returned by [`crate::services::api::list_companies`].
#[derive(Debug, Serialize)]
pub struct CompaniesResponse {
    pub total: usize,
    pub companies: Vec<Company>,
}

/// Query parameters accepted by the `/api/v1/opportunities` service.
#[derive(Debug, Default)]
pub struct OpportunitiesQuery {
    pub stage: Option<Stage>,
    pub page: Option<usize>,
}

/// Result payload returned by [`crate::services::api::list_opportunities`].
#[derive(Debug, Serialize)]
pub struct OpportunitiesResponse {
    pub total: usize,
    pub opportunities: Vec<Opportunity>,
}

/// Date window accepted by the `/api/v1/calendar` feed.
#[derive(Debug, Default)]
pub struct CalendarFeedQuery {
    pub from: Option<NaiveDate>,
    pub until: Option<NaiveDate>,
}

/// Result payload returned by [`crate::services::api::calendar_feed`].
#[derive(Debug, Serialize)]
pub struct CalendarFeedResponse {
    pub reminders: Vec<Reminder>,
}

/// Result payload returned by [`crate::services::api::list_activity`].
#[derive(Debug, Serialize)]
pub struct ActivityResponse {
    pub total: usize,
    pub entries: Vec<ActivityEntry>,
}
