use actix_web::{HttpResponse, Responder, get, web};
use chrono::NaiveDate;
use serde::Deserialize;

use crate::dto::api::{CalendarFeedQuery, CompaniesQuery, ContactsQuery, OpportunitiesQuery};
use crate::models::auth::AuthenticatedUser;
use crate::repository::DieselRepository;
use crate::services::api as api_service;
use crate::services::ServiceError;

#[derive(Deserialize)]
struct ListQueryParams {
    q: Option<String>,
    page: Option<usize>,
}

#[derive(Deserialize)]
struct OpportunitiesQueryParams {
    stage: Option<String>,
    page: Option<usize>,
}

#[derive(Deserialize)]
struct CalendarFeedParams {
    from: Option<NaiveDate>,
    until: Option<NaiveDate>,
}

#[derive(Deserialize)]
struct ActivityQueryParams {
    page: Option<usize>,
}

fn api_error(err: ServiceError) -> HttpResponse {
    match err {
        ServiceError::Unauthorized => HttpResponse::Unauthorized().finish(),
        ServiceError::NotFound => HttpResponse::NotFound().finish(),
        ServiceError::Form(message) => HttpResponse::BadRequest().body(message),
        err => {
            log::error!("API error: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/v1/contacts")]
pub async fn api_v1_contacts(
    params: web::Query<ListQueryParams>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let params = params.into_inner();
    let query = ContactsQuery {
        search: params.q,
        page: params.page,
    };
    match api_service::list_contacts(repo.as_ref(), &user, query) {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(err) => api_error(err),
    }
}

#[get("/v1/companies")]
pub async fn api_v1_companies(
    params: web::Query<ListQueryParams>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let params = params.into_inner();
    let query = CompaniesQuery {
        search: params.q,
        page: params.page,
    };
    match api_service::list_companies(repo.as_ref(), &user, query) {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(err) => api_error(err),
    }
}

#[get("/v1/opportunities")]
pub async fn api_v1_opportunities(
    params: web::Query<OpportunitiesQueryParams>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let params = params.into_inner();
    let query = OpportunitiesQuery {
        stage: params.stage.as_deref().map(Into::into),
        page: params.page,
    };
    match api_service::list_opportunities(repo.as_ref(), &user, query) {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(err) => api_error(err),
    }
}

#[get("/v1/calendar")]
pub async fn api_v1_calendar(
    params: web::Query<CalendarFeedParams>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let params = params.into_inner();
    let query = CalendarFeedQuery {
        from: params.from,
        until: params.until,
    };
    match api_service::calendar_feed(repo.as_ref(), &user, query) {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(err) => api_error(err),
    }
}

#[get("/v1/activity")]
pub async fn api_v1_activity(
    params: web::Query<ActivityQueryParams>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match api_service::list_activity(repo.as_ref(), &user, params.page) {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(err) => api_error(err),
    }
}
