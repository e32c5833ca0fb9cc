// HTTP handlers for membership periods and renewal.
//
// Endpoints:
// - POST /memberships - Enroll a member on a plan
// - GET /memberships/{id} - Fetch one membership
// - GET /members/{id}/memberships - A member's membership history
// - POST /memberships/{id}/cancel - Cancel the running period
// - POST /memberships/{id}/renew - Chain a new period, optionally with installments

use actix_web::{web, HttpResponse};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::MySqlPool;

use crate::config::Config;
use crate::core::{AppError, Result};
use crate::modules::installments::controllers::installment_controller::InstallmentPlanResponse;
use crate::modules::memberships::{
    models::Membership,
    services::{InstallmentTerms, MembershipService},
};

#[derive(Debug, Deserialize)]
pub struct CreateMembershipRequest {
    pub member_id: String,
    pub plan_id: String,
    /// ISO-8601 date; defaults to today when omitted
    pub start_date: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RenewMembershipRequest {
    /// Switch to a different plan; defaults to the current one
    pub plan_id: Option<String>,
    /// Override the renewal anchor date
    pub start_date: Option<String>,
    pub installments: Option<InstallmentTermsBody>,
}

#[derive(Debug, Deserialize)]
pub struct InstallmentTermsBody {
    pub num_installments: u32,
    pub down_payment: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct MembershipResponse {
    pub id: String,
    pub member_id: String,
    pub plan_id: String,
    pub start_date: String,
    pub end_date: String,
    pub status: String,
}

impl From<Membership> for MembershipResponse {
    fn from(membership: Membership) -> Self {
        Self {
            id: membership.id,
            member_id: membership.member_id,
            plan_id: membership.plan_id,
            start_date: membership.start_date.to_string(),
            end_date: membership.end_date.to_string(),
            status: membership.status.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RenewalResponse {
    pub membership: MembershipResponse,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub installment_plan: Option<InstallmentPlanResponse>,
}

fn parse_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| AppError::validation(format!("Invalid date format: {}", raw)))
}

fn service(pool: &web::Data<MySqlPool>, config: &web::Data<Config>) -> MembershipService {
    MembershipService::new(pool.get_ref().clone(), config.app.currency)
}

/// POST /memberships
pub async fn create_membership(
    body: web::Json<CreateMembershipRequest>,
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
) -> Result<HttpResponse> {
    let body = body.into_inner();
    let start_date = body.start_date.as_deref().map(parse_date).transpose()?;

    let membership = service(&pool, &config)
        .enroll(body.member_id, &body.plan_id, start_date)
        .await?;

    Ok(HttpResponse::Created().json(MembershipResponse::from(membership)))
}

/// GET /memberships/{id}
pub async fn get_membership(
    id: web::Path<String>,
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
) -> Result<HttpResponse> {
    let membership = service(&pool, &config).get(&id).await?;
    Ok(HttpResponse::Ok().json(MembershipResponse::from(membership)))
}

/// GET /members/{member_id}/memberships
pub async fn list_member_memberships(
    member_id: web::Path<String>,
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
) -> Result<HttpResponse> {
    let memberships = service(&pool, &config).list_for_member(&member_id).await?;

    let response: Vec<MembershipResponse> = memberships
        .into_iter()
        .map(MembershipResponse::from)
        .collect();

    Ok(HttpResponse::Ok().json(response))
}

/// POST /memberships/{id}/cancel
pub async fn cancel_membership(
    id: web::Path<String>,
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
) -> Result<HttpResponse> {
    let membership = service(&pool, &config).cancel(&id).await?;
    Ok(HttpResponse::Ok().json(MembershipResponse::from(membership)))
}

/// POST /memberships/{id}/renew
///
/// Chains a new period onto this membership. With installment terms in the
/// body, the plan price is spread into a schedule anchored on the new
/// period's start and returned alongside the membership.
pub async fn renew_membership(
    id: web::Path<String>,
    body: web::Json<RenewMembershipRequest>,
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
) -> Result<HttpResponse> {
    let body = body.into_inner();
    let start_date = body.start_date.as_deref().map(parse_date).transpose()?;

    let terms = body
        .installments
        .map(|t| {
            let down_payment = t
                .down_payment
                .as_deref()
                .map(|raw| {
                    raw.parse()
                        .map_err(|_| AppError::validation(format!("Invalid amount format: {}", raw)))
                })
                .transpose()?;

            Ok::<_, AppError>(InstallmentTerms {
                num_installments: t.num_installments,
                down_payment,
            })
        })
        .transpose()?;

    let outcome = service(&pool, &config)
        .renew(&id, body.plan_id, start_date, terms)
        .await?;

    let response = RenewalResponse {
        membership: MembershipResponse::from(outcome.membership),
        installment_plan: outcome.installment_plan.map(InstallmentPlanResponse::from),
    };

    Ok(HttpResponse::Created().json(response))
}

/// Configure membership routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/memberships", web::post().to(create_membership))
        .route("/memberships/{id}", web::get().to(get_membership))
        .route("/memberships/{id}/cancel", web::post().to(cancel_membership))
        .route("/memberships/{id}/renew", web::post().to(renew_membership))
        .route(
            "/members/{member_id}/memberships",
            web::get().to(list_member_memberships),
        );
}
