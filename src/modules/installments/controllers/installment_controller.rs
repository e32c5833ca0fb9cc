// HTTP handlers for installment plan endpoints.
//
// Endpoints:
// - POST /installment-plans/preview - Compute a draft schedule (no persistence)
// - POST /memberships/{id}/installment-plan - Confirm and persist a plan
// - GET /memberships/{id}/installment-plan - Fetch a membership's plan
// - PATCH /installment-plans/{id}/installments - Apply manual overrides

use actix_web::{web, HttpResponse};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::MySqlPool;

use crate::config::Config;
use crate::core::{AppError, Result};
use crate::modules::installments::{
    models::{Installment, InstallmentPlan, ScheduleRequest},
    services::{InstallmentOverride, InstallmentService},
};

/// Request body shared by preview and plan creation
#[derive(Debug, Deserialize)]
pub struct ScheduleRequestBody {
    pub total_amount: String,
    pub num_installments: u32,
    /// ISO-8601 date; defaults to today when omitted
    pub start_date: Option<String>,
    pub down_payment: Option<String>,
}

impl ScheduleRequestBody {
    fn into_request(self) -> Result<ScheduleRequest> {
        let total_amount = parse_amount(&self.total_amount)?;
        let down_payment = self.down_payment.as_deref().map(parse_amount).transpose()?;
        let start_date = self.start_date.as_deref().map(parse_date).transpose()?;

        Ok(ScheduleRequest::new(
            total_amount,
            self.num_installments,
            start_date,
            down_payment,
        ))
    }
}

/// Request for PATCH /installment-plans/{id}/installments
#[derive(Debug, Deserialize)]
pub struct AdjustInstallmentsRequest {
    pub installments: Vec<InstallmentOverrideBody>,
}

#[derive(Debug, Deserialize)]
pub struct InstallmentOverrideBody {
    pub number: u32,
    pub amount: Option<String>,
    pub due_date: Option<String>,
}

/// Response for a single installment
#[derive(Debug, Serialize)]
pub struct InstallmentResponse {
    pub number: u32,
    pub amount: String,
    pub due_date: String,
    pub paid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paid_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_id: Option<String>,
}

impl From<Installment> for InstallmentResponse {
    fn from(installment: Installment) -> Self {
        Self {
            number: installment.number,
            amount: installment.amount.to_string(),
            due_date: installment.due_date.to_string(),
            paid: installment.paid,
            paid_date: installment.paid_date.map(|d| d.to_string()),
            payment_id: installment.payment_id,
        }
    }
}

/// Response for a full installment plan
#[derive(Debug, Serialize)]
pub struct InstallmentPlanResponse {
    pub id: String,
    pub membership_id: String,
    pub enabled: bool,
    pub total_amount: String,
    pub num_installments: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub down_payment: Option<String>,
    pub outstanding: String,
    pub installments: Vec<InstallmentResponse>,
}

impl From<InstallmentPlan> for InstallmentPlanResponse {
    fn from(plan: InstallmentPlan) -> Self {
        let outstanding = plan.outstanding();

        Self {
            id: plan.id,
            membership_id: plan.membership_id,
            enabled: plan.enabled,
            total_amount: plan.total_amount.to_string(),
            num_installments: plan.num_installments,
            down_payment: plan.down_payment.map(|d| d.to_string()),
            outstanding: outstanding.to_string(),
            installments: plan
                .installments
                .into_iter()
                .map(InstallmentResponse::from)
                .collect(),
        }
    }
}

/// Response for POST /installment-plans/preview
#[derive(Debug, Serialize)]
pub struct PreviewResponse {
    pub total_amount: String,
    pub installments: Vec<InstallmentResponse>,
}

fn parse_amount(raw: &str) -> Result<Decimal> {
    raw.parse::<Decimal>()
        .map_err(|_| AppError::validation(format!("Invalid amount format: {}", raw)))
}

fn parse_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| AppError::validation(format!("Invalid date format: {}", raw)))
}

fn service(pool: &web::Data<MySqlPool>, config: &web::Data<Config>) -> InstallmentService {
    InstallmentService::new(pool.get_ref().clone(), config.app.currency)
}

/// POST /installment-plans/preview
///
/// Computes a draft schedule for the given inputs without persisting it.
/// The setup form calls this on every change to count, total, start date,
/// or down payment.
pub async fn preview_schedule(
    body: web::Json<ScheduleRequestBody>,
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
) -> Result<HttpResponse> {
    let request = body.into_inner().into_request()?;
    let installments = service(&pool, &config).preview(&request)?;

    let response = PreviewResponse {
        total_amount: request.total_amount.to_string(),
        installments: installments
            .into_iter()
            .map(InstallmentResponse::from)
            .collect(),
    };

    Ok(HttpResponse::Ok().json(response))
}

/// POST /memberships/{membership_id}/installment-plan
///
/// Confirms a schedule and persists it as the membership's plan.
///
/// # Returns
/// - 201: Plan created
/// - 400: Invalid inputs or balance-gate rejection
pub async fn create_plan(
    membership_id: web::Path<String>,
    body: web::Json<ScheduleRequestBody>,
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
) -> Result<HttpResponse> {
    let request = body.into_inner().into_request()?;
    let plan = service(&pool, &config)
        .create_plan(membership_id.into_inner(), request)
        .await?;

    Ok(HttpResponse::Created().json(InstallmentPlanResponse::from(plan)))
}

/// GET /memberships/{membership_id}/installment-plan
pub async fn get_plan(
    membership_id: web::Path<String>,
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
) -> Result<HttpResponse> {
    let plan = service(&pool, &config)
        .get_plan_for_membership(&membership_id)
        .await?;

    Ok(HttpResponse::Ok().json(InstallmentPlanResponse::from(plan)))
}

/// PATCH /installment-plans/{plan_id}/installments
///
/// Applies manual overrides to individual installments. Paid installments
/// are refused; the balance gate must accept the edited schedule before
/// anything is written.
pub async fn adjust_installments(
    plan_id: web::Path<String>,
    body: web::Json<AdjustInstallmentsRequest>,
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
) -> Result<HttpResponse> {
    let overrides = body
        .into_inner()
        .installments
        .into_iter()
        .map(|o| {
            Ok(InstallmentOverride {
                number: o.number,
                amount: o.amount.as_deref().map(parse_amount).transpose()?,
                due_date: o.due_date.as_deref().map(parse_date).transpose()?,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let plan = service(&pool, &config)
        .adjust_installments(&plan_id, overrides)
        .await?;

    Ok(HttpResponse::Ok().json(InstallmentPlanResponse::from(plan)))
}

/// Configure installment routes.
///
/// Plain routes, not a scope: membership routes live under the same
/// `/memberships/{id}` prefix in their own module.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route(
        "/installment-plans/preview",
        web::post().to(preview_schedule),
    )
    .route(
        "/installment-plans/{plan_id}/installments",
        web::patch().to(adjust_installments),
    )
    .route(
        "/memberships/{membership_id}/installment-plan",
        web::post().to(create_plan),
    )
    .route(
        "/memberships/{membership_id}/installment-plan",
        web::get().to(get_plan),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_installment_response_serialization() {
        let installment = Installment::scheduled(
            1,
            dec!(333),
            NaiveDate::from_ymd_opt(2026, 1, 15).unwrap(),
        );

        let response = InstallmentResponse::from(installment);

        assert_eq!(response.number, 1);
        assert_eq!(response.amount, "333");
        assert_eq!(response.due_date, "2026-01-15");
        assert!(!response.paid);
        assert!(response.paid_date.is_none());
    }

    #[test]
    fn test_request_body_parsing() {
        let body = ScheduleRequestBody {
            total_amount: "1000".to_string(),
            num_installments: 3,
            start_date: Some("2026-01-15".to_string()),
            down_payment: Some("400".to_string()),
        };

        let request = body.into_request().unwrap();
        assert_eq!(request.total_amount, dec!(1000));
        assert_eq!(request.num_installments, 3);
        assert_eq!(
            request.start_date,
            NaiveDate::from_ymd_opt(2026, 1, 15).unwrap()
        );
        assert_eq!(request.down_payment, Some(dec!(400)));
    }

    #[test]
    fn test_request_body_rejects_bad_amount() {
        let body = ScheduleRequestBody {
            total_amount: "one thousand".to_string(),
            num_installments: 3,
            start_date: None,
            down_payment: None,
        };

        assert!(body.into_request().is_err());
    }

    #[test]
    fn test_request_body_rejects_bad_date() {
        let body = ScheduleRequestBody {
            total_amount: "1000".to_string(),
            num_installments: 3,
            start_date: Some("15/01/2026".to_string()),
            down_payment: None,
        };

        assert!(body.into_request().is_err());
    }
}
