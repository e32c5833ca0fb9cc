// HTTP handlers for payment endpoints.
//
// Endpoints:
// - POST /payments - Record a payment (optionally settling an installment)
// - GET /payments/{id} - Fetch one payment
// - GET /members/{id}/payments - A member's payment history with total

use actix_web::{web, HttpResponse};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::MySqlPool;

use crate::config::Config;
use crate::core::{AppError, Result};
use crate::modules::installments::controllers::installment_controller::InstallmentPlanResponse;
use crate::modules::payments::{
    models::{Payment, PaymentMethod},
    services::{InstallmentTarget, PaymentService},
};

#[derive(Debug, Deserialize)]
pub struct RecordPaymentRequest {
    pub member_id: String,
    pub amount: String,
    /// One of: cash, card, transfer
    pub method: String,
    /// ISO-8601 date; defaults to today when omitted
    pub paid_on: Option<String>,
    pub note: Option<String>,
    pub installment: Option<InstallmentTargetBody>,
}

#[derive(Debug, Deserialize)]
pub struct InstallmentTargetBody {
    pub plan_id: String,
    pub number: u32,
}

#[derive(Debug, Serialize)]
pub struct PaymentResponse {
    pub id: String,
    pub member_id: String,
    pub amount: String,
    pub method: String,
    pub paid_on: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl From<Payment> for PaymentResponse {
    fn from(payment: Payment) -> Self {
        Self {
            id: payment.id,
            member_id: payment.member_id,
            amount: payment.amount.to_string(),
            method: payment.method.to_string(),
            paid_on: payment.paid_on.to_string(),
            note: payment.note,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RecordPaymentResponse {
    pub payment: PaymentResponse,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub installment_plan: Option<InstallmentPlanResponse>,
}

#[derive(Debug, Serialize)]
pub struct MemberPaymentsResponse {
    pub member_id: String,
    pub total_paid: String,
    pub payments: Vec<PaymentResponse>,
}

fn parse_amount(raw: &str) -> Result<Decimal> {
    raw.parse::<Decimal>()
        .map_err(|_| AppError::validation(format!("Invalid amount format: {}", raw)))
}

fn parse_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| AppError::validation(format!("Invalid date format: {}", raw)))
}

fn service(pool: &web::Data<MySqlPool>, config: &web::Data<Config>) -> PaymentService {
    PaymentService::new(pool.get_ref().clone(), config.app.currency)
}

/// POST /payments
pub async fn record_payment(
    body: web::Json<RecordPaymentRequest>,
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
) -> Result<HttpResponse> {
    let body = body.into_inner();

    let amount = parse_amount(&body.amount)?;
    let method = PaymentMethod::try_from(body.method).map_err(AppError::Validation)?;
    let paid_on = body.paid_on.as_deref().map(parse_date).transpose()?;

    let target = body.installment.map(|t| InstallmentTarget {
        plan_id: t.plan_id,
        number: t.number,
    });

    let outcome = service(&pool, &config)
        .record(body.member_id, amount, method, paid_on, body.note, target)
        .await?;

    let response = RecordPaymentResponse {
        payment: PaymentResponse::from(outcome.payment),
        installment_plan: outcome.installment_plan.map(InstallmentPlanResponse::from),
    };

    Ok(HttpResponse::Created().json(response))
}

/// GET /payments/{id}
pub async fn get_payment(
    id: web::Path<String>,
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
) -> Result<HttpResponse> {
    let payment = service(&pool, &config).get(&id).await?;
    Ok(HttpResponse::Ok().json(PaymentResponse::from(payment)))
}

/// GET /members/{member_id}/payments
pub async fn list_member_payments(
    member_id: web::Path<String>,
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
) -> Result<HttpResponse> {
    let service = service(&pool, &config);
    let member_id = member_id.into_inner();

    let payments = service.list_for_member(&member_id).await?;
    let total_paid = service.total_for_member(&member_id).await?;

    let response = MemberPaymentsResponse {
        member_id,
        total_paid: total_paid.to_string(),
        payments: payments.into_iter().map(PaymentResponse::from).collect(),
    };

    Ok(HttpResponse::Ok().json(response))
}

/// Configure payment routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/payments", web::post().to(record_payment))
        .route("/payments/{id}", web::get().to(get_payment))
        .route(
            "/members/{member_id}/payments",
            web::get().to(list_member_payments),
        );
}
