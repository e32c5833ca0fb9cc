// HTTP handlers for the membership plan catalog.

use actix_web::{web, HttpResponse};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::MySqlPool;

use crate::config::Config;
use crate::core::{AppError, Result};
use crate::modules::memberships::{models::MembershipPlan, services::PlanService};

#[derive(Debug, Deserialize)]
pub struct CreatePlanRequest {
    pub name: String,
    pub duration_months: u32,
    pub price: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdatePlanRequest {
    pub name: Option<String>,
    pub duration_months: Option<u32>,
    pub price: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PlanResponse {
    pub id: String,
    pub name: String,
    pub duration_months: u32,
    pub price: String,
}

impl From<MembershipPlan> for PlanResponse {
    fn from(plan: MembershipPlan) -> Self {
        Self {
            id: plan.id,
            name: plan.name,
            duration_months: plan.duration_months,
            price: plan.price.to_string(),
        }
    }
}

fn parse_amount(raw: &str) -> Result<Decimal> {
    raw.parse::<Decimal>()
        .map_err(|_| AppError::validation(format!("Invalid amount format: {}", raw)))
}

fn service(pool: &web::Data<MySqlPool>, config: &web::Data<Config>) -> PlanService {
    PlanService::new(pool.get_ref().clone(), config.app.currency)
}

/// POST /plans
pub async fn create_plan(
    body: web::Json<CreatePlanRequest>,
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
) -> Result<HttpResponse> {
    let body = body.into_inner();
    let price = parse_amount(&body.price)?;

    let plan = service(&pool, &config)
        .create(body.name, body.duration_months, price)
        .await?;

    Ok(HttpResponse::Created().json(PlanResponse::from(plan)))
}

/// GET /plans
pub async fn list_plans(
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
) -> Result<HttpResponse> {
    let plans = service(&pool, &config).list().await?;
    let response: Vec<PlanResponse> = plans.into_iter().map(PlanResponse::from).collect();

    Ok(HttpResponse::Ok().json(response))
}

/// GET /plans/{id}
pub async fn get_plan(
    id: web::Path<String>,
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
) -> Result<HttpResponse> {
    let plan = service(&pool, &config).get(&id).await?;
    Ok(HttpResponse::Ok().json(PlanResponse::from(plan)))
}

/// PUT /plans/{id}
pub async fn update_plan(
    id: web::Path<String>,
    body: web::Json<UpdatePlanRequest>,
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
) -> Result<HttpResponse> {
    let body = body.into_inner();
    let price = body.price.as_deref().map(parse_amount).transpose()?;

    let plan = service(&pool, &config)
        .update(&id, body.name, body.duration_months, price)
        .await?;

    Ok(HttpResponse::Ok().json(PlanResponse::from(plan)))
}

/// DELETE /plans/{id}
pub async fn delete_plan(
    id: web::Path<String>,
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
) -> Result<HttpResponse> {
    service(&pool, &config).remove(&id).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Configure plan catalog routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/plans")
            .route("", web::post().to(create_plan))
            .route("", web::get().to(list_plans))
            .route("/{id}", web::get().to(get_plan))
            .route("/{id}", web::put().to(update_plan))
            .route("/{id}", web::delete().to(delete_plan)),
    );
}
