// HTTP handlers for the expense ledger.
//
// Endpoints:
// - POST /expenses - Record an expense
// - GET /expenses/{id} - Fetch one expense
// - PUT /expenses/{id} - Edit an expense
// - DELETE /expenses/{id} - Remove an expense
// - GET /expenses?year=&month= - Ledger entries for a month
// - GET /expenses/summary?year=&month= - Per-category monthly totals

use actix_web::{web, HttpResponse};
use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::MySqlPool;

use crate::config::Config;
use crate::core::{AppError, Result};
use crate::modules::expenses::{
    models::{Expense, ExpenseCategory},
    services::ExpenseService,
};

#[derive(Debug, Deserialize)]
pub struct RecordExpenseRequest {
    /// One of: equipment, maintenance, salary, utilities, other
    pub category: String,
    pub amount: String,
    /// ISO-8601 date; defaults to today when omitted
    pub incurred_on: Option<String>,
    pub description: String,
}

#[derive(Debug, Deserialize)]
pub struct MonthQuery {
    pub year: Option<i32>,
    pub month: Option<u32>,
}

impl MonthQuery {
    /// Default to the current calendar month
    fn resolve(&self) -> (i32, u32) {
        let today = chrono::Utc::now().date_naive();
        (
            self.year.unwrap_or_else(|| today.year()),
            self.month.unwrap_or_else(|| today.month()),
        )
    }
}

#[derive(Debug, Serialize)]
pub struct ExpenseResponse {
    pub id: String,
    pub category: String,
    pub amount: String,
    pub incurred_on: String,
    pub description: String,
}

impl From<Expense> for ExpenseResponse {
    fn from(expense: Expense) -> Self {
        Self {
            id: expense.id,
            category: expense.category.to_string(),
            amount: expense.amount.to_string(),
            incurred_on: expense.incurred_on.to_string(),
            description: expense.description,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CategoryTotalResponse {
    pub category: String,
    pub total: String,
}

#[derive(Debug, Serialize)]
pub struct MonthlySummaryResponse {
    pub year: i32,
    pub month: u32,
    pub grand_total: String,
    pub totals: Vec<CategoryTotalResponse>,
}

fn parse_amount(raw: &str) -> Result<Decimal> {
    raw.parse::<Decimal>()
        .map_err(|_| AppError::validation(format!("Invalid amount format: {}", raw)))
}

fn parse_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| AppError::validation(format!("Invalid date format: {}", raw)))
}

fn service(pool: &web::Data<MySqlPool>, config: &web::Data<Config>) -> ExpenseService {
    ExpenseService::new(pool.get_ref().clone(), config.app.currency)
}

/// POST /expenses
pub async fn record_expense(
    body: web::Json<RecordExpenseRequest>,
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
) -> Result<HttpResponse> {
    let body = body.into_inner();

    let category = ExpenseCategory::try_from(body.category).map_err(AppError::Validation)?;
    let amount = parse_amount(&body.amount)?;
    let incurred_on = body.incurred_on.as_deref().map(parse_date).transpose()?;

    let expense = service(&pool, &config)
        .record(category, amount, incurred_on, body.description)
        .await?;

    Ok(HttpResponse::Created().json(ExpenseResponse::from(expense)))
}

/// GET /expenses?year=&month=
pub async fn list_expenses(
    query: web::Query<MonthQuery>,
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
) -> Result<HttpResponse> {
    let (year, month) = query.resolve();
    let expenses = service(&pool, &config).list_for_month(year, month).await?;

    let response: Vec<ExpenseResponse> = expenses.into_iter().map(ExpenseResponse::from).collect();
    Ok(HttpResponse::Ok().json(response))
}

/// GET /expenses/summary?year=&month=
pub async fn monthly_summary(
    query: web::Query<MonthQuery>,
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
) -> Result<HttpResponse> {
    let (year, month) = query.resolve();
    let summary = service(&pool, &config).monthly_summary(year, month).await?;

    let response = MonthlySummaryResponse {
        year: summary.year,
        month: summary.month,
        grand_total: summary.grand_total.to_string(),
        totals: summary
            .totals
            .into_iter()
            .map(|t| CategoryTotalResponse {
                category: t.category.to_string(),
                total: t.total.to_string(),
            })
            .collect(),
    };

    Ok(HttpResponse::Ok().json(response))
}

#[derive(Debug, Deserialize)]
pub struct UpdateExpenseRequest {
    pub category: Option<String>,
    pub amount: Option<String>,
    pub incurred_on: Option<String>,
    pub description: Option<String>,
}

/// PUT /expenses/{id}
pub async fn update_expense(
    id: web::Path<String>,
    body: web::Json<UpdateExpenseRequest>,
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
) -> Result<HttpResponse> {
    let body = body.into_inner();

    let category = body
        .category
        .map(ExpenseCategory::try_from)
        .transpose()
        .map_err(AppError::Validation)?;
    let amount = body.amount.as_deref().map(parse_amount).transpose()?;
    let incurred_on = body.incurred_on.as_deref().map(parse_date).transpose()?;

    let expense = service(&pool, &config)
        .update(&id, category, amount, incurred_on, body.description)
        .await?;

    Ok(HttpResponse::Ok().json(ExpenseResponse::from(expense)))
}

/// GET /expenses/{id}
pub async fn get_expense(
    id: web::Path<String>,
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
) -> Result<HttpResponse> {
    let expense = service(&pool, &config).get(&id).await?;
    Ok(HttpResponse::Ok().json(ExpenseResponse::from(expense)))
}

/// DELETE /expenses/{id}
pub async fn delete_expense(
    id: web::Path<String>,
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
) -> Result<HttpResponse> {
    service(&pool, &config).remove(&id).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Configure expense routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/expenses")
            .route("", web::post().to(record_expense))
            .route("", web::get().to(list_expenses))
            .route("/summary", web::get().to(monthly_summary))
            .route("/{id}", web::get().to(get_expense))
            .route("/{id}", web::put().to(update_expense))
            .route("/{id}", web::delete().to(delete_expense)),
    );
}
