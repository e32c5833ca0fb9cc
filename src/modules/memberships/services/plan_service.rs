use rust_decimal::Decimal;
use sqlx::MySqlPool;
use tracing::info;

use crate::core::{AppError, Currency, Result};
use crate::modules::memberships::{models::MembershipPlan, repositories::PlanRepository};

/// Service for the membership plan catalog
pub struct PlanService {
    repository: PlanRepository,
    currency: Currency,
}

impl PlanService {
    pub fn new(pool: MySqlPool, currency: Currency) -> Self {
        Self {
            repository: PlanRepository::new(pool),
            currency,
        }
    }

    pub async fn create(
        &self,
        name: String,
        duration_months: u32,
        price: Decimal,
    ) -> Result<MembershipPlan> {
        self.currency
            .validate_amount(price)
            .map_err(AppError::Validation)?;

        let plan = MembershipPlan::new(name, duration_months, price)?;
        self.repository.create(&plan).await?;

        info!(
            plan_id = plan.id.as_str(),
            name = plan.name.as_str(),
            duration_months = plan.duration_months,
            "Membership plan created"
        );

        Ok(plan)
    }

    pub async fn get(&self, id: &str) -> Result<MembershipPlan> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Membership plan not found"))
    }

    pub async fn list(&self) -> Result<Vec<MembershipPlan>> {
        self.repository.list().await
    }

    pub async fn update(
        &self,
        id: &str,
        name: Option<String>,
        duration_months: Option<u32>,
        price: Option<Decimal>,
    ) -> Result<MembershipPlan> {
        let mut plan = self.get(id).await?;

        if let Some(name) = name {
            let name = name.trim().to_string();
            if name.is_empty() {
                return Err(AppError::validation("Plan name must not be empty"));
            }
            plan.name = name;
        }

        if let Some(duration_months) = duration_months {
            if duration_months == 0 {
                return Err(AppError::validation(
                    "Plan duration must be at least one month",
                ));
            }
            plan.duration_months = duration_months;
        }

        if let Some(price) = price {
            if price <= Decimal::ZERO {
                return Err(AppError::validation("Plan price must be positive"));
            }
            self.currency
                .validate_amount(price)
                .map_err(AppError::Validation)?;
            plan.price = price;
        }

        plan.updated_at = chrono::Utc::now().naive_utc();
        self.repository.update(&plan).await?;

        info!(plan_id = id, "Membership plan updated");

        Ok(plan)
    }

    pub async fn remove(&self, id: &str) -> Result<()> {
        self.repository.delete(id).await?;

        info!(plan_id = id, "Membership plan deleted");

        Ok(())
    }
}
