// HTTP handlers for member CRUD endpoints.

use actix_web::{web, HttpResponse};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::MySqlPool;

use crate::core::{AppError, Result};
use crate::modules::members::{models::Member, services::MemberService};

#[derive(Debug, Deserialize)]
pub struct CreateMemberRequest {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    /// ISO-8601 date; defaults to today when omitted
    pub joined_on: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateMemberRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct MemberResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub status: String,
    pub joined_on: String,
}

impl From<Member> for MemberResponse {
    fn from(member: Member) -> Self {
        Self {
            id: member.id,
            name: member.name,
            email: member.email,
            phone: member.phone,
            status: member.status.to_string(),
            joined_on: member.joined_on.to_string(),
        }
    }
}

fn parse_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| AppError::validation(format!("Invalid date format: {}", raw)))
}

/// POST /members
pub async fn create_member(
    body: web::Json<CreateMemberRequest>,
    pool: web::Data<MySqlPool>,
) -> Result<HttpResponse> {
    let body = body.into_inner();
    let joined_on = body.joined_on.as_deref().map(parse_date).transpose()?;

    let member = MemberService::new(pool.get_ref().clone())
        .register(body.name, body.email, body.phone, joined_on)
        .await?;

    Ok(HttpResponse::Created().json(MemberResponse::from(member)))
}

/// GET /members
pub async fn list_members(
    query: web::Query<ListQuery>,
    pool: web::Data<MySqlPool>,
) -> Result<HttpResponse> {
    let members = MemberService::new(pool.get_ref().clone())
        .list(query.limit, query.offset)
        .await?;

    let response: Vec<MemberResponse> = members.into_iter().map(MemberResponse::from).collect();
    Ok(HttpResponse::Ok().json(response))
}

/// GET /members/{id}
pub async fn get_member(
    id: web::Path<String>,
    pool: web::Data<MySqlPool>,
) -> Result<HttpResponse> {
    let member = MemberService::new(pool.get_ref().clone()).get(&id).await?;
    Ok(HttpResponse::Ok().json(MemberResponse::from(member)))
}

/// PUT /members/{id}
pub async fn update_member(
    id: web::Path<String>,
    body: web::Json<UpdateMemberRequest>,
    pool: web::Data<MySqlPool>,
) -> Result<HttpResponse> {
    let body = body.into_inner();

    let member = MemberService::new(pool.get_ref().clone())
        .update_details(&id, body.name, body.email, body.phone)
        .await?;

    Ok(HttpResponse::Ok().json(MemberResponse::from(member)))
}

/// POST /members/{id}/deactivate
pub async fn deactivate_member(
    id: web::Path<String>,
    pool: web::Data<MySqlPool>,
) -> Result<HttpResponse> {
    let member = MemberService::new(pool.get_ref().clone())
        .deactivate(&id)
        .await?;

    Ok(HttpResponse::Ok().json(MemberResponse::from(member)))
}

/// DELETE /members/{id}
pub async fn delete_member(
    id: web::Path<String>,
    pool: web::Data<MySqlPool>,
) -> Result<HttpResponse> {
    MemberService::new(pool.get_ref().clone()).remove(&id).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Configure member routes.
///
/// Plain routes, not a scope: other modules nest member sub-resources
/// (`/members/{id}/memberships`, `/members/{id}/payments`) and a `/members`
/// scope would swallow those paths.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/members", web::post().to(create_member))
        .route("/members", web::get().to(list_members))
        .route("/members/{id}", web::get().to(get_member))
        .route("/members/{id}", web::put().to(update_member))
        .route("/members/{id}", web::delete().to(delete_member))
        .route("/members/{id}/deactivate", web::post().to(deactivate_member));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_member_response_serialization() {
        let member = Member::new(
            "Ada Lovelace".to_string(),
            "ada@example.com".to_string(),
            None,
            NaiveDate::from_ymd_opt(2026, 1, 5).unwrap(),
        )
        .unwrap();

        let response = MemberResponse::from(member);
        assert_eq!(response.name, "Ada Lovelace");
        assert_eq!(response.status, "active");
        assert_eq!(response.joined_on, "2026-01-05");
        assert!(response.phone.is_none());
    }
}
