//! Customer service

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};
use shared::EntityKind;
use sqlx::{FromRow, PgPool};
use validator::{Validate, ValidationError};

use crate::error::{AppError, AppResult};
use crate::services::sequence::allocate_id;

/// Customer service for managing the customer directory
#[derive(Clone)]
pub struct CustomerService {
    db: PgPool,
}

/// Customer record
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Customer {
    pub id: String,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Input for creating a customer
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCustomerInput {
    #[validate(length(min = 1, max = 200, message = "name is required"))]
    pub name: String,
    #[validate(email(message = "email is not a valid address"))]
    pub email: Option<String>,
    #[validate(custom = "phone_number")]
    pub phone: Option<String>,
    pub address: Option<String>,
}

fn phone_number(phone: &str) -> Result<(), ValidationError> {
    shared::validate_phone(phone).map_err(|msg| {
        let mut err = ValidationError::new("phone");
        err.message = Some(msg.into());
        err
    })
}

impl CustomerService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// List customers, optionally filtered by a case-insensitive name/email/phone search
    pub async fn list_customers(&self, search: Option<&str>) -> AppResult<Vec<Customer>> {
        let pattern = search
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| format!("%{}%", s.to_lowercase()));

        let customers = sqlx::query_as::<_, Customer>(
            r#"
            SELECT id, name, email, phone, address, created_at
            FROM customers
            WHERE $1::TEXT IS NULL
               OR LOWER(name) LIKE $1
               OR LOWER(COALESCE(email, '')) LIKE $1
               OR COALESCE(phone, '') LIKE $1
            ORDER BY name ASC
            "#,
        )
        .bind(pattern)
        .fetch_all(&self.db)
        .await?;

        Ok(customers)
    }

    /// Create a customer
    pub async fn create_customer(&self, input: CreateCustomerInput) -> AppResult<Customer> {
        input.validate()?;

        let name = input.name.trim();
        if name.is_empty() {
            return Err(AppError::validation("name", "name is required"));
        }

        let mut tx = self.db.begin().await?;
        let id = allocate_id(&mut tx, EntityKind::Customer, Utc::now().year()).await?;

        let customer = sqlx::query_as::<_, Customer>(
            r#"
            INSERT INTO customers (id, name, email, phone, address)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, email, phone, address, created_at
            "#,
        )
        .bind(&id)
        .bind(name)
        .bind(&input.email)
        .bind(&input.phone)
        .bind(&input.address)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::info!(customer_id = %customer.id, "Customer created");

        Ok(customer)
    }

    /// Get a customer by id
    pub async fn get_customer(&self, customer_id: &str) -> AppResult<Customer> {
        sqlx::query_as::<_, Customer>(
            "SELECT id, name, email, phone, address, created_at FROM customers WHERE id = $1",
        )
        .bind(customer_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Customer".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(name: &str, phone: Option<&str>) -> CreateCustomerInput {
        CreateCustomerInput {
            name: name.to_string(),
            email: None,
            phone: phone.map(str::to_string),
            address: None,
        }
    }

    #[test]
    fn test_phone_validation_rejects_letters() {
        let err = input("Ada", Some("call me")).validate().unwrap_err();
        assert!(err.field_errors().contains_key("phone"));
    }

    #[test]
    fn test_valid_customer_input() {
        assert!(input("Ada", Some("+62 812-3456-789")).validate().is_ok());
        assert!(input("Ada", None).validate().is_ok());
    }

    #[tokio::test]
    async fn test_create_rejects_empty_name() {
        let pool = sqlx::postgres::PgPoolOptions::new()
            .connect_lazy("postgres://localhost/unused")
            .unwrap();
        let err = CustomerService::new(pool)
            .create_customer(input("", None))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation { ref field, .. } if field == "name"));
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires a PostgreSQL DATABASE_URL"]
    async fn test_create_and_search(pool: PgPool) {
        let service = CustomerService::new(pool);
        let ada = service
            .create_customer(CreateCustomerInput {
                name: "Ada Lovelace".to_string(),
                email: Some("ada@example.com".to_string()),
                phone: None,
                address: None,
            })
            .await
            .unwrap();
        service.create_customer(input("Grace Hopper", None)).await.unwrap();

        assert!(ada.id.starts_with("CUS-"));
        assert!(ada.id.ends_with("-001"));

        let found = service.list_customers(Some("LOVE")).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, ada.id);

        assert_eq!(service.list_customers(None).await.unwrap().len(), 2);
        assert_eq!(service.get_customer(&ada.id).await.unwrap().name, "Ada Lovelace");
    }
}
