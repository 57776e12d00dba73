//! Product catalog service
//!
//! A product's recipe lists the grams of each ingredient one unit consumes.
//! Order placement reads these lines to deduct stock.

use std::collections::HashMap;

use chrono::{DateTime, Datelike, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::{validate_recipe_quantity, EntityKind};
use sqlx::{FromRow, PgPool};
use validator::Validate;

use crate::error::{map_unique_violation, AppError, AppResult};
use crate::services::sequence::allocate_id;

/// Product service for managing the catalog
#[derive(Clone)]
pub struct ProductService {
    db: PgPool,
}

/// Product record
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub category: Option<String>,
    pub price: Decimal,
    pub created_at: DateTime<Utc>,
}

/// Recipe line as stored
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct RecipeLine {
    pub ingredient_id: String,
    pub ingredient_name: String,
    pub quantity_needed: Decimal,
}

/// Product with its recipe
#[derive(Debug, Clone, Serialize)]
pub struct ProductWithRecipe {
    #[serde(flatten)]
    pub product: Product,
    pub recipe: Vec<RecipeLine>,
}

/// Recipe line on product creation
#[derive(Debug, Deserialize)]
pub struct RecipeLineInput {
    pub ingredient_id: String,
    /// Grams of the ingredient per unit of product
    pub quantity_needed: Decimal,
}

/// Input for creating a product
#[derive(Debug, Deserialize, Validate)]
pub struct CreateProductInput {
    #[validate(length(min = 1, max = 200, message = "name is required"))]
    pub name: String,
    pub category: Option<String>,
    pub price: Decimal,
    #[serde(default)]
    pub recipe: Vec<RecipeLineInput>,
}

#[derive(Debug, FromRow)]
struct RecipeRow {
    product_id: String,
    ingredient_id: String,
    ingredient_name: String,
    quantity_needed: Decimal,
}

impl ProductService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// All products with their recipes, by name
    pub async fn list_products(&self) -> AppResult<Vec<ProductWithRecipe>> {
        let products = sqlx::query_as::<_, Product>(
            "SELECT id, name, category, price, created_at FROM products ORDER BY name ASC",
        )
        .fetch_all(&self.db)
        .await?;

        let rows = sqlx::query_as::<_, RecipeRow>(
            r#"
            SELECT pi.product_id, pi.ingredient_id, i.name as ingredient_name, pi.quantity_needed
            FROM product_ingredients pi
            JOIN ingredients i ON i.id = pi.ingredient_id
            ORDER BY pi.product_id, i.name
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        let mut recipes: HashMap<String, Vec<RecipeLine>> = HashMap::new();
        for row in rows {
            recipes.entry(row.product_id).or_default().push(RecipeLine {
                ingredient_id: row.ingredient_id,
                ingredient_name: row.ingredient_name,
                quantity_needed: row.quantity_needed,
            });
        }

        Ok(products
            .into_iter()
            .map(|product| {
                let recipe = recipes.remove(&product.id).unwrap_or_default();
                ProductWithRecipe { product, recipe }
            })
            .collect())
    }

    /// Create a product and its recipe lines
    pub async fn create_product(&self, input: CreateProductInput) -> AppResult<ProductWithRecipe> {
        input.validate()?;

        let name = input.name.trim();
        if name.is_empty() {
            return Err(AppError::validation("name", "name is required"));
        }
        if input.price < Decimal::ZERO {
            return Err(AppError::validation("price", "Price cannot be negative"));
        }
        for line in &input.recipe {
            validate_recipe_quantity(line.quantity_needed)
                .map_err(|msg| AppError::validation("recipe", msg))?;
        }

        let mut tx = self.db.begin().await?;
        let id = allocate_id(&mut tx, EntityKind::Product, Utc::now().year()).await?;

        let product = sqlx::query_as::<_, Product>(
            r#"
            INSERT INTO products (id, name, category, price)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, category, price, created_at
            "#,
        )
        .bind(&id)
        .bind(name)
        .bind(&input.category)
        .bind(input.price)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| map_unique_violation(e, &format!("Product '{}' already exists", name)))?;

        let mut recipe = Vec::with_capacity(input.recipe.len());
        for line in &input.recipe {
            let ingredient_name = sqlx::query_scalar::<_, String>(
                "SELECT name FROM ingredients WHERE id = $1",
            )
            .bind(&line.ingredient_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Ingredient {}", line.ingredient_id)))?;

            sqlx::query(
                r#"
                INSERT INTO product_ingredients (product_id, ingredient_id, quantity_needed)
                VALUES ($1, $2, $3)
                "#,
            )
            .bind(&id)
            .bind(&line.ingredient_id)
            .bind(line.quantity_needed)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                map_unique_violation(e, &format!("Ingredient {} listed twice", line.ingredient_id))
            })?;

            recipe.push(RecipeLine {
                ingredient_id: line.ingredient_id.clone(),
                ingredient_name,
                quantity_needed: line.quantity_needed,
            });
        }

        tx.commit().await?;

        tracing::info!(product_id = %product.id, recipe_lines = recipe.len(), "Product created");

        Ok(ProductWithRecipe { product, recipe })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(name: &str, quantity_needed: i64) -> CreateProductInput {
        CreateProductInput {
            name: name.to_string(),
            category: Some("Pastry".to_string()),
            price: Decimal::new(250, 2),
            recipe: vec![RecipeLineInput {
                ingredient_id: "ING-2025-001".to_string(),
                quantity_needed: Decimal::from(quantity_needed),
            }],
        }
    }

    #[tokio::test]
    async fn test_rejects_non_positive_recipe_quantity() {
        let pool = sqlx::postgres::PgPoolOptions::new()
            .connect_lazy("postgres://localhost/unused")
            .unwrap();
        let err = ProductService::new(pool)
            .create_product(input("Croissant", 0))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation { ref field, .. } if field == "recipe"));
    }

    async fn seed_flour(pool: &PgPool) {
        sqlx::query(
            r#"
            INSERT INTO ingredients (id, name, category, unit, price, quantity, initial_quantity,
                                     cost_per_unit, purchase_date)
            VALUES ('ING-2025-001', 'Flour', 'Dry', 'gr', 100, 2000, 2000, 0.05, '2025-01-01')
            "#,
        )
        .execute(pool)
        .await
        .unwrap();
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires a PostgreSQL DATABASE_URL"]
    async fn test_create_and_list_with_recipe(pool: PgPool) {
        seed_flour(&pool).await;
        let service = ProductService::new(pool);

        let created = service.create_product(input("Croissant", 50)).await.unwrap();
        assert!(created.product.id.starts_with("PRD-"));
        assert_eq!(created.recipe[0].ingredient_name, "Flour");

        let listed = service.list_products().await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].recipe[0].quantity_needed, Decimal::from(50));
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires a PostgreSQL DATABASE_URL"]
    async fn test_duplicate_name_conflicts_case_insensitively(pool: PgPool) {
        seed_flour(&pool).await;
        let service = ProductService::new(pool);

        service.create_product(input("Croissant", 50)).await.unwrap();
        let err = service.create_product(input(" croissant", 40)).await.unwrap_err();
        assert!(matches!(err, AppError::DuplicateEntry(_)));
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires a PostgreSQL DATABASE_URL"]
    async fn test_unknown_ingredient_rolls_back_product(pool: PgPool) {
        let service = ProductService::new(pool);

        let err = service.create_product(input("Croissant", 50)).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
        assert!(service.list_products().await.unwrap().is_empty());
    }
}
