use anyhow::{anyhow, Context};
use bb8_postgres::bb8::{Pool, PooledConnection};
use bb8_postgres::PostgresConnectionManager;
use bb8_postgres::tokio_postgres::{NoTls, Row};
use tracing::{info, warn};
use crate::models::restaurant::{NewRestaurant, Restaurant};
use crate::models::review::{Review, ReviewRequest};

pub const RETRY_LIMIT: usize = 5;

const RESTAURANT_COLUMNS: &str = "id, name, google_place_id, website";
const REVIEW_COLUMNS: &str = "id, restaurant_id, user_name, rating, review, created_at";

pub type PostgresPool = Pool<PostgresConnectionManager<NoTls>>;

pub async fn connect_postgres_pool(
    database_url: &str,
    max_size: u32,
) -> anyhow::Result<PostgresPool> {
    let manager = PostgresConnectionManager::new_from_stringlike(database_url, NoTls)
        .context("Invalid DATABASE_URL")?;

    let pool = Pool::builder()
        .max_size(max_size)
        .build(manager)
        .await
        .context("Failed to build postgres connection pool")?;

    info!("Postgres connection pool ready with max size: {}", max_size);
    Ok(pool)
}

pub struct PostgresConnectionRepo {
    postgres_connection: PostgresPool,
}

impl PostgresConnectionRepo {
    pub fn new(
        postgres_connection: PostgresPool,
    ) -> Self {
        Self {
            postgres_connection
        }
    }

    async fn get_postgres_connection(
        &self,
    ) -> anyhow::Result<PooledConnection<'_, PostgresConnectionManager<NoTls>>> {
        for _ in 0..RETRY_LIMIT {
            match self.postgres_connection.get().await {
                Ok(conn) => return Ok(conn),
                Err(e) => {
                    warn!("Failed to retrieve postgres connection due to: {}, retrying in 3s", e);
                    tokio::time::sleep(tokio::time::Duration::from_secs(3)).await;
                    continue;
                }
            }
        }

        Err(anyhow!("Failed to retrieve a valid connection from postgres pool, BAILING"))
    }

    pub async fn find_restaurant_by_name(
        &self,
        name: &str,
    ) -> anyhow::Result<Option<Restaurant>> {
        let conn = self.get_postgres_connection().await?;
        let stmt = format!(
            "SELECT {} FROM restaurants WHERE name = $1 ORDER BY id LIMIT 1;",
            RESTAURANT_COLUMNS
        );

        let row = conn
            .query_opt(&stmt, &[&name])
            .await
            .with_context(|| format!("Failed to look up restaurant by name: {}", name))?;

        row.as_ref().map(parse_row_into_restaurant).transpose()
    }

    pub async fn find_restaurant_by_place_id(
        &self,
        place_id: &str,
    ) -> anyhow::Result<Option<Restaurant>> {
        let conn = self.get_postgres_connection().await?;
        let stmt = format!(
            "SELECT {} FROM restaurants WHERE google_place_id = $1 LIMIT 1;",
            RESTAURANT_COLUMNS
        );

        let row = conn
            .query_opt(&stmt, &[&place_id])
            .await
            .with_context(|| format!("Failed to look up restaurant by place id: {}", place_id))?;

        row.as_ref().map(parse_row_into_restaurant).transpose()
    }

    pub async fn insert_restaurant(
        &self,
        restaurant: &NewRestaurant,
    ) -> anyhow::Result<Restaurant> {
        let conn = self.get_postgres_connection().await?;
        let stmt = format!(
            "INSERT INTO restaurants (name, google_place_id, website) VALUES ($1, $2, $3) RETURNING {};",
            RESTAURANT_COLUMNS
        );

        let row = conn
            .query_one(
                &stmt,
                &[&restaurant.name, &restaurant.google_place_id, &restaurant.website],
            )
            .await
            .with_context(|| format!("Failed to insert restaurant: {}", restaurant.name))?;

        parse_row_into_restaurant(&row)
    }

    /// Fills in place id and website, never overwriting values already stored.
    pub async fn update_restaurant_details(
        &self,
        restaurant_id: i64,
        google_place_id: Option<&str>,
        website: Option<&str>,
    ) -> anyhow::Result<Restaurant> {
        let conn = self.get_postgres_connection().await?;
        let stmt = format!(
            "UPDATE restaurants \
             SET google_place_id = COALESCE(google_place_id, $2), website = COALESCE(website, $3) \
             WHERE id = $1 RETURNING {};",
            RESTAURANT_COLUMNS
        );

        let row = conn
            .query_one(&stmt, &[&restaurant_id, &google_place_id, &website])
            .await
            .with_context(|| format!("Failed to update restaurant with id: {}", restaurant_id))?;

        parse_row_into_restaurant(&row)
    }

    /// Resolves by place id, then by name, and inserts only when neither matches.
    /// See [`resolve_name_match`] for how a row found by name is treated.
    pub async fn get_or_create_restaurant(
        &self,
        lookup: &NewRestaurant,
    ) -> anyhow::Result<Restaurant> {
        if let Some(place_id) = lookup.google_place_id.as_deref() {
            if let Some(restaurant) = self.find_restaurant_by_place_id(place_id).await? {
                return Ok(restaurant);
            }
        }

        if let Some(existing) = self.find_restaurant_by_name(&lookup.name).await? {
            match resolve_name_match(&existing, lookup) {
                NameMatch::Reuse => return Ok(existing),
                NameMatch::FillDetails => {
                    return self
                        .update_restaurant_details(
                            existing.id,
                            lookup.google_place_id.as_deref(),
                            lookup.website.as_deref(),
                        )
                        .await;
                }
                NameMatch::OtherBranch => {}
            }
        }

        info!("Creating restaurant record for: {}", lookup.name);
        self.insert_restaurant(lookup).await
    }

    /// Newest first, across every restaurant row with this name.
    pub async fn retrieve_reviews_by_restaurant_name(
        &self,
        restaurant_name: &str,
    ) -> anyhow::Result<Vec<Review>> {
        let conn = self.get_postgres_connection().await?;
        let stmt = "SELECT r.id, r.restaurant_id, r.user_name, r.rating, r.review, r.created_at \
             FROM reviews r JOIN restaurants s ON s.id = r.restaurant_id \
             WHERE s.name = $1 ORDER BY r.created_at DESC, r.id DESC;";

        let rows = conn
            .query(stmt, &[&restaurant_name])
            .await
            .with_context(|| format!("Failed to retrieve reviews for restaurant: {}", restaurant_name))?;

        rows.iter().map(parse_row_into_review).collect()
    }

    pub async fn add_review(
        &self,
        review: &ReviewRequest,
    ) -> anyhow::Result<Vec<Review>> {
        let conn = self.get_postgres_connection().await?;
        let stmt = format!(
            "INSERT INTO reviews (restaurant_id, user_name, rating, review) VALUES ($1, $2, $3, $4) RETURNING {};",
            REVIEW_COLUMNS
        );

        let rows = conn
            .query(
                &stmt,
                &[&review.restaurant_id, &review.user_name, &review.rating, &review.review],
            )
            .await
            .with_context(|| format!("Failed to add review for restaurant id: {}", review.restaurant_id))?;

        rows.iter().map(parse_row_into_review).collect()
    }
}

/// What to do with a row found by name during get-or-create.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameMatch {
    /// The row already describes this restaurant.
    Reuse,
    /// Same restaurant, but the lookup knows a place id or website the row lacks.
    FillDetails,
    /// Bound to a different place: another branch with the same name.
    OtherBranch,
}

pub fn resolve_name_match(
    existing: &Restaurant,
    lookup: &NewRestaurant,
) -> NameMatch {
    if let (Some(stored), Some(wanted)) = (existing.google_place_id.as_deref(), lookup.google_place_id.as_deref()) {
        if stored != wanted {
            return NameMatch::OtherBranch;
        }
    }

    let needs_link = existing.google_place_id.is_none() && lookup.google_place_id.is_some();
    let needs_website = existing.website.is_none() && lookup.website.is_some();
    if needs_link || needs_website {
        NameMatch::FillDetails
    } else {
        NameMatch::Reuse
    }
}

fn parse_row_into_restaurant(
    row: &Row,
) -> anyhow::Result<Restaurant> {
    Ok(Restaurant {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        google_place_id: row.try_get("google_place_id")?,
        website: row.try_get("website")?,
    })
}

fn parse_row_into_review(
    row: &Row,
) -> anyhow::Result<Review> {
    Ok(Review {
        id: row.try_get("id")?,
        restaurant_id: row.try_get("restaurant_id")?,
        user_name: row.try_get("user_name")?,
        rating: row.try_get("rating")?,
        review: row.try_get("review")?,
        created_at: row.try_get("created_at")?,
    })
}
