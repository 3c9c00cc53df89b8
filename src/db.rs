//! Query services for the `restaurants` and `dishes` tables.
//!
//! Every operation here is a static SQL template with positional `?`
//! placeholders and a bind list in declaration order. Caller-supplied
//! values are always bound, never interpolated into the query text, and
//! the template set is fixed: a new filterable field means a new named
//! operation, not a predicate builder.

use anyhow::Context;
use derive_builder::Builder;
use sqlx::sqlite::SqlitePool;

use crate::data::{Dish, DishLookup, Dishes, Restaurant, RestaurantLookup, Restaurants};

/// Shared handle over the SQLite pool. Constructed once at startup and
/// injected into both query services; closed when the process shuts down.
#[derive(Clone)]
pub struct Store {
    pool: SqlitePool,
}

impl Store {
    pub async fn connect(url: &str) -> anyhow::Result<Self> {
        let pool = SqlitePool::connect(url)
            .await
            .with_context(|| format!("fail to open database {url}"))?;
        Ok(Self { pool })
    }

    pub fn from_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

/// How the three-flag restaurant filter treats an absent flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterMode {
    /// All three flags participate in the equality comparison as given.
    /// An absent flag binds as SQL NULL and `col = NULL` matches no row,
    /// so a partial filter returns the empty set. This is the historical
    /// behavior and the default.
    Strict,
    /// Absent flags stop constraining, degrading to a 2-of-3 (or fewer)
    /// conjunctive filter.
    Lenient,
}

/// Flags for [`RestaurantQueries::filter`]. Callers set only the flags
/// they actually received.
#[derive(Builder, Debug, Clone, Default)]
#[builder(default)]
pub struct RestaurantFlags {
    #[builder(setter(into, strip_option))]
    pub is_veg: Option<bool>,
    #[builder(setter(into, strip_option))]
    pub has_outdoor_seating: Option<bool>,
    #[builder(setter(into, strip_option))]
    pub is_luxury: Option<bool>,
}

#[derive(Clone)]
pub struct RestaurantQueries {
    store: Store,
    filter_mode: FilterMode,
}

impl RestaurantQueries {
    pub fn new(store: Store, filter_mode: FilterMode) -> Self {
        Self { store, filter_mode }
    }

    pub async fn list_all(&self) -> anyhow::Result<Restaurants> {
        let restaurants = sqlx::query_as::<_, Restaurant>("SELECT * FROM restaurants")
            .fetch_all(&self.store.pool)
            .await
            .with_context(|| "fail to list restaurants")?;
        Ok(Restaurants { restaurants })
    }

    pub async fn by_cuisine(&self, cuisine: &str) -> anyhow::Result<Restaurants> {
        let restaurants =
            sqlx::query_as::<_, Restaurant>("SELECT * FROM restaurants WHERE cuisine = ?")
                .bind(cuisine)
                .fetch_all(&self.store.pool)
                .await
                .with_context(|| format!("fail to list restaurants with cuisine {cuisine}"))?;
        Ok(Restaurants { restaurants })
    }

    pub async fn by_id(&self, id: i64) -> anyhow::Result<RestaurantLookup> {
        let restaurant = sqlx::query_as::<_, Restaurant>("SELECT * FROM restaurants WHERE id = ?")
            .bind(id)
            .fetch_all(&self.store.pool)
            .await
            .with_context(|| format!("fail to get restaurant {id}"))?;
        Ok(RestaurantLookup { restaurant })
    }

    /// Conjunctive equality filter on all three boolean flags. See
    /// [`FilterMode`] for how absent flags are treated.
    pub async fn filter(&self, flags: RestaurantFlags) -> anyhow::Result<Restaurants> {
        let query = match self.filter_mode {
            FilterMode::Strict => {
                "SELECT * FROM restaurants \
                 WHERE isVeg = ? AND hasOutdoorSeating = ? AND isLuxury = ?"
            }
            FilterMode::Lenient => {
                "SELECT * FROM restaurants \
                 WHERE (?1 IS NULL OR isVeg = ?1) \
                   AND (?2 IS NULL OR hasOutdoorSeating = ?2) \
                   AND (?3 IS NULL OR isLuxury = ?3)"
            }
        };

        let restaurants = sqlx::query_as::<_, Restaurant>(query)
            .bind(flags.is_veg)
            .bind(flags.has_outdoor_seating)
            .bind(flags.is_luxury)
            .fetch_all(&self.store.pool)
            .await
            .with_context(|| "fail to filter restaurants")?;
        Ok(Restaurants { restaurants })
    }

    pub async fn sort_by_rating(&self) -> anyhow::Result<Restaurants> {
        let restaurants =
            sqlx::query_as::<_, Restaurant>("SELECT * FROM restaurants ORDER BY rating DESC")
                .fetch_all(&self.store.pool)
                .await
                .with_context(|| "fail to sort restaurants by rating")?;
        Ok(Restaurants { restaurants })
    }
}

#[derive(Clone)]
pub struct DishQueries {
    store: Store,
}

impl DishQueries {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    pub async fn list_all(&self) -> anyhow::Result<Dishes> {
        let dishes = sqlx::query_as::<_, Dish>("SELECT * FROM dishes")
            .fetch_all(&self.store.pool)
            .await
            .with_context(|| "fail to list dishes")?;
        Ok(Dishes { dishes })
    }

    pub async fn by_id(&self, id: i64) -> anyhow::Result<DishLookup> {
        let dish = sqlx::query_as::<_, Dish>("SELECT * FROM dishes WHERE id = ?")
            .bind(id)
            .fetch_all(&self.store.pool)
            .await
            .with_context(|| format!("fail to get dish {id}"))?;
        Ok(DishLookup { dish })
    }

    pub async fn filter(&self, is_veg: Option<bool>) -> anyhow::Result<Dishes> {
        let dishes = sqlx::query_as::<_, Dish>("SELECT * FROM dishes WHERE isVeg = ?")
            .bind(is_veg)
            .fetch_all(&self.store.pool)
            .await
            .with_context(|| "fail to filter dishes")?;
        Ok(Dishes { dishes })
    }

    pub async fn sort_by_price(&self) -> anyhow::Result<Dishes> {
        let dishes = sqlx::query_as::<_, Dish>("SELECT * FROM dishes ORDER BY price")
            .fetch_all(&self.store.pool)
            .await
            .with_context(|| "fail to sort dishes by price")?;
        Ok(Dishes { dishes })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Envelope;
    use sqlx::sqlite::SqlitePoolOptions;

    // One connection so the in-memory database is shared across queries.
    async fn seeded_store() -> Store {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();

        sqlx::query(
            "CREATE TABLE restaurants (
                id INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                cuisine TEXT NOT NULL,
                isVeg INTEGER NOT NULL,
                hasOutdoorSeating INTEGER NOT NULL,
                isLuxury INTEGER NOT NULL,
                rating REAL NOT NULL
            )",
        )
        .execute(&pool)
        .await
        .unwrap();

        sqlx::query(
            "CREATE TABLE dishes (
                id INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                isVeg INTEGER NOT NULL,
                price REAL NOT NULL
            )",
        )
        .execute(&pool)
        .await
        .unwrap();

        for (id, name, cuisine, veg, outdoor, luxury, rating) in [
            (1, "Trattoria Roma", "Italian", 1, 1, 0, 4.5),
            (2, "Baan Thai", "Thai", 0, 1, 0, 4.8),
            (3, "Saffron Palace", "Indian", 1, 0, 1, 4.2),
        ] {
            sqlx::query(
                "INSERT INTO restaurants
                    (id, name, cuisine, isVeg, hasOutdoorSeating, isLuxury, rating)
                 VALUES (?, ?, ?, ?, ?, ?, ?)",
            )
            .bind(id)
            .bind(name)
            .bind(cuisine)
            .bind(veg)
            .bind(outdoor)
            .bind(luxury)
            .bind(rating)
            .execute(&pool)
            .await
            .unwrap();
        }

        for (id, name, veg, price) in [
            (1, "Margherita", 1, 9.5),
            (2, "Green Curry", 0, 12.0),
            (3, "Dal Makhani", 1, 8.0),
        ] {
            sqlx::query("INSERT INTO dishes (id, name, isVeg, price) VALUES (?, ?, ?, ?)")
                .bind(id)
                .bind(name)
                .bind(veg)
                .bind(price)
                .execute(&pool)
                .await
                .unwrap();
        }

        Store::from_pool(pool)
    }

    #[tokio::test]
    async fn list_all_returns_every_row() {
        let q = RestaurantQueries::new(seeded_store().await, FilterMode::Strict);
        let all = q.list_all().await.unwrap();
        assert_eq!(all.restaurants.len(), 3);
    }

    #[tokio::test]
    async fn by_cuisine_is_the_exact_match_subset_of_list_all() {
        let q = RestaurantQueries::new(seeded_store().await, FilterMode::Strict);
        let all = q.list_all().await.unwrap().restaurants;
        let italian = q.by_cuisine("Italian").await.unwrap().restaurants;

        let expected: Vec<i64> = all
            .iter()
            .filter(|r| r.cuisine == "Italian")
            .map(|r| r.id)
            .collect();
        assert_eq!(italian.iter().map(|r| r.id).collect::<Vec<_>>(), expected);

        // Exact comparison, no normalization.
        assert!(q.by_cuisine("italian").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn by_id_returns_a_collection_of_at_most_one() {
        let q = RestaurantQueries::new(seeded_store().await, FilterMode::Strict);

        let hit = q.by_id(2).await.unwrap();
        assert_eq!(hit.restaurant.len(), 1);
        assert_eq!(hit.into_unique().unwrap().cuisine, "Thai");

        let miss = q.by_id(99).await.unwrap();
        assert!(miss.is_empty());
        assert!(miss.into_unique().is_none());
    }

    #[tokio::test]
    async fn three_flag_filter_matches_only_full_matches() {
        let q = RestaurantQueries::new(seeded_store().await, FilterMode::Strict);
        let flags = RestaurantFlagsBuilder::default()
            .is_veg(true)
            .has_outdoor_seating(true)
            .is_luxury(false)
            .build()
            .unwrap();

        let matched = q.filter(flags).await.unwrap().restaurants;
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].id, 1);
    }

    #[tokio::test]
    async fn strict_filter_with_absent_flag_matches_nothing() {
        // Regression guard: an omitted flag must not silently match all
        // rows for that column.
        let q = RestaurantQueries::new(seeded_store().await, FilterMode::Strict);
        let flags = RestaurantFlagsBuilder::default()
            .is_veg(true)
            .has_outdoor_seating(true)
            .build()
            .unwrap();

        assert!(q.filter(flags).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn lenient_filter_drops_absent_flags_from_the_conjunction() {
        let q = RestaurantQueries::new(seeded_store().await, FilterMode::Lenient);
        let flags = RestaurantFlagsBuilder::default()
            .is_veg(true)
            .is_luxury(false)
            .build()
            .unwrap();

        let matched = q.filter(flags).await.unwrap().restaurants;
        assert_eq!(matched.iter().map(|r| r.id).collect::<Vec<_>>(), vec![1]);

        // No flags at all means no constraint.
        let everything = q.filter(RestaurantFlags::default()).await.unwrap();
        assert_eq!(everything.restaurants.len(), 3);
    }

    #[tokio::test]
    async fn sort_by_rating_is_a_descending_permutation() {
        let q = RestaurantQueries::new(seeded_store().await, FilterMode::Strict);
        let sorted = q.sort_by_rating().await.unwrap().restaurants;

        assert_eq!(sorted.iter().map(|r| r.id).collect::<Vec<_>>(), vec![2, 1, 3]);
        assert!(sorted.windows(2).all(|w| w[0].rating >= w[1].rating));
        assert_eq!(sorted.len(), q.list_all().await.unwrap().restaurants.len());
    }

    #[tokio::test]
    async fn dish_queries_cover_list_lookup_filter_and_sort() {
        let q = DishQueries::new(seeded_store().await);

        assert_eq!(q.list_all().await.unwrap().dishes.len(), 3);

        let miss = q.by_id(99).await.unwrap();
        assert!(miss.is_empty());

        let veg = q.filter(Some(true)).await.unwrap().dishes;
        assert_eq!(veg.iter().map(|d| d.id).collect::<Vec<_>>(), vec![1, 3]);

        let by_price = q.sort_by_price().await.unwrap().dishes;
        assert_eq!(by_price.iter().map(|d| d.id).collect::<Vec<_>>(), vec![3, 1, 2]);
        assert!(by_price.windows(2).all(|w| w[0].price <= w[1].price));
    }

    #[tokio::test]
    async fn repeated_queries_yield_identical_results() {
        let q = RestaurantQueries::new(seeded_store().await, FilterMode::Strict);

        let first = q.by_cuisine("Thai").await.unwrap().restaurants;
        let second = q.by_cuisine("Thai").await.unwrap().restaurants;
        assert_eq!(
            first.iter().map(|r| r.id).collect::<Vec<_>>(),
            second.iter().map(|r| r.id).collect::<Vec<_>>()
        );
    }

    #[tokio::test]
    async fn store_fault_propagates_as_an_error() {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        // No tables created: every query against this store must fail,
        // not come back empty.
        let q = DishQueries::new(Store::from_pool(pool));
        assert!(q.list_all().await.is_err());
    }

    #[test]
    fn envelopes_serialize_with_their_single_wire_key() {
        let lookup = DishLookup {
            dish: vec![Dish {
                id: 7,
                name: "Pad See Ew".into(),
                is_veg: false,
                price: 11.0,
            }],
        };
        let json = serde_json::to_value(&lookup).unwrap();
        assert_eq!(json["dish"][0]["id"], 7);
        assert_eq!(json["dish"][0]["isVeg"], false);

        let empty = Restaurants { restaurants: vec![] };
        assert_eq!(
            serde_json::to_value(&empty).unwrap(),
            serde_json::json!({ "restaurants": [] })
        );
    }
}
