//! Row models and the single-key response envelopes the API returns.

use serde::Serialize;

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Restaurant {
    pub id: i64,
    pub name: String,
    pub cuisine: String,
    #[sqlx(rename = "isVeg")]
    pub is_veg: bool,
    #[sqlx(rename = "hasOutdoorSeating")]
    pub has_outdoor_seating: bool,
    #[sqlx(rename = "isLuxury")]
    pub is_luxury: bool,
    pub rating: f64,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Dish {
    pub id: i64,
    pub name: String,
    #[sqlx(rename = "isVeg")]
    pub is_veg: bool,
    pub price: f64,
}

/// `{ "restaurants": [...] }`
#[derive(Debug, Serialize)]
pub struct Restaurants {
    pub restaurants: Vec<Restaurant>,
}

/// `{ "restaurant": [...] }`. A point lookup keeps the collection shape
/// of the underlying query result, so callers check length instead of
/// assuming a scalar.
#[derive(Debug, Serialize)]
pub struct RestaurantLookup {
    pub restaurant: Vec<Restaurant>,
}

/// `{ "dishes": [...] }`
#[derive(Debug, Serialize)]
pub struct Dishes {
    pub dishes: Vec<Dish>,
}

/// `{ "dish": [...] }`
#[derive(Debug, Serialize)]
pub struct DishLookup {
    pub dish: Vec<Dish>,
}

/// A single-key response object. "Not found" is a presentation decision
/// made by the HTTP layer, so every envelope reports emptiness instead of
/// erroring on zero matches.
pub trait Envelope: Serialize {
    fn is_empty(&self) -> bool;
}

impl Envelope for Restaurants {
    fn is_empty(&self) -> bool {
        self.restaurants.is_empty()
    }
}

impl Envelope for RestaurantLookup {
    fn is_empty(&self) -> bool {
        self.restaurant.is_empty()
    }
}

impl Envelope for Dishes {
    fn is_empty(&self) -> bool {
        self.dishes.is_empty()
    }
}

impl Envelope for DishLookup {
    fn is_empty(&self) -> bool {
        self.dish.is_empty()
    }
}

impl RestaurantLookup {
    /// The expect-0-or-1 accessor. Uniqueness of `id` is the store's
    /// business, so a multi-row result still yields the first row.
    pub fn into_unique(self) -> Option<Restaurant> {
        self.restaurant.into_iter().next()
    }
}

impl DishLookup {
    pub fn into_unique(self) -> Option<Dish> {
        self.dish.into_iter().next()
    }
}
