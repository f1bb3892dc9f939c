pub mod inventory {
    use chrono::{DateTime, Utc};
    use diesel::prelude::*;
    use serde::{Deserialize, Serialize};
    use uuid::Uuid;

    #[derive(Debug, Clone, Queryable, Selectable, Identifiable, Serialize)]
    #[diesel(table_name = crate::persistence::schema::vehicles)]
    #[diesel(check_for_backend(diesel::pg::Pg))]
    pub struct Vehicle {
        pub id: Uuid,
        pub make: Option<String>,
        pub model: Option<String>,
        pub year: Option<i32>,
        pub price: Option<f64>,
        pub mileage: Option<i32>,
        pub transmission: Option<String>,
        pub engine: Option<String>,
        pub vin: Option<String>,
        pub description: Option<String>,
        pub dealer_id: Option<String>,
        pub body_style: Option<String>,
        pub fuel_type: Option<String>,
        pub exterior_color: Option<String>,
        pub interior_color: Option<String>,
        pub is_available: Option<bool>,
        pub is_featured: bool,
        pub features: Vec<String>,
        pub created_at: DateTime<Utc>,
        pub updated_at: DateTime<Utc>,
    }

    /// Write model for `vehicles`. Its fields are exactly the column
    /// allow-list; `None` lets the column default apply on insert and leaves
    /// the column untouched on update.
    #[derive(Debug, Clone, Default, PartialEq, Insertable, AsChangeset, Deserialize)]
    #[diesel(table_name = crate::persistence::schema::vehicles)]
    #[serde(deny_unknown_fields)]
    pub struct VehicleChanges {
        #[serde(default)]
        pub make: Option<String>,
        #[serde(default)]
        pub model: Option<String>,
        #[serde(default)]
        pub year: Option<i32>,
        #[serde(default)]
        pub price: Option<f64>,
        #[serde(default)]
        pub mileage: Option<i32>,
        #[serde(default)]
        pub transmission: Option<String>,
        #[serde(default)]
        pub engine: Option<String>,
        #[serde(default)]
        pub vin: Option<String>,
        #[serde(default)]
        pub description: Option<String>,
        #[serde(default)]
        pub dealer_id: Option<String>,
        #[serde(default)]
        pub body_style: Option<String>,
        #[serde(default)]
        pub fuel_type: Option<String>,
        #[serde(default)]
        pub exterior_color: Option<String>,
        #[serde(default)]
        pub interior_color: Option<String>,
        #[serde(default)]
        pub is_available: Option<bool>,
        #[serde(default)]
        pub is_featured: Option<bool>,
        #[serde(default)]
        pub features: Option<Vec<String>>,
    }

    #[derive(Debug, Clone, Queryable, Selectable, Identifiable, Associations, Serialize)]
    #[diesel(table_name = crate::persistence::schema::vehicle_images)]
    #[diesel(belongs_to(Vehicle, foreign_key = vehicle_id))]
    #[diesel(check_for_backend(diesel::pg::Pg))]
    pub struct VehicleImage {
        pub id: Uuid,
        pub vehicle_id: Uuid,
        pub url: String,
        pub public_id: Option<String>,
        pub is_primary: bool,
        pub sort_order: i32,
        pub created_at: DateTime<Utc>,
    }

    #[derive(Insertable)]
    #[diesel(table_name = crate::persistence::schema::vehicle_images)]
    pub struct NewVehicleImage {
        pub vehicle_id: Uuid,
        pub url: String,
        pub public_id: Option<String>,
        pub is_primary: Option<bool>,
        pub sort_order: Option<i32>,
    }

    #[derive(Debug, Clone, Queryable, Selectable, Identifiable, Associations, Serialize)]
    #[diesel(table_name = crate::persistence::schema::vehicle_videos)]
    #[diesel(belongs_to(Vehicle, foreign_key = vehicle_id))]
    #[diesel(check_for_backend(diesel::pg::Pg))]
    pub struct VehicleVideo {
        pub id: Uuid,
        pub vehicle_id: Uuid,
        pub url: String,
        pub public_id: Option<String>,
        pub is_primary: bool,
        pub sort_order: i32,
        pub created_at: DateTime<Utc>,
    }

    #[derive(Insertable)]
    #[diesel(table_name = crate::persistence::schema::vehicle_videos)]
    pub struct NewVehicleVideo {
        pub vehicle_id: Uuid,
        pub url: String,
        pub public_id: Option<String>,
        pub is_primary: Option<bool>,
        pub sort_order: Option<i32>,
    }
}

pub mod reviews {
    use chrono::{DateTime, Utc};
    use diesel::prelude::*;

    #[derive(Queryable, Selectable, Identifiable)]
    #[diesel(table_name = crate::persistence::schema::google_reviews_cache)]
    #[diesel(primary_key(place_id))]
    #[diesel(check_for_backend(diesel::pg::Pg))]
    pub struct ReviewsCacheRow {
        pub place_id: String,
        pub reviews_data: serde_json::Value,
        pub updated_at: DateTime<Utc>,
    }

    #[derive(Insertable)]
    #[diesel(table_name = crate::persistence::schema::google_reviews_cache)]
    pub struct ReviewsCacheUpsert<'a> {
        pub place_id: &'a str,
        pub reviews_data: serde_json::Value,
        pub updated_at: DateTime<Utc>,
    }
}
