//! Repository for the `properties` table, resident links and search.

use leasehold_core::geo::SRID_WGS84;
use leasehold_core::search::{LocationFilter, PropertyFilter, SEARCH_RADIUS_METERS};
use leasehold_core::types::{DbId, Timestamp};
use sqlx::{PgConnection, PgExecutor, PgPool};

use crate::models::location::CreateLocation;
use crate::models::property::{CreateProperty, Property, PropertyWithLocation};
use crate::repositories::location_repo::{JOINED_COLUMNS as LOCATION_COLUMNS, LocationRepo};

/// Property columns for queries that alias `properties` as `p`.
const COLUMNS: &str = "p.id, p.name, p.description, p.price_per_month, p.security_deposit, \
    p.application_fee, p.photo_urls, p.amenities, p.highlights, p.is_pets_allowed, \
    p.is_parking_included, p.beds, p.baths, p.square_feet, p.property_type, p.posted_date, \
    p.average_rating, p.number_of_reviews, p.location_id, p.manager_clerk_id, p.created_at, \
    p.updated_at";

/// Provides reads, creation and search for properties.
pub struct PropertyRepo;

impl PropertyRepo {
    /// Insert a location and its property in one transaction.
    pub async fn create(
        pool: &PgPool,
        location: &CreateLocation,
        input: &CreateProperty,
    ) -> Result<PropertyWithLocation, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let location = LocationRepo::create(&mut *tx, location).await?;

        let query = format!(
            "INSERT INTO properties AS p
                (name, description, price_per_month, security_deposit, application_fee,
                 photo_urls, amenities, highlights, is_pets_allowed, is_parking_included,
                 beds, baths, square_feet, property_type, location_id, manager_clerk_id)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
             RETURNING {COLUMNS}"
        );
        let property = sqlx::query_as::<_, Property>(&query)
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.price_per_month)
            .bind(input.security_deposit)
            .bind(input.application_fee)
            .bind(&input.photo_urls)
            .bind(&input.amenities)
            .bind(&input.highlights)
            .bind(input.is_pets_allowed)
            .bind(input.is_parking_included)
            .bind(input.beds)
            .bind(input.baths)
            .bind(input.square_feet)
            .bind(&input.property_type)
            .bind(location.id)
            .bind(&input.manager_clerk_id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(PropertyWithLocation { property, location })
    }

    /// Find a bare property row by id.
    pub async fn find_by_id<'e, E: PgExecutor<'e>>(
        executor: E,
        id: DbId,
    ) -> Result<Option<Property>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM properties p WHERE p.id = $1");
        sqlx::query_as::<_, Property>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Find a property together with its location.
    pub async fn find_with_location(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<PropertyWithLocation>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS}, {LOCATION_COLUMNS}
             FROM properties p JOIN locations l ON l.id = p.location_id
             WHERE p.id = $1"
        );
        sqlx::query_as::<_, PropertyWithLocation>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Load several properties with their locations, in no particular order.
    pub async fn find_many_with_location(
        pool: &PgPool,
        ids: &[DbId],
    ) -> Result<Vec<PropertyWithLocation>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS}, {LOCATION_COLUMNS}
             FROM properties p JOIN locations l ON l.id = p.location_id
             WHERE p.id = ANY($1)"
        );
        sqlx::query_as::<_, PropertyWithLocation>(&query)
            .bind(ids)
            .fetch_all(pool)
            .await
    }

    /// Properties owned by a manager, newest first.
    pub async fn list_by_manager(
        pool: &PgPool,
        manager_clerk_id: &str,
    ) -> Result<Vec<PropertyWithLocation>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS}, {LOCATION_COLUMNS}
             FROM properties p JOIN locations l ON l.id = p.location_id
             WHERE p.manager_clerk_id = $1
             ORDER BY p.posted_date DESC, p.id DESC"
        );
        sqlx::query_as::<_, PropertyWithLocation>(&query)
            .bind(manager_clerk_id)
            .fetch_all(pool)
            .await
    }

    /// Properties a tenant has marked as favorites.
    pub async fn list_favorites(
        pool: &PgPool,
        tenant_id: DbId,
    ) -> Result<Vec<PropertyWithLocation>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS}, {LOCATION_COLUMNS}
             FROM tenant_favorites f
             JOIN properties p ON p.id = f.property_id
             JOIN locations l ON l.id = p.location_id
             WHERE f.tenant_id = $1
             ORDER BY f.created_at DESC, p.id DESC"
        );
        sqlx::query_as::<_, PropertyWithLocation>(&query)
            .bind(tenant_id)
            .fetch_all(pool)
            .await
    }

    /// Properties a tenant currently resides in.
    pub async fn list_residences(
        pool: &PgPool,
        tenant_id: DbId,
    ) -> Result<Vec<PropertyWithLocation>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS}, {LOCATION_COLUMNS}
             FROM property_residents r
             JOIN properties p ON p.id = r.property_id
             JOIN locations l ON l.id = p.location_id
             WHERE r.tenant_id = $1
             ORDER BY r.created_at DESC, p.id DESC"
        );
        sqlx::query_as::<_, PropertyWithLocation>(&query)
            .bind(tenant_id)
            .fetch_all(pool)
            .await
    }

    /// Distinct properties a tenant applied to, most recent application first.
    pub async fn list_recently_applied(
        pool: &PgPool,
        tenant_clerk_id: &str,
        limit: i64,
    ) -> Result<Vec<PropertyWithLocation>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS}, {LOCATION_COLUMNS}
             FROM (
                 SELECT property_id, MAX(application_date) AS last_applied
                 FROM applications
                 WHERE tenant_clerk_id = $1
                 GROUP BY property_id
             ) a
             JOIN properties p ON p.id = a.property_id
             JOIN locations l ON l.id = p.location_id
             ORDER BY a.last_applied DESC, p.id DESC
             LIMIT $2"
        );
        sqlx::query_as::<_, PropertyWithLocation>(&query)
            .bind(tenant_clerk_id)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// Link a tenant to a property as a resident. Idempotent.
    pub async fn add_resident(
        conn: &mut PgConnection,
        property_id: DbId,
        tenant_id: DbId,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO property_residents (property_id, tenant_id) VALUES ($1, $2)
             ON CONFLICT (property_id, tenant_id) DO NOTHING",
        )
        .bind(property_id)
        .bind(tenant_id)
        .execute(conn)
        .await?;
        Ok(())
    }

    /// Run a property search. Every supplied filter is ANDed; results are
    /// newest `posted_date` first.
    pub async fn search(
        pool: &PgPool,
        filter: &PropertyFilter,
    ) -> Result<Vec<PropertyWithLocation>, sqlx::Error> {
        let (where_clause, bind_values, _) = build_property_filter(filter);

        let query = format!(
            "SELECT {COLUMNS}, {LOCATION_COLUMNS}
             FROM properties p JOIN locations l ON l.id = p.location_id
             {where_clause}
             ORDER BY p.posted_date DESC, p.id DESC"
        );

        let q = bind_property_values(
            sqlx::query_as::<_, PropertyWithLocation>(&query),
            &bind_values,
        );
        q.fetch_all(pool).await
    }
}

// ---------------------------------------------------------------------------
// Internal helpers for dynamic query building
// ---------------------------------------------------------------------------

/// Typed bind value for dynamically-built property searches.
#[derive(Debug, Clone, PartialEq)]
enum BindValue {
    BigIntList(Vec<DbId>),
    Double(f64),
    Int(i32),
    Text(String),
    TextList(Vec<String>),
    Timestamp(Timestamp),
}

/// Escape `%`, `_` and `\` so user text matches literally inside `ILIKE`.
fn escape_like(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

/// Build a WHERE clause and bind values from a [`PropertyFilter`].
///
/// Returns `(where_clause, bind_values, next_bind_index)`.
/// The `where_clause` is empty if no filters are active, or starts with `WHERE `.
fn build_property_filter(filter: &PropertyFilter) -> (String, Vec<BindValue>, u32) {
    let mut conditions: Vec<String> = Vec::new();
    let mut bind_idx = 1u32;
    let mut bind_values: Vec<BindValue> = Vec::new();

    if let Some(ref ids) = filter.ids {
        conditions.push(format!("p.id = ANY(${bind_idx})"));
        bind_idx += 1;
        bind_values.push(BindValue::BigIntList(ids.clone()));
    }

    if let Some(min) = filter.price_min {
        conditions.push(format!("p.price_per_month >= ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(BindValue::Double(min));
    }

    if let Some(max) = filter.price_max {
        conditions.push(format!("p.price_per_month <= ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(BindValue::Double(max));
    }

    if let Some(beds) = filter.beds_min {
        conditions.push(format!("p.beds >= ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(BindValue::Int(beds));
    }

    if let Some(baths) = filter.baths_min {
        conditions.push(format!("p.baths >= ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(BindValue::Double(baths));
    }

    if let Some(min) = filter.square_feet_min {
        conditions.push(format!("p.square_feet >= ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(BindValue::Int(min));
    }

    if let Some(max) = filter.square_feet_max {
        conditions.push(format!("p.square_feet <= ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(BindValue::Int(max));
    }

    if let Some(property_type) = filter.property_type {
        conditions.push(format!("p.property_type = ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(BindValue::Text(property_type.to_string()));
    }

    if let Some(ref amenities) = filter.amenities {
        conditions.push(format!("p.amenities && ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(BindValue::TextList(amenities.clone()));
    }

    if let Some(date) = filter.available_from {
        conditions.push(format!(
            "EXISTS (SELECT 1 FROM leases le WHERE le.property_id = p.id AND le.start_date <= ${bind_idx})"
        ));
        bind_idx += 1;
        bind_values.push(BindValue::Timestamp(date));
    }

    match filter.location {
        Some(LocationFilter::Near(point)) => {
            conditions.push(format!(
                "ST_DWithin(l.coordinates, \
                 ST_SetSRID(ST_MakePoint(${}, ${}), {SRID_WGS84})::geography, ${})",
                bind_idx,
                bind_idx + 1,
                bind_idx + 2
            ));
            bind_idx += 3;
            bind_values.push(BindValue::Double(point.longitude));
            bind_values.push(BindValue::Double(point.latitude));
            bind_values.push(BindValue::Double(SEARCH_RADIUS_METERS));
        }
        Some(LocationFilter::Text(ref text)) => {
            conditions.push(format!(
                "(l.city ILIKE ${bind_idx} ESCAPE '\\' OR l.address ILIKE ${bind_idx} ESCAPE '\\')"
            ));
            bind_idx += 1;
            bind_values.push(BindValue::Text(format!("%{}%", escape_like(text))));
        }
        None => {}
    }

    let where_clause = if conditions.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", conditions.join(" AND "))
    };

    (where_clause, bind_values, bind_idx)
}

/// Bind a slice of `BindValue` to a sqlx `QueryAs`.
fn bind_property_values<'q, O>(
    mut q: sqlx::query::QueryAs<'q, sqlx::Postgres, O, sqlx::postgres::PgArguments>,
    bind_values: &'q [BindValue],
) -> sqlx::query::QueryAs<'q, sqlx::Postgres, O, sqlx::postgres::PgArguments> {
    for val in bind_values {
        match val {
            BindValue::BigIntList(v) => q = q.bind(v.as_slice()),
            BindValue::Double(v) => q = q.bind(*v),
            BindValue::Int(v) => q = q.bind(*v),
            BindValue::Text(v) => q = q.bind(v.as_str()),
            BindValue::TextList(v) => q = q.bind(v.as_slice()),
            BindValue::Timestamp(v) => q = q.bind(*v),
        }
    }
    q
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use leasehold_core::geo::Coordinates;

    use super::*;

    #[test]
    fn empty_filter_has_no_where_clause() {
        let (clause, values, next) = build_property_filter(&PropertyFilter::default());
        assert!(clause.is_empty());
        assert!(values.is_empty());
        assert_eq!(next, 1);
    }

    #[test]
    fn numeric_filters_are_anded_in_order() {
        let filter = PropertyFilter {
            price_min: Some(500.0),
            price_max: Some(1000.0),
            beds_min: Some(2),
            ..Default::default()
        };
        let (clause, values, next) = build_property_filter(&filter);
        assert_eq!(
            clause,
            "WHERE p.price_per_month >= $1 AND p.price_per_month <= $2 AND p.beds >= $3"
        );
        assert_eq!(
            values,
            vec![BindValue::Double(500.0), BindValue::Double(1000.0), BindValue::Int(2)]
        );
        assert_eq!(next, 4);
    }

    #[test]
    fn radius_filter_binds_longitude_first() {
        let filter = PropertyFilter {
            beds_min: Some(1),
            location: Some(LocationFilter::Near(Coordinates {
                latitude: 5.6,
                longitude: -0.19,
            })),
            ..Default::default()
        };
        let (clause, values, next) = build_property_filter(&filter);
        assert!(clause.contains("ST_MakePoint($2, $3), 4326)::geography, $4)"));
        assert_eq!(
            values[1..],
            [
                BindValue::Double(-0.19),
                BindValue::Double(5.6),
                BindValue::Double(SEARCH_RADIUS_METERS)
            ]
        );
        assert_eq!(next, 5);
    }

    #[test]
    fn text_location_is_escaped_and_reuses_one_parameter() {
        let filter = PropertyFilter {
            location: Some(LocationFilter::Text("50%_off\\".into())),
            ..Default::default()
        };
        let (clause, values, _) = build_property_filter(&filter);
        assert_eq!(
            clause,
            "WHERE (l.city ILIKE $1 ESCAPE '\\' OR l.address ILIKE $1 ESCAPE '\\')"
        );
        assert_eq!(values, vec![BindValue::Text("%50\\%\\_off\\\\%".into())]);
    }

    #[test]
    fn set_filters_use_array_operators() {
        let date = Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap();
        let filter = PropertyFilter {
            ids: Some(vec![3, 7]),
            amenities: Some(vec!["WiFi".into()]),
            available_from: Some(date),
            ..Default::default()
        };
        let (clause, values, _) = build_property_filter(&filter);
        assert!(clause.starts_with("WHERE p.id = ANY($1) AND p.amenities && $2 AND EXISTS"));
        assert!(clause.contains("le.start_date <= $3"));
        assert_eq!(values[2], BindValue::Timestamp(date));
    }

    #[test]
    fn escape_like_leaves_plain_text_alone() {
        assert_eq!(escape_like("Accra"), "Accra");
    }
}
