// Typed domain records
// Store records are mapped into these at the boundary; nothing past the
// services layer sees a loosely typed record.

use chrono::NaiveDate;
use serde::de::{self, DeserializeOwned, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::record_store::{Record, StoreError};

pub type RecordId = i64;

// Anything a `ListState` can hold
pub trait Identified {
    fn id(&self) -> RecordId;
}

// Anything the favorite coordinator can flip
pub trait Favoritable: Identified {
    fn favorite(&self) -> bool;
    fn set_favorite(&mut self, favorite: bool);
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hotel {
    #[serde(rename = "Id")]
    pub id: RecordId,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub rating: f64,
    #[serde(rename = "imageUrl", default)]
    pub image_url: Option<String>,
    #[serde(default, deserialize_with = "amenity_list")]
    pub amenities: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deal {
    #[serde(rename = "Id")]
    pub id: RecordId,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(default)]
    pub hotel: Option<String>,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub original_price: f64,
    #[serde(default)]
    pub discounted_price: f64,
    #[serde(default)]
    pub discount: f64,
    #[serde(default, deserialize_with = "amenity_list")]
    pub amenities: Vec<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub date_range: Option<String>,
    #[serde(default, deserialize_with = "loose_bool")]
    pub favorite: bool,
}

impl Deal {
    pub fn savings(&self) -> f64 {
        (self.original_price - self.discounted_price).max(0.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    #[serde(rename = "Id")]
    pub id: RecordId,
    #[serde(rename = "Name", default)]
    pub name: String,
    #[serde(deserialize_with = "lookup_id")]
    pub deal: RecordId,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    #[serde(default)]
    pub guests: u32,
    #[serde(default)]
    pub rooms: u32,
    #[serde(default)]
    pub special_requests: Option<String>,
    #[serde(rename = "CreatedOn", default)]
    pub created_on: Option<String>,
    // Present when the fetch expanded the `deal` lookup
    #[serde(rename = "dealDetails", default, skip_serializing_if = "Option::is_none")]
    pub deal_details: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchLogEntry {
    #[serde(rename = "Id")]
    pub id: RecordId,
    #[serde(rename = "Name", default)]
    pub name: String,
    pub location: String,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    #[serde(default)]
    pub guests: u32,
    #[serde(rename = "CreatedOn", default)]
    pub created_on: Option<String>,
}

impl Favoritable for Deal {
    fn favorite(&self) -> bool {
        self.favorite
    }

    fn set_favorite(&mut self, favorite: bool) {
        self.favorite = favorite;
    }
}

macro_rules! identified {
    ($($ty:ty),*) => {
        $(impl Identified for $ty {
            fn id(&self) -> RecordId {
                self.id
            }
        })*
    };
}

identified!(Hotel, Deal, Booking, SearchLogEntry);

/// Map one store record into a typed entity, naming the table on failure.
pub fn from_record<T: DeserializeOwned>(table: &str, record: Record) -> Result<T, StoreError> {
    serde_json::from_value(Value::Object(record)).map_err(|e| StoreError::InvalidRecord {
        table: table.to_string(),
        message: e.to_string(),
    })
}

pub fn from_records<T: DeserializeOwned>(
    table: &str,
    records: Vec<Record>,
) -> Result<Vec<T>, StoreError> {
    records
        .into_iter()
        .map(|record| from_record(table, record))
        .collect()
}

// Amenities arrive either as a list or as "Wifi, Pool, Spa"
fn amenity_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    let names: Vec<String> = match raw {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::String(s)) => s.split(',').map(|a| a.trim().to_string()).collect(),
        Some(Value::Array(items)) => items
            .into_iter()
            .map(|item| match item {
                Value::String(s) => Ok(s.trim().to_string()),
                other => Err(de::Error::custom(format!("amenity is not text: {}", other))),
            })
            .collect::<Result<_, _>>()?,
        Some(other) => {
            return Err(de::Error::custom(format!(
                "amenities must be text or a list, got {}",
                other
            )))
        }
    };
    Ok(names.into_iter().filter(|a| !a.is_empty()).collect())
}

// Lookup fields come back as a bare id or as `{ "Id": .., "Name": .. }`
fn lookup_id<'de, D>(deserializer: D) -> Result<RecordId, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Number(n) => n
            .as_i64()
            .ok_or_else(|| de::Error::custom(format!("lookup id out of range: {}", n))),
        Value::String(s) => s
            .parse()
            .map_err(|_| de::Error::custom(format!("lookup id is not numeric: {}", s))),
        Value::Object(obj) => obj
            .get("Id")
            .and_then(Value::as_i64)
            .ok_or_else(|| de::Error::custom("lookup object has no numeric Id")),
        other => Err(de::Error::custom(format!("invalid lookup: {}", other))),
    }
}

// A missing or null flag is not a favorite
fn loose_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or(false))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use test_case::test_case;

    fn record(value: Value) -> Record {
        match value {
            Value::Object(map) => map,
            _ => panic!("not an object"),
        }
    }

    #[test]
    fn test_deal_from_record() {
        let deal: Deal = from_record(
            "deal",
            record(json!({
                "Id": 7,
                "Name": "Spring in Kyoto",
                "hotel": "Kyoto Garden Inn",
                "location": "Kyoto, Japan",
                "originalPrice": 320.0,
                "discountedPrice": 240.0,
                "discount": 25,
                "amenities": "Wifi, Onsen, ,Breakfast",
                "image": "https://img.example/kyoto.jpg",
                "dateRange": "Apr 1 - Apr 30",
                "favorite": null
            })),
        )
        .unwrap();

        assert_eq!(deal.id, 7);
        assert_eq!(deal.amenities, vec!["Wifi", "Onsen", "Breakfast"]);
        assert!(!deal.favorite);
        assert_eq!(deal.savings(), 80.0);
        assert_eq!(deal.discount, 25.0);
    }

    #[test]
    fn test_hotel_amenities_as_list() {
        let hotel: Hotel = from_record(
            "hotel",
            record(json!({
                "Id": 1,
                "Name": "Harbor View",
                "location": "Sydney",
                "price": 210,
                "rating": 4.6,
                "amenities": ["Pool", " Gym "]
            })),
        )
        .unwrap();
        assert_eq!(hotel.amenities, vec!["Pool", "Gym"]);
        assert_eq!(hotel.image_url, None);
    }

    #[test_case(json!(12); "#1 bare id")]
    #[test_case(json!("12"); "#2 numeric text")]
    #[test_case(json!({"Id": 12, "Name": "Spring in Kyoto"}); "#3 lookup object")]
    fn test_booking_deal_lookup(deal: Value) {
        let booking: Booking = from_record(
            "booking",
            record(json!({
                "Id": 3,
                "Name": "Booking-12-2024-06-01",
                "deal": deal,
                "checkIn": "2024-06-01",
                "checkOut": "2024-06-04",
                "guests": 2,
                "rooms": 1
            })),
        )
        .unwrap();
        assert_eq!(booking.deal, 12);
        assert_eq!(booking.check_in, NaiveDate::from_ymd_opt(2024, 6, 1).unwrap());
    }

    #[test]
    fn test_invalid_record_names_table() {
        let result: Result<Booking, _> = from_record(
            "booking",
            record(json!({"Id": 3, "deal": 1, "checkIn": "soon", "checkOut": "2024-06-04"})),
        );
        match result {
            Err(StoreError::InvalidRecord { table, .. }) => assert_eq!(table, "booking"),
            other => panic!("expected InvalidRecord, got {:?}", other),
        }
    }

    #[test]
    fn test_one_bad_record_fails_the_batch() {
        let records = vec![
            record(json!({"Id": 1, "Name": "A"})),
            record(json!({"Name": "no id"})),
        ];
        assert!(from_records::<Hotel>("hotel", records).is_err());
    }
}
