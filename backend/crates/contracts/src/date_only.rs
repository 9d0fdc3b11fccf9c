//! Date-only JSON format
//!
//! serde `with` module writing a [`NaiveDate`] as `"yyyy-MM-dd"`.
//! A JSON `null` reads as `0001-01-01`.
//!
//! ```rust
//! use chrono::NaiveDate;
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Serialize, Deserialize)]
//! struct Booking {
//!     #[serde(with = "contracts::date_only")]
//!     check_in: NaiveDate,
//! }
//!
//! let booking: Booking = serde_json::from_str(r#"{ "check_in": "2021-01-01" }"#).unwrap();
//! assert_eq!(booking.check_in, NaiveDate::from_ymd_opt(2021, 1, 1).unwrap());
//! ```

use chrono::NaiveDate;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serializer};

pub const FORMAT: &str = "%Y-%m-%d";

pub fn serialize<S>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.collect_str(&date.format(FORMAT))
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(value) => NaiveDate::parse_from_str(&value, FORMAT)
            .map_err(|err| D::Error::custom(format!("invalid date '{value}': {err}"))),
        None => NaiveDate::from_ymd_opt(1, 1, 1)
            .ok_or_else(|| D::Error::custom("minimum date is out of range")),
    }
}
