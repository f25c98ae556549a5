//! Amounts are stored as integer cents and exchanged as decimal currency.
//!
//! Use `#[serde(with = "crate::money")]` on `i64` cent fields,
//! `crate::money::option` on `Option<i64>` and `crate::money::map` on maps of
//! cents. `49.99` on the wire is `4999` in the database.

use serde::{Deserialize, Deserializer, Serializer, de};

/// Largest amount accepted on the wire, in currency units.
const MAX_AMOUNT: f64 = 1e13;

pub fn to_currency(cents: i64) -> f64 {
    cents as f64 / 100.0
}

/// Rounds to the nearest cent. Non-finite and out-of-range amounts are rejected.
pub fn from_currency(amount: f64) -> Result<i64, String> {
    if !amount.is_finite() || amount.abs() > MAX_AMOUNT {
        return Err(format!("Invalid amount: {amount}"));
    }
    Ok((amount * 100.0).round() as i64)
}

pub fn serialize<S>(cents: &i64, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_f64(to_currency(*cents))
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let amount = f64::deserialize(deserializer)?;
    from_currency(amount).map_err(de::Error::custom)
}

pub mod option {
    use serde::{Deserialize, Deserializer, Serializer, de};

    pub fn serialize<S>(cents: &Option<i64>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match cents {
            Some(cents) => serializer.serialize_some(&super::to_currency(*cents)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<f64>::deserialize(deserializer)?
            .map(|amount| super::from_currency(amount).map_err(de::Error::custom))
            .transpose()
    }
}

pub mod map {
    use serde::{Deserialize, Deserializer, Serialize, Serializer, de, ser::SerializeMap};
    use std::collections::BTreeMap;

    pub fn serialize<K, S>(map: &BTreeMap<K, i64>, serializer: S) -> Result<S::Ok, S::Error>
    where
        K: Serialize,
        S: Serializer,
    {
        let mut out = serializer.serialize_map(Some(map.len()))?;
        for (key, cents) in map {
            out.serialize_entry(key, &super::to_currency(*cents))?;
        }
        out.end()
    }

    pub fn deserialize<'de, K, D>(deserializer: D) -> Result<BTreeMap<K, i64>, D::Error>
    where
        K: Deserialize<'de> + Ord,
        D: Deserializer<'de>,
    {
        BTreeMap::<K, f64>::deserialize(deserializer)?
            .into_iter()
            .map(|(key, amount)| {
                super::from_currency(amount)
                    .map(|cents| (key, cents))
                    .map_err(de::Error::custom)
            })
            .collect()
    }
}
