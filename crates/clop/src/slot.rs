//! Value setter: string tokens coerced into typed destination slots.
//!
//! A [`Slot`] borrows one field of the caller's struct for the duration of a
//! bind pass. The engine only needs to know whether the slot is a flag (bool
//! or bool slice, which take no value), a repeated slot, or a plain scalar;
//! everything else is delegated to [`FromArg`].

use std::{
    collections::{BTreeMap, HashMap},
    fmt,
    hash::Hash,
    path::PathBuf,
    time::Duration,
};

use serde::de::DeserializeOwned;

/// A typed handle to caller storage.
pub enum Slot<'a> {
    Bool(&'a mut bool),
    Bools(&'a mut Vec<bool>),
    Scalar(&'a mut dyn Scalar),
    Slice(&'a mut dyn Repeated),
    /// Raw values are captured for a `callback` handler instead of being
    /// written anywhere.
    Callback(Vec<String>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Bool,
    Bools,
    Scalar,
    Slice,
    Callback,
}

impl Kind {
    /// Bool-like slots default a missing value to `"true"`.
    pub fn is_flag(self) -> bool {
        matches!(self, Kind::Bool | Kind::Bools)
    }

    pub fn is_slice(self) -> bool {
        matches!(self, Kind::Bools | Kind::Slice)
    }
}

impl<'a> Slot<'a> {
    pub fn callback() -> Slot<'a> {
        Slot::Callback(Vec::new())
    }

    pub fn kind(&self) -> Kind {
        match self {
            Slot::Bool(_) => Kind::Bool,
            Slot::Bools(_) => Kind::Bools,
            Slot::Scalar(_) => Kind::Scalar,
            Slot::Slice(_) => Kind::Slice,
            Slot::Callback(_) => Kind::Callback,
        }
    }

    pub fn is_zero(&self) -> bool {
        match self {
            Slot::Bool(it) => !**it,
            Slot::Bools(it) => it.is_empty(),
            Slot::Scalar(it) => it.is_zero(),
            Slot::Slice(it) => it.is_empty(),
            Slot::Callback(it) => it.is_empty(),
        }
    }

    pub fn reset(&mut self) {
        match self {
            Slot::Bool(it) => **it = false,
            Slot::Bools(it) => it.clear(),
            Slot::Scalar(it) => it.reset(),
            Slot::Slice(it) => it.clear(),
            Slot::Callback(it) => it.clear(),
        }
    }

    /// Coerces `raw` and stores it; slices append.
    pub fn set(&mut self, raw: &str) -> Result<(), String> {
        match self {
            Slot::Bool(it) => **it = parse_bool(raw)?,
            Slot::Bools(it) => it.push(parse_bool(raw)?),
            Slot::Scalar(it) => it.set(raw)?,
            Slot::Slice(it) => it.push(raw)?,
            Slot::Callback(it) => it.push(raw.to_string()),
        }
        Ok(())
    }

    /// Applies a declared default. For slices a JSON array literal is
    /// expanded element by element; anything else goes through [`Slot::set`].
    pub fn set_default(&mut self, raw: &str) -> Result<(), String> {
        if self.kind().is_slice() && raw.starts_with('[') && raw.ends_with(']') {
            let items: Vec<serde_json::Value> =
                serde_json::from_str(raw).map_err(|err| err.to_string())?;
            for item in items {
                match item {
                    serde_json::Value::String(it) => self.set(&it)?,
                    other => self.set(&other.to_string())?,
                }
            }
            return Ok(());
        }
        self.set(raw)
    }

    pub(crate) fn take_callback_values(&mut self) -> Vec<String> {
        match self {
            Slot::Callback(it) => std::mem::take(it),
            _ => Vec::new(),
        }
    }
}

impl fmt::Debug for Slot<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Slot::{:?}", self.kind())
    }
}

/// Conversion of a single command-line token into a value.
///
/// An empty token is the zero value for numbers and durations, mirroring
/// `--int=`.
pub trait FromArg: Default + PartialEq + Sized {
    fn from_arg(raw: &str) -> Result<Self, String>;
}

macro_rules! from_arg_via_from_str {
    ($($ty:ty),*) => {$(
        impl FromArg for $ty {
            fn from_arg(raw: &str) -> Result<Self, String> {
                if raw.is_empty() {
                    return Ok(Self::default());
                }
                raw.parse::<$ty>().map_err(|err| err.to_string())
            }
        }
    )*};
}

from_arg_via_from_str!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64);

impl FromArg for String {
    fn from_arg(raw: &str) -> Result<Self, String> {
        Ok(raw.to_string())
    }
}

impl FromArg for PathBuf {
    fn from_arg(raw: &str) -> Result<Self, String> {
        Ok(PathBuf::from(raw))
    }
}

impl FromArg for Duration {
    fn from_arg(raw: &str) -> Result<Self, String> {
        if raw.is_empty() || raw == "0" {
            return Ok(Duration::ZERO);
        }
        humantime::parse_duration(raw).map_err(|err| err.to_string())
    }
}

impl<T: FromArg> FromArg for Option<T> {
    fn from_arg(raw: &str) -> Result<Self, String> {
        T::from_arg(raw).map(Some)
    }
}

impl<K, V> FromArg for HashMap<K, V>
where
    K: Eq + Hash + DeserializeOwned,
    V: PartialEq + DeserializeOwned,
{
    fn from_arg(raw: &str) -> Result<Self, String> {
        serde_json::from_str(raw).map_err(|err| err.to_string())
    }
}

impl<K, V> FromArg for BTreeMap<K, V>
where
    K: Ord + DeserializeOwned,
    V: PartialEq + DeserializeOwned,
{
    fn from_arg(raw: &str) -> Result<Self, String> {
        serde_json::from_str(raw).map_err(|err| err.to_string())
    }
}

/// Any `Deserialize` type filled from a JSON literal, e.g.
/// `--point '{"x":1,"y":2}'`.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Json<T>(pub T);

impl<T> FromArg for Json<T>
where
    T: Default + PartialEq + DeserializeOwned,
{
    fn from_arg(raw: &str) -> Result<Self, String> {
        serde_json::from_str(raw).map(Json).map_err(|err| err.to_string())
    }
}

/// Same spelling as Go's `strconv.ParseBool`; empty means `false`.
pub fn parse_bool(raw: &str) -> Result<bool, String> {
    match raw {
        "" | "0" | "f" | "F" | "false" | "FALSE" | "False" => Ok(false),
        "1" | "t" | "T" | "true" | "TRUE" | "True" => Ok(true),
        _ => Err(format!("invalid boolean `{raw}`")),
    }
}

/// Object-safe view of a scalar field.
pub trait Scalar {
    fn set(&mut self, raw: &str) -> Result<(), String>;
    fn is_zero(&self) -> bool;
    fn reset(&mut self);
}

impl<T: FromArg> Scalar for T {
    fn set(&mut self, raw: &str) -> Result<(), String> {
        *self = T::from_arg(raw)?;
        Ok(())
    }
    fn is_zero(&self) -> bool {
        *self == T::default()
    }
    fn reset(&mut self) {
        *self = T::default();
    }
}

/// Object-safe view of a `Vec<T>` field.
pub trait Repeated {
    fn push(&mut self, raw: &str) -> Result<(), String>;
    fn is_empty(&self) -> bool;
    fn clear(&mut self);
}

impl<T: FromArg> Repeated for Vec<T> {
    fn push(&mut self, raw: &str) -> Result<(), String> {
        Vec::push(self, T::from_arg(raw)?);
        Ok(())
    }
    fn is_empty(&self) -> bool {
        Vec::is_empty(self)
    }
    fn clear(&mut self) {
        Vec::clear(self)
    }
}

/// Picks the [`Slot`] variant for a field reference. The derive calls this
/// for every leaf field.
pub trait IntoSlot<'a> {
    fn into_slot(self) -> Slot<'a>;
}

impl<'a> IntoSlot<'a> for &'a mut bool {
    fn into_slot(self) -> Slot<'a> {
        Slot::Bool(self)
    }
}

impl<'a> IntoSlot<'a> for &'a mut Vec<bool> {
    fn into_slot(self) -> Slot<'a> {
        Slot::Bools(self)
    }
}

impl<'a, T: FromArg + 'a> IntoSlot<'a> for &'a mut T {
    fn into_slot(self) -> Slot<'a> {
        Slot::Scalar(self)
    }
}

impl<'a, T: FromArg + 'a> IntoSlot<'a> for &'a mut Vec<T> {
    fn into_slot(self) -> Slot<'a> {
        Slot::Slice(self)
    }
}

impl<'a> IntoSlot<'a> for Slot<'a> {
    fn into_slot(self) -> Slot<'a> {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slices_append() {
        let mut args: Vec<String> = Vec::new();
        let mut slot = (&mut args).into_slot();
        slot.set("1").unwrap();
        slot.set("2").unwrap();
        drop(slot);
        assert_eq!(args, ["1", "2"]);

        let mut nums: Vec<i32> = Vec::new();
        let mut slot = (&mut nums).into_slot();
        slot.set("1").unwrap();
        slot.set("2").unwrap();
        assert_eq!(slot.kind(), Kind::Slice);
        drop(slot);
        assert_eq!(nums, [1, 2]);
    }

    #[test]
    fn integer_family_respects_width() {
        let mut small = 0i8;
        let mut slot = (&mut small).into_slot();
        assert!(slot.set("127").is_ok());
        assert!(slot.set("128").is_err());
        assert!(slot.set("-1").is_ok());
        drop(slot);
        assert_eq!(small, -1);

        let mut unsigned = 5u16;
        let mut slot = (&mut unsigned).into_slot();
        assert!(slot.set("-1").is_err());
        slot.set("").unwrap();
        assert!(slot.is_zero());
    }

    #[test]
    fn bool_spellings() {
        let mut flag = false;
        let mut slot = (&mut flag).into_slot();
        assert_eq!(slot.kind(), Kind::Bool);
        slot.set("T").unwrap();
        assert!(!slot.is_zero());
        slot.set("false").unwrap();
        assert!(slot.is_zero());
        assert!(slot.set("yes").is_err());
    }

    #[test]
    fn durations_and_floats() {
        let mut rate = Duration::ZERO;
        (&mut rate).into_slot().set("1s").unwrap();
        assert_eq!(rate, Duration::from_secs(1));
        (&mut rate).into_slot().set("1h 30m").unwrap();
        assert_eq!(rate, Duration::from_secs(90 * 60));
        assert!((&mut rate).into_slot().set("soon").is_err());

        let mut start = 0.0f64;
        (&mut start).into_slot().set("-3.5").unwrap();
        assert_eq!(start, -3.5);
    }

    #[test]
    fn structured_literals() {
        let mut headers: HashMap<String, i32> = HashMap::new();
        (&mut headers).into_slot().set(r#"{"a": 1, "b": 2}"#).unwrap();
        assert_eq!(headers.get("b"), Some(&2));

        let mut point: Json<Vec<u8>> = Json::default();
        (&mut point).into_slot().set("[1, 2, 3]").unwrap();
        assert_eq!(point.0, [1, 2, 3]);
    }

    #[test]
    fn json_array_default_expands() {
        let mut names: Vec<String> = Vec::new();
        let mut slot = (&mut names).into_slot();
        slot.set_default(r#"["one", "two"]"#).unwrap();
        drop(slot);
        assert_eq!(names, ["one", "two"]);

        let mut nums: Vec<f64> = Vec::new();
        (&mut nums).into_slot().set_default("[1.1,2.2]").unwrap();
        assert_eq!(nums, [1.1, 2.2]);
    }

    #[test]
    fn reset_zeroes_the_target() {
        let mut rate = String::from("8000");
        let mut slot = (&mut rate).into_slot();
        assert!(!slot.is_zero());
        slot.reset();
        assert!(slot.is_zero());
    }

    #[test]
    fn callback_captures_raw_values() {
        let mut slot = Slot::callback();
        slot.set("1MB").unwrap();
        assert_eq!(slot.kind(), Kind::Callback);
        assert_eq!(slot.take_callback_values(), ["1MB"]);
        assert!(slot.is_zero());
    }
}
