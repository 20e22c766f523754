//! Query string encoding for request parameters.
//!
//! Parameters form an ordered, possibly nested mapping. Encoding follows
//! the conventions the osu! API expects: `key[]=v` per array element,
//! `parent.child=v` for nested mappings, and numbers only when positive.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

/// Characters left untouched by `encodeURIComponent`.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// A single parameter value.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    /// Never emitted.
    Undefined,
    Str(String),
    /// Emitted only when greater than zero.
    Int(i64),
    /// Emitted only when greater than zero.
    Float(f64),
    /// Pre-rendered elements, emitted as `key[]=element`.
    Array(Vec<String>),
    Map(Params),
}

/// Ordered parameter mapping.
///
/// Inserting an existing key replaces its value without moving it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Params {
    entries: Vec<(String, ParamValue)>,
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace `key`.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ParamValue>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Builder form of [`Params::insert`].
    pub fn with(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Encode into an `&`-joined query string (without the leading `?`).
    pub fn to_query_string(&self) -> String {
        encode(self)
    }
}

/// Encode `params` into an `&`-joined query string.
pub fn encode(params: &Params) -> String {
    let mut pairs = Vec::new();
    collect_pairs(params, None, &mut pairs);
    pairs.join("&")
}

fn collect_pairs(params: &Params, prefix: Option<&str>, out: &mut Vec<String>) {
    for (key, value) in params.iter() {
        let path = match prefix {
            Some(parent) => format!("{parent}.{key}"),
            None => key.to_string(),
        };

        match value {
            ParamValue::Undefined => {}
            ParamValue::Str(s) => out.push(format!("{path}={}", encode_component(s))),
            ParamValue::Int(n) if *n > 0 => out.push(format!("{path}={n}")),
            ParamValue::Float(n) if *n > 0.0 => out.push(format!("{path}={n}")),
            ParamValue::Int(_) | ParamValue::Float(_) => {}
            ParamValue::Array(items) => {
                for item in items {
                    out.push(format!("{path}[]={}", encode_component(item)));
                }
            }
            ParamValue::Map(nested) => collect_pairs(nested, Some(path.as_str()), out),
        }
    }
}

pub(crate) fn encode_component(value: &str) -> String {
    utf8_percent_encode(value, COMPONENT).to_string()
}

// ---------------------------------------------------------------------------
// Conversions
// ---------------------------------------------------------------------------

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<&String> for ParamValue {
    fn from(value: &String) -> Self {
        Self::Str(value.clone())
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for ParamValue {
    fn from(value: i32) -> Self {
        Self::Int(value.into())
    }
}

impl From<u32> for ParamValue {
    fn from(value: u32) -> Self {
        Self::Int(value.into())
    }
}

impl From<u64> for ParamValue {
    fn from(value: u64) -> Self {
        Self::Int(i64::try_from(value).unwrap_or(i64::MAX))
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl<T: ToString> From<Vec<T>> for ParamValue {
    fn from(value: Vec<T>) -> Self {
        Self::Array(value.iter().map(ToString::to_string).collect())
    }
}

impl<T: ToString> From<&[T]> for ParamValue {
    fn from(value: &[T]) -> Self {
        Self::Array(value.iter().map(ToString::to_string).collect())
    }
}

impl From<Params> for ParamValue {
    fn from(value: Params) -> Self {
        Self::Map(value)
    }
}

impl<T: Into<ParamValue>> From<Option<T>> for ParamValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Undefined, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalars_keep_insertion_order() {
        let params = Params::new()
            .with("mode", "osu")
            .with("limit", 50)
            .with("type", "global");
        assert_eq!(encode(&params), "mode=osu&limit=50&type=global");
    }

    #[test]
    fn arrays_emit_one_pair_per_element() {
        let params = Params::new().with("tags", vec!["a", "b"]);
        assert_eq!(encode(&params), "tags[]=a&tags[]=b");
    }

    #[test]
    fn array_elements_are_encoded_and_zero_is_kept() {
        let params = Params::new().with("ids", vec![0, 12]).with("q", vec!["a b"]);
        assert_eq!(encode(&params), "ids[]=0&ids[]=12&q[]=a%20b");
    }

    #[test]
    fn nested_maps_use_dot_paths() {
        let params = Params::new().with("cursor", Params::new().with("id", 5));
        assert_eq!(encode(&params), "cursor.id=5");
    }

    #[test]
    fn deeply_nested_maps_extend_the_path() {
        let inner = Params::new().with("c", "x");
        let params = Params::new()
            .with("a", Params::new().with("b", inner))
            .with("z", 1);
        assert_eq!(encode(&params), "a.b.c=x&z=1");
    }

    #[test]
    fn non_positive_numbers_are_omitted() {
        let params = Params::new()
            .with("zero", 0)
            .with("negative", -4)
            .with("float_zero", 0.0)
            .with("nan", f64::NAN)
            .with("one", 1);
        assert_eq!(encode(&params), "one=1");
    }

    #[test]
    fn positive_floats_are_rendered_plainly() {
        let params = Params::new().with("pp", 0.5).with("whole", 2.0);
        assert_eq!(encode(&params), "pp=0.5&whole=2");
    }

    #[test]
    fn strings_are_always_emitted_and_encoded() {
        let params = Params::new()
            .with("empty", "")
            .with("query", "peppy & co/ü")
            .with("safe", "a-b_c.d!e~f*g'h(i)");
        assert_eq!(
            encode(&params),
            "empty=&query=peppy%20%26%20co%2F%C3%BC&safe=a-b_c.d!e~f*g'h(i)"
        );
    }

    #[test]
    fn undefined_values_are_skipped_at_any_level() {
        let none: Option<&str> = None;
        let params = Params::new()
            .with("a", none)
            .with("b", Params::new().with("c", ParamValue::Undefined))
            .with("d", Some("x"));
        assert_eq!(encode(&params), "d=x");
    }

    #[test]
    fn insert_replaces_in_place() {
        let mut params = Params::new().with("k", "old").with("m", 0);
        params.insert("k", "new");
        assert_eq!(params.len(), 2);
        assert_eq!(encode(&params), "k=new");
    }

    #[test]
    fn duplicates_across_levels_are_not_merged() {
        let params = Params::new()
            .with("id", 1)
            .with("nested", Params::new().with("id", 1));
        assert_eq!(encode(&params), "id=1&nested.id=1");
    }

    #[test]
    fn empty_params_encode_to_empty_string() {
        assert_eq!(Params::new().to_query_string(), "");
    }
}
