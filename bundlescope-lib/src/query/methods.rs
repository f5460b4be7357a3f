use super::value::{from_cel, to_cel};
use crate::diff::{DiffItem, LimitInput, ValueDiff, format_diff, is_within_limit, normalize_limit};
use crate::helpers::{self, Pattern};
use crate::versions;
use cel_interpreter::{ExecutionError, ResolveResult, Value};
use core::fmt::{self, Debug, Formatter};
use serde::de::DeserializeOwned;
use serde_json::{Value as JsonValue, json};
use std::collections::BTreeMap;
use std::sync::Arc;

/// A query method: receives the evaluated call arguments.
pub type Method = Arc<dyn Fn(&[Value]) -> ResolveResult + Send + Sync>;

/// Named methods available to queries.
///
/// Inserting a name that already exists replaces the earlier method.
#[derive(Clone, Default)]
pub struct MethodSet {
    methods: BTreeMap<String, Method>,
}

impl Debug for MethodSet {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.methods.keys()).finish()
    }
}

impl MethodSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The methods every engine starts with.
    #[must_use]
    pub fn builtin() -> Self {
        let mut set = Self::new();

        set.insert("stringify", |args| {
            Ok(Value::String(Arc::new(from_cel(&arg(args, 0)).to_string())))
        });
        set.insert("typeof", |args| Ok(text_value(type_name(&arg(args, 0)))));
        set.insert("isNullish", |args| Ok(Value::Bool(matches!(arg(args, 0), Value::Null))));
        set.insert("isArray", |args| Ok(Value::Bool(matches!(arg(args, 0), Value::List(_)))));
        set.insert("useNotNullish", |args| match arg(args, 0) {
            Value::List(items) => Ok(items.iter().find(|v| !matches!(v, Value::Null)).cloned().unwrap_or(Value::Null)),
            _ => Ok(Value::Null),
        });
        set.insert("toNumber", |args| {
            Ok(string_arg(args, 0)
                .and_then(|s| helpers::to_number(&s))
                .map_or(Value::Null, Value::Int))
        });
        set.insert("formatSize", |args| Ok(text_value(helpers::format_size(lenient_number(args, 0)))));
        set.insert("formatDuration", |args| Ok(text_value(helpers::format_duration(lenient_number(args, 0)))));
        set.insert("formatDate", |args| {
            let ts = integer("formatDate", args, 0)?;
            let format = string_arg(args, 1);
            Ok(helpers::format_date(ts, format.as_deref()).map_or(Value::Null, text_value))
        });
        set.insert("percentFrom", |args| {
            let a = number("percentFrom", args, 0)?;
            let b = number("percentFrom", args, 1)?;
            let digits = optional_digits("percentFrom", args, 2)?;
            Ok(Value::Float(helpers::percent_from(a, b, digits)))
        });
        set.insert("toFixed", |args| {
            let value = number("toFixed", args, 0)?;
            let digits = optional_digits("toFixed", args, 1)?.unwrap_or(2);
            Ok(text_value(helpers::to_fixed(value, digits)))
        });
        set.insert("fileExt", |args| Ok(text_value(helpers::file_ext(string_arg(args, 0).as_deref()))));
        set.insert("toMatchRegexp", |args| {
            let value = string_arg(args, 0).unwrap_or_default();
            let pattern = regex_arg("toMatchRegexp", args, 1)?;
            Ok(Value::Bool(pattern.is_match(&value)))
        });
        set.insert("toRegexp", |args| {
            let source = string_arg(args, 0).unwrap_or_default();
            let pattern = Pattern::regex(&format!("({source})"), "").map_err(|e| fail("toRegexp", e))?;
            encode("toRegexp", &pattern)
        });
        set.insert("serializeStringOrRegexp", |args| match arg(args, 0) {
            Value::Null => Ok(Value::Null),
            Value::String(s) => encode("serializeStringOrRegexp", &Pattern::exact(s.as_str())),
            other => {
                let pattern: Pattern = decode("serializeStringOrRegexp", &other)?;
                encode("serializeStringOrRegexp", &pattern)
            }
        });
        set.insert("deserializeStringOrRegexp", |args| match arg(args, 0) {
            Value::Null => Ok(Value::Null),
            other => match decode::<Pattern>("deserializeStringOrRegexp", &other)? {
                Pattern::Exact(text) => Ok(text_value(text)),
                regex @ Pattern::Regex { .. } => encode("deserializeStringOrRegexp", &regex),
            },
        });
        set.insert("plural", |args| plural_method("plural", args, helpers::plural));
        set.insert("pluralWithValue", |args| plural_method("pluralWithValue", args, helpers::plural_with_value));
        set.insert("pluralRus", |args| plural_method("pluralRus", args, helpers::plural_rus));
        set.insert("pluralWithValueRus", |args| plural_method("pluralWithValueRus", args, helpers::plural_with_value_rus));
        set.insert("getNetworkTypeInfo", |args| {
            let name = string_arg(args, 0).unwrap_or_default();
            match helpers::network_type(&name) {
                Some(network) => encode("getNetworkTypeInfo", network),
                None => Ok(Value::Null),
            }
        });
        set.insert("getNetworkTypeName", |args| {
            let name = match arg(args, 0) {
                Value::Map(_) => decode::<JsonValue>("getNetworkTypeName", &arg(args, 0))?
                    .get("name")
                    .and_then(JsonValue::as_str)
                    .map(str::to_string),
                _ => string_arg(args, 0),
            };
            Ok(name
                .as_deref()
                .and_then(helpers::network_type)
                .map_or(Value::Null, |network| text_value(helpers::network_type_name(network))))
        });
        set.insert("getDownloadTime", |args| {
            let size = number("getDownloadTime", args, 0)?;
            let network = string_arg(args, 1).unwrap_or_default();
            Ok(helpers::download_time(size, &network).map_or(Value::Null, Value::Float))
        });
        set.insert("semverGT", |args| semver_predicate(args, versions::gt));
        set.insert("semverGTE", |args| semver_predicate(args, versions::gte));
        set.insert("semverLT", |args| semver_predicate(args, versions::lt));
        set.insert("semverLTE", |args| semver_predicate(args, versions::lte));
        set.insert("semverEQ", |args| semver_predicate(args, versions::eq));
        set.insert("semverDiff", |args| {
            let (a, b) = (string_arg(args, 0).unwrap_or_default(), string_arg(args, 1).unwrap_or_default());
            Ok(versions::diff(&a, &b).map_or(Value::Null, |release| text_value(release.to_string())))
        });
        set.insert("semverParse", |args| {
            let Some(version) = string_arg(args, 0).as_deref().and_then(versions::parse) else {
                return Ok(Value::Null);
            };
            Ok(to_cel(&json!({
                "version": format!("{}.{}.{}{}", version.major, version.minor, version.patch,
                    if version.pre.is_empty() { String::new() } else { format!("-{}", version.pre) }),
                "major": version.major,
                "minor": version.minor,
                "patch": version.patch,
                "prerelease": split_identifiers(version.pre.as_str()),
                "build": split_identifiers(version.build.as_str()),
            })))
        });
        set.insert("semverSatisfies", |args| {
            let (version, range) = (string_arg(args, 0).unwrap_or_default(), string_arg(args, 1).unwrap_or_default());
            Ok(Value::Bool(versions::satisfies(&version, &range)))
        });
        set.insert("formatDiff", |args| {
            let item: DiffItem = decode("formatDiff", &arg(args, 0))?;
            Ok(text_value(format_diff(&item)))
        });
        set.insert("isMatch", |args| {
            let value = string_arg(args, 0);
            let pattern = optional_pattern("isMatch", args, 1)?;
            Ok(Value::Bool(helpers::is_match(value.as_deref(), pattern.as_ref())))
        });
        set.insert("exclude", exclude_method);
        set.insert("diff_normalizeLimit", |args| {
            let limit: Option<LimitInput> = decode("diff_normalizeLimit", &arg(args, 0))?;
            match normalize_limit(limit) {
                Some(limit) => encode("diff_normalizeLimit", &limit),
                None => Ok(Value::Null),
            }
        });
        set.insert("diff_isLTETheLimit", |args| {
            let diff: ValueDiff = decode("diff_isLTETheLimit", &arg(args, 0))?;
            let limit: Option<LimitInput> = decode("diff_isLTETheLimit", &arg(args, 1))?;
            Ok(Value::Bool(is_within_limit(&diff, normalize_limit(limit).as_ref())))
        });

        set
    }

    /// Add or replace a method.
    pub fn insert<F>(&mut self, name: impl Into<String>, method: F)
    where
        F: Fn(&[Value]) -> ResolveResult + Send + Sync + 'static,
    {
        let _ = self.methods.insert(name.into(), Arc::new(method));
    }

    /// Builder form of [`insert`](Self::insert).
    #[must_use]
    pub fn with<F>(mut self, name: impl Into<String>, method: F) -> Self
    where
        F: Fn(&[Value]) -> ResolveResult + Send + Sync + 'static,
    {
        self.insert(name, method);
        self
    }

    /// Layer `overrides` on top of this set; their methods win on name clashes.
    #[must_use]
    pub fn merge(mut self, overrides: Self) -> Self {
        self.methods.extend(overrides.methods);
        self
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Method> {
        self.methods.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.methods.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Method)> {
        self.methods.iter().map(|(name, method)| (name.as_str(), method))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.methods.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }
}

pub(super) fn arg(args: &[Value], index: usize) -> Value {
    args.get(index).cloned().unwrap_or(Value::Null)
}

pub(super) fn fail(method: &str, error: impl ToString) -> ExecutionError {
    ExecutionError::function_error(method, error.to_string())
}

pub(super) fn text_value(text: impl Into<String>) -> Value {
    Value::String(Arc::new(text.into()))
}

pub(super) fn string_arg(args: &[Value], index: usize) -> Option<String> {
    match arg(args, index) {
        Value::String(s) => Some(s.to_string()),
        _ => None,
    }
}

#[expect(clippy::cast_precision_loss, reason = "query numbers are doubles")]
fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Int(i) => Some(*i as f64),
        Value::UInt(u) => Some(*u as f64),
        Value::Float(f) => Some(*f),
        _ => None,
    }
}

fn number(method: &str, args: &[Value], index: usize) -> Result<f64, ExecutionError> {
    as_number(&arg(args, index)).ok_or_else(|| fail(method, format!("argument {} must be a number", index + 1)))
}

fn lenient_number(args: &[Value], index: usize) -> f64 {
    as_number(&arg(args, index)).unwrap_or(f64::NAN)
}

pub(super) fn integer(method: &str, args: &[Value], index: usize) -> Result<i64, ExecutionError> {
    match arg(args, index) {
        Value::Int(i) => Ok(i),
        Value::UInt(u) => i64::try_from(u).map_err(|e| fail(method, e)),
        #[expect(clippy::cast_possible_truncation, reason = "fraction is dropped on purpose")]
        Value::Float(f) if f.is_finite() => Ok(f.trunc() as i64),
        _ => Err(fail(method, format!("argument {} must be an integer", index + 1))),
    }
}

fn optional_digits(method: &str, args: &[Value], index: usize) -> Result<Option<u32>, ExecutionError> {
    match arg(args, index) {
        Value::Null => Ok(None),
        _ => {
            let digits = integer(method, args, index)?;
            u32::try_from(digits).map(Some).map_err(|e| fail(method, e))
        }
    }
}

/// Decode a CEL value through its JSON form.
pub(super) fn decode<T: DeserializeOwned>(method: &str, value: &Value) -> Result<T, ExecutionError> {
    serde_json::from_value(from_cel(value)).map_err(|e| fail(method, e))
}

/// Encode any serializable value as a CEL value.
pub(super) fn encode<T: serde::Serialize + ?Sized>(method: &str, value: &T) -> ResolveResult {
    serde_json::to_value(value).map(|json| to_cel(&json)).map_err(|e| fail(method, e))
}

fn optional_pattern(method: &str, args: &[Value], index: usize) -> Result<Option<Pattern>, ExecutionError> {
    match arg(args, index) {
        Value::Null => Ok(None),
        other => pattern_value(method, &other).map(Some),
    }
}

/// A plain string matches exactly; regular expressions arrive in their serialized form.
fn pattern_value(method: &str, value: &Value) -> Result<Pattern, ExecutionError> {
    match value {
        Value::String(s) => Ok(Pattern::exact(s.as_str())),
        other => decode(method, other),
    }
}

/// A regular expression argument: a serialized pattern or a bare regex source.
fn regex_arg(method: &str, args: &[Value], index: usize) -> Result<Pattern, ExecutionError> {
    match arg(args, index) {
        Value::String(s) => Pattern::regex(&s, "").map_err(|e| fail(method, e)),
        other => decode(method, &other),
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Int(_) | Value::UInt(_) | Value::Float(_) => "number",
        Value::String(_) => "string",
        Value::Bool(_) => "boolean",
        Value::Function(..) => "function",
        _ => "object",
    }
}

fn plural_method(method: &str, args: &[Value], plural: fn(f64, &[String]) -> String) -> ResolveResult {
    let value = number(method, args, 0)?;
    let words: Vec<String> = decode(method, &arg(args, 1))?;
    Ok(text_value(plural(value, &words)))
}

fn semver_predicate(args: &[Value], predicate: fn(&str, &str) -> bool) -> ResolveResult {
    let (a, b) = (string_arg(args, 0).unwrap_or_default(), string_arg(args, 1).unwrap_or_default());
    Ok(Value::Bool(predicate(&a, &b)))
}

fn split_identifiers(text: &str) -> Vec<&str> {
    if text.is_empty() { Vec::new() } else { text.split('.').collect() }
}

/// `exclude(items, patterns, field?)`: drop items whose `field` (a dotted path, or the
/// item itself) matches any pattern.
fn exclude_method(args: &[Value]) -> ResolveResult {
    let Value::List(items) = arg(args, 0) else {
        return Err(fail("exclude", "argument 1 must be a list"));
    };

    let patterns: Vec<Pattern> = match arg(args, 1) {
        Value::Null => Vec::new(),
        Value::List(list) => list.iter().map(|item| pattern_value("exclude", item)).collect::<Result<_, _>>()?,
        _ => return Err(fail("exclude", "argument 2 must be a list of patterns")),
    };

    let field = string_arg(args, 2);
    let json_items: Vec<JsonValue> = items.iter().map(from_cel).collect();

    let kept = helpers::exclude(&json_items, &patterns, |item| {
        field
            .as_deref()
            .map_or(Some(item), |path| path.split('.').try_fold(item, |current, key| current.get(key)))
            .and_then(JsonValue::as_str)
    });

    Ok(Value::List(Arc::new(kept.into_iter().map(to_cel).collect())))
}
