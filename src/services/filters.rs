//! Query-string filters turned into parameterized column filters.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, FixedOffset};
use sea_orm::sea_query::{ColumnType, Value as QueryValue};
use sea_orm::{ColumnTrait, IdenStatic, Iterable};

use crate::db::dao::{ColumnFilter, CompareOp, FilterOp};
use crate::error::AppError;

const INVALID_FILTER_MESSAGE: &str = "Invalid filter";
const INVALID_FILTER_VALUE_MESSAGE: &str = "Invalid filter value";

/// One accepted query key and how its value becomes a filter on `column`.
pub struct FilterKey<C> {
    pub key: &'static str,
    pub column: C,
    pub parse: fn(&str) -> Result<FilterOp, AppError>,
}

pub enum FilterMode<C: 'static> {
    /// Only the listed keys are accepted.
    Allowlist(&'static [FilterKey<C>]),
    /// Any column by name except `deny`; values are parsed by column type.
    AllColumns { deny: &'static [&'static str] },
}

pub fn build_column_filters<C>(
    mode: FilterMode<C>,
    filters: HashMap<String, String>,
) -> Result<Vec<ColumnFilter<C>>, AppError>
where
    C: ColumnTrait + Copy,
{
    if filters.is_empty() {
        return Ok(Vec::new());
    }

    let mut parsed = Vec::with_capacity(filters.len());
    match mode {
        FilterMode::Allowlist(keys) => {
            for (key, value) in filters {
                let def = keys
                    .iter()
                    .find(|def| def.key == key)
                    .ok_or_else(invalid_filter)?;
                parsed.push(ColumnFilter {
                    column: def.column,
                    op: (def.parse)(&value)?,
                });
            }
        }
        FilterMode::AllColumns { deny } => {
            let deny: HashSet<&str> = deny.iter().copied().collect();
            let columns: HashMap<&'static str, C> =
                C::iter().map(|column| (column.as_str(), column)).collect();
            for (key, value) in filters {
                if deny.contains(key.as_str()) {
                    return Err(invalid_filter());
                }
                let column = *columns.get(key.as_str()).ok_or_else(invalid_filter)?;
                let column_def = column.def();
                let column_type = column_def.get_column_type();
                let op = if is_string_column_type(column_type) {
                    parse_string_filter(&value)?
                } else {
                    parse_non_string_filter(&value, column_type)?
                };
                parsed.push(ColumnFilter { column, op });
            }
        }
    }
    Ok(parsed)
}

pub(crate) fn invalid_filter() -> AppError {
    AppError::bad_request(INVALID_FILTER_MESSAGE)
}

fn invalid_filter_value() -> AppError {
    AppError::bad_request(INVALID_FILTER_VALUE_MESSAGE)
}

fn invalid_filter_value_with(detail: impl std::fmt::Display) -> AppError {
    AppError::bad_request(format!("{INVALID_FILTER_VALUE_MESSAGE}: {detail}"))
}

fn parse_int<T>(raw: &str) -> Result<T, AppError>
where
    T: std::str::FromStr,
    <T as std::str::FromStr>::Err: std::fmt::Display,
{
    raw.trim().parse::<T>().map_err(invalid_filter_value_with)
}

fn parse_bool(raw: &str) -> Result<bool, AppError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(invalid_filter_value()),
    }
}

fn parse_datetime(raw: &str) -> Result<DateTime<FixedOffset>, AppError> {
    DateTime::parse_from_rfc3339(raw.trim()).map_err(invalid_filter_value_with)
}

fn escape_like(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

fn like(pattern: String) -> FilterOp {
    FilterOp::Like {
        pattern,
        escape: '\\',
    }
}

/// `abc` is an exact match; `abc*`, `*abc` and `*abc*` become escaped LIKE patterns.
fn parse_string_filter(raw: &str) -> Result<FilterOp, AppError> {
    let raw = raw.trim();
    let leading = raw.starts_with('*');
    let trailing = raw.ends_with('*');
    let inner = raw.trim_matches('*');
    if inner.is_empty() || inner.contains('*') {
        return Err(invalid_filter_value());
    }

    let escaped = escape_like(inner);
    Ok(match (leading, trailing) {
        (false, false) => FilterOp::Eq(QueryValue::String(Some(inner.to_string()))),
        (true, true) => like(format!("%{escaped}%")),
        (true, false) => like(format!("%{escaped}")),
        (false, true) => like(format!("{escaped}%")),
    })
}

fn parse_comparison(raw: &str) -> Option<(CompareOp, &str)> {
    let raw = raw.trim_start();
    [
        (">=", CompareOp::Gte),
        ("<=", CompareOp::Lte),
        (">", CompareOp::Gt),
        ("<", CompareOp::Lt),
    ]
    .into_iter()
    .find_map(|(prefix, op)| raw.strip_prefix(prefix).map(|rest| (op, rest.trim())))
}

fn parse_range(raw: &str) -> Result<Option<(&str, &str)>, AppError> {
    let Some((start, end)) = raw.trim().split_once("..") else {
        return Ok(None);
    };
    let (start, end) = (start.trim(), end.trim());
    if start.is_empty() || end.is_empty() || end.contains("..") {
        return Err(invalid_filter_value());
    }
    Ok(Some((start, end)))
}

fn is_string_column_type(column_type: &ColumnType) -> bool {
    matches!(
        column_type,
        ColumnType::Char(_) | ColumnType::String(_) | ColumnType::Text
    )
}

fn is_orderable_column_type(column_type: &ColumnType) -> bool {
    matches!(
        column_type,
        ColumnType::Integer | ColumnType::BigInteger | ColumnType::TimestampWithTimeZone
    )
}

fn parse_non_string_filter(raw: &str, column_type: &ColumnType) -> Result<FilterOp, AppError> {
    let raw = raw.trim();
    if raw.is_empty() || raw.contains('*') {
        return Err(invalid_filter_value());
    }

    if let Some((op, rest)) = parse_comparison(raw) {
        if rest.is_empty() || !is_orderable_column_type(column_type) {
            return Err(invalid_filter());
        }
        let value = parse_value_by_column_type(rest, column_type)?;
        return Ok(FilterOp::Compare { op, value });
    }

    if let Some((start, end)) = parse_range(raw)? {
        if !is_orderable_column_type(column_type) {
            return Err(invalid_filter());
        }
        return Ok(FilterOp::Between {
            min: parse_value_by_column_type(start, column_type)?,
            max: parse_value_by_column_type(end, column_type)?,
        });
    }

    Ok(FilterOp::Eq(parse_value_by_column_type(raw, column_type)?))
}

fn parse_value_by_column_type(raw: &str, column_type: &ColumnType) -> Result<QueryValue, AppError> {
    match column_type {
        ColumnType::Integer => Ok(QueryValue::Int(Some(parse_int::<i32>(raw)?))),
        ColumnType::BigInteger => Ok(QueryValue::BigInt(Some(parse_int::<i64>(raw)?))),
        ColumnType::Boolean => Ok(QueryValue::Bool(Some(parse_bool(raw)?))),
        ColumnType::TimestampWithTimeZone => Ok(QueryValue::ChronoDateTimeWithTimeZone(Some(
            parse_datetime(raw)?,
        ))),
        _ => Err(invalid_filter()),
    }
}

// Parsers for allowlisted keys.

pub fn exact_text(raw: &str) -> Result<FilterOp, AppError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(invalid_filter_value());
    }
    Ok(FilterOp::Eq(QueryValue::String(Some(raw.to_string()))))
}

pub fn contains_text(raw: &str) -> Result<FilterOp, AppError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(invalid_filter_value());
    }
    Ok(like(format!("%{}%", escape_like(raw))))
}

pub fn exact_i32(raw: &str) -> Result<FilterOp, AppError> {
    Ok(FilterOp::Eq(QueryValue::Int(Some(parse_int::<i32>(raw)?))))
}

pub fn at_least_i32(raw: &str) -> Result<FilterOp, AppError> {
    Ok(FilterOp::Compare {
        op: CompareOp::Gte,
        value: QueryValue::Int(Some(parse_int::<i32>(raw)?)),
    })
}

pub fn at_most_i32(raw: &str) -> Result<FilterOp, AppError> {
    Ok(FilterOp::Compare {
        op: CompareOp::Lte,
        value: QueryValue::Int(Some(parse_int::<i32>(raw)?)),
    })
}

pub fn at_least_i64(raw: &str) -> Result<FilterOp, AppError> {
    Ok(FilterOp::Compare {
        op: CompareOp::Gte,
        value: QueryValue::BigInt(Some(parse_int::<i64>(raw)?)),
    })
}

pub fn at_most_i64(raw: &str) -> Result<FilterOp, AppError> {
    Ok(FilterOp::Compare {
        op: CompareOp::Lte,
        value: QueryValue::BigInt(Some(parse_int::<i64>(raw)?)),
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use sea_orm::sea_query::Value as QueryValue;

    use super::{
        CompareOp, FilterMode, FilterOp, FilterKey, at_least_i64, build_column_filters,
        contains_text,
    };
    use crate::db::entities::property;

    static PRICE_ALLOWLIST: &[FilterKey<property::Column>] = &[
        FilterKey {
            key: "min_price",
            column: property::Column::Price,
            parse: at_least_i64,
        },
        FilterKey {
            key: "q",
            column: property::Column::Title,
            parse: contains_text,
        },
    ];

    fn filters(entries: &[(&str, &str)]) -> HashMap<String, String> {
        entries
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect()
    }

    fn all_columns() -> FilterMode<property::Column> {
        FilterMode::AllColumns { deny: &["created_by"] }
    }

    #[test]
    fn empty_input_builds_no_filters() {
        let parsed = build_column_filters(all_columns(), HashMap::new()).expect("empty");
        assert!(parsed.is_empty());
    }

    #[test]
    fn allowlist_rejects_unknown_key() {
        let err = build_column_filters(
            FilterMode::Allowlist(PRICE_ALLOWLIST),
            filters(&[("price", "10")]),
        )
        .expect_err("unknown key");
        assert_eq!(err.message(), "Invalid filter");
    }

    #[test]
    fn allowlist_applies_custom_parser() {
        let parsed = build_column_filters(
            FilterMode::Allowlist(PRICE_ALLOWLIST),
            filters(&[("min_price", "150000")]),
        )
        .expect("min_price");
        assert!(matches!(
            &parsed[0].op,
            FilterOp::Compare { op: CompareOp::Gte, value: QueryValue::BigInt(Some(150000)) }
        ));
    }

    #[test]
    fn contains_escapes_like_metacharacters() {
        let parsed = build_column_filters(
            FilterMode::Allowlist(PRICE_ALLOWLIST),
            filters(&[("q", "50%_off")]),
        )
        .expect("q");
        assert!(matches!(
            &parsed[0].op,
            FilterOp::Like { pattern, .. } if pattern == "%50\\%\\_off%"
        ));
    }

    #[test]
    fn denied_column_is_rejected() {
        let err = build_column_filters(all_columns(), filters(&[("created_by", "1")]))
            .expect_err("denied");
        assert_eq!(err.message(), "Invalid filter");
    }

    #[test]
    fn string_wildcards_become_like() {
        let parsed =
            build_column_filters(all_columns(), filters(&[("city", "Par*")])).expect("city");
        assert!(matches!(
            &parsed[0].op,
            FilterOp::Like { pattern, .. } if pattern == "Par%"
        ));
    }

    #[test]
    fn numeric_comparison_and_range_are_parsed() {
        let parsed =
            build_column_filters(all_columns(), filters(&[("price", ">=1000")])).expect("gte");
        assert!(matches!(
            &parsed[0].op,
            FilterOp::Compare { op: CompareOp::Gte, value: QueryValue::BigInt(Some(1000)) }
        ));

        let parsed =
            build_column_filters(all_columns(), filters(&[("rooms", "2..4")])).expect("range");
        assert!(matches!(&parsed[0].op, FilterOp::Between { .. }));
    }

    #[test]
    fn malformed_numeric_value_is_bad_request() {
        let err = build_column_filters(all_columns(), filters(&[("price", "cheap")]))
            .expect_err("not a number");
        assert!(err.message().starts_with("Invalid filter value"));
    }

    #[test]
    fn comparison_prefix_on_text_column_is_literal() {
        let parsed = build_column_filters(all_columns(), filters(&[("city", ">=Paris")]))
            .expect("text columns treat comparisons as literal values");
        assert!(matches!(&parsed[0].op, FilterOp::Eq(_)));
    }
}
