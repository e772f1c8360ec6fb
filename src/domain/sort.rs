//! Sort keys and deterministic row ordering for result tables

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }
}

/// Comparable projection of a row
///
/// `Absent` at the top level sorts after every present value in both
/// directions. Inside a tuple it ranks below any present element.
#[derive(Debug, Clone, PartialEq)]
pub enum SortValue {
    Absent,
    Int(i64),
    Float(f64),
    Text(String),
    Tuple(Vec<SortValue>),
}

impl SortValue {
    fn rank(&self) -> u8 {
        match self {
            SortValue::Absent => 0,
            SortValue::Int(_) | SortValue::Float(_) => 1,
            SortValue::Text(_) => 2,
            SortValue::Tuple(_) => 3,
        }
    }

    /// Ascending total order
    pub fn total_cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (SortValue::Int(a), SortValue::Int(b)) => a.cmp(b),
            (SortValue::Float(a), SortValue::Float(b)) => float_cmp(*a, *b),
            (SortValue::Int(a), SortValue::Float(b)) => int_float_cmp(*a, *b),
            (SortValue::Float(a), SortValue::Int(b)) => int_float_cmp(*b, *a).reverse(),
            (SortValue::Text(a), SortValue::Text(b)) => a.cmp(b),
            (SortValue::Tuple(a), SortValue::Tuple(b)) => a
                .iter()
                .zip(b.iter())
                .map(|(x, y)| x.total_cmp(y))
                .find(|ordering| ordering.is_ne())
                .unwrap_or_else(|| a.len().cmp(&b.len())),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

/// `total_cmp` with both zeros equal, matching `int_float_cmp`
fn float_cmp(a: f64, b: f64) -> Ordering {
    if a == b {
        Ordering::Equal
    } else {
        a.total_cmp(&b)
    }
}

/// Exact comparison of an integer with a float; NaN sorts by its sign
fn int_float_cmp(a: i64, b: f64) -> Ordering {
    // 2^63, the first float above i64::MAX
    const I64_END: f64 = 9_223_372_036_854_775_808.0;

    if b.is_nan() {
        return if b.is_sign_negative() {
            Ordering::Greater
        } else {
            Ordering::Less
        };
    }
    if b >= I64_END {
        return Ordering::Less;
    }
    if b < -I64_END {
        return Ordering::Greater;
    }

    let whole = b.trunc();
    // in range, so the cast is exact
    match a.cmp(&(whole as i64)) {
        Ordering::Equal => 0.0f64.partial_cmp(&(b - whole)).unwrap_or(Ordering::Equal),
        ordering => ordering,
    }
}

impl From<&str> for SortValue {
    fn from(value: &str) -> Self {
        SortValue::Text(value.to_string())
    }
}

impl From<String> for SortValue {
    fn from(value: String) -> Self {
        SortValue::Text(value)
    }
}

impl From<i64> for SortValue {
    fn from(value: i64) -> Self {
        SortValue::Int(value)
    }
}

impl<T: Into<SortValue>> From<Option<T>> for SortValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(SortValue::Absent)
    }
}

/// Named projection from a row to its sort key
pub trait SortProperty<T> {
    fn key(&self, row: &T) -> SortValue;
}

impl<T, F> SortProperty<T> for F
where
    F: Fn(&T) -> SortValue,
{
    fn key(&self, row: &T) -> SortValue {
        self(row)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortOrder<P> {
    pub property: P,
    pub direction: SortDirection,
}

impl<P> SortOrder<P> {
    pub fn new(property: P, direction: SortDirection) -> Self {
        Self {
            property,
            direction,
        }
    }

    pub fn asc(property: P) -> Self {
        Self::new(property, SortDirection::Asc)
    }

    pub fn desc(property: P) -> Self {
        Self::new(property, SortDirection::Desc)
    }
}

pub fn compare_values(a: &SortValue, b: &SortValue, direction: SortDirection) -> Ordering {
    match (a, b) {
        (SortValue::Absent, SortValue::Absent) => Ordering::Equal,
        (SortValue::Absent, _) => Ordering::Greater,
        (_, SortValue::Absent) => Ordering::Less,
        _ => direction.apply(a.total_cmp(b)),
    }
}

pub fn compare_props<T, P>(a: &T, b: &T, property: &P, direction: SortDirection) -> Ordering
where
    P: SortProperty<T> + ?Sized,
{
    compare_values(&property.key(a), &property.key(b), direction)
}

/// Primary order first, tie-break order only on exact equality
pub fn compare<T, P, Q>(a: &T, b: &T, primary: &SortOrder<P>, tie_break: &SortOrder<Q>) -> Ordering
where
    P: SortProperty<T>,
    Q: SortProperty<T>,
{
    compare_props(a, b, &primary.property, primary.direction)
        .then_with(|| compare_props(a, b, &tie_break.property, tie_break.direction))
}

/// Stable sort of `rows` by `primary`, ties broken by `tie_break`
pub fn sort_rows<T, P, Q>(rows: &mut [T], primary: &SortOrder<P>, tie_break: &SortOrder<Q>)
where
    P: SortProperty<T>,
    Q: SortProperty<T>,
{
    rows.sort_by(|a, b| compare(a, b, primary, tie_break));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Row {
        name: &'static str,
        score: Option<i64>,
        serial: u32,
    }

    fn by_score(row: &Row) -> SortValue {
        row.score.into()
    }

    fn by_name(row: &Row) -> SortValue {
        row.name.into()
    }

    fn rows() -> Vec<Row> {
        vec![
            Row { name: "delta", score: Some(5), serial: 0 },
            Row { name: "alpha", score: None, serial: 1 },
            Row { name: "charlie", score: Some(5), serial: 2 },
            Row { name: "bravo", score: Some(9), serial: 3 },
            Row { name: "bravo", score: Some(5), serial: 4 },
        ]
    }

    #[test]
    fn test_absent_sorts_last_in_both_directions() {
        for direction in [SortDirection::Asc, SortDirection::Desc] {
            let mut data = rows();
            sort_rows(&mut data, &SortOrder::new(by_score, direction), &SortOrder::asc(by_name));
            assert_eq!(data.last().unwrap().name, "alpha");
        }
    }

    #[test]
    fn test_ties_follow_secondary_key() {
        let mut data = rows();
        sort_rows(&mut data, &SortOrder::desc(by_score), &SortOrder::asc(by_name));
        let names: Vec<_> = data.iter().map(|row| row.name).collect();
        assert_eq!(names, vec!["bravo", "bravo", "charlie", "delta", "alpha"]);
        assert_eq!(data[0].score, Some(9));
    }

    #[test]
    fn test_resorting_is_idempotent_and_stable() {
        let primary = SortOrder::desc(by_score);
        let secondary = SortOrder::asc(by_name);

        let mut once = rows();
        sort_rows(&mut once, &primary, &secondary);
        let mut twice = once.clone();
        sort_rows(&mut twice, &primary, &secondary);
        assert_eq!(once, twice);

        let mut equal = vec![
            Row { name: "x", score: Some(1), serial: 0 },
            Row { name: "x", score: Some(1), serial: 1 },
        ];
        sort_rows(&mut equal, &primary, &secondary);
        assert_eq!(equal[0].serial, 0);
        assert_eq!(equal[1].serial, 1);
    }

    #[test]
    fn test_tuple_ordering_is_lexicographic() {
        let a = SortValue::Tuple(vec![SortValue::Int(2), SortValue::Float(1.5)]);
        let b = SortValue::Tuple(vec![SortValue::Int(2), SortValue::Float(0.5)]);
        let c = SortValue::Tuple(vec![SortValue::Int(3)]);
        assert_eq!(a.total_cmp(&b), Ordering::Greater);
        assert_eq!(c.total_cmp(&a), Ordering::Greater);
        assert_eq!(compare_values(&a, &c, SortDirection::Desc), Ordering::Greater);
    }

    #[test]
    fn test_mixed_numbers_compare_exactly() {
        let big = 1i64 << 53;
        assert_eq!(SortValue::Int(big + 1).total_cmp(&SortValue::Float(big as f64)), Ordering::Greater);
        assert_eq!(SortValue::Float(big as f64).total_cmp(&SortValue::Int(big)), Ordering::Equal);
        assert_eq!(SortValue::Int(2).total_cmp(&SortValue::Float(2.5)), Ordering::Less);
        assert_eq!(SortValue::Int(-3).total_cmp(&SortValue::Float(-2.5)), Ordering::Less);
        assert_eq!(SortValue::Int(i64::MAX).total_cmp(&SortValue::Float(f64::INFINITY)), Ordering::Less);
        assert_eq!(SortValue::Int(0).total_cmp(&SortValue::Float(-0.0)), Ordering::Equal);
        assert_eq!(SortValue::Float(-0.0).total_cmp(&SortValue::Float(0.0)), Ordering::Equal);

        let mut values = vec![
            SortValue::Int(big + 1),
            SortValue::Float(big as f64),
            SortValue::Int(big),
            SortValue::Float(0.5),
            SortValue::Int(-1),
        ];
        values.sort_by(|a, b| a.total_cmp(b));
        assert_eq!(values[0], SortValue::Int(-1));
        assert_eq!(values[1], SortValue::Float(0.5));
        assert_eq!(values[4], SortValue::Int(big + 1));
    }
}
