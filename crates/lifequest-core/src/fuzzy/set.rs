//! Fuzzy sets and membership functions.

use indexmap::IndexMap;
use serde::Serialize;

use crate::error::KnowledgeBaseError;

/// Membership function shape.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum FuzzyShape {
    /// Rises from `a` to the apex `b`, falls to `c`.
    Triangle { a: f64, b: f64, c: f64 },
    /// Rises from `a` to `b`, flat at 1 until `c`, falls to `d`.
    Trapezoid { a: f64, b: f64, c: f64, d: f64 },
}

impl FuzzyShape {
    /// Degree of membership of `x`, in `[0, 1]`.
    pub fn membership(&self, x: f64) -> f64 {
        match *self {
            FuzzyShape::Triangle { a, b, c } => {
                if x < a || x > c {
                    0.0
                } else if x == b {
                    1.0
                } else if x < b {
                    // x in [a, b) implies b > a
                    (x - a) / (b - a)
                } else {
                    (c - x) / (c - b)
                }
            }
            FuzzyShape::Trapezoid { a, b, c, d } => {
                if x < a || x > d {
                    0.0
                } else if x >= b && x <= c {
                    1.0
                } else if x < b {
                    if b == a {
                        1.0
                    } else {
                        (x - a) / (b - a)
                    }
                } else if d == c {
                    1.0
                } else {
                    (d - x) / (d - c)
                }
            }
        }
    }

    /// Representative point used by centroid defuzzification.
    pub fn center(&self) -> f64 {
        match *self {
            FuzzyShape::Triangle { b, .. } => b,
            FuzzyShape::Trapezoid { b, c, .. } => (b + c) / 2.0,
        }
    }

    /// Build a shape from 3 (triangle) or 4 (trapezoid) ordered parameters.
    pub fn from_params(params: &[f64]) -> Result<Self, String> {
        if params.iter().any(|p| !p.is_finite()) {
            return Err("parameters must be finite numbers".to_string());
        }
        if params.windows(2).any(|w| w[0] > w[1]) {
            return Err(format!("parameters must be non-decreasing, got {params:?}"));
        }
        match params {
            &[a, b, c] => Ok(FuzzyShape::Triangle { a, b, c }),
            &[a, b, c, d] => Ok(FuzzyShape::Trapezoid { a, b, c, d }),
            _ => Err(format!("expected 3 or 4 parameters, got {}", params.len())),
        }
    }

    pub fn params(&self) -> Vec<f64> {
        match *self {
            FuzzyShape::Triangle { a, b, c } => vec![a, b, c],
            FuzzyShape::Trapezoid { a, b, c, d } => vec![a, b, c, d],
        }
    }
}

/// Named linguistic term of a variable.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FuzzySet {
    pub name: String,
    pub shape: FuzzyShape,
}

impl FuzzySet {
    pub fn new(name: impl Into<String>, shape: FuzzyShape) -> Self {
        Self {
            name: name.into(),
            shape,
        }
    }

    pub fn membership(&self, x: f64) -> f64 {
        self.shape.membership(x)
    }

    pub fn center(&self) -> f64 {
        self.shape.center()
    }
}

/// Linguistic variable: named sets in declaration order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FuzzyVariable {
    pub name: String,
    pub sets: IndexMap<String, FuzzySet>,
}

impl FuzzyVariable {
    /// Validate raw parameter lists into a variable.
    pub fn from_params(
        name: &str,
        sets: &IndexMap<String, Vec<f64>>,
    ) -> Result<Self, KnowledgeBaseError> {
        let mut compiled = IndexMap::with_capacity(sets.len());
        for (set_name, params) in sets {
            let shape = FuzzyShape::from_params(params).map_err(|message| {
                KnowledgeBaseError::InvalidSetShape {
                    variable: name.to_string(),
                    set: set_name.clone(),
                    message,
                }
            })?;
            compiled.insert(set_name.clone(), FuzzySet::new(set_name.clone(), shape));
        }
        Ok(Self {
            name: name.to_string(),
            sets: compiled,
        })
    }

    pub fn set(&self, name: &str) -> Option<&FuzzySet> {
        self.sets.get(name)
    }

    /// Degrees for every set the value belongs to, rounded to 4 places.
    ///
    /// Sets with zero membership are left out.
    pub fn fuzzify(&self, x: f64) -> IndexMap<String, f64> {
        self.sets
            .values()
            .filter_map(|set| {
                let degree = set.membership(x);
                (degree > 0.0).then(|| (set.name.clone(), round4(degree)))
            })
            .collect()
    }
}

fn round4(x: f64) -> f64 {
    (x * 10_000.0).round() / 10_000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tri(a: f64, b: f64, c: f64) -> FuzzyShape {
        FuzzyShape::Triangle { a, b, c }
    }

    fn trap(a: f64, b: f64, c: f64, d: f64) -> FuzzyShape {
        FuzzyShape::Trapezoid { a, b, c, d }
    }

    #[test]
    fn test_triangle_apex_is_exactly_one() {
        assert_eq!(tri(5.0, 7.5, 10.0).membership(7.5), 1.0);
    }

    #[test]
    fn test_triangle_slopes() {
        let shape = tri(0.0, 4.0, 8.0);
        assert_eq!(shape.membership(2.0), 0.5);
        assert_eq!(shape.membership(6.0), 0.5);
        assert_eq!(shape.membership(0.0), 0.0);
        assert_eq!(shape.membership(8.0), 0.0);
        assert_eq!(shape.membership(-1.0), 0.0);
        assert_eq!(shape.membership(9.0), 0.0);
    }

    #[test]
    fn test_degenerate_triangle_is_a_step() {
        // left shoulder: a == b
        let shape = tri(0.0, 0.0, 4.0);
        assert_eq!(shape.membership(0.0), 1.0);
        assert_eq!(shape.membership(2.0), 0.5);
        // right shoulder: b == c
        let shape = tri(6.0, 10.0, 10.0);
        assert_eq!(shape.membership(10.0), 1.0);
        assert_eq!(shape.membership(8.0), 0.5);
    }

    #[test]
    fn test_trapezoid_flat_top() {
        let shape = trap(4.0, 6.0, 8.0, 10.0);
        for x in [6.0, 6.5, 7.0, 8.0] {
            assert_eq!(shape.membership(x), 1.0);
        }
        assert_eq!(shape.membership(5.0), 0.5);
        assert_eq!(shape.membership(9.0), 0.5);
        assert_eq!(shape.membership(3.9), 0.0);
        assert_eq!(shape.membership(10.1), 0.0);
    }

    #[test]
    fn test_trapezoid_vertical_edges() {
        let shape = trap(7.0, 7.0, 10.0, 10.0);
        assert_eq!(shape.membership(7.0), 1.0);
        assert_eq!(shape.membership(10.0), 1.0);
        assert_eq!(shape.membership(6.99), 0.0);
    }

    #[test]
    fn test_centers() {
        assert_eq!(tri(80.0, 90.0, 100.0).center(), 90.0);
        assert_eq!(trap(0.0, 10.0, 30.0, 40.0).center(), 20.0);
    }

    #[test]
    fn test_from_params_validation() {
        assert!(FuzzyShape::from_params(&[0.0, 5.0, 10.0]).is_ok());
        assert!(matches!(
            FuzzyShape::from_params(&[0.0, 5.0, 10.0, 12.0]),
            Ok(FuzzyShape::Trapezoid { .. })
        ));
        assert!(FuzzyShape::from_params(&[0.0, 5.0]).is_err());
        assert!(FuzzyShape::from_params(&[5.0, 0.0, 10.0]).is_err());
        assert!(FuzzyShape::from_params(&[0.0, f64::NAN, 10.0]).is_err());
    }

    #[test]
    fn test_fuzzify_excludes_sets_outside_support() {
        let mut raw = IndexMap::new();
        raw.insert("low".to_string(), vec![0.0, 0.0, 4.0]);
        raw.insert("medium".to_string(), vec![3.0, 5.0, 7.0]);
        raw.insert("high".to_string(), vec![6.0, 10.0, 10.0]);
        let stress = FuzzyVariable::from_params("stress", &raw).unwrap();

        let degrees = stress.fuzzify(9.0);
        assert_eq!(degrees.len(), 1);
        assert_eq!(degrees["high"], 0.75);
        assert!(!degrees.contains_key("low"));

        let degrees = stress.fuzzify(6.5);
        assert_eq!(degrees["medium"], 0.25);
        assert_eq!(degrees["high"], 0.125);
    }

    #[test]
    fn test_fuzzify_rounds_to_four_places() {
        let mut raw = IndexMap::new();
        raw.insert("mid".to_string(), vec![0.0, 3.0, 6.0]);
        let var = FuzzyVariable::from_params("v", &raw).unwrap();
        assert_eq!(var.fuzzify(1.0)["mid"], 0.3333);
    }

    #[test]
    fn test_invalid_set_names_variable_and_set() {
        let mut raw = IndexMap::new();
        raw.insert("broken".to_string(), vec![3.0, 1.0, 2.0]);
        let err = FuzzyVariable::from_params("stress", &raw).unwrap_err();
        match err {
            KnowledgeBaseError::InvalidSetShape { variable, set, .. } => {
                assert_eq!(variable, "stress");
                assert_eq!(set, "broken");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
