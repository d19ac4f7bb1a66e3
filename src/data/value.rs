/// Cell values of a provider table
#[derive(Debug, Clone)]
pub enum Value {
    Null,
    Int64(i64),
    Float64(f64),
    String(String),
}

impl Value {
    /// Infer the type of a raw CSV cell
    pub fn parse_cell(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Value::Null;
        }
        if let Ok(i) = trimmed.parse::<i64>() {
            return Value::Int64(i);
        }
        if let Ok(f) = trimmed.parse::<f64>() {
            return Value::Float64(f);
        }
        Value::String(raw.to_string())
    }

    /// Coerce to a float for threshold comparison.
    ///
    /// `Null` becomes NaN so it never satisfies an ordering. Returns `None`
    /// when a string cell does not hold a number.
    pub fn to_f64(&self) -> Option<f64> {
        match self {
            Value::Null => Some(f64::NAN),
            Value::Int64(v) => Some(*v as f64),
            Value::Float64(v) => Some(*v),
            Value::String(s) => s.trim().parse::<f64>().ok(),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Int64(a), Value::Int64(b)) => a == b,
            (Value::Float64(a), Value::Float64(b)) => a.to_bits() == b.to_bits(),
            (Value::String(a), Value::String(b)) => a == b,
            // Cross-type numeric comparisons
            (Value::Int64(a), Value::Float64(b)) => (*a as f64).to_bits() == b.to_bits(),
            (Value::Float64(a), Value::Int64(b)) => a.to_bits() == (*b as f64).to_bits(),
            _ => false,
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

/// Renders the cell the way it is written to CSV. Nulls are empty and
/// floats always carry a decimal point.
impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Int64(i) => write!(f, "{}", i),
            Value::Float64(v) => write!(f, "{:?}", v),
            Value::String(s) => write!(f, "{}", s),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_cell_inference() {
        assert_eq!(Value::parse_cell(""), Value::Null);
        assert_eq!(Value::parse_cell("  "), Value::Null);
        assert_eq!(Value::parse_cell("42"), Value::Int64(42));
        assert_eq!(Value::parse_cell("10.2"), Value::Float64(10.2));
        assert_eq!(Value::parse_cell("-0.5"), Value::Float64(-0.5));
        assert_eq!(
            Value::parse_cell("Haute-Garonne"),
            Value::String("Haute-Garonne".to_string())
        );
    }

    #[test]
    fn test_to_f64() {
        assert_eq!(Value::Int64(3).to_f64(), Some(3.0));
        assert_eq!(Value::Float64(0.25).to_f64(), Some(0.25));
        assert_eq!(Value::from(" 7.5 ").to_f64(), Some(7.5));
        assert_eq!(Value::from("n/a").to_f64(), None);
        assert!(Value::Null.to_f64().unwrap().is_nan());
    }

    #[test]
    fn test_display_keeps_decimal_point() {
        assert_eq!(Value::Float64(5.0).to_string(), "5.0");
        assert_eq!(Value::Float64(10.2).to_string(), "10.2");
        assert_eq!(Value::Int64(5).to_string(), "5");
        assert_eq!(Value::Null.to_string(), "");
    }
}
