//! Counting-loop and slice bounds.

/// `start`, `stop`, `step` of a `range(...)` call or a slice, as rendered text.
///
/// Unset parts stay `None` until a backend that renders a native counting
/// loop asks for defaults with [`fill_defaults`](Self::fill_defaults).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RangeDescriptor {
    pub start: Option<String>,
    pub stop: Option<String>,
    pub step: Option<String>,
}

impl RangeDescriptor {
    /// Bounds from the rendered arguments of `range(...)`; 1 to 3 arguments.
    pub fn from_args(args: &[String]) -> Option<Self> {
        match args {
            [stop] => Some(Self {
                start: None,
                stop: Some(stop.clone()),
                step: None,
            }),
            [start, stop] => Some(Self {
                start: Some(start.clone()),
                stop: Some(stop.clone()),
                step: None,
            }),
            [start, stop, step] => Some(Self {
                start: Some(start.clone()),
                stop: Some(stop.clone()),
                step: Some(step.clone()),
            }),
            _ => None,
        }
    }

    /// Fill in the implicit start of 0 and, when `step` is set, the implicit
    /// step of 1, spelled with the backend's integer literal.
    pub fn fill_defaults(&mut self, literal: impl Fn(i64) -> String, step: bool) {
        if self.start.is_none() {
            self.start = Some(literal(0));
        }
        if step && self.step.is_none() {
            self.step = Some(literal(1));
        }
    }
}

/// What a `for` loop iterates over.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoopIter {
    /// `range(...)`, with the backend's rendering of the whole call.
    Range { range: RangeDescriptor, call: String },
    /// Any other iterable.
    Items(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    fn resolved(values: &[&str]) -> (String, String, String) {
        let mut range = RangeDescriptor::from_args(&args(values)).unwrap();
        range.fill_defaults(|n| n.to_string(), true);
        (
            range.start.unwrap(),
            range.stop.unwrap(),
            range.step.unwrap(),
        )
    }

    #[test]
    fn test_range_resolution() {
        assert_eq!(resolved(&["5"]), ("0".into(), "5".into(), "1".into()));
        assert_eq!(resolved(&["2", "5"]), ("2".into(), "5".into(), "1".into()));
        assert_eq!(
            resolved(&["0", "10", "2"]),
            ("0".into(), "10".into(), "2".into())
        );
    }

    #[test]
    fn test_defaults_are_lazy() {
        let mut range = RangeDescriptor::from_args(&args(&["5"])).unwrap();
        assert_eq!(range.start, None);
        range.fill_defaults(|n| n.to_string(), false);
        assert_eq!(range.start.as_deref(), Some("0"));
        assert_eq!(range.step, None);
    }

    #[test]
    fn test_arity() {
        assert!(RangeDescriptor::from_args(&[]).is_none());
        assert!(RangeDescriptor::from_args(&args(&["1", "2", "3", "4"])).is_none());
    }
}
