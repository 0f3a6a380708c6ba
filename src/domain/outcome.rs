// src/domain/outcome.rs

/// What an adapter hands back: either a real answer, or the fallback it
/// substituted and why.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    Success(T),
    Degraded { fallback: T, reason: String },
}

impl<T> Outcome<T> {
    pub fn degraded(fallback: T, reason: impl Into<String>) -> Self {
        Outcome::Degraded {
            fallback,
            reason: reason.into(),
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, Outcome::Degraded { .. })
    }

    pub fn into_value(self) -> T {
        match self {
            Outcome::Success(v) => v,
            Outcome::Degraded { fallback, .. } => fallback,
        }
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Outcome<U> {
        match self {
            Outcome::Success(v) => Outcome::Success(f(v)),
            Outcome::Degraded { fallback, reason } => Outcome::Degraded {
                fallback: f(fallback),
                reason,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn degraded_keeps_reason_through_map() {
        let o: Outcome<Option<i32>> = Outcome::degraded(None, "timeout");
        let mapped = o.map(|v| v.unwrap_or(7));
        assert_eq!(
            mapped,
            Outcome::Degraded {
                fallback: 7,
                reason: "timeout".into()
            }
        );
    }

    #[test]
    fn success_is_not_degraded() {
        let o = Outcome::Success(1);
        assert!(!o.is_degraded());
        assert_eq!(o.into_value(), 1);
    }
}
