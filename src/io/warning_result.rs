/// A value read from an input, together with the warnings raised while reading it.
///
/// Contrary to a `Result`, there is always a value; warnings do not prevent it from being used.
#[derive(Debug, PartialEq, Eq)]
pub enum WarningResult<T, W> {
    Ok(T),
    Warned(T, Vec<W>),
}

impl<T, W> WarningResult<T, W> {
    /// Adds a warning to this result.
    pub fn with_warning(self, warning: W) -> Self {
        match self {
            WarningResult::Ok(t) => WarningResult::Warned(t, vec![warning]),
            WarningResult::Warned(t, mut warnings) => {
                warnings.push(warning);
                WarningResult::Warned(t, warnings)
            }
        }
    }

    /// Returns the value, passing the warnings (if any) to the provided callback.
    pub fn consume_warnings<F>(self, f: F) -> T
    where
        F: FnOnce(Vec<W>),
    {
        match self {
            WarningResult::Ok(t) => t,
            WarningResult::Warned(t, warnings) => {
                f(warnings);
                t
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_consume_ok() {
        let mut consumed = false;
        let r: WarningResult<i32, String> = WarningResult::Ok(1);
        assert_eq!(1, r.consume_warnings(|_| consumed = true));
        assert!(!consumed);
    }

    #[test]
    fn test_with_warning() {
        let r: WarningResult<i32, &str> = WarningResult::Ok(1);
        let r = r.with_warning("w1").with_warning("w2");
        assert_eq!(WarningResult::Warned(1, vec!["w1", "w2"]), r);
    }
}
