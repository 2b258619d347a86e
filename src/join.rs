use std::borrow::Cow;

use crate::{error::Result, reduction::Reduction};

/// A [`Reduction`] joining strings with a delimiter, in input order.
/// Its [`Output`] is [`String`].
///
/// It has no combiner, so it only runs sequentially.
///
/// # Examples
///
/// ```
/// use better_reduce::{prelude::*, Joining};
///
/// let names = ["Joe", "Steven", "Patrick"];
///
/// assert_eq!(names.reduce_by(&Joining::default()).unwrap(), "Joe,Steven,Patrick");
/// assert_eq!(names.reduce_by(&Joining::new(" | ")).unwrap(), "Joe | Steven | Patrick");
/// ```
///
/// [`Output`]: Reduction::Output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Joining {
    delimiter: Cow<'static, str>,
}

/// The accumulator of [`Joining`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Joiner {
    buf: String,
    len: usize,
}

impl Joining {
    /// Creates a new instance of this reduction with the given delimiter.
    #[inline]
    pub fn new(delimiter: impl Into<Cow<'static, str>>) -> Self {
        Self {
            delimiter: delimiter.into(),
        }
    }

    /// The delimiter put between two elements.
    #[inline]
    pub fn delimiter(&self) -> &str {
        &self.delimiter
    }
}

/// Comma-separated.
impl Default for Joining {
    #[inline]
    fn default() -> Self {
        Self::new(",")
    }
}

impl Joiner {
    /// Number of elements joined so far.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if nothing was joined yet.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The joined string so far.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.buf
    }

    fn push(&mut self, delimiter: &str, element: &str) {
        if self.len > 0 {
            self.buf.push_str(delimiter);
        }
        self.buf.push_str(element);
        self.len += 1;
    }
}

impl<T> Reduction<T> for Joining
where
    T: AsRef<str>,
{
    type Accumulator = Joiner;

    type Output = String;

    #[inline]
    fn create_accumulator(&self) -> Joiner {
        Joiner::default()
    }

    #[inline]
    fn accumulate(&self, joiner: &mut Joiner, element: T) -> Result<()> {
        joiner.push(&self.delimiter, element.as_ref());
        Ok(())
    }

    #[inline]
    fn finish(&self, joiner: Joiner) -> String {
        joiner.buf
    }

    fn name(&self) -> &'static str {
        "Joining"
    }
}

#[cfg(test)]
mod tests {
    use proptest::collection::vec as propvec;
    use proptest::prelude::*;

    use crate::{
        error::{ConfigError, ReduceError},
        exec::{Execution, ReduceExt, reduce},
        test_utils::store,
    };

    use super::*;

    #[test]
    fn customer_names() {
        let names = store::customers().into_iter().map(|customer| customer.name);
        assert_eq!(
            names.reduce_by(&Joining::default()).unwrap(),
            "Joe,Steven,Patrick,Diana,Chris,Kathy,Alice,Andrew,Martin,Amy"
        );
    }

    #[test]
    fn empty_elements_still_delimited() {
        let joining = Joining::default();
        assert_eq!(["", "a", ""].reduce_by(&joining).unwrap(), ",a,");
        assert_eq!([""].reduce_by(&joining).unwrap(), "");
        assert_eq!(Vec::<&str>::new().reduce_by(&joining).unwrap(), "");

        let mut joiner = Reduction::<&str>::create_accumulator(&joining);
        assert!(joiner.is_empty());
        joining.accumulate(&mut joiner, "").unwrap();
        assert_eq!(joiner.len(), 1);
        assert_eq!(joiner.as_str(), "");
    }

    #[test]
    fn refuses_parallel() {
        let names = ["Joe", "Steven"];
        for execution in [Execution::parallel(), Execution::concurrent()] {
            assert_eq!(
                reduce(names, &Joining::default(), execution).unwrap_err(),
                ReduceError::Configuration {
                    reduction: "Joining",
                    reason: ConfigError::MissingCombiner,
                }
            );
        }
    }

    proptest! {
        #[test]
        fn same_as_slice_join(
            strings in propvec(".{0,5}", ..=10),
            delimiter in prop_oneof![Just(","), Just(""), Just(", "), Just("--")],
        ) {
            let joined = strings.iter().reduce_by(&Joining::new(delimiter)).unwrap();
            prop_assert_eq!(joined, strings.join(delimiter));
        }
    }
}
