use std::{ops::RangeInclusive, str::FromStr};

use crate::{
    error::{ReduceError, Result, TokenError},
    reduction::Reduction,
};

/// A [`Reduction`] decoding 1-based index tokens into a bit string.
/// Its [`Output`] is [`String`].
///
/// Every token is either a single index (`"7"`) or an inclusive range (`"1-3"`),
/// see [`RangeToken`]. The output has one character per index up to the largest index seen,
/// `'1'` where an index was mentioned and `'0'` elsewhere, index 1 first.
/// Mentioning an index twice changes nothing. No token at all gives an empty string.
///
/// It has no combiner, so it only runs sequentially.
///
/// The output is as long as the largest index, so indices above [`MAX_INDEX`] are rejected
/// with [`TokenError::TooLarge`].
///
/// # Examples
///
/// ```
/// use better_reduce::{prelude::*, BitString};
///
/// let decode = |list: &str| list.split(',').reduce_by(&BitString::new());
///
/// assert_eq!(decode("3").unwrap(), "001");
/// assert_eq!(decode("1,3,5").unwrap(), "10101");
/// assert_eq!(decode("1-3").unwrap(), "111");
/// assert_eq!(decode("7,1-3,5").unwrap(), "1110101");
///
/// assert!(decode("5-2").unwrap_err().is_parse());
/// ```
///
/// [`Output`]: Reduction::Output
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BitString;

impl BitString {
    /// Creates a new instance of this reduction.
    #[inline]
    pub const fn new() -> Self {
        Self
    }
}

impl<T> Reduction<T> for BitString
where
    T: AsRef<str>,
{
    /// `bits[i]` is set once index `i + 1` was seen. Never longer than the largest index.
    type Accumulator = Vec<bool>;

    type Output = String;

    #[inline]
    fn create_accumulator(&self) -> Vec<bool> {
        Vec::new()
    }

    fn accumulate(&self, bits: &mut Vec<bool>, token: T) -> Result<()> {
        let token: RangeToken = token.as_ref().parse()?;
        let indices = token.indices();
        if bits.len() < *indices.end() {
            bits.resize(*indices.end(), false);
        }
        // Indices are 1-based.
        bits[indices.start() - 1..*indices.end()].fill(true);
        Ok(())
    }

    fn finish(&self, bits: Vec<bool>) -> String {
        bits.into_iter()
            .map(|bit| if bit { '1' } else { '0' })
            .collect()
    }

    fn name(&self) -> &'static str {
        "BitString"
    }
}

/// The largest index a [`RangeToken`] may name.
pub const MAX_INDEX: usize = 1 << 24;

/// One token of a range list: a single index or an inclusive range of indices.
///
/// Indices start at 1 and end at [`MAX_INDEX`]. Whitespace around the token is ignored.
///
/// # Examples
///
/// ```
/// use better_reduce::RangeToken;
///
/// assert_eq!("9".parse(), Ok(RangeToken::Single(9)));
/// assert_eq!(" 14-17 ".parse(), Ok(RangeToken::Range { low: 14, high: 17 }));
/// assert!("0".parse::<RangeToken>().is_err());
/// assert!("1-2-3".parse::<RangeToken>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RangeToken {
    /// `n`, with `1 <= n <= MAX_INDEX`.
    Single(usize),
    /// `low-high`, with `1 <= low <= high <= MAX_INDEX`.
    Range { low: usize, high: usize },
}

impl RangeToken {
    /// The indices this token names, in ascending order.
    #[inline]
    pub fn indices(self) -> RangeInclusive<usize> {
        match self {
            Self::Single(index) => index..=index,
            Self::Range { low, high } => low..=high,
        }
    }
}

fn parse_index(bound: &str) -> Result<usize, TokenError> {
    if bound.is_empty() {
        return Err(TokenError::Malformed);
    }
    match bound.parse::<usize>()? {
        0 => Err(TokenError::ZeroIndex),
        index if index > MAX_INDEX => Err(TokenError::TooLarge {
            index,
            max: MAX_INDEX,
        }),
        index => Ok(index),
    }
}

fn parse_token(token: &str) -> Result<RangeToken, TokenError> {
    let Some((low, high)) = token.split_once('-') else {
        return parse_index(token).map(RangeToken::Single);
    };
    if high.contains('-') {
        return Err(TokenError::Malformed);
    }

    let (low, high) = (parse_index(low)?, parse_index(high)?);
    if low > high {
        return Err(TokenError::Descending { low, high });
    }

    Ok(RangeToken::Range { low, high })
}

impl FromStr for RangeToken {
    type Err = ReduceError;

    fn from_str(token: &str) -> Result<Self> {
        parse_token(token.trim()).map_err(|reason| ReduceError::parse(token, reason))
    }
}
