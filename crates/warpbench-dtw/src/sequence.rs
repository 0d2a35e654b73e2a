//! Input sequences.

use crate::error::DtwError;

/// An immutable, non-empty run of finite samples.
///
/// Construction is the only validation point; the engine trusts every
/// [`SequenceView`] it is handed.
#[derive(Debug, Clone, PartialEq)]
pub struct Sequence {
    samples: Box<[f64]>,
}

impl Sequence {
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`DtwError::EmptySequence`] | `samples` is empty |
    /// | [`DtwError::NonFiniteValue`] | a sample is NaN or infinite |
    pub fn new(samples: Vec<f64>) -> Result<Self, DtwError> {
        if samples.is_empty() {
            return Err(DtwError::EmptySequence);
        }
        match samples.iter().position(|v| !v.is_finite()) {
            Some(index) => Err(DtwError::NonFiniteValue { index }),
            None => Ok(Self {
                samples: samples.into_boxed_slice(),
            }),
        }
    }

    #[must_use]
    pub fn as_view(&self) -> SequenceView<'_> {
        SequenceView {
            samples: &self.samples,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Never true for a constructed sequence.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

impl AsRef<[f64]> for Sequence {
    fn as_ref(&self) -> &[f64] {
        &self.samples
    }
}

/// Borrowed handle on a [`Sequence`], passed by value through the engine.
///
/// Only obtainable from a `Sequence`, so it carries the same guarantees.
#[derive(Debug, Clone, Copy)]
pub struct SequenceView<'a> {
    samples: &'a [f64],
}

impl<'a> SequenceView<'a> {
    #[must_use]
    pub fn as_slice(&self) -> &'a [f64] {
        self.samples
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Never true for a view of a constructed sequence.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

impl<'a> From<&'a Sequence> for SequenceView<'a> {
    fn from(seq: &'a Sequence) -> Self {
        seq.as_view()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_is_rejected() {
        assert_eq!(Sequence::new(vec![]), Err(DtwError::EmptySequence));
    }

    #[test]
    fn first_non_finite_index_is_reported() {
        assert_eq!(
            Sequence::new(vec![1.0, f64::NAN, f64::INFINITY]),
            Err(DtwError::NonFiniteValue { index: 1 })
        );
        assert_eq!(
            Sequence::new(vec![f64::NEG_INFINITY]),
            Err(DtwError::NonFiniteValue { index: 0 })
        );
    }

    #[test]
    fn extreme_finite_values_are_accepted() {
        let seq = Sequence::new(vec![f64::MAX, f64::MIN, f64::MIN_POSITIVE]).unwrap();
        assert_eq!(seq.len(), 3);
    }

    #[test]
    fn view_shares_the_samples() {
        let seq = Sequence::new(vec![10.0, 20.0, 30.0]).unwrap();
        let view = SequenceView::from(&seq);
        assert_eq!(view.len(), 3);
        assert!(!view.is_empty());
        assert_eq!(view.as_slice(), seq.as_ref());
        assert!(std::ptr::eq(view.as_slice(), seq.as_ref()));
    }
}
