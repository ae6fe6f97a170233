//! Assertions over eventual values.
//!
//! `expect(picker.is_enabled()).to_eventually_equal(true).await?` awaits the
//! query and compares the resolved value. A query failure propagates as-is;
//! a resolved mismatch becomes [`ExerciseError::AssertionMismatch`]. There is
//! no polling: one read, one verdict.

use crate::result::{ExerciseError, ExerciseResult};
use std::fmt::Debug;
use std::future::Future;

/// Assertion builder wrapping an eventual value
#[derive(Debug)]
#[must_use = "an expectation does nothing until one of its assertions is awaited"]
pub struct Eventually<F> {
    eventual: F,
}

/// Create an expectation for an eventual value
pub fn expect<F, T>(eventual: F) -> Eventually<F>
where
    F: Future<Output = ExerciseResult<T>>,
{
    Eventually { eventual }
}

impl<F, T> Eventually<F>
where
    F: Future<Output = ExerciseResult<T>>,
{
    /// Resolve and compare for equality
    pub async fn to_eventually_equal<E>(self, expected: E) -> ExerciseResult<()>
    where
        T: PartialEq<E> + Debug,
        E: Debug,
    {
        let actual = self.eventual.await?;
        if actual == expected {
            Ok(())
        } else {
            Err(ExerciseError::AssertionMismatch {
                expected: format!("{expected:?}"),
                actual: format!("{actual:?}"),
            })
        }
    }

    /// Resolve and check with a predicate, describing the expectation on failure
    pub async fn to_eventually_satisfy<P>(self, description: &str, predicate: P) -> ExerciseResult<()>
    where
        T: Debug,
        P: FnOnce(&T) -> bool,
    {
        let actual = self.eventual.await?;
        if predicate(&actual) {
            Ok(())
        } else {
            Err(ExerciseError::AssertionMismatch {
                expected: description.to_string(),
                actual: format!("{actual:?}"),
            })
        }
    }
}

impl<F> Eventually<F>
where
    F: Future<Output = ExerciseResult<bool>>,
{
    /// Resolve and require `true`
    pub async fn to_eventually_be_true(self) -> ExerciseResult<()> {
        self.to_eventually_equal(true).await
    }

    /// Resolve and require `false`
    pub async fn to_eventually_be_false(self) -> ExerciseResult<()> {
        self.to_eventually_equal(false).await
    }
}
