//! Shared, identity-comparable callbacks.
//!
//! Configuration is compared for equality so hosts can skip redundant
//! reconfiguration. Closures cannot be compared structurally, so the handles
//! here compare by identity (`Arc::ptr_eq`) instead.

use std::{fmt, sync::Arc};

/// Comparable handle around any shared callable trait object.
pub struct Slot<F: ?Sized> {
    inner: Arc<F>,
}

impl<F: ?Sized> Slot<F> {
    /// Creates a slot from a shared callable.
    pub fn from_shared(handler: Arc<F>) -> Self {
        Self { inner: handler }
    }

    /// Borrows the callable.
    pub fn get(&self) -> &F {
        &self.inner
    }
}

impl<F: ?Sized> Clone for Slot<F> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<F: ?Sized> PartialEq for Slot<F> {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl<F: ?Sized> Eq for Slot<F> {}

/// Comparable callback handle for `Fn(T) -> R`.
pub struct CallbackWith<T, R = ()> {
    slot: Slot<dyn Fn(T) -> R + Send + Sync>,
}

impl<T, R> CallbackWith<T, R> {
    /// Wraps a closure.
    pub fn new<F>(handler: F) -> Self
    where
        F: Fn(T) -> R + Send + Sync + 'static,
    {
        Self {
            slot: Slot::from_shared(Arc::new(handler)),
        }
    }

    /// Invokes the callback.
    pub fn call(&self, value: T) -> R {
        (self.slot.get())(value)
    }
}

impl<T, R> Clone for CallbackWith<T, R> {
    fn clone(&self) -> Self {
        Self {
            slot: self.slot.clone(),
        }
    }
}

impl<T, R> PartialEq for CallbackWith<T, R> {
    fn eq(&self, other: &Self) -> bool {
        self.slot == other.slot
    }
}

impl<T, R> Eq for CallbackWith<T, R> {}

impl<T, R> fmt::Debug for CallbackWith<T, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallbackWith").finish_non_exhaustive()
    }
}

impl<T, R, F> From<F> for CallbackWith<T, R>
where
    F: Fn(T) -> R + Send + Sync + 'static,
{
    fn from(handler: F) -> Self {
        Self::new(handler)
    }
}

/// Turns a label value and the configured suffix into display text.
///
/// Stored in [`crate::config::SliderConfig`] and swappable at any time.
/// [`LabelFormatter::default`] truncates to one decimal digit.
///
/// ```
/// use twinslide::callback::LabelFormatter;
///
/// let percent = LabelFormatter::new(|value, suffix| format!("{value:.0}{suffix}"));
/// assert_eq!(percent.format(42.6, "%"), "43%");
/// assert_eq!(LabelFormatter::default().format(42.68, "%"), "42.6%");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct LabelFormatter {
    slot: Slot<dyn Fn(f64, &str) -> String + Send + Sync>,
}

impl LabelFormatter {
    /// Wraps a formatting closure.
    pub fn new<F>(format: F) -> Self
    where
        F: Fn(f64, &str) -> String + Send + Sync + 'static,
    {
        Self {
            slot: Slot::from_shared(Arc::new(format)),
        }
    }

    /// Formats `value` with `suffix`.
    pub fn format(&self, value: f64, suffix: &str) -> String {
        (self.slot.get())(value, suffix)
    }
}

impl Default for LabelFormatter {
    fn default() -> Self {
        Self::new(truncate_one_decimal)
    }
}

impl fmt::Debug for LabelFormatter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LabelFormatter").finish_non_exhaustive()
    }
}

/// The default label text: the value truncated toward zero to one decimal
/// digit, always printed with a fractional part, followed by `suffix`.
pub fn truncate_one_decimal(value: f64, suffix: &str) -> String {
    let truncated = (value * 10.0).trunc() / 10.0;
    // Avoid printing "-0.0" for small negative values.
    let truncated = if truncated == 0.0 { 0.0 } else { truncated };
    format!("{truncated:?}{suffix}")
}
