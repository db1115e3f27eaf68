/// Pins a new [`Holder`](crate::Holder) on the stack.
///
/// Expands to a `let` statement, so the binding lives in the caller's scope and
/// the holder is dropped (invalidating its watchers) when that scope ends.
///
/// # Example
///
/// ```rust
/// use stackref::holder;
///
/// holder!(value = 54325);
/// assert_eq!(*value.borrow(), 54325);
/// ```
#[macro_export]
macro_rules! holder {
    ($name:ident = $value:expr) => {
        #[allow(unused_mut)]
        let mut $name = ::core::pin::pin!($crate::Holder::new($value));
    };
}

/// Pins a new [`Watcher`](crate::Watcher) on the stack, optionally binding it.
///
/// ```rust
/// use stackref::{holder, watch};
///
/// holder!(a = 7);
/// watch!(b => a.as_ref());
/// watch!(c: i32);
///
/// assert!(b.is_valid());
/// assert!(!c.is_valid());
/// ```
///
/// # Panics
/// The binding form panics if the holder has exhausted its registration keys.
#[macro_export]
macro_rules! watch {
    ($name:ident) => {
        #[allow(unused_mut)]
        let mut $name = ::core::pin::pin!($crate::Watcher::new());
    };
    ($name:ident : $ty:ty) => {
        #[allow(unused_mut)]
        let mut $name = ::core::pin::pin!($crate::Watcher::<$ty>::new());
    };
    ($name:ident => $holder:expr) => {
        let mut $name = ::core::pin::pin!($crate::Watcher::new());
        $name.as_mut().bind($holder);
    };
}
