//! Lifecycle callbacks for pooled resources

/// Hooks the pool invokes as a resource moves between idle and active.
///
/// Every method defaults to a no-op, so a type with no per-checkout state
/// opts in with an empty impl. The pool requires this trait on every
/// resource type; a type from another crate (a `TcpStream`, a driver
/// connection) has to be wrapped in a local newtype to get that impl.
///
/// On release the pool calls [`on_release`](Self::on_release) first and
/// [`reset_state`](Self::reset_state) last.
///
/// # Examples
///
/// ```
/// use elastic_pool::LifecycleHooks;
///
/// struct Buffer {
///     bytes: Vec<u8>,
/// }
///
/// impl LifecycleHooks for Buffer {
///     fn reset_state(&mut self) {
///         self.bytes.clear();
///     }
/// }
/// ```
pub trait LifecycleHooks {
    /// Called after the resource became active, before it is handed out
    fn on_acquire(&mut self) {}

    /// Called when the resource is being returned
    fn on_release(&mut self) {}

    /// Restore the resource to a blank, reusable condition
    fn reset_state(&mut self) {}
}

macro_rules! no_hooks {
    ($($ty:ty),* $(,)?) => {
        $(impl LifecycleHooks for $ty {})*
    };
}

no_hooks!(u8, u16, u32, u64, usize, i8, i16, i32, i64, isize, bool, char, String);

impl<T> LifecycleHooks for Vec<T> {
    fn reset_state(&mut self) {
        self.clear();
    }
}
