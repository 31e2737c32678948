//! Resource construction and destruction

use crate::errors::BoxError;

/// Creates and destroys the resources a pool manages.
///
/// The pool never invents resources on its own; every resource it tracks came
/// from [`create`](Self::create) and leaves through [`destroy`](Self::destroy).
/// Calls are serialized by the pool's lock, so implementations do not need to
/// be reentrant.
pub trait ResourceFactory<T>: Send + Sync {
    /// Build a new resource
    fn create(&self) -> T;

    /// Tear a resource down for good
    fn destroy(&self, resource: T) -> Result<(), BoxError>;

    /// Put a returned resource's transient state back to its canonical default
    ///
    /// Runs before the resource's own lifecycle hooks.
    fn recycle(&self, _resource: &mut T) {}
}

/// Factory built from closures
///
/// # Examples
///
/// ```
/// use elastic_pool::{FnFactory, ResourceFactory};
///
/// let factory = FnFactory::new(|| String::with_capacity(64), |s: String| {
///     drop(s);
///     Ok(())
/// });
///
/// let s = factory.create();
/// assert!(s.capacity() >= 64);
/// assert!(factory.destroy(s).is_ok());
/// ```
pub struct FnFactory<C, D> {
    create: C,
    destroy: D,
}

impl<C, D> FnFactory<C, D> {
    pub fn new<T>(create: C, destroy: D) -> Self
    where
        C: Fn() -> T + Send + Sync,
        D: Fn(T) -> Result<(), BoxError> + Send + Sync,
    {
        Self { create, destroy }
    }
}

impl<T, C, D> ResourceFactory<T> for FnFactory<C, D>
where
    C: Fn() -> T + Send + Sync,
    D: Fn(T) -> Result<(), BoxError> + Send + Sync,
{
    fn create(&self) -> T {
        (self.create)()
    }

    fn destroy(&self, resource: T) -> Result<(), BoxError> {
        (self.destroy)(resource)
    }
}

/// Factory whose destroyer simply drops the resource
pub fn factory_fn<T, C>(create: C) -> impl ResourceFactory<T>
where
    C: Fn() -> T + Send + Sync,
{
    FnFactory::new(create, |resource: T| {
        drop(resource);
        Ok(())
    })
}
