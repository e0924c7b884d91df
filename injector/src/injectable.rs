//! The marker capability every bindable type carries.

use crate::reflector::{self, Fields, TypeInfo};
use std::any::Any;
use std::sync::Arc;

/// Marks a type as eligible for binding and injection.
///
/// For binding purposes the trait is only a tag. Types that have dependencies
/// of their own override [`Injectable::describe`] to declare their
/// [`Inject`](crate::Inject) fields and, optionally, a post-construct hook.
/// The declaration runs once per type and is cached by the
/// [`reflector`](crate::reflector).
///
/// The trait is object safe, so an abstraction can be bound and injected as a
/// trait object by making `Injectable` one of its supertraits:
///
/// ```
/// use fibre_injector::{Injectable, Injector};
/// use std::rc::Rc;
///
/// trait Clock: Injectable {
///   fn now(&self) -> u64;
/// }
///
/// struct FixedClock;
/// impl Injectable for FixedClock {}
/// impl Clock for FixedClock {
///   fn now(&self) -> u64 { 42 }
/// }
///
/// let injector = Injector::new();
/// injector.bind::<dyn Clock>(Rc::new(FixedClock));
/// assert_eq!(injector.get::<dyn Clock>().unwrap().now(), 42);
/// ```
pub trait Injectable: Reflect {
  /// Declares the injectable fields of `Self`. The default declares none.
  fn describe(_fields: &mut Fields<Self>)
  where
    Self: Sized,
  {
  }
}

/// Runtime access to the concrete type behind an injectable value.
///
/// Implemented for every `Injectable` type; it is what lets a `dyn Trait`
/// binding reach the field list of the type it was created from.
#[doc(hidden)]
pub trait Reflect: Any {
  fn type_info(&self) -> Arc<TypeInfo>;
  fn as_any(&self) -> &dyn Any;
  fn as_reflect(&self) -> &dyn Reflect;
}

impl<T: Injectable> Reflect for T {
  fn type_info(&self) -> Arc<TypeInfo> {
    reflector::reflect::<T>()
  }

  fn as_any(&self) -> &dyn Any {
    self
  }

  fn as_reflect(&self) -> &dyn Reflect {
    self
  }
}
