//! The field type that marks a dependency as "to be injected".

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// A dependency slot filled by an [`Injector`](crate::Injector).
///
/// Declaring a field as `Inject<T>` and listing it in
/// [`Injectable::describe`](crate::Injectable::describe) is how a type asks
/// for `T`. The slot starts empty; the injector writes it, everybody else can
/// only read it. Injecting again replaces the previous value.
pub struct Inject<T: ?Sized> {
  slot: RefCell<Option<Rc<T>>>,
}

impl<T: ?Sized> Inject<T> {
  /// Creates an empty slot.
  pub fn new() -> Self {
    Self {
      slot: RefCell::new(None),
    }
  }

  /// Returns the injected dependency.
  ///
  /// # Panics
  ///
  /// Panics if nothing has been injected yet. Use [`Inject::try_get`] for a
  /// non-panicking version.
  pub fn get(&self) -> Rc<T> {
    self.try_get().unwrap_or_else(|| {
      panic!(
        "Dependency has not been injected: {}",
        std::any::type_name::<T>()
      )
    })
  }

  /// Returns the injected dependency, or `None` while the slot is empty.
  pub fn try_get(&self) -> Option<Rc<T>> {
    self.slot.borrow().clone()
  }

  pub fn is_injected(&self) -> bool {
    self.slot.borrow().is_some()
  }

  pub(crate) fn set(&self, value: Rc<T>) {
    *self.slot.borrow_mut() = Some(value);
  }
}

impl<T: ?Sized> Default for Inject<T> {
  fn default() -> Self {
    Self::new()
  }
}

impl<T: ?Sized> fmt::Debug for Inject<T> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Inject")
      .field("type", &std::any::type_name::<T>())
      .field("injected", &self.is_injected())
      .finish()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn slot_starts_empty_and_keeps_last_value() {
    let slot: Inject<String> = Inject::default();
    assert!(!slot.is_injected());
    assert!(slot.try_get().is_none());

    let first = Rc::new("first".to_string());
    let second = Rc::new("second".to_string());
    slot.set(Rc::clone(&first));
    assert!(Rc::ptr_eq(&slot.get(), &first));

    slot.set(Rc::clone(&second));
    assert!(Rc::ptr_eq(&slot.get(), &second));
  }

  #[test]
  #[should_panic(expected = "Dependency has not been injected")]
  fn get_panics_on_empty_slot() {
    let slot: Inject<u8> = Inject::new();
    slot.get();
  }

  #[test]
  fn debug_reports_state_without_the_value() {
    let slot: Inject<str> = Inject::new();
    assert!(format!("{:?}", slot).contains("injected: false"));
  }
}
