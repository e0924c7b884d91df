//! Public macros for declaring injectable types.

/// Implements [`Injectable`](crate::Injectable) for a type.
///
/// With just a type, the impl is a plain marker. Listing field names declares
/// each of them as an injectable field; every listed field must be an
/// [`Inject<_>`](crate::Inject). A trailing `post_construct = path` names a
/// `fn(&Self)` to run during [`Injector::post_bindings`](crate::Injector::post_bindings).
///
/// # Examples
///
/// ```
/// use fibre_injector::{injectable, Inject, Injector};
///
/// struct Config { url: &'static str }
/// injectable!(Config);
///
/// #[derive(Default)]
/// struct Repository { config: Inject<Config> }
/// injectable!(Repository { config });
///
/// let injector = Injector::new();
/// injector.bind_instance(Config { url: "memory://" });
///
/// let repository = Repository::default();
/// injector.inject(&repository).unwrap();
/// assert_eq!(repository.config.get().url, "memory://");
/// ```
///
/// ```
/// use fibre_injector::{injectable, Inject, Injector};
/// use std::cell::Cell;
///
/// struct Clock;
/// injectable!(Clock);
///
/// #[derive(Default)]
/// struct Scheduler { clock: Inject<Clock>, started: Cell<bool> }
/// impl Scheduler {
///   fn start(&self) { self.started.set(self.clock.is_injected()); }
/// }
/// injectable!(Scheduler { clock } post_construct = Scheduler::start);
///
/// let injector = Injector::new();
/// injector.bind_instance(Clock);
/// let scheduler = injector.bind_instance(Scheduler::default());
/// injector.post_bindings().unwrap();
/// assert!(scheduler.started.get());
/// ```
#[macro_export]
macro_rules! injectable {
    // Fields plus a post-construct hook: injectable!(Type { a, b } post_construct = Type::ready)
    ($type:ty { $($field:ident),* $(,)? } post_construct = $hook:expr) => {
        impl $crate::Injectable for $type {
            fn describe(fields: &mut $crate::Fields<Self>) {
                $( fields.field(stringify!($field), |this| &this.$field); )*
                fields.post_construct($hook);
            }
        }
    };

    // Fields only: injectable!(Type { a, b })
    ($type:ty { $($field:ident),* $(,)? }) => {
        impl $crate::Injectable for $type {
            #[allow(unused_variables)]
            fn describe(fields: &mut $crate::Fields<Self>) {
                $( fields.field(stringify!($field), |this| &this.$field); )*
            }
        }
    };

    // Marker only: injectable!(Type)
    ($type:ty) => {
        impl $crate::Injectable for $type {}
    };
}
