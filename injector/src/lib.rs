//! # Fibre Injector
//!
//! A small, hierarchical dependency injection container for single-threaded
//! setup code.
//!
//! Instances are bound into an [`Injector`] under a type key. Other objects
//! declare their dependencies as [`Inject`] fields, and the injector fills
//! them by type, asking its parent chain when it has no binding of its own.
//!
//! ## Core Concepts
//!
//! - **Injector**: the registry of bindings. One per scope; a child injector
//!   sees everything its ancestors bind and can shadow any of it.
//! - **Binding**: one shared instance per type key per injector. The key is a
//!   type, including trait objects such as `dyn Greeter`.
//! - **Injection**: [`Injector::inject`] fills the `Inject` fields a type
//!   declares through [`Injectable::describe`] (or the [`injectable!`] macro).
//! - **Post-bind pass**: [`Injector::post_bindings`] injects every bound
//!   instance, then runs their post-construct hooks.
//!
//! ## Quick Start
//!
//! ```
//! use fibre_injector::{injectable, Inject, Injectable, Injector};
//! use std::rc::Rc;
//!
//! trait Greeter: Injectable {
//!   fn greet(&self) -> String;
//! }
//!
//! struct EnglishGreeter;
//! injectable!(EnglishGreeter);
//! impl Greeter for EnglishGreeter {
//!   fn greet(&self) -> String {
//!     "Hello, World!".to_string()
//!   }
//! }
//!
//! #[derive(Default)]
//! struct Welcome {
//!   greeter: Inject<dyn Greeter>,
//! }
//! injectable!(Welcome { greeter });
//!
//! let app = Injector::new();
//! app.bind::<dyn Greeter>(Rc::new(EnglishGreeter));
//!
//! // A child scope resolves through its parent.
//! let screen = app.child();
//! let welcome = Welcome::default();
//! screen.inject(&welcome).unwrap();
//!
//! assert_eq!(welcome.greeter.get().greet(), "Hello, World!");
//! ```

mod core;
mod error;
mod injectable;
mod injector;
mod macros;
pub mod reflector;
mod slot;

pub use crate::core::InjectionKey;
pub use error::{InjectorError, Result};
#[doc(hidden)]
pub use injectable::Reflect;
pub use injectable::Injectable;
pub use injector::Injector;
pub use reflector::{FieldDescriptor, Fields, TypeInfo};
pub use slot::Inject;
