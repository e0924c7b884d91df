use fibre_injector::{injectable, Inject, Injectable, Injector};
use std::rc::Rc;
use tracing_subscriber::EnvFilter;

// 1. Two plain services living in the application scope.
struct Greetings {
  hello: &'static str,
}
injectable!(Greetings);

struct Farewells {
  goodbye: &'static str,
}
injectable!(Farewells);

// 2. An abstraction that each screen scope provides differently.
trait Theme: Injectable {
  fn decorate(&self, message: &str) -> String;
}

struct Plain;
injectable!(Plain);
impl Theme for Plain {
  fn decorate(&self, message: &str) -> String {
    message.to_string()
  }
}

struct Shouting;
injectable!(Shouting);
impl Theme for Shouting {
  fn decorate(&self, message: &str) -> String {
    format!("{}!", message.to_uppercase())
  }
}

// 3. A consumer that declares what it needs and prints once everything is wired.
#[derive(Default)]
struct Screen {
  greetings: Inject<Greetings>,
  farewells: Inject<Farewells>,
  theme: Inject<dyn Theme>,
}

impl Screen {
  fn print_messages(&self) {
    let theme = self.theme.get();
    println!("{}", theme.decorate(self.greetings.get().hello));
    println!("{}", theme.decorate(self.farewells.get().goodbye));
  }
}
injectable!(Screen { greetings, farewells, theme } post_construct = Screen::print_messages);

fn main() -> fibre_injector::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::from_default_env())
    .init();

  // --- Application scope ---
  let app = Injector::new();
  app.bind_instance(Greetings { hello: "Hello from the app scope" });
  app.bind_instance(Farewells { goodbye: "Goodbye from the app scope" });
  app.bind::<dyn Theme>(Rc::new(Plain));

  // Direct injection into an object that is not bound anywhere.
  let standalone = Screen::default();
  app.inject(&standalone)?;
  standalone.print_messages();

  // --- Screen scope: shadows the theme, inherits everything else ---
  let screen_scope = app.child();
  screen_scope.bind::<dyn Theme>(Rc::new(Shouting));
  screen_scope.bind_instance(Screen::default());

  // Injects the bound screen, then runs its post-construct hook.
  screen_scope.post_bindings()?;

  Ok(())
}
