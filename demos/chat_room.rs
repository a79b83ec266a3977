//! # Example: chat_room
//!
//! Chat members never reference each other; every message goes through a
//! [`Mediator`] that relays it to everyone except the sender.
//!
//! Shows how to:
//! - Own colleagues in a [`Mediator`] (default [`Ownership::Exclusive`]).
//! - Register a guest as observing only, so it leaves when its owner drops it.
//! - Join a member from inside a relay (reentrant add) and see it only afterwards.
//!
//! ## Flow
//! ```text
//! alice, bob (owned), guest (observed) ──► Mediator
//!     ├─► alice.send("hello")   → bob, guest
//!     ├─► drop(guest)
//!     ├─► bob.send("bye guest") → alice
//!     └─► carol joins during relay → receives nothing this round
//! ```
//!
//! ## Run
//! ```bash
//! RUST_LOG=roster=trace cargo run --example chat_room
//! ```

use std::sync::Arc;

use roster::{Mediator, Ownership};

trait Member: Send + Sync {
    fn name(&self) -> &str;
    fn receive(&self, from: &str, text: &str);
}

struct Person {
    name: String,
}

impl Person {
    fn arc(name: &str) -> Arc<dyn Member> {
        Arc::new(Person {
            name: name.to_string(),
        })
    }
}

impl Member for Person {
    fn name(&self) -> &str {
        &self.name
    }

    fn receive(&self, from: &str, text: &str) {
        println!("[{}] {from}: {text}", self.name);
    }
}

fn send(room: &Mediator<dyn Member>, sender: &Arc<dyn Member>, text: &str) {
    println!("{} says {text:?}", sender.name());
    room.invoke_colleagues_except(sender, |m| m.receive(sender.name(), text));
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,roster=debug".into()),
        )
        .init();

    let room: Mediator<dyn Member> = Mediator::new();

    let alice = Person::arc("alice");
    let bob = Person::arc("bob");
    let guest = Person::arc("guest");

    room.add_colleague(Arc::clone(&alice));
    room.add_colleague(Arc::clone(&bob));
    room.add_colleague_with(Arc::clone(&guest), Ownership::Observing);

    send(&room, &alice, "hello");
    drop(guest);
    send(&room, &bob, "bye guest");

    // Carol joins while bob's message is being relayed.
    let mut carol_joined = false;
    room.invoke_colleagues_except(&bob, |m| {
        m.receive("bob", "anyone else coming?");
        if !carol_joined {
            room.add_colleague(Person::arc("carol"));
            carol_joined = true;
        }
    });

    let names: Vec<String> = room
        .colleagues()
        .iter()
        .map(|m| m.name().to_string())
        .collect();
    println!("members now: {names:?}");
}
