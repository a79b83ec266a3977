//! # Example: emergency_dispatch
//!
//! A dispatch system notifies every responder station it knows about. Stations are
//! owned by the city, not by the dispatcher, so closing a station removes it from
//! future broadcasts without any explicit unregister call.
//!
//! Shows how to:
//! - Observe delegates with [`MulticastDelegate`].
//! - Drop a delegate and watch it disappear from the next broadcast.
//! - Use the fallible variant to find out which stations did not answer.
//!
//! ## Flow
//! ```text
//! police, fire ──► MulticastDelegate (Observing)
//!     ├─► invoke_delegates(notify_fire @ house)   → police, fire
//!     ├─► drop(fire)
//!     ├─► invoke_delegates(notify_fire @ garage)  → police
//!     └─► try_invoke_delegates(notify_car_crash)  → Incomplete { failures: [clinic] }
//! ```
//!
//! ## Run
//! ```bash
//! RUST_LOG=roster=trace cargo run --example emergency_dispatch
//! ```

use std::sync::Arc;

use roster::MulticastDelegate;

trait EmergencyResponding: Send + Sync {
    fn notify_fire(&self, at: &str);
    fn notify_car_crash(&self, at: &str) -> Result<(), String>;
}

struct FireStation;

impl EmergencyResponding for FireStation {
    fn notify_fire(&self, at: &str) {
        println!("Firefighters were notified about a fire at {at}");
    }

    fn notify_car_crash(&self, at: &str) -> Result<(), String> {
        println!("Firefighters were notified about a car crash at {at}");
        Ok(())
    }
}

struct PoliceStation;

impl EmergencyResponding for PoliceStation {
    fn notify_fire(&self, at: &str) {
        println!("Police were notified about a fire at {at}");
    }

    fn notify_car_crash(&self, at: &str) -> Result<(), String> {
        println!("Police were notified about a car crash at {at}");
        Ok(())
    }
}

/// A station whose phone line is down.
struct Clinic;

impl EmergencyResponding for Clinic {
    fn notify_fire(&self, _at: &str) {}

    fn notify_car_crash(&self, _at: &str) -> Result<(), String> {
        Err("clinic line busy".to_string())
    }
}

struct DispatchSystem {
    responders: MulticastDelegate<dyn EmergencyResponding>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,roster=debug".into()),
        )
        .init();

    let dispatch = DispatchSystem {
        responders: MulticastDelegate::new(),
    };

    let police: Arc<dyn EmergencyResponding> = Arc::new(PoliceStation);
    let fire: Arc<dyn EmergencyResponding> = Arc::new(FireStation);
    dispatch.responders.add_delegate(&police);
    dispatch.responders.add_delegate(&fire);

    dispatch.responders.invoke_delegates(|r| r.notify_fire("Ray's house"));
    println!();

    drop(fire);
    dispatch.responders.invoke_delegates(|r| r.notify_fire("Ray's garage"));
    println!();

    let clinic: Arc<dyn EmergencyResponding> = Arc::new(Clinic);
    dispatch.responders.add_delegate(&clinic);

    match dispatch
        .responders
        .try_invoke_delegates(|r| r.notify_car_crash("Main St"))
    {
        Ok(delivery) => println!("all {} responders answered", delivery.delivered),
        Err(err) => {
            println!("{err}");
            for failure in err.failures() {
                println!("  {} -> {}", failure.key(), failure.as_message());
            }
        }
    }
}
