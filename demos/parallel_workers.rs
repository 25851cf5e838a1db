use std::{
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use eventbus::*;

// With several workers, handlers for different publications overlap and
// complete in no particular order.
#[tokio::main]
async fn main() -> Result {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let bus = Bus::with_options("parallel", 4, 16)?;
    let handled = Arc::new(AtomicUsize::new(0));

    let counter = handled.clone();
    bus.subscribe("job", move |payload: &Payload| -> HandlerResult {
        let id = std::str::from_utf8(payload)?;
        std::thread::sleep(Duration::from_millis(100));
        counter.fetch_add(1, Ordering::Relaxed);
        println!("job {id} done on {:?}", std::thread::current().id());
        Ok(())
    })?;

    let mut id = 0;
    while id < 32 {
        match bus.publish("job", id.to_string()) {
            Ok(()) => id += 1,
            Err(Error::SubmissionRejected(Rejection::QueueFull)) => {
                // Reject-when-full: the producer decides how to back off.
                tokio::time::sleep(Duration::from_millis(20)).await;
            }
            Err(e) => return Err(e),
        }
    }

    bus.shutdown().await;
    println!("handled {} jobs", handled.load(Ordering::Relaxed));
    Ok(())
}
