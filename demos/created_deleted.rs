use std::time::Duration;

use eventbus::*;
use serde::{Deserialize, Serialize};

const CREATED_EVENT: &str = "created_event";
const DELETED_EVENT: &str = "deleted_event";

#[derive(Serialize, Deserialize, Debug)]
struct CreatedPayload {
    #[serde(rename = "Message")]
    message: String,
}

#[derive(Serialize, Deserialize, Debug)]
struct DeletedPayload {
    #[serde(rename = "Name")]
    name: String,
}

fn on_created(payload: &Payload) -> HandlerResult {
    let created: CreatedPayload = payload.to_json()?;

    // Simulate slow work; handlers run on a blocking thread.
    std::thread::sleep(Duration::from_secs(2));
    println!("{created:?}");
    Ok(())
}

fn on_deleted(payload: &Payload) -> HandlerResult {
    let deleted: DeletedPayload = payload.to_json()?;
    println!("{deleted:?}");
    Ok(())
}

#[tokio::main]
async fn main() -> std::result::Result<(), BoxError> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let bus = Bus::builder("event-bus-1-100")
        .max_workers(1)
        .queue_size(100)
        .validator(JsonValidator)
        .monitor(monitors::Tracer)
        .build()?;

    bus.subscribe(CREATED_EVENT, on_created)?;
    bus.subscribe(DELETED_EVENT, on_deleted)?;

    for user in 1..=2 {
        let created = Payload::from_json(&CreatedPayload {
            message: format!("user {user} created"),
        })?;
        bus.publish(CREATED_EVENT, created)?;

        let deleted = Payload::from_json(&DeletedPayload {
            name: format!("user {user}"),
        })?;
        bus.publish(DELETED_EVENT, deleted)?;
    }

    println!("published events");

    // Graceful shutdown: waits for all four events to be handled
    bus.shutdown().await;
    Ok(())
}
