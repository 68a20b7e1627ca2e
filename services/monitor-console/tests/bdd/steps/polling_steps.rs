//! BDD step definitions for the status polling feature

use std::time::Duration;

use cucumber::{given, then, when};

use crate::world::{eventually, ConsoleWorld};

#[given(expr = "the server will fail status requests with {string}")]
fn reject_status(world: &mut ConsoleWorld, message: String) {
    world.server.reject_status_requests(&message);
}

#[when(expr = "{int} status request(s) has/have been received")]
async fn status_requests_received(world: &mut ConsoleWorld, count: usize) {
    let server = world.server.clone();
    eventually("status requests", || server.requests_to("update").len() >= count).await;
    world.status_count_mark = world.status_requests().len();
}

#[when(expr = "{int} more status request(s) has/have been received")]
async fn more_status_requests_received(world: &mut ConsoleWorld, count: usize) {
    let target = world.status_requests().len() + count;
    let server = world.server.clone();
    eventually("more status requests", || {
        server.requests_to("update").len() >= target
    })
    .await;
    world.status_count_mark = target;
}

#[when("the poller is stopped")]
async fn poller_stopped(world: &mut ConsoleWorld) {
    let handle = world.poll_handle.take().expect("poller was not started");
    handle.shutdown().await;
    world.status_count_mark = world.status_requests().len();
}

#[then(expr = "every status request was authenticated with {string}")]
fn every_status_request_authenticated(world: &mut ConsoleWorld, credential: String) {
    let requests = world.status_requests();
    assert!(!requests.is_empty());
    for request in requests {
        assert_eq!(request.param("admin_password"), Some(credential.as_str()));
    }
}

#[then(expr = "the latest status request was authenticated with {string}")]
fn latest_status_request_authenticated(world: &mut ConsoleWorld, credential: String) {
    let requests = world.status_requests();
    let latest = requests.last().expect("no status request was sent");
    assert_eq!(latest.param("admin_password"), Some(credential.as_str()));
}

#[then(expr = "the poller reports at least {int} consecutive failure(s)")]
async fn consecutive_failures(world: &mut ConsoleWorld, count: u32) {
    let status = world.console().poller().status();
    let deadline = tokio::time::Instant::now() + Duration::from_secs(2);
    loop {
        if status.read().await.consecutive_failures >= count {
            break;
        }
        assert!(
            tokio::time::Instant::now() < deadline,
            "poller never reached {} consecutive failures",
            count
        );
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}

#[then("no further status requests are sent")]
async fn no_further_status_requests(world: &mut ConsoleWorld) {
    let interval = world.console().poller().interval();
    tokio::time::sleep(interval * 4).await;
    assert_eq!(world.status_requests().len(), world.status_count_mark);
}
