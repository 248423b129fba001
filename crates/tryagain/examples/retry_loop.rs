//! Example: driving a retry loop with each interval strategy
//!
//! This example demonstrates:
//! 1. Constant interval bounded by attempts
//! 2. Exponential backoff bounded by a deadline
//! 3. Decorrelated jitter stopped by cancellation
//! 4. Running the operation through `execute`
//!
//! Run with:
//! ```bash
//! cargo run -p tryagain --example retry_loop
//! ```

use std::error::Error;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::{Duration, Instant};
use tryagain::prelude::*;

/// A simulated API that fails the first few times
struct UnreliableApi {
    attempts: Arc<AtomicU32>,
    fail_count: u32,
}

impl UnreliableApi {
    fn new(fail_count: u32) -> Self {
        Self {
            attempts: Arc::new(AtomicU32::new(0)),
            fail_count,
        }
    }

    async fn call(&self) -> Result<String, std::io::Error> {
        let attempt = self.attempts.fetch_add(1, Ordering::SeqCst);

        if attempt < self.fail_count {
            println!("  Attempt {}: FAILED", attempt + 1);
            Err(std::io::Error::other(format!(
                "Transient error on attempt {}",
                attempt + 1
            )))
        } else {
            println!("  Attempt {}: SUCCESS", attempt + 1);
            Ok("API response data".to_string())
        }
    }
}

/// Example 1: constant interval, stop after ten attempts
async fn example_constant() {
    println!("\n=== Example 1: Constant Interval, 10 Attempts ===\n");

    let mut retry = Retry::constant(ConstantOptions {
        interval: Some(Duration::from_millis(100)),
        max_attempts: 10,
        ..Default::default()
    });

    let mut start = Instant::now();
    while retry.next().await {
        println!("  retry {}: {:?} elapsed", retry.attempts(), start.elapsed());
        start = Instant::now();
    }
    println!("Stopped: {:?}", retry.stop_reason());
}

/// Example 2: exponential backoff until a two-second deadline
async fn example_exponential_deadline() {
    println!("\n=== Example 2: Exponential Backoff, 2s Deadline ===\n");

    let mut retry = Retry::exponential_backoff(ExponentialBackoffOptions {
        signal: Some(StopSignal::timeout(Duration::from_secs(2))),
        base_interval: Some(Duration::from_millis(50)),
        max_interval: Some(Duration::from_secs(1)),
        ..Default::default()
    });

    let mut start = Instant::now();
    while retry.next().await {
        println!("  retry {}: {:?} elapsed", retry.attempts(), start.elapsed());
        start = Instant::now();
    }
    println!("Stopped: {:?}", retry.stop_reason());
}

/// Example 3: jitter, cancelled from another task
async fn example_jitter_cancel() {
    println!("\n=== Example 3: Decorrelated Jitter, Cancelled After 500ms ===\n");

    let signal = StopSignal::new();
    let mut retry = Retry::jitter(JitterOptions {
        signal: Some(signal.clone()),
        base: Some(Duration::from_millis(10)),
        max: Some(Duration::from_millis(200)),
        ..Default::default()
    });

    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(500)).await;
        signal.cancel();
    });

    let mut start = Instant::now();
    while retry.next().await {
        println!("  retry {}: {:?} elapsed", retry.attempts(), start.elapsed());
        start = Instant::now();
    }
    println!("Stopped: {:?}", retry.stop_reason());
}

/// Example 4: let the driver run the operation
async fn example_execute() -> Result<(), Box<dyn Error>> {
    println!("\n=== Example 4: execute() ===\n");

    let api = UnreliableApi::new(2);
    let mut retry = Retry::exponential_backoff(ExponentialBackoffOptions {
        base_interval: Some(Duration::from_millis(50)),
        max_attempts: 5,
        ..Default::default()
    });

    let result = retry
        .execute(|| {
            let api = &api;
            async move { api.call().await }
        })
        .await?;

    println!("\nResult: {}", result);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    println!("==============================================");
    println!("   tryagain: Retry Loop Examples");
    println!("==============================================");

    example_constant().await;
    example_exponential_deadline().await;
    example_jitter_cancel().await;
    example_execute().await?;

    println!("\n==============================================");
    println!("   All examples completed successfully!");
    println!("==============================================\n");

    Ok(())
}
