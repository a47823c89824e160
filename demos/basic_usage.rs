//! Basic logger usage example
//!
//! Demonstrates the default console handler, custom handlers with their own
//! thresholds and gates, and structured messages.
//!
//! Run with: cargo run --example basic_usage

use rust_fanout_logger::prelude::*;
use rust_fanout_logger::{info, warning};
use serde::Serialize;

#[derive(Serialize)]
struct Request<'a> {
    method: &'a str,
    path: &'a str,
    status: u16,
}

fn main() -> Result<()> {
    println!("=== Rust Fanout Logger - Basic Usage Example ===\n");

    // The default logger reports every level to the console
    println!("1. Logging at different levels:");
    let logger = Logger::with_namespace("demo");
    logger.fatal("This is a fatal message");
    logger.error("This is an error message");
    logger.warning("This is a warning message");
    logger.info("This is an info message");
    logger.debug("This is a debug message");
    logger.trace("This is a trace message");
    logger.audit("user 42 changed their password");
    logger.metric("requests_per_second=1250");
    rust_fanout_logger::flush();

    // A warning-level handler without the audit channel
    println!("\n2. A handler with its own threshold and gates:");
    let handler = HandlerConfig::new()
        .level("warning")
        .allow_audit(false)
        .on_message(|text: &str, _event: &LogEvent| {
            println!("   observed: {}", text);
        })
        .build()?;
    let strict = Logger::with_handler(handler.clone(), Some("strict"));
    strict.info("Info message (hidden)");
    strict.audit("Audit record (hidden)");
    strict.warning("Warning message (visible)");
    strict.metric("Metric record (visible)");
    rust_fanout_logger::flush();

    // Type and id annotations
    println!("\n3. Annotated and structured messages:");
    strict.error_with(
        "query timed out",
        MessageOptions::new().kind("db").id("conn-7"),
    );
    logger.log_value(
        Severity::Info,
        &Request {
            method: "GET",
            path: "/health",
            status: 200,
        },
        MessageOptions::new().kind("http"),
    )?;
    info!(logger, "listening on port {}", 8080);
    warning!(logger, "{} retries left", 2);
    rust_fanout_logger::flush();

    // Disposed handlers stop reporting
    println!("\n4. Disposing a handler:");
    handler.dispose();
    strict.fatal("Fatal message (hidden, handler disposed)");
    println!("   strict logger level: {:?}", strict.level());
    rust_fanout_logger::flush();

    println!("\n=== Example completed successfully! ===");

    Ok(())
}
