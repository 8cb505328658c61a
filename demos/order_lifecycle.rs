//! Example: managing a Klarna order after checkout
//!
//! This example demonstrates how to:
//! 1. Load client configuration from the environment
//! 2. Fetch and acknowledge an order
//! 3. Capture part of the authorized amount and attach shipping info
//! 4. Refund part of the capture
//!
//! Run against the playground with:
//! KLARNA_USERNAME=... KLARNA_PASSWORD=... KLARNA_PLAYGROUND=true \
//!     cargo run --example order_lifecycle -- <order_id>

use klarna_order_management::{
    payload_from, CaptureId, ClientConfig, OrderId, OrderManagementClient,
};
use serde_json::{json, Value};
use std::env;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    klarna_order_management::init_tracing();

    let order_id = env::args()
        .nth(1)
        .map(OrderId::new)
        .ok_or("usage: order_lifecycle <order_id>")?;

    println!("=== Klarna Order Lifecycle Example ===\n");

    // 1. Configuration
    let config = ClientConfig::from_env()?;
    println!("1. Using {}\n", config.base_url);
    let client = OrderManagementClient::from_config(&config)?;

    // 2. Fetch and acknowledge
    let order: Value = client.get_order(&order_id).await?.json()?;
    println!(
        "2. Order {} is {} with {} authorized",
        order_id, order["status"], order["remaining_authorized_amount"]
    );
    client.acknowledge(&order_id).await?;
    println!("   ✓ Acknowledged\n");

    // 3. Capture half and attach shipping info
    let amount = order["remaining_authorized_amount"].as_u64().unwrap_or(0) / 2;
    let capture = payload_from(&json!({
        "captured_amount": amount,
        "description": "First shipment"
    }))?;
    let created = client.create_capture(&order_id, &capture).await?;
    let capture_id = created
        .header("capture-id")
        .map(CaptureId::new)
        .ok_or("capture response carried no Capture-Id header")?;
    println!("3. Captured {} as {}", amount, capture_id);

    let shipping = payload_from(&json!({
        "shipping_info": [{
            "shipping_company": "DHL",
            "shipping_method": "Home",
            "tracking_number": "63456415674545679874"
        }]
    }))?;
    client
        .add_shipping_info_to_capture(&order_id, &capture_id, &shipping)
        .await?;
    println!("   ✓ Shipping info added\n");

    // 4. Refund part of the capture
    let refund = payload_from(&json!({
        "refunded_amount": amount / 10,
        "description": "Damaged item"
    }))?;
    let refunded = client.create_refund(&order_id, &refund).await?;
    println!(
        "4. Refund created at {}",
        refunded.location().unwrap_or("<no location>")
    );

    Ok(())
}
