//! Fetch the merchant balance and any unsettled transactions.
//!
//! ```bash
//! WALLET_GATEWAY_API_KEY=... WALLET_GATEWAY_SECRET_KEY=... WALLET_GATEWAY_PASSWORD=... \
//! RUST_LOG=wallet_gateway=debug cargo run -p wallet-gateway --example check_balance
//! ```

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use wallet_gateway::WalletGatewayClient;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "wallet_gateway=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let client = WalletGatewayClient::from_env()?;
    tracing::info!("Using gateway at {}", client.config().base_url);

    let balance = client.get_balance().await?;
    println!(
        "Balance: {} (as of {})",
        balance.balance.map(|b| format!("{:.2}", b)).unwrap_or_else(|| "-".to_string()),
        balance
            .response_time
            .map(|t| t.to_rfc3339())
            .unwrap_or_else(|| "unknown".to_string())
    );

    let outstanding = client.get_outstanding_transactions().await?;
    println!(
        "Outstanding: {} credit / {} debit across {} transactions",
        outstanding.outstanding_credit.unwrap_or(0.0),
        outstanding.outstanding_debit.unwrap_or(0.0),
        outstanding.transactions.len()
    );
    for tx in &outstanding.transactions {
        println!(
            "  {} {} {} {}",
            tx.transaction_id.as_deref().unwrap_or("?"),
            tx.operation_type.map(|op| op.name()).unwrap_or("UNKNOWN"),
            tx.status.map(|s| s.name()).unwrap_or("UNKNOWN"),
            tx.amount.unwrap_or(0.0)
        );
    }

    Ok(())
}
