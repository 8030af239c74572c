//! Balancer commands

use super::{finish_report, Context};
use crate::output::BalancerRow;
use crate::BalancerCommands;
use nlb_common::{Driver, EXTRA_POOL_ID};

pub async fn handle(action: BalancerCommands, ctx: &Context) -> anyhow::Result<()> {
    let driver = ctx.driver()?;
    match action {
        BalancerCommands::List => {
            let balancers = driver.list_balancers().await?;
            ctx.format
                .print(&balancers, balancers.iter().map(BalancerRow::from))?;
        }
        BalancerCommands::Get { id } => {
            let balancer = driver.get_balancer(&id).await?;
            ctx.format.print(&balancer, [BalancerRow::from(&balancer)])?;
        }
        BalancerCommands::Create {
            name,
            port,
            protocol,
            algorithm,
            members,
        } => {
            let report = driver
                .create_balancer(&name, port, &protocol, algorithm, &members)
                .await?;
            finish_report(&report, ctx.format)?;
        }
        BalancerCommands::Destroy { id } => {
            let balancer = driver.get_balancer(&id).await?;
            driver.destroy_balancer(&balancer).await?;
            eprintln!("Destroyed balancer: {}", id);
            if let Ok(pool_id) = balancer.extra_value(EXTRA_POOL_ID) {
                eprintln!("Pool {} and its nodes were kept", pool_id);
            }
        }
    }
    Ok(())
}
