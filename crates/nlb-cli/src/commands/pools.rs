//! Pool commands

use super::Context;
use crate::output::PoolRow;
use crate::PoolCommands;

pub async fn handle(action: PoolCommands, ctx: &Context) -> anyhow::Result<()> {
    let driver = ctx.driver()?;
    match action {
        PoolCommands::List => {
            let pools = driver.ex_get_pools().await?;
            ctx.format.print(&pools, pools.iter().map(PoolRow::from))?;
        }
        PoolCommands::Get { id } => {
            let pool = driver.ex_get_pool(&id).await?;
            ctx.format.print(&pool, [PoolRow::from(&pool)])?;
        }
    }
    Ok(())
}
