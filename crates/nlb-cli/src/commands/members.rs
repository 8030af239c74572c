//! Member commands

use super::{finish_report, Context};
use crate::output::MemberRow;
use crate::MemberCommands;
use anyhow::Context as _;
use nlb_common::{Driver, Member};

pub async fn handle(action: MemberCommands, ctx: &Context) -> anyhow::Result<()> {
    let driver = ctx.driver()?;
    match action {
        MemberCommands::List { balancer } => {
            let balancer = driver.get_balancer(&balancer).await?;
            let members = driver.balancer_list_members(&balancer).await?;
            ctx.format.print(&members, members.iter().map(MemberRow::from))?;
        }
        MemberCommands::Attach {
            balancer,
            ip,
            port,
            name,
        } => {
            let balancer = driver.get_balancer(&balancer).await?;
            let mut member = Member::new(ip, port);
            if let Some(name) = name {
                member = member.with_name(name);
            }
            let report = driver.balancer_attach_member(&balancer, &member).await?;
            finish_report(&report, ctx.format)?;
        }
        MemberCommands::Detach { balancer, member } => {
            let balancer = driver.get_balancer(&balancer).await?;
            let found = driver
                .balancer_list_members(&balancer)
                .await?
                .into_iter()
                .find(|m| m.id.as_deref() == Some(member.as_str()))
                .with_context(|| format!("member {} is not attached to {}", member, balancer.id))?;
            driver.balancer_detach_member(&balancer, &found).await?;
            eprintln!("Detached member: {}", member);
        }
    }
    Ok(())
}
