//! `balances` and `settle` subcommands.

use std::io::Write;

use engine::{BalanceService, BalanceStatus, GroupBalances, GroupId, LedgerStore, MemberId};

use crate::{
    cli::{BalancesArgs, Command, SettleArgs},
    error::{AppError, Result},
};

pub async fn run<S: LedgerStore>(
    service: &BalanceService<S>,
    command: Command,
    out: &mut impl Write,
) -> Result<()> {
    match command {
        Command::Balances(args) => balances(service, args, out).await,
        Command::Settle(args) => settle(service, args, out).await,
    }
}

async fn balances<S: LedgerStore>(
    service: &BalanceService<S>,
    args: BalancesArgs,
    out: &mut impl Write,
) -> Result<()> {
    let group = GroupId::new(&args.group)?;
    let view = service.group_balances(&group).await?;
    render(out, &view, args.json)
}

async fn settle<S: LedgerStore>(
    service: &BalanceService<S>,
    args: SettleArgs,
    out: &mut impl Write,
) -> Result<()> {
    let group = GroupId::new(&args.group)?;
    let acting = args.acting.as_deref().map(MemberId::new).transpose()?;

    if args.all {
        let acting = acting.ok_or_else(|| AppError::Usage("--all needs --as".to_string()))?;
        let plan = service.group_balances(&group).await?;
        let mine: Vec<_> = plan
            .transfers
            .iter()
            .filter(|t| t.involves(&acting))
            .collect();
        if mine.is_empty() {
            writeln!(out, "Nothing to settle for {acting}.")?;
        }
        for transfer in mine {
            service.settle_transfer(&group, &acting, transfer).await?;
            writeln!(
                out,
                "Recorded {} -> {}: {}",
                transfer.from_name, transfer.to_name, transfer.amount
            )?;
        }
    } else {
        let (Some(from), Some(to), Some(amount)) = (args.from, args.to, args.amount) else {
            return Err(AppError::Usage(
                "settle needs --from, --to and --amount, or --all".to_string(),
            ));
        };
        let from = MemberId::new(from)?;
        let to = MemberId::new(to)?;
        let settlement = match &acting {
            Some(acting) => service.settle_as(&group, acting, &from, &to, amount).await?,
            None => service.record_settlement(&group, &from, &to, amount).await?,
        };
        writeln!(out, "Recorded {from} -> {to}: {}", settlement.amount)?;
    }

    let view = service.group_balances(&group).await?;
    render(out, &view, args.json)
}

fn render(out: &mut impl Write, view: &GroupBalances, json: bool) -> Result<()> {
    if json {
        serde_json::to_writer_pretty(&mut *out, view)?;
        writeln!(out)?;
        return Ok(());
    }

    writeln!(out, "Balances")?;
    let width = view
        .balances
        .iter()
        .map(|b| b.display_name.chars().count())
        .max()
        .unwrap_or(0);
    for balance in &view.balances {
        let status = match balance.status() {
            BalanceStatus::Owed => "is owed",
            BalanceStatus::Owes => "owes",
            BalanceStatus::Settled => "settled",
        };
        writeln!(
            out,
            "  {:<width$}  {:>10}  {status}",
            balance.display_name,
            balance.amount.signed(),
        )?;
    }

    writeln!(out)?;
    if view.is_settled() {
        writeln!(out, "All settled up!")?;
    } else {
        writeln!(out, "Transfers")?;
        for transfer in &view.transfers {
            writeln!(
                out,
                "  {} -> {}: {}",
                transfer.from_name, transfer.to_name, transfer.amount
            )?;
        }
    }

    for issue in &view.issues {
        writeln!(out, "warning: {issue}")?;
    }
    Ok(())
}
