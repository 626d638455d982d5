//! Realm commands

use crate::batch::BatchReport;
use crate::context::Invocation;
use crate::error::CliResult;
use clap::{Args, Subcommand};

#[derive(Args, Debug)]
pub struct RealmsArgs {
    #[command(subcommand)]
    pub command: RealmsCommands,
}

#[derive(Subcommand, Debug)]
pub enum RealmsCommands {
    /// List every realm on the server
    List,
}

impl RealmsCommands {
    pub fn verb(&self) -> &'static str {
        match self {
            RealmsCommands::List => "list",
        }
    }
}

pub async fn execute(args: RealmsArgs, inv: &mut Invocation, report: &mut BatchReport) -> CliResult<()> {
    match args.command {
        RealmsCommands::List => {
            let realms = inv.api().list_realms().await?;
            let total = realms.len();
            for realm in realms {
                report.push_line(realm);
            }
            report.push_line(format!("Total: {total}"));
            Ok(())
        }
    }
}
