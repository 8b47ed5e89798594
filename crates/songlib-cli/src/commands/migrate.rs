//! Migrate commands

use clap::{Args, Subcommand};

use songlib_store::migrations::{scan, Direction};
use songlib_store::MigrationReport;

use crate::app;

#[derive(Debug, Args)]
pub struct MigrateArgs {
    #[command(subcommand)]
    pub command: MigrateCommand,
}

#[derive(Debug, Subcommand)]
pub enum MigrateCommand {
    /// Apply pending migrations
    Up(UpArgs),
    /// Replay every down script
    Down,
    /// List applied and pending versions
    Status,
}

#[derive(Debug, Args)]
pub struct UpArgs {
    /// Leave the schema as-is when a migration fails instead of running down
    #[arg(long)]
    pub no_rollback: bool,
}

pub async fn execute(args: MigrateArgs) -> anyhow::Result<()> {
    let config = app::load_config()?;

    match args.command {
        MigrateCommand::Up(up) => {
            let report = app::with_migrator(&config, move |migrator, ctx| {
                if up.no_rollback {
                    Ok(migrator.up(ctx)?)
                } else {
                    migrator.up_or_rollback(ctx).map_err(app::up_failure)
                }
            })
            .await?;
            print_report(&report);
        }
        MigrateCommand::Down => {
            let report =
                app::with_migrator(&config, |migrator, ctx| Ok(migrator.down(ctx)?)).await?;
            print_report(&report);
        }
        MigrateCommand::Status => {
            let (applied, available) = app::with_migrator(&config, |migrator, ctx| {
                let applied = migrator.applied_migrations(ctx)?;
                let available = scan(migrator.dir(), Direction::Up)?;
                Ok((applied, available))
            })
            .await?;

            for version in &applied {
                println!("applied  {}", version);
            }
            for file in available.iter().filter(|f| !applied.contains(&f.version)) {
                println!("pending  {}", file.version);
            }
        }
    }

    Ok(())
}

fn print_report(report: &MigrationReport) {
    println!(
        "migrate {}: {} executed, {} skipped in {} ms",
        report.direction,
        report.executed.len(),
        report.skipped.len(),
        report.elapsed.as_millis()
    );
    for version in &report.executed {
        println!("  {}", version);
    }
}
