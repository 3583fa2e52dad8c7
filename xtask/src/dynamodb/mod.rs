//! DynamoDB infrastructure management commands.

mod client;
mod config;
mod deploy;
mod error;
mod planning;
mod seed;

pub use error::{DynamodbError, Result};

use crate::prelude::*;
use dialoguer::Confirm;
use visitlog_core::visits::{
    sample_visitors, VisitTables, DEFAULT_VISITOR_TABLE, DEFAULT_VISIT_INDEX, DEFAULT_VISIT_TABLE,
};

/// DynamoDB infrastructure management commands.
#[derive(Debug, clap::Parser)]
pub struct DynamodbCommand {
    #[command(subcommand)]
    pub action: DynamodbAction,
}

/// Available DynamoDB actions.
#[derive(Debug, clap::Subcommand)]
pub enum DynamodbAction {
    /// Deploy or destroy DynamoDB table infrastructure.
    Deploy(DeployCommand),

    /// Write the demo visitor profiles.
    Seed(SeedCommand),
}

/// Table and index names, shared with the visitlog binary's environment.
#[derive(Debug, Clone, clap::Args)]
pub struct TableArgs {
    /// Visit table name.
    #[arg(long, env = "VISIT_TABLE_NAME", default_value = DEFAULT_VISIT_TABLE)]
    pub visit_table: String,

    /// Location index on the visit table.
    #[arg(long, env = "VISIT_INDEX_NAME", default_value = DEFAULT_VISIT_INDEX)]
    pub visit_index: String,

    /// Visitor profile table name.
    #[arg(long, env = "VISITOR_TABLE_NAME", default_value = DEFAULT_VISITOR_TABLE)]
    pub visitor_table: String,
}

impl TableArgs {
    fn tables(&self) -> VisitTables {
        VisitTables {
            visit_table: self.visit_table.clone(),
            visit_index: self.visit_index.clone(),
            visitor_table: self.visitor_table.clone(),
        }
    }
}

/// Deploy or update DynamoDB infrastructure.
#[derive(Debug, clap::Parser)]
#[command(long_about = "Deploy or destroy DynamoDB table infrastructure.

By default, this command creates the visit table (keyed by visitor and
location, with a location index) and the visitor profile table, or adds
missing indexes to existing tables.

The command shows a plan of changes before applying and asks for confirmation.

Environment variables:
  AWS_ENDPOINT_URL    - Use local DynamoDB (e.g., http://localhost:8000)
  AWS_REGION          - AWS region (defaults to us-east-1)
  AWS_PROFILE         - AWS profile to use for credentials")]
pub struct DeployCommand {
    /// Skip confirmation prompts.
    #[arg(long)]
    pub force: bool,

    /// Destroy the tables instead of creating/updating.
    #[arg(long)]
    pub destroy: bool,

    #[command(flatten)]
    pub tables: TableArgs,
}

/// Write the demo visitor profiles.
#[derive(Debug, clap::Parser)]
#[command(long_about = "Insert the visitor profiles used by `visitlog demo`.

Existing profiles with the same names are overwritten.")]
pub struct SeedCommand {
    #[command(flatten)]
    pub tables: TableArgs,

    /// Skip confirmation prompts.
    #[arg(long)]
    pub force: bool,
}

/// Main entry point for dynamodb command.
pub async fn run(command: DynamodbCommand, global: crate::Global) -> Result<()> {
    match command.action {
        DynamodbAction::Deploy(deploy_cmd) => run_deploy(deploy_cmd, &global).await,
        DynamodbAction::Seed(seed_cmd) => run_seed(seed_cmd, &global).await,
    }
}

fn confirm(prompt: &str, default: bool) -> Result<()> {
    let confirmed = Confirm::new()
        .with_prompt(prompt)
        .default(default)
        .interact()
        .map_err(|e| DynamodbError::AwsSdk(e.to_string()))?;

    if confirmed {
        Ok(())
    } else {
        Err(DynamodbError::UserCancelled)
    }
}

async fn run_deploy(cmd: DeployCommand, global: &crate::Global) -> Result<()> {
    let aws_config = client::AwsConfig::default();

    if !global.is_silent() {
        aprintln!("{} {}", p_b("Target:"), aws_config.target_display());
        aprintln!();
    }

    let dynamo_client = client::create_client(&aws_config).await;
    let configs: Vec<config::TableConfig> = cmd
        .tables
        .tables()
        .schemas()
        .iter()
        .map(config::table_config)
        .collect();

    if cmd.destroy {
        let mut plans = Vec::new();
        for table in &configs {
            let current = client::get_table_state(&dynamo_client, &table.table_name).await?;
            plans.push(planning::calculate_destroy_plan(
                current.as_ref(),
                &table.table_name,
            ));
        }

        if !global.is_silent() {
            aprintln!("{}", p_y("Destroy Plan:"));
            for plan in &plans {
                for line in planning::format_destroy_plan(plan) {
                    aprintln!("  {}", p_r(&line));
                }
            }
            aprintln!();
        }

        if plans
            .iter()
            .all(|plan| matches!(plan, planning::DestroyPlan::AlreadyGone { .. }))
        {
            if !global.is_silent() {
                aprintln!("{}", p_g("Nothing to destroy."));
            }
            return Ok(());
        }

        if !cmd.force {
            confirm(
                "Are you sure you want to delete these tables? ALL DATA WILL BE LOST",
                false,
            )?;
        }

        if !global.is_silent() {
            aprintln!("{}", p_b("Deleting tables..."));
        }

        for plan in &plans {
            deploy::execute_destroy_plan(&dynamo_client, plan).await?;
        }

        if !global.is_silent() {
            aprintln!("{}", p_g("Tables destroyed successfully."));
        }
    } else {
        let mut plans = Vec::new();
        for table in &configs {
            let current = client::get_table_state(&dynamo_client, &table.table_name).await?;
            plans.push(planning::calculate_deploy_plan(current.as_ref(), table));
        }

        if !global.is_silent() {
            aprintln!("{}", p_c("Deploy Plan:"));
            for plan in &plans {
                print_plan_lines(&planning::format_deploy_plan(plan));
            }
            aprintln!();
        }

        // A key mismatch cannot be fixed in place; fail before touching anything.
        if let Some(planning::DeployPlan::KeyMismatch {
            table_name,
            expected,
            found,
        }) = plans
            .iter()
            .find(|plan| matches!(plan, planning::DeployPlan::KeyMismatch { .. }))
        {
            return Err(DynamodbError::KeySchemaMismatch {
                table_name: table_name.clone(),
                expected: expected.clone(),
                found: found.clone(),
            });
        }

        if !plans.iter().any(planning::DeployPlan::has_changes) {
            if !global.is_silent() {
                aprintln!("{}", p_g("Infrastructure is up to date."));
            }
            return Ok(());
        }

        if !cmd.force {
            confirm("Apply these changes?", true)?;
        }

        if !global.is_silent() {
            aprintln!("{}", p_b("Applying changes..."));
        }

        for plan in &plans {
            deploy::execute_deploy_plan(&dynamo_client, plan).await?;
        }

        if !global.is_silent() {
            aprintln!("{}", p_g("Infrastructure deployed successfully."));
        }
    }

    Ok(())
}

async fn run_seed(cmd: SeedCommand, global: &crate::Global) -> Result<()> {
    let aws_config = client::AwsConfig::default();
    let table_name = cmd.tables.visitor_table;
    let visitors = sample_visitors();

    if !global.is_silent() {
        aprintln!("{} {}", p_b("Target:"), aws_config.target_display());
        aprintln!("{} {}", p_b("Table:"), table_name);
        aprintln!();
    }

    let dynamo_client = client::create_client(&aws_config).await;

    // Verify table exists
    let table_state = client::get_table_state(&dynamo_client, &table_name).await?;
    if table_state.is_none() {
        return Err(DynamodbError::TableNotFound { table_name });
    }

    if !global.is_silent() {
        aprintln!("{}", p_c("Profiles to write:"));
        for visitor in &visitors {
            aprintln!("  {} ({}, {})", visitor.name, visitor.city, visitor.state);
        }
        aprintln!();
    }

    if !cmd.force {
        confirm(&format!("Write {} profiles?", visitors.len()), true)?;
    }

    let inserted = seed::seed_visitors(&dynamo_client, &table_name, &visitors).await?;

    if !global.is_silent() {
        aprintln!("{} {} profiles written.", p_g("Success:"), inserted);
    }

    Ok(())
}
