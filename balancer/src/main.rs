//! Main entry point for the tab-balancer binary
//!
//! Balances a JSON window snapshot offline through [`InMemoryHost`], using
//! the same planner and executor a browser host would drive.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::fs;

use balancer::{
    BalancerConfig, BalancerResult, InMemoryHost, JsonFileSettings, Plan, SettingsStore, TabBalancer,
};
use shared::{Component, component_debug, component_info, logging};

/// Keep browser windows within tab-count limits
#[derive(Parser)]
#[command(name = "tab-balancer")]
#[command(about = "Balances tabs across browser windows by domain")]
pub struct Args {
    /// JSON snapshot of the host's windows (array of windows with tabs)
    #[arg(long)]
    pub windows: PathBuf,

    /// JSON settings file holding a saved configuration
    #[arg(long)]
    pub settings: Option<PathBuf>,

    /// Write the resolved configuration back to the settings file
    #[arg(long, requires = "settings")]
    pub save_settings: bool,

    /// Windows above this many tabs shed units
    #[arg(long)]
    pub max_tabs: Option<usize>,

    /// Windows below this many tabs are consolidated or refilled
    #[arg(long)]
    pub min_tabs: Option<usize>,

    /// Keep existing tab groups together (true/false)
    #[arg(long)]
    pub respect_grouping: Option<bool>,

    /// Group tabs by domain and title after balancing
    #[arg(long)]
    pub auto_group: bool,

    /// Print the plan without moving anything
    #[arg(long)]
    pub dry_run: bool,

    /// Write the resulting windows to this JSON file
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

impl Args {
    /// Overlay command-line flags on a configuration
    fn apply(&self, mut config: BalancerConfig) -> BalancerResult<BalancerConfig> {
        if let Some(max_tabs) = self.max_tabs {
            config.max_tabs = max_tabs;
        }
        if let Some(min_tabs) = self.min_tabs {
            config.min_tabs = min_tabs;
        }
        if let Some(respect_grouping) = self.respect_grouping {
            config.respect_grouping = respect_grouping;
        }
        if self.auto_group {
            config.auto_group = true;
        }
        config.validate()?;
        Ok(config)
    }
}

/// Defaults, then settings file, then environment, then flags
async fn resolve_config(args: &Args) -> BalancerResult<BalancerConfig> {
    let stored = match &args.settings {
        Some(path) => JsonFileSettings::new(path).load().await?,
        None => None,
    };
    let config = args.apply(stored.unwrap_or_default().with_env_overrides()?)?;

    if args.save_settings {
        if let Some(path) = &args.settings {
            JsonFileSettings::new(path).save(&config).await?;
        }
    }
    Ok(config)
}

fn print_plan(plan: &Plan) {
    if plan.is_empty() {
        println!("Nothing to move");
        return;
    }
    for op in &plan.moves {
        println!("{} tabs: {} -> {}", op.tab_ids.len(), op.source, op.target);
    }
    if !plan.doomed.is_empty() {
        let doomed: Vec<String> = plan.doomed.iter().map(ToString::to_string).collect();
        println!("Emptied: {}", doomed.join(", "));
    }
}

#[tokio::main]
async fn main() -> BalancerResult<()> {
    let args = Args::parse();

    logging::init_tracing_with_level(Some(&args.log_level));
    logging::log_startup(Component::Balancer, "tab balancer");

    let config = resolve_config(&args).await?;
    component_debug!(
        Component::Balancer,
        "Config: maxTabs={}, minTabs={}, respectGrouping={}, autoGroup={}",
        config.max_tabs,
        config.min_tabs,
        config.respect_grouping,
        config.auto_group
    );

    let host = Arc::new(InMemoryHost::load(&args.windows).await?);
    let balancer = TabBalancer::new(host.clone(), config);

    if args.dry_run {
        let plan = balancer.plan().await?;
        print_plan(&plan);
        return Ok(());
    }

    let report = balancer.balance_windows().await?;
    print_plan(&report.plan);
    println!("{}", serde_json::to_string_pretty(&report.execution)?);
    if let Some(auto_group) = &report.auto_group {
        println!("{}", serde_json::to_string_pretty(auto_group)?);
    }

    if let Some(output) = &args.output {
        fs::write(output, host.to_json().await?).await?;
        component_info!(Component::Balancer, "Wrote windows to {}", output.display());
    }

    logging::log_success(Component::Balancer, "Balancing run finished");
    Ok(())
}
