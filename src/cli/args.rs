// Copyright (c) 2025 Nikolay Denev <ndenev@gmail.com>
// SPDX-License-Identifier: BSD-3-Clause

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "mysqlbackup-lister")]
#[command(author, version, about = "List MySQLBackupSchedules from a watch-backed local cache")]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Kubernetes context to use (defaults to config, then kubeconfig's current context)
    #[arg(short, long, global = true, value_name = "CONTEXT")]
    pub context: Option<String>,

    /// Namespace to query (defaults to config, then "default")
    #[arg(short, long, global = true)]
    pub namespace: Option<String>,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value = "table")]
    pub output: OutputFormat,

    /// Omit column headers in output
    #[arg(long, global = true)]
    pub no_headers: bool,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List schedules
    List {
        /// List across all namespaces
        #[arg(short = 'A', long)]
        all_namespaces: bool,

        /// Label selector, e.g. "tier=gold,env in (prod,staging)"
        #[arg(short = 'l', long)]
        selector: Option<String>,
    },

    /// Get one schedule by name
    Get {
        /// Schedule name
        name: String,
    },

    /// Keep the cache running and re-print the list periodically
    Watch {
        /// Watch across all namespaces
        #[arg(short = 'A', long)]
        all_namespaces: bool,

        /// Label selector
        #[arg(short = 'l', long)]
        selector: Option<String>,

        /// Seconds between refreshes
        #[arg(long, default_value = "5")]
        interval: u64,
    },

    /// Show or change saved defaults
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Print the current configuration
    Show,
    /// Save the default namespace
    SetNamespace { namespace: String },
    /// Save the default kubeconfig context
    SetContext { context: String },
}

#[derive(ValueEnum, Clone, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Yaml,
}
