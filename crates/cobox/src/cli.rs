//! Clap derive structures for the `cobox` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use std::fmt;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// cobox -- fleet administration from the command line
#[derive(Debug, Parser)]
#[command(
    name = "cobox",
    version,
    about = "Administer a CoBox delivery fleet from the command line",
    long_about = "Client for the CoBox fleet administration backend.\n\n\
        Manage vehicles, drivers, delivery orders, routes and incidents.\n\
        Most commands require a session: run `cobox login` first.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Config file to read instead of the platform default
    #[arg(long, env = "COBOX_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Backend origin (overrides config and COBOX_API_BASE_URL)
    #[arg(long, global = true)]
    pub api_base_url: Option<String>,

    /// Output format [default: from config, else table]
    #[arg(long, short = 'o', global = true)]
    pub output: Option<OutputFormat>,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Request timeout in seconds (overrides config)
    #[arg(long, global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Sign in and store the session
    Login(LoginArgs),

    /// Create a new account (does not sign in)
    Register(RegisterArgs),

    /// Sign out and forget the stored session
    Logout,

    /// Show the signed-in user
    Whoami,

    /// Show the sidebar, or resolve a dashboard path
    Nav(NavArgs),

    /// Manage fleet vehicles
    #[command(alias = "v")]
    Vehicles(VehiclesArgs),

    /// Manage drivers
    #[command(alias = "d")]
    Drivers(DriversArgs),

    /// Manage delivery orders
    #[command(alias = "o")]
    Orders(OrdersArgs),

    /// Manage delivery routes
    #[command(alias = "r")]
    Routes(RoutesArgs),

    /// View incidents and reassign responsibility
    #[command(alias = "inc")]
    Incidents(IncidentsArgs),

    /// Look up users
    Users(UsersArgs),

    /// Inspect CLI configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Session ──────────────────────────────────────────────────────────

#[derive(Args)]
pub struct LoginArgs {
    /// Account email
    #[arg(long, short = 'e', env = "COBOX_EMAIL")]
    pub email: Option<String>,

    /// Password (prompted when omitted)
    #[arg(long, env = "COBOX_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,
}

#[derive(Args)]
pub struct RegisterArgs {
    /// Account email
    #[arg(long, short = 'e')]
    pub email: String,

    #[arg(long)]
    pub first_name: String,

    #[arg(long)]
    pub last_name: String,

    /// Phone number (9-20 characters)
    #[arg(long)]
    pub phone: String,

    /// Role to request (repeatable)
    #[arg(long = "role")]
    pub roles: Vec<String>,

    /// Password (prompted when omitted)
    #[arg(long, env = "COBOX_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,
}

// Passwords stay out of debug logs.
impl fmt::Debug for LoginArgs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginArgs")
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

impl fmt::Debug for RegisterArgs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterArgs")
            .field("email", &self.email)
            .field("roles", &self.roles)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Args)]
pub struct NavArgs {
    /// Dashboard path to resolve, e.g. /dashboard/routes
    pub path: Option<String>,
}

// ── Vehicles ─────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct VehiclesArgs {
    #[command(subcommand)]
    pub command: VehiclesCommand,
}

#[derive(Debug, Subcommand)]
pub enum VehiclesCommand {
    /// List all vehicles
    #[command(alias = "ls")]
    List,

    /// Show one vehicle
    Get {
        #[arg(value_parser = clap::value_parser!(i64).range(1..))]
        id: i64,
    },

    /// Register a vehicle
    Create {
        /// Licence plate
        #[arg(long)]
        plate: String,

        /// Load capacity in kilograms
        #[arg(long)]
        capacity_kg: f64,
    },
}

// ── Drivers ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct DriversArgs {
    #[command(subcommand)]
    pub command: DriversCommand,
}

#[derive(Debug, Subcommand)]
pub enum DriversCommand {
    /// List all drivers
    #[command(alias = "ls")]
    List,

    /// Show one driver
    Get {
        #[arg(value_parser = clap::value_parser!(i64).range(1..))]
        id: i64,
    },

    /// Register a driver
    Create {
        /// Licence number (9-10 characters)
        #[arg(long)]
        licence: String,
    },

    /// List the routes assigned to a driver
    Routes {
        #[arg(value_parser = clap::value_parser!(i64).range(1..))]
        id: i64,
    },
}

// ── Orders ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct OrdersArgs {
    #[command(subcommand)]
    pub command: OrdersCommand,
}

#[derive(Debug, Subcommand)]
pub enum OrdersCommand {
    /// List all orders
    #[command(alias = "ls")]
    List,

    /// Show one order
    Get {
        #[arg(value_parser = clap::value_parser!(i64).range(1..))]
        id: i64,
    },

    /// Fetch several orders at once (fails if any is missing)
    Batch {
        /// Order ids
        #[arg(required = true, value_delimiter = ',')]
        ids: Vec<i64>,
    },

    /// Create an order
    Create(CreateOrderArgs),

    /// Mark an order ready for pickup
    Ready { id: i64 },

    /// Complete an order with proof of delivery
    Complete(CompleteOrderArgs),
}

#[derive(Debug, Args)]
pub struct CreateOrderArgs {
    /// Read the order from a JSON file instead of flags
    #[arg(long, short = 'F', conflicts_with_all = [
        "client_id", "address", "city", "country", "postal_code", "weight_kg",
    ])]
    pub from_file: Option<PathBuf>,

    #[arg(long, required_unless_present = "from_file")]
    pub client_id: Option<i64>,

    /// Street address
    #[arg(long, required_unless_present = "from_file")]
    pub address: Option<String>,

    #[arg(long, required_unless_present = "from_file")]
    pub city: Option<String>,

    #[arg(long, required_unless_present = "from_file")]
    pub country: Option<String>,

    #[arg(long, required_unless_present = "from_file")]
    pub postal_code: Option<String>,

    /// Parcel weight in kilograms
    #[arg(long, required_unless_present = "from_file")]
    pub weight_kg: Option<f64>,

    /// Reference latitude (requires --lon)
    #[arg(long, requires = "lon", allow_hyphen_values = true)]
    pub lat: Option<f64>,

    /// Reference longitude (requires --lat)
    #[arg(long, requires = "lat", allow_hyphen_values = true)]
    pub lon: Option<f64>,

    #[arg(long)]
    pub notes: Option<String>,
}

#[derive(Debug, Args)]
pub struct CompleteOrderArgs {
    pub id: i64,

    /// Route the order was delivered on
    #[arg(long)]
    pub route: i64,

    /// URL of the delivery photo
    #[arg(long)]
    pub photo_url: String,

    /// Name of the person who received the parcel
    #[arg(long)]
    pub receiver: String,

    /// Signature data (data URL or encoded image)
    #[arg(long, required_unless_present = "signature_file")]
    pub signature: Option<String>,

    /// Read signature data from a file
    #[arg(long, conflicts_with = "signature")]
    pub signature_file: Option<PathBuf>,
}

// ── Routes ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct RoutesArgs {
    #[command(subcommand)]
    pub command: RoutesCommand,
}

#[derive(Debug, Subcommand)]
pub enum RoutesCommand {
    /// List all routes
    #[command(alias = "ls")]
    List,

    /// Show one route
    Get {
        #[arg(value_parser = clap::value_parser!(i64).range(1..))]
        id: i64,
    },

    /// Create a route
    Create {
        #[arg(long)]
        title: String,
    },

    /// Add an order to a route
    AddOrder {
        id: i64,
        #[arg(long)]
        order: i64,
    },

    /// Assign a vehicle to a route
    AssignVehicle {
        id: i64,
        #[arg(long)]
        vehicle: i64,
    },

    /// Assign a driver to a route
    AssignDriver {
        id: i64,
        #[arg(long)]
        driver: i64,
    },

    /// Mark a route as in progress
    Start { id: i64 },
}

// ── Incidents ────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct IncidentsArgs {
    #[command(subcommand)]
    pub command: IncidentsCommand,
}

#[derive(Debug, Subcommand)]
pub enum IncidentsCommand {
    /// List all incidents
    #[command(alias = "ls")]
    List,

    /// Show one incident
    Get { id: String },

    /// Reassign the responsible user
    Assign {
        /// Incident id
        id: String,

        /// New responsible user id (see `cobox users search`)
        #[arg(long)]
        user: Option<String>,

        /// Why the responsibility changes
        #[arg(long, default_value = "")]
        reason: String,
    },
}

// ── Users ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct UsersArgs {
    #[command(subcommand)]
    pub command: UsersCommand,
}

#[derive(Debug, Subcommand)]
pub enum UsersCommand {
    /// Search users by name or email (at least 2 characters)
    Search { term: String },
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show the resolved configuration
    Show,

    /// Print the config file path
    Path,
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
